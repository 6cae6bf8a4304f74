//! Plain-text renderings for terminal output.
//!
//! Every command can also print JSON (`--json`); these are the short human
//! forms.

use barberbot_booking::{BookingOutcome, BusinessDetails, BusinessServices, Fallback, ResolutionView, UserRecord};
use barberbot_core::{Location, Resource, Service, SlotView};

pub fn overview(entries: &[BusinessServices]) -> String {
    if entries.is_empty() {
        return "No businesses found.".to_string();
    }
    let mut lines = Vec::new();
    for entry in entries {
        let business = &entry.business;
        let mut heading = business.name.clone();
        if let Some(rating) = business.rating {
            heading.push_str(&format!(" ({rating:.1}*)"));
        }
        if business.is_default {
            heading.push_str(" [default]");
        }
        lines.push(heading);
        if entry.services.is_empty() {
            lines.push("  no services available".to_string());
        }
        for service in &entry.services {
            lines.push(format!("  {}", service_line(service)));
        }
    }
    lines.join("\n")
}

pub fn details(details: &BusinessDetails) -> String {
    let info = &details.info;
    let mut lines = vec![info.name.clone()];
    let fields = [
        ("address", details.address.as_deref()),
        ("phone", info.phone.as_deref()),
        ("email", info.email.as_deref()),
        ("website", info.website.as_deref()),
        ("instagram", details.business.instagram.as_deref()),
        ("timezone", info.timezone.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            lines.push(format!("  {label}: {value}"));
        }
    }
    lines.join("\n")
}

pub fn services(services: &[Service]) -> String {
    if services.is_empty() {
        return "No services.".to_string();
    }
    services.iter().map(service_line).collect::<Vec<_>>().join("\n")
}

fn service_line(service: &Service) -> String {
    let mut line = format!("{} ({} min)", service.name, service.duration_minutes);
    if let Some(price) = service.price {
        let currency = service.currency.as_deref().unwrap_or("CZK");
        line.push_str(&format!(", {price:.0} {currency}"));
    }
    line.push_str(&format!("  [{}]", service.id));
    line
}

pub fn resources(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No staff listed.".to_string();
    }
    resources
        .iter()
        .map(|r| format!("{}  [{}]", r.name, r.id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn locations(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No locations listed.".to_string();
    }
    locations
        .iter()
        .map(|l| format!("{}  [{}]", l.name, l.id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn slot_times(slots: &[SlotView]) -> String {
    slots
        .iter()
        .map(|s| s.start_time.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn resolution(view: &ResolutionView) -> String {
    if !view.slots.is_empty() {
        return format!(
            "{} on {}: {}",
            view.business_name,
            view.date,
            slot_times(&view.slots)
        );
    }

    let mut lines = vec![format!("{} has nothing free on {}.", view.business_name, view.date)];
    match view.fallback {
        Fallback::Searched { siblings_checked: 0 } | Fallback::NotNeeded => {}
        Fallback::Searched { .. } if view.alternatives.is_empty() => {
            lines.push("No other place has a free slot that day either.".to_string());
        }
        Fallback::Searched { .. } => {
            lines.push("Free elsewhere:".to_string());
            for alt in &view.alternatives {
                lines.push(format!("  {}: {}", alt.business_name, slot_times(&alt.slots)));
            }
        }
    }
    lines.join("\n")
}

pub fn outcome(outcome: &BookingOutcome) -> String {
    format!(
        "Booked {} at {} for {} ({} - {}). Booking {} is {}.",
        outcome.service_name,
        outcome.business_name,
        outcome.slot.start.get(..10).unwrap_or(&outcome.slot.start),
        outcome.slot.start_time,
        outcome.slot.end_time,
        outcome.confirmation.booking_id,
        outcome.confirmation.status,
    )
}

pub fn users(users: &[UserRecord]) -> String {
    if users.is_empty() {
        return "No registered users.".to_string();
    }
    users
        .iter()
        .map(|u| match u.created_at.as_deref() {
            Some(created) => format!("{}  (since {created})", u.phone_number),
            None => u.phone_number.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn user(user: &UserRecord) -> String {
    format!("Registered {}.", user.phone_number)
}
