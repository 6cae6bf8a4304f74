//! Availability, booking and cancellation.

use barberbot_booking::{AvailabilityRequest, BookingError, BookingOrder};
use barberbot_core::{CustomerDetails, TimePreference, parse_date};

use crate::app::App;
use crate::cli::parse_start;
use crate::error::ClientResult;
use crate::render;

pub async fn availability(
    app: &App,
    business: &str,
    service: &str,
    date: &str,
    preference: TimePreference,
    resource: Option<&str>,
) -> ClientResult<()> {
    let date = parse_date(date).map_err(BookingError::from)?;
    let business = app.catalog.business(business)?;

    let resolution = app
        .runner
        .run("availability", move || async move {
            let service = app.catalog.service(business, service).await?;
            let mut request = AvailabilityRequest::new(business.clone(), service, date)
                .with_preference(preference);
            if let Some(resource) = resource {
                request = request.with_resource(resource);
            }
            app.resolver.resolve(&request).await
        })
        .await?;

    app.emit(&resolution.view(&app.booking.utc_offset), render::resolution)
}

/// Contact and slot details of a `book` invocation.
#[derive(Debug, Clone, Copy)]
pub struct BookArgs<'a> {
    pub business: &'a str,
    pub service: &'a str,
    pub start: &'a str,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub resource: Option<&'a str>,
    pub note: Option<&'a str>,
}

pub async fn book(app: &App, args: BookArgs<'_>) -> ClientResult<()> {
    let start = parse_start(args.start, &app.booking.utc_offset).ok_or_else(|| {
        BookingError::validation("start", "expected YYYY-MM-DD HH:MM or an RFC 3339 timestamp")
    })?;
    let business = app.catalog.business(args.business)?;

    let mut customer = CustomerDetails::from_full_name(args.name);
    customer.phone = args.phone.map(str::to_string);
    customer.email = args.email.map(str::to_string);

    let outcome = app
        .runner
        .run("book", move || {
            let customer = customer.clone();
            async move {
                let service = app.catalog.service(business, args.service).await?;
                let mut order = BookingOrder::new(service, customer, start);
                if let Some(resource) = args.resource {
                    order = order.with_resource(resource);
                }
                if let Some(note) = args.note {
                    order = order.with_note(note);
                }
                app.bookings.book(business, order).await
            }
        })
        .await?;

    app.emit(&outcome, render::outcome)
}

pub async fn cancel(app: &App, business: &str, booking_id: &str) -> ClientResult<()> {
    let business = app.catalog.business(business)?;
    app.runner
        .run("cancel", move || app.bookings.cancel(business, booking_id))
        .await?;
    println!("Booking {} at {} cancelled.", booking_id.trim(), business.name);
    Ok(())
}
