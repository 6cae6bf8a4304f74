//! Cross-business availability resolution.
//!
//! Slots are fetched for the requested business first. Only when nothing
//! bookable remains after filtering are the same-category siblings asked,
//! all of them concurrently, and every sibling with at least one slot is
//! reported as an alternative.

use std::sync::Arc;

use barberbot_core::{
    Business, Directory, Service, Slot, SlotView, TimePreference, TimeWindow, dedup_sorted,
};
use barberbot_providers::AvailabilityScope;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};
use crate::registry::PlatformRegistry;

/// What to look availability up for.
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub business: Business,
    pub service: Service,
    pub date: NaiveDate,
    pub preference: TimePreference,
    /// Restricts the primary query to one staff member.
    pub resource_id: Option<String>,
}

impl AvailabilityRequest {
    pub fn new(business: Business, service: Service, date: NaiveDate) -> Self {
        Self {
            business,
            service,
            date,
            preference: TimePreference::Any,
            resource_id: None,
        }
    }

    #[must_use]
    pub fn with_preference(mut self, preference: TimePreference) -> Self {
        self.preference = preference;
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }
}

/// Whether siblings were searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Fallback {
    /// The requested business had slots.
    NotNeeded,
    /// The requested business had none; this many siblings were asked.
    Searched { siblings_checked: usize },
}

/// A sibling business that can take the booking instead.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub business: Business,
    /// The sibling's own service matching the requested one by name.
    pub service: Service,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub business: Business,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub alternatives: Vec<Alternative>,
    pub fallback: Fallback,
}

impl Resolution {
    /// True when neither the business nor any sibling has a slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.alternatives.is_empty()
    }

    pub fn view(&self, offset: &FixedOffset) -> ResolutionView {
        ResolutionView {
            business_id: self.business.id.clone(),
            business_name: self.business.name.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            slots: self.slots.iter().map(|slot| slot.view(offset)).collect(),
            alternatives: self
                .alternatives
                .iter()
                .map(|alt| AlternativeView {
                    business_id: alt.business.id.clone(),
                    business_name: alt.business.name.clone(),
                    service_id: alt.service.id.clone(),
                    slots: alt.slots.iter().map(|slot| slot.view(offset)).collect(),
                })
                .collect(),
            fallback: self.fallback,
        }
    }
}

/// Serializable form of a [`Resolution`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionView {
    pub business_id: String,
    pub business_name: String,
    pub date: String,
    pub slots: Vec<SlotView>,
    pub alternatives: Vec<AlternativeView>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeView {
    pub business_id: String,
    pub business_name: String,
    pub service_id: String,
    pub slots: Vec<SlotView>,
}

/// Slots that can still be offered at `now` under `preference`, sorted and
/// without duplicate starts.
pub fn offerable(
    slots: Vec<Slot>,
    now: DateTime<Utc>,
    preference: &TimePreference,
    offset: &FixedOffset,
) -> Vec<Slot> {
    dedup_sorted(
        slots
            .into_iter()
            .filter(|slot| slot.start > now && preference.matches_instant(slot.start, offset))
            .collect(),
    )
}

#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    registry: Arc<PlatformRegistry>,
    directory: Arc<Directory>,
    config: BookingConfig,
}

impl AvailabilityResolver {
    pub fn new(
        registry: Arc<PlatformRegistry>,
        directory: Arc<Directory>,
        config: BookingConfig,
    ) -> Self {
        Self {
            registry,
            directory,
            config,
        }
    }

    pub async fn resolve(&self, request: &AvailabilityRequest) -> BookingResult<Resolution> {
        self.resolve_at(request, Utc::now()).await
    }

    /// Same as [`Self::resolve`] with an explicit clock.
    pub async fn resolve_at(
        &self,
        request: &AvailabilityRequest,
        now: DateTime<Utc>,
    ) -> BookingResult<Resolution> {
        if self.config.is_closed(request.date) {
            return Err(BookingError::validation(
                "date",
                format!("businesses are closed on {}", request.date.format("%A")),
            ));
        }

        let offset = self.config.utc_offset;
        let window = TimeWindow::for_date(request.date, offset);
        let business = &request.business;

        let platform = self.registry.for_business(business);
        let raw = platform
            .get_availability(
                business,
                &request.service,
                AvailabilityScope::from_resource(request.resource_id.clone()),
                window,
            )
            .await?;
        let slots = offerable(raw, now, &request.preference, &offset);

        if !slots.is_empty() {
            debug!(business = %business.name, count = slots.len(), "slots found");
            return Ok(Resolution {
                business: business.clone(),
                date: request.date,
                slots,
                alternatives: Vec::new(),
                fallback: Fallback::NotNeeded,
            });
        }

        let siblings: Vec<&Business> = self.directory.siblings_of(business).collect();
        info!(
            business = %business.name,
            siblings = siblings.len(),
            "no slots, searching siblings"
        );

        let searches = siblings.iter().map(|sibling| {
            self.sibling_alternative(sibling, &request.service.name, window, &request.preference, now)
        });
        let alternatives: Vec<Alternative> = join_all(searches).await.into_iter().flatten().collect();

        Ok(Resolution {
            business: business.clone(),
            date: request.date,
            slots: Vec::new(),
            alternatives,
            fallback: Fallback::Searched {
                siblings_checked: siblings.len(),
            },
        })
    }

    /// Failures here only mean "no alternative at this sibling".
    async fn sibling_alternative(
        &self,
        sibling: &Business,
        service_name: &str,
        window: TimeWindow,
        preference: &TimePreference,
        now: DateTime<Utc>,
    ) -> Option<Alternative> {
        let platform = self.registry.for_business(sibling);

        let services = match platform.list_services(sibling).await {
            Ok(services) => services,
            Err(e) => {
                warn!(business = %sibling.name, error = %e, "sibling services unavailable");
                return None;
            }
        };
        let Some(service) = services.into_iter().find(|s| s.same_name_as(service_name)) else {
            debug!(business = %sibling.name, service = %service_name, "sibling lacks service");
            return None;
        };

        let raw = match platform
            .get_availability(sibling, &service, AvailabilityScope::Unspecified, window)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(business = %sibling.name, error = %e, "sibling availability unavailable");
                return None;
            }
        };

        let slots = offerable(raw, now, preference, &window.offset);
        if slots.is_empty() {
            return None;
        }
        Some(Alternative {
            business: sibling.clone(),
            service,
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePlatform;
    use barberbot_core::{Category, Platform, default_offset};
    use chrono::{Duration, TimeZone};

    const RICO: &str = "rico";
    const H21: &str = "holicstvi-21";
    const THIRD: &str = "third-cut";
    const ANATOMIC: &str = "anatomic";

    fn directory() -> Directory {
        Directory::new(vec![
            Business::new(RICO, "Rico Studio", Category::Barbershop, Platform::Reservio, "t1")
                .as_default(),
            Business::new(H21, "Holičství 21", Category::Barbershop, Platform::Reservio, "t2"),
            Business::new(THIRD, "Third Cut", Category::Barbershop, Platform::Reservio, "t3"),
            Business::new(ANATOMIC, "Anatomic Fitness", Category::Physiotherapy, Platform::Reservio, "t4"),
        ])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 7).unwrap()
    }

    /// Local (+01:00) wall-clock time on the test date.
    fn local(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 7, hour, minute, 0).unwrap() - Duration::hours(1)
    }

    fn slot(hour: u32, minute: u32) -> Slot {
        Slot::starting_at(local(hour, minute), Duration::minutes(30))
    }

    fn haircut() -> Service {
        Service::new("s-rico", "Haircut", 30)
    }

    fn resolver(fake: FakePlatform) -> (AvailabilityResolver, Arc<FakePlatform>) {
        let fake = Arc::new(fake);
        let registry = PlatformRegistry::new().with_platform(fake.clone());
        let resolver = AvailabilityResolver::new(
            Arc::new(registry),
            Arc::new(directory()),
            BookingConfig::default(),
        );
        (resolver, fake)
    }

    fn request(preference: TimePreference) -> AvailabilityRequest {
        let rico = directory().find(RICO).unwrap().clone();
        AvailabilityRequest::new(rico, haircut(), date()).with_preference(preference)
    }

    fn early_morning() -> DateTime<Utc> {
        local(7, 0)
    }

    #[tokio::test]
    async fn empty_primary_reports_sibling_alternative() {
        let fake = FakePlatform::new(Platform::Reservio)
            .with_services(RICO, vec![haircut()])
            .with_slots(RICO, vec![])
            .with_services(H21, vec![Service::new("s-h21", " haircut ", 30)])
            .with_slots(H21, vec![slot(15, 30), slot(14, 0), slot(14, 0)])
            .with_services(THIRD, vec![Service::new("s-3", "Haircut", 30)]);
        let (resolver, fake) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Any), early_morning())
            .await
            .unwrap();

        assert!(resolution.slots.is_empty());
        assert_eq!(resolution.fallback, Fallback::Searched { siblings_checked: 2 });
        assert_eq!(resolution.alternatives.len(), 1);
        let alt = &resolution.alternatives[0];
        assert_eq!(alt.business.name, "Holičství 21");
        assert_eq!(alt.service.id, "s-h21");
        assert_eq!(alt.slots, vec![slot(14, 0), slot(15, 30)]);

        let view = resolution.view(&default_offset());
        assert_eq!(view.alternatives[0].slots[0].start_time, "2:00 PM");
        assert_eq!(view.alternatives[0].slots[1].start_time, "3:30 PM");

        let calls = fake.availability_calls();
        assert!(!calls.contains(&ANATOMIC.to_string()));
    }

    #[tokio::test]
    async fn past_and_current_slots_are_dropped() {
        let now = local(10, 0);
        let fake = FakePlatform::new(Platform::Reservio)
            .with_slots(RICO, vec![slot(9, 0), slot(10, 0), slot(10, 30), slot(11, 0)]);
        let (resolver, _) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Any), now)
            .await
            .unwrap();
        assert_eq!(resolution.slots, vec![slot(10, 30), slot(11, 0)]);
        assert_eq!(resolution.fallback, Fallback::NotNeeded);
    }

    #[tokio::test]
    async fn morning_preference_keeps_only_morning() {
        let fake = FakePlatform::new(Platform::Reservio)
            .with_slots(RICO, vec![slot(9, 0), slot(13, 0), slot(18, 0)]);
        let (resolver, fake) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Morning), early_morning())
            .await
            .unwrap();

        assert_eq!(resolution.slots, vec![slot(9, 0)]);
        assert!(resolution.alternatives.is_empty());
        assert_eq!(resolution.fallback, Fallback::NotNeeded);
        assert_eq!(fake.availability_calls(), vec![RICO.to_string()]);
    }

    #[tokio::test]
    async fn preference_can_empty_the_primary() {
        let fake = FakePlatform::new(Platform::Reservio)
            .with_slots(RICO, vec![slot(9, 0), slot(13, 0)])
            .with_services(H21, vec![Service::new("s-h21", "Haircut", 30)])
            .with_slots(H21, vec![slot(17, 0), slot(11, 0)]);
        let (resolver, _) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Evening), early_morning())
            .await
            .unwrap();
        assert!(resolution.slots.is_empty());
        assert_eq!(resolution.alternatives[0].slots, vec![slot(17, 0)]);
    }

    #[tokio::test]
    async fn every_sibling_is_queried_once_even_when_one_fails() {
        let fake = FakePlatform::new(Platform::Reservio)
            .with_services(H21, vec![Service::new("s-h21", "Haircut", 30)])
            .with_services(THIRD, vec![Service::new("s-3", "Haircut", 30)])
            .with_slots(THIRD, vec![slot(16, 0)])
            .failing_for(H21);
        let (resolver, fake) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Any), early_morning())
            .await
            .unwrap();

        let calls = fake.availability_calls();
        assert_eq!(calls.iter().filter(|id| *id == RICO).count(), 1);
        assert_eq!(calls.iter().filter(|id| *id == THIRD).count(), 1);
        // H21 fails at the services call, before availability
        assert_eq!(calls.iter().filter(|id| *id == H21).count(), 0);
        assert_eq!(FakePlatform::count(&fake.service_calls), 2);

        assert_eq!(resolution.alternatives.len(), 1);
        assert_eq!(resolution.alternatives[0].business.id, THIRD);
    }

    #[tokio::test]
    async fn siblings_keep_directory_order() {
        let fake = FakePlatform::new(Platform::Reservio)
            .with_services(H21, vec![Service::new("s-h21", "Haircut", 30)])
            .with_slots(H21, vec![slot(16, 0)])
            .with_services(THIRD, vec![Service::new("s-3", "Haircut", 30)])
            .with_slots(THIRD, vec![slot(9, 0)]);
        let (resolver, _) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Any), early_morning())
            .await
            .unwrap();
        let ids: Vec<&str> = resolution
            .alternatives
            .iter()
            .map(|alt| alt.business.id.as_str())
            .collect();
        assert_eq!(ids, vec![H21, THIRD]);
    }

    #[tokio::test]
    async fn searched_without_alternatives_is_distinguishable() {
        let fake = FakePlatform::new(Platform::Reservio);
        let (resolver, _) = resolver(fake);

        let resolution = resolver
            .resolve_at(&request(TimePreference::Any), early_morning())
            .await
            .unwrap();
        assert!(resolution.is_empty());
        assert_eq!(resolution.fallback, Fallback::Searched { siblings_checked: 2 });
    }

    #[tokio::test]
    async fn primary_failure_propagates() {
        let fake = FakePlatform::new(Platform::Reservio).failing_for(RICO);
        let (resolver, fake) = resolver(fake);

        let err = resolver
            .resolve_at(&request(TimePreference::Any), early_morning())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Upstream(_)));
        assert_eq!(fake.availability_calls(), vec![RICO.to_string()]);
    }

    #[tokio::test]
    async fn closed_day_is_rejected_before_any_call() {
        let fake = FakePlatform::new(Platform::Reservio);
        let (resolver, fake) = resolver(fake);

        let saturday = NaiveDate::from_ymd_opt(2025, 10, 11).unwrap();
        let mut request = request(TimePreference::Any);
        request.date = saturday;

        let err = resolver.resolve_at(&request, early_morning()).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert!(fake.availability_calls().is_empty());
    }

    #[test]
    fn offerable_sorts_and_dedups() {
        let slots = offerable(
            vec![slot(15, 0), slot(9, 0), slot(15, 0), slot(12, 0)],
            early_morning(),
            &TimePreference::Any,
            &default_offset(),
        );
        assert_eq!(slots, vec![slot(9, 0), slot(12, 0), slot(15, 0)]);
        assert!(slots.windows(2).all(|w| w[0].start < w[1].start));
    }
}
