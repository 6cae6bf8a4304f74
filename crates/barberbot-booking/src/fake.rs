//! In-memory platform used by the tests of this crate.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use barberbot_core::{
    BookingConfirmation, BookingRequest, Business, BusinessInfo, CustomerDetails, Platform,
    Resource, Service, Slot, TimeWindow,
};
use barberbot_providers::{AvailabilityScope, BookingPlatform, BoxFuture, ProviderError, ProviderResult};

#[derive(Debug, Default)]
pub(crate) struct FakePlatform {
    platform: Platform,
    services: HashMap<String, Vec<Service>>,
    slots: HashMap<String, Vec<Slot>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    customers: Mutex<HashMap<String, String>>,
    pub availability_calls: Mutex<Vec<String>>,
    pub service_calls: AtomicUsize,
    pub find_customer_calls: AtomicUsize,
    pub create_customer_calls: AtomicUsize,
    pub create_booking_calls: AtomicUsize,
    pub bookings: Mutex<Vec<BookingRequest>>,
}

impl FakePlatform {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    pub fn with_services(mut self, business_id: &str, services: Vec<Service>) -> Self {
        self.services.insert(business_id.to_string(), services);
        self
    }

    pub fn with_slots(mut self, business_id: &str, slots: Vec<Slot>) -> Self {
        self.slots.insert(business_id.to_string(), slots);
        self
    }

    pub fn failing_for(mut self, business_id: &str) -> Self {
        self.failing.insert(business_id.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn availability_calls(&self) -> Vec<String> {
        self.availability_calls.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn fail_if_configured(&self, business: &Business, endpoint: &str) -> ProviderResult<()> {
        if self.failing.contains(&business.id) {
            Err(ProviderError::upstream(endpoint, 502, "bad gateway").with_provider("fake"))
        } else {
            Ok(())
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl BookingPlatform for FakePlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn business_info<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<BusinessInfo>> {
        Box::pin(async move {
            self.fail_if_configured(business, "/info")?;
            Ok(BusinessInfo {
                id: business.id.clone(),
                name: business.name.clone(),
                city: Some("Praha".into()),
                ..Default::default()
            })
        })
    }

    fn list_services<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<Vec<Service>>> {
        Box::pin(async move {
            self.service_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            self.fail_if_configured(business, "/services")?;
            Ok(self.services.get(&business.id).cloned().unwrap_or_default())
        })
    }

    fn list_resources<'a>(
        &'a self,
        _business: &'a Business,
        _location_id: Option<&'a str>,
    ) -> BoxFuture<'a, ProviderResult<Vec<Resource>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn get_availability<'a>(
        &'a self,
        business: &'a Business,
        _service: &'a Service,
        _scope: AvailabilityScope,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Slot>>> {
        Box::pin(async move {
            self.availability_calls
                .lock()
                .unwrap()
                .push(business.id.clone());
            self.pause().await;
            self.fail_if_configured(business, "/availability")?;
            Ok(self
                .slots
                .get(&business.id)
                .map(|slots| {
                    slots
                        .iter()
                        .filter(|slot| window.contains(slot.start))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn find_customer<'a>(
        &'a self,
        _business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>> {
        Box::pin(async move {
            self.find_customer_calls.fetch_add(1, Ordering::SeqCst);
            let key = customer.phone.clone().or_else(|| customer.email.clone());
            Ok(key.and_then(|key| self.customers.lock().unwrap().get(&key).cloned()))
        })
    }

    fn create_customer<'a>(
        &'a self,
        _business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(async move {
            let n = self.create_customer_calls.fetch_add(1, Ordering::SeqCst);
            let id = format!("cust-{}", n + 1);
            if let Some(key) = customer.phone.clone().or_else(|| customer.email.clone()) {
                self.customers.lock().unwrap().insert(key, id.clone());
            }
            Ok(id)
        })
    }

    fn create_booking<'a>(
        &'a self,
        business: &'a Business,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<BookingConfirmation>> {
        Box::pin(async move {
            self.fail_if_configured(business, "/bookings")?;
            let n = self.create_booking_calls.fetch_add(1, Ordering::SeqCst);
            self.bookings.lock().unwrap().push(request.clone());
            Ok(BookingConfirmation {
                booking_id: format!("bk-{}", n + 1),
                status: "confirmed".into(),
                price: request.service.price,
            })
        })
    }
}
