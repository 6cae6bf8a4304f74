//! BookingPlatform trait definition.
//!
//! One trait, one implementation per upstream scheduling platform. Every
//! operation takes the [`Business`] it acts for: the business carries the
//! platform-side id and the credential reference, so a single platform
//! instance serves every business hosted on it.

use std::future::Future;
use std::pin::Pin;

use barberbot_core::{
    BookingConfirmation, BookingRequest, Business, BusinessInfo, CustomerDetails, Location,
    Platform, Resource, Service, Slot, TimeWindow,
};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for trait methods that must stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What an availability query is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvailabilityScope {
    /// Let the platform decide (business default location, first location...).
    #[default]
    Unspecified,
    /// A single staff member or chair.
    Resource(String),
    /// Every resource of one location.
    Location(String),
}

impl AvailabilityScope {
    pub fn from_resource(resource_id: Option<String>) -> Self {
        resource_id.map(Self::Resource).unwrap_or_default()
    }
}

/// The operations the booking engine needs from a scheduling platform.
///
/// Implementations make plain HTTP calls and never retry; retry policy
/// belongs to the caller.
pub trait BookingPlatform: Send + Sync {
    /// Which platform this is.
    fn platform(&self) -> Platform;

    /// Contact and address details of the business.
    fn business_info<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<BusinessInfo>>;

    fn list_services<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<Vec<Service>>>;

    /// Branches of the business. Platforms without locations return none.
    fn list_locations<'a>(
        &'a self,
        _business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<Vec<Location>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_resources<'a>(
        &'a self,
        business: &'a Business,
        location_id: Option<&'a str>,
    ) -> BoxFuture<'a, ProviderResult<Vec<Resource>>>;

    /// Open start times for `service` inside `window`.
    ///
    /// Slots come back normalized, deduplicated and sorted by start.
    fn get_availability<'a>(
        &'a self,
        business: &'a Business,
        service: &'a Service,
        scope: AvailabilityScope,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Slot>>>;

    /// Looks a customer up by phone (preferred) or email.
    fn find_customer<'a>(
        &'a self,
        business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>>;

    /// Creates a customer and returns the platform id.
    fn create_customer<'a>(
        &'a self,
        business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<String>>;

    /// Returns the id of the first matching customer, creating one when
    /// nobody matches.
    fn find_or_create_customer<'a>(
        &'a self,
        business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(async move {
            if let Some(id) = self.find_customer(business, customer).await? {
                debug!(business = %business.name, customer_id = %id, "customer found");
                return Ok(id);
            }
            let id = self.create_customer(business, customer).await?;
            debug!(business = %business.name, customer_id = %id, "customer created");
            Ok(id)
        })
    }

    fn create_booking<'a>(
        &'a self,
        business: &'a Business,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<BookingConfirmation>>;

    /// Cancels a booking. The default reports the operation as unsupported.
    fn cancel_booking<'a>(
        &'a self,
        _business: &'a Business,
        _booking_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        let platform = self.platform();
        Box::pin(async move {
            Err(ProviderError::unsupported("booking cancellation is not supported")
                .with_provider(platform.as_str()))
        })
    }
}

/// Stands in for a platform that could not be set up.
///
/// Every call fails with the error captured at construction time, so a
/// misconfigured platform only breaks the businesses hosted on it.
#[derive(Debug)]
pub struct UnavailablePlatform {
    platform: Platform,
    error: ProviderError,
}

impl UnavailablePlatform {
    pub fn new(platform: Platform, error: ProviderError) -> Self {
        Self { platform, error }
    }

    fn fail<T: Send + 'static>(&self) -> BoxFuture<'_, ProviderResult<T>> {
        let error = self.error.duplicate().with_provider(self.platform.as_str());
        Box::pin(async move { Err(error) })
    }
}

impl BookingPlatform for UnavailablePlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn business_info<'a>(&'a self, _: &'a Business) -> BoxFuture<'a, ProviderResult<BusinessInfo>> {
        self.fail()
    }

    fn list_services<'a>(&'a self, _: &'a Business) -> BoxFuture<'a, ProviderResult<Vec<Service>>> {
        self.fail()
    }

    fn list_resources<'a>(
        &'a self,
        _: &'a Business,
        _: Option<&'a str>,
    ) -> BoxFuture<'a, ProviderResult<Vec<Resource>>> {
        self.fail()
    }

    fn get_availability<'a>(
        &'a self,
        _: &'a Business,
        _: &'a Service,
        _: AvailabilityScope,
        _: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Slot>>> {
        self.fail()
    }

    fn find_customer<'a>(
        &'a self,
        _: &'a Business,
        _: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>> {
        self.fail()
    }

    fn create_customer<'a>(
        &'a self,
        _: &'a Business,
        _: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        self.fail()
    }

    fn create_booking<'a>(
        &'a self,
        _: &'a Business,
        _: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<BookingConfirmation>> {
        self.fail()
    }
}
