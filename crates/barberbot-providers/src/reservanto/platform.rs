//! Reservanto implementation of [`BookingPlatform`].

use barberbot_core::{
    BookingConfirmation, BookingRequest, Business, BusinessInfo, CustomerDetails, Location,
    Platform, Resource, Service, Slot, TimeWindow, resolve_secret,
};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::normalize_slots;
use crate::platform::{AvailabilityScope, BookingPlatform, BoxFuture};
use crate::raw_slot::RawSlot;

use super::client::{EmptyBody, PROVIDER, ReservantoClient};
use super::config::ReservantoConfig;
use super::payload::{
    CancelRequest, CreateBookingReply, CreateBookingRequest, CreatedCustomer,
    CustomerCreateRequest, CustomerSearchReply, CustomerSearchRequest, ItemsReply, LocationItem,
    LocationListRequest, LocationStartsReply, LocationStartsRequest, MerchantReply, ResourceItem,
    ResourceListRequest, ServiceItem, StartsReply, StartsRequest,
};

const MERCHANT_INFO: &str = "/Merchant/GetInfo";
const LOCATIONS: &str = "/Location/GetList";
const RESOURCES: &str = "/BookingResource/GetList";
const SERVICES: &str = "/BookingService/GetList";
const STARTS: &str = "/OneToOne/GetAvailableStarts";
const STARTS_FOR_LOCATION: &str = "/OneToOne/GetAvailableStartsForLocation";
const CREATE_BOOKING: &str = "/OneToOne/CreateBooking";
const CANCEL_BOOKING: &str = "/Booking/Cancel";
const CUSTOMER_SEARCH: &str = "/Customer/GetList";
const CUSTOMER_CREATE: &str = "/Customer/Create";

/// Reservanto scheduling platform.
///
/// Calls are authorized with session tokens exchanged from a long-lived
/// merchant token. The business credential is used when present, the
/// platform-wide token from [`ReservantoConfig`] otherwise.
#[derive(Debug)]
pub struct ReservantoPlatform {
    client: ReservantoClient,
}

impl ReservantoPlatform {
    pub fn new(config: ReservantoConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: ReservantoClient::new(config)?,
        })
    }

    pub fn client(&self) -> &ReservantoClient {
        &self.client
    }

    fn long_lived(&self, business: &Business) -> ProviderResult<String> {
        let reference = if business.credential.trim().is_empty() {
            self.client.config().long_lived_token.as_deref().ok_or_else(|| {
                ProviderError::configuration(format!(
                    "no Reservanto token configured for {}",
                    business.name
                ))
                .with_provider(PROVIDER)
            })?
        } else {
            business.credential.as_str()
        };

        resolve_secret(reference).map_err(|e| {
            ProviderError::authentication(format!("no Reservanto token for {}", business.name))
                .with_source(e)
                .with_provider(PROVIDER)
        })
    }

    async fn business_info_impl(&self, business: &Business) -> ProviderResult<BusinessInfo> {
        let token = self.long_lived(business)?;
        let reply: MerchantReply = self.client.call(&token, MERCHANT_INFO, &EmptyBody {}).await?;

        let merchant = reply.result;
        let address = merchant.mailing_address.unwrap_or_default();
        Ok(BusinessInfo {
            id: merchant
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| business.id.clone()),
            name: merchant.name,
            street: address.street,
            city: address.city,
            zip_code: address.zip_code,
            country: address.country,
            phone: merchant.contact_phone,
            email: merchant.contact_email,
            website: merchant.web,
            timezone: None,
        })
    }

    async fn list_services_impl(&self, business: &Business) -> ProviderResult<Vec<Service>> {
        let token = self.long_lived(business)?;
        let reply: ItemsReply<ServiceItem> =
            self.client.call(&token, SERVICES, &EmptyBody {}).await?;

        let services = reply
            .into_items(SERVICES)
            .map_err(|e| e.with_provider(PROVIDER))?
            .into_iter()
            .map(|item| Service {
                id: item.id.to_string(),
                name: item.name,
                description: item.description,
                duration_minutes: item.duration,
                price: item.price,
                currency: item.currency,
            })
            .collect::<Vec<_>>();

        debug!(business = %business.name, count = services.len(), "reservanto services");
        Ok(services)
    }

    async fn list_locations_impl(&self, business: &Business) -> ProviderResult<Vec<Location>> {
        let token = self.long_lived(business)?;
        let reply: ItemsReply<LocationItem> = self
            .client
            .call(&token, LOCATIONS, &LocationListRequest { only_public: true })
            .await?;

        Ok(reply
            .into_items(LOCATIONS)
            .map_err(|e| e.with_provider(PROVIDER))?
            .into_iter()
            .map(|item| Location {
                id: item.id.to_string(),
                name: item.name,
                phone: item.phone,
                email: item.email,
                description: item.description,
            })
            .collect())
    }

    async fn list_resources_impl(
        &self,
        business: &Business,
        location_id: Option<&str>,
    ) -> ProviderResult<Vec<Resource>> {
        let token = self.long_lived(business)?;
        let request = ResourceListRequest {
            location_id: location_id.map(|id| numeric_id("location", id)).transpose()?,
            only_public: true,
        };
        let reply: ItemsReply<ResourceItem> = self.client.call(&token, RESOURCES, &request).await?;

        Ok(reply
            .into_items(RESOURCES)
            .map_err(|e| e.with_provider(PROVIDER))?
            .into_iter()
            .map(|item| Resource {
                id: item.id.to_string(),
                name: item.name,
                email: item.email,
                phone: item.phone,
                description: item.description,
                location_id: item.location_id.map(|id| id.to_string()),
            })
            .collect())
    }

    /// The location to query when the caller named neither a resource nor a
    /// location: the business default, else the first one upstream lists.
    async fn fallback_location(&self, business: &Business) -> ProviderResult<Option<String>> {
        if let Some(id) = &business.location_id {
            return Ok(Some(id.clone()));
        }
        let locations = self.list_locations_impl(business).await?;
        Ok(locations.into_iter().next().map(|location| location.id))
    }

    async fn availability_impl(
        &self,
        business: &Business,
        service: &Service,
        scope: AvailabilityScope,
        window: TimeWindow,
    ) -> ProviderResult<Vec<Slot>> {
        let service_id = numeric_id("service", &service.id)?;

        let scope = match scope {
            AvailabilityScope::Unspecified => match self.fallback_location(business).await? {
                Some(id) => AvailabilityScope::Location(id),
                None => {
                    warn!(business = %business.name, "no reservanto location to query, reporting no availability");
                    return Ok(Vec::new());
                }
            },
            scope => scope,
        };

        let token = self.long_lived(business)?;
        let raws: Vec<RawSlot> = match scope {
            AvailabilityScope::Resource(resource_id) => {
                let request = StartsRequest {
                    booking_resource_id: numeric_id("resource", &resource_id)?,
                    booking_service_id: service_id,
                    interval_start: window.start_epoch(),
                    interval_end: window.end_epoch(),
                };
                let reply: StartsReply = self.client.call(&token, STARTS, &request).await?;
                reply
                    .starts
                    .into_iter()
                    .map(|start| RawSlot::epoch(start).with_resource(&resource_id))
                    .collect()
            }
            AvailabilityScope::Location(location_id) => {
                let request = LocationStartsRequest {
                    location_id: numeric_id("location", &location_id)?,
                    booking_service_id: service_id,
                    interval_start: window.start_epoch(),
                    interval_end: window.end_epoch(),
                };
                let reply: LocationStartsReply =
                    self.client.call(&token, STARTS_FOR_LOCATION, &request).await?;
                reply
                    .starts
                    .into_iter()
                    .map(|start| {
                        let raw = RawSlot::epoch(start.start);
                        match start.booking_resource_id {
                            Some(id) => raw.with_resource(id.to_string()),
                            None => raw,
                        }
                    })
                    .collect()
            }
            AvailabilityScope::Unspecified => Vec::new(),
        };

        normalize_slots(&raws, service.duration()).map_err(|e| e.with_provider(PROVIDER))
    }

    async fn find_customer_impl(
        &self,
        business: &Business,
        customer: &CustomerDetails,
    ) -> ProviderResult<Option<String>> {
        let request = match (customer.phone.as_deref(), customer.email.as_deref()) {
            (Some(phone), _) => CustomerSearchRequest {
                phone: Some(phone),
                email: None,
            },
            (None, Some(email)) => CustomerSearchRequest {
                phone: None,
                email: Some(email),
            },
            (None, None) => return Ok(None),
        };

        let token = self.long_lived(business)?;
        let reply: Option<CustomerSearchReply> = self
            .client
            .call_optional(&token, CUSTOMER_SEARCH, &request)
            .await?;
        Ok(reply.and_then(CustomerSearchReply::first_id))
    }

    async fn create_customer_impl(
        &self,
        business: &Business,
        customer: &CustomerDetails,
    ) -> ProviderResult<String> {
        let token = self.long_lived(business)?;
        let request = CustomerCreateRequest {
            first_name: &customer.first_name,
            last_name: &customer.last_name,
            email: customer.email.as_deref(),
            phone: customer.phone.as_deref(),
        };
        let reply: CreatedCustomer = self.client.call(&token, CUSTOMER_CREATE, &request).await?;
        reply
            .into_id(CUSTOMER_CREATE)
            .map_err(|e| e.with_provider(PROVIDER))
    }

    async fn create_booking_impl(
        &self,
        business: &Business,
        request: &BookingRequest,
    ) -> ProviderResult<BookingConfirmation> {
        let resource_id = request.resource_id.as_deref().ok_or_else(|| {
            ProviderError::bad_request("reservanto bookings need a resource").with_provider(PROVIDER)
        })?;
        let customer_id = request.customer_id.as_deref().ok_or_else(|| {
            ProviderError::bad_request("reservanto bookings need a customer id")
                .with_provider(PROVIDER)
        })?;

        let body = CreateBookingRequest {
            booking_resource_id: numeric_id("resource", resource_id)?,
            booking_service_id: numeric_id("service", &request.service.id)?,
            customer_id: numeric_id("customer", customer_id)?,
            booking_start: request.start.timestamp(),
            customer_note: request.note.as_deref(),
            force_confirmed: true,
        };

        let token = self.long_lived(business)?;
        let reply: CreateBookingReply = self.client.call(&token, CREATE_BOOKING, &body).await?;

        let booking_id = reply.appointment_id.to_string();
        info!(business = %business.name, booking_id = %booking_id, "reservanto booking created");
        Ok(BookingConfirmation {
            booking_id,
            status: reply
                .status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "confirmed".to_string()),
            price: reply.price,
        })
    }

    async fn cancel_booking_impl(&self, business: &Business, booking_id: &str) -> ProviderResult<()> {
        let body = CancelRequest {
            appointment_id: numeric_id("booking", booking_id)?,
            send_notification: true,
        };
        let token = self.long_lived(business)?;
        let _: serde_json::Value = self.client.call(&token, CANCEL_BOOKING, &body).await?;
        info!(business = %business.name, booking_id = %booking_id, "reservanto booking cancelled");
        Ok(())
    }
}

/// Reservanto ids are integers; anything else cannot be sent.
fn numeric_id(kind: &str, id: &str) -> ProviderResult<i64> {
    id.trim().parse::<i64>().map_err(|e| {
        ProviderError::bad_request(format!("invalid {kind} id {id:?}"))
            .with_source(e)
            .with_provider(PROVIDER)
    })
}

impl BookingPlatform for ReservantoPlatform {
    fn platform(&self) -> Platform {
        Platform::Reservanto
    }

    fn business_info<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<BusinessInfo>> {
        Box::pin(self.business_info_impl(business))
    }

    fn list_services<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<Vec<Service>>> {
        Box::pin(self.list_services_impl(business))
    }

    fn list_locations<'a>(
        &'a self,
        business: &'a Business,
    ) -> BoxFuture<'a, ProviderResult<Vec<Location>>> {
        Box::pin(self.list_locations_impl(business))
    }

    fn list_resources<'a>(
        &'a self,
        business: &'a Business,
        location_id: Option<&'a str>,
    ) -> BoxFuture<'a, ProviderResult<Vec<Resource>>> {
        Box::pin(self.list_resources_impl(business, location_id))
    }

    fn get_availability<'a>(
        &'a self,
        business: &'a Business,
        service: &'a Service,
        scope: AvailabilityScope,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Slot>>> {
        Box::pin(self.availability_impl(business, service, scope, window))
    }

    fn find_customer<'a>(
        &'a self,
        business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>> {
        Box::pin(self.find_customer_impl(business, customer))
    }

    fn create_customer<'a>(
        &'a self,
        business: &'a Business,
        customer: &'a CustomerDetails,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(self.create_customer_impl(business, customer))
    }

    fn create_booking<'a>(
        &'a self,
        business: &'a Business,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<BookingConfirmation>> {
        Box::pin(self.create_booking_impl(business, request))
    }

    fn cancel_booking<'a>(
        &'a self,
        business: &'a Business,
        booking_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.cancel_booking_impl(business, booking_id))
    }
}
