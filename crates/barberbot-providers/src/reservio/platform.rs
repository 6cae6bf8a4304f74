//! Reservio implementation of [`BookingPlatform`].

use barberbot_core::{
    BookingConfirmation, BookingRequest, Business, BusinessInfo, CustomerDetails, Platform,
    Resource, Service, Slot, TimeWindow, resolve_secret,
};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::normalize_slots;
use crate::platform::{AvailabilityScope, BookingPlatform, BoxFuture};
use crate::raw_slot::RawSlot;

use super::client::{PROVIDER, ReservioClient};
use super::config::ReservioConfig;
use super::payload::{
    BookingAttributes, BookingPayload, BusinessAttributes, Document, Identified, Item,
    ResourceAttributes, ServiceAttributes, SlotAttributes, client_payload,
};

/// Reservio scheduling platform.
///
/// Each business authenticates with its own static bearer token, taken
/// from the business's credential reference on every call.
#[derive(Debug)]
pub struct ReservioPlatform {
    client: ReservioClient,
}

impl ReservioPlatform {
    pub fn new(config: ReservioConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: ReservioClient::new(config)?,
        })
    }

    fn token(business: &Business) -> ProviderResult<String> {
        resolve_secret(&business.credential).map_err(|e| {
            ProviderError::authentication(format!("no Reservio token for {}", business.name))
                .with_source(e)
                .with_provider(PROVIDER)
        })
    }

    fn business_path(business: &Business, suffix: &str) -> String {
        format!("/businesses/{}{}", urlencoding::encode(&business.id), suffix)
    }

    async fn business_info_impl(&self, business: &Business) -> ProviderResult<BusinessInfo> {
        let token = Self::token(business)?;
        let doc: Document<Item<BusinessAttributes>> = self
            .client
            .get(&token, &Self::business_path(business, ""), &[])
            .await?;

        let attrs = doc.data.attributes;
        Ok(BusinessInfo {
            id: doc.data.id,
            name: attrs.name,
            street: attrs.street,
            city: attrs.city,
            zip_code: attrs.zip,
            country: attrs.country,
            phone: attrs.phone,
            email: attrs.email,
            website: attrs.web,
            timezone: attrs.settings.and_then(|s| s.timezone),
        })
    }

    async fn list_services_impl(&self, business: &Business) -> ProviderResult<Vec<Service>> {
        let token = Self::token(business)?;
        let doc: Document<Vec<Item<ServiceAttributes>>> = self
            .client
            .get(&token, &Self::business_path(business, "/services"), &[])
            .await?;

        let services = doc
            .data
            .into_iter()
            .map(|item| Service {
                id: item.id,
                name: item.attributes.name,
                description: item.attributes.description,
                duration_minutes: item
                    .attributes
                    .duration
                    .map(|secs| u32::try_from(secs / 60).unwrap_or(u32::MAX))
                    .unwrap_or_default(),
                price: item.attributes.cost,
                currency: item.attributes.currency,
            })
            .collect::<Vec<_>>();

        debug!(business = %business.name, count = services.len(), "reservio services");
        Ok(services)
    }

    async fn list_resources_impl(&self, business: &Business) -> ProviderResult<Vec<Resource>> {
        let token = Self::token(business)?;
        let doc: Document<Vec<Item<ResourceAttributes>>> = self
            .client
            .get(&token, &Self::business_path(business, "/resources"), &[])
            .await?;

        Ok(doc
            .data
            .into_iter()
            .map(|item| Resource {
                id: item.id,
                name: item.attributes.name,
                email: item.attributes.email,
                phone: item.attributes.phone,
                description: item.attributes.description,
                location_id: None,
            })
            .collect())
    }

    async fn availability_impl(
        &self,
        business: &Business,
        service: &Service,
        scope: AvailabilityScope,
        window: TimeWindow,
    ) -> ProviderResult<Vec<Slot>> {
        let token = Self::token(business)?;

        let mut query = vec![
            ("filter[from]", window.start_iso()),
            ("filter[to]", window.end_iso()),
            ("filter[serviceId]", service.id.clone()),
        ];
        let resource_id = match scope {
            AvailabilityScope::Resource(id) => {
                query.push(("filter[resourceId]", id.clone()));
                Some(id)
            }
            AvailabilityScope::Location(id) => {
                debug!(location = %id, "reservio has no locations, querying whole business");
                None
            }
            AvailabilityScope::Unspecified => None,
        };

        let doc: Document<Vec<Item<SlotAttributes>>> = self
            .client
            .get(
                &token,
                &Self::business_path(business, "/availability/booking-slots"),
                &query,
            )
            .await?;

        let raws: Vec<RawSlot> = doc
            .data
            .into_iter()
            .map(|item| {
                let raw = RawSlot::iso(item.attributes.start, item.attributes.end);
                match &resource_id {
                    Some(id) => raw.with_resource(id),
                    None => raw,
                }
            })
            .collect();

        normalize_slots(&raws, service.duration()).map_err(|e| e.with_provider(PROVIDER))
    }

    async fn find_customer_impl(
        &self,
        business: &Business,
        customer: &CustomerDetails,
    ) -> ProviderResult<Option<String>> {
        let Some(search) = customer.phone.clone().or_else(|| customer.email.clone()) else {
            return Ok(None);
        };
        let token = Self::token(business)?;
        let doc: Document<Vec<Identified>> = self
            .client
            .get(
                &token,
                &Self::business_path(business, "/clients"),
                &[("filter[search]", search)],
            )
            .await?;
        Ok(doc.data.into_iter().next().map(|client| client.id))
    }

    async fn create_customer_impl(
        &self,
        business: &Business,
        customer: &CustomerDetails,
    ) -> ProviderResult<String> {
        let token = Self::token(business)?;
        let doc: Document<Identified> = self
            .client
            .post(
                &token,
                &Self::business_path(business, "/clients"),
                &client_payload(customer),
            )
            .await?;
        Ok(doc.data.id)
    }

    async fn create_booking_impl(
        &self,
        business: &Business,
        request: &BookingRequest,
    ) -> ProviderResult<BookingConfirmation> {
        let token = Self::token(business)?;
        let payload = BookingPayload::new(request, &self.client.config().utc_offset);
        let doc: Document<Item<BookingAttributes>> = self
            .client
            .post(&token, &Self::business_path(business, "/bookings"), &payload)
            .await?;

        info!(business = %business.name, booking_id = %doc.data.id, "reservio booking created");
        Ok(BookingConfirmation {
            booking_id: doc.data.id,
            status: doc
                .data
                .attributes
                .state
                .unwrap_or_else(|| "created".to_string()),
            price: doc.data.attributes.cost,
        })
    }
}

impl BookingPlatform for ReservioPlatform {
    fn platform(&self) -> Platform {
        Platform::Reservio
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

    fn list_resources<'a>(
        &'a self,
        business: &'a Business,
        _location_id: Option<&'a str>,
    ) -> BoxFuture<'a, ProviderResult<Vec<Resource>>> {
        Box::pin(self.list_resources_impl(business))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use barberbot_core::Category;
    use barberbot_core::time::default_offset;
    use chrono::{NaiveDate, TimeZone, Utc};
    use httpmock::prelude::*;
    use serde_json::json;

    fn platform(server: &MockServer) -> ReservioPlatform {
        let config = ReservioConfig::new().with_base_url(server.base_url()).unwrap();
        ReservioPlatform::new(config).unwrap()
    }

    fn business() -> Business {
        Business::new("biz-1", "Rico Studio", Category::Barbershop, Platform::Reservio, "tok-rico")
    }

    fn window() -> TimeWindow {
        TimeWindow::for_date(NaiveDate::from_ymd_opt(2025, 10, 7).unwrap(), default_offset())
    }

    #[tokio::test]
    async fn services_convert_seconds_to_minutes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/businesses/biz-1/services")
                    .header("authorization", "Bearer tok-rico")
                    .header("accept", "application/vnd.api+json")
                    .header_exists("x-request-timestamp");
                then.status(200).json_body(json!({
                    "data": [
                        {"id": "s1", "type": "service", "attributes": {"name": "Haircut", "duration": 1800, "cost": 450.0, "currency": "CZK"}},
                        {"id": "s2", "type": "service", "attributes": {"name": "Beard", "duration": 900}}
                    ]
                }));
            })
            .await;

        let services = platform(&server).list_services(&business()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].duration_minutes, 30);
        assert_eq!(services[0].price, Some(450.0));
        assert_eq!(services[1].duration_minutes, 15);
        assert!(services[1].price.is_none());
    }

    #[tokio::test]
    async fn availability_sends_iso_window_and_normalizes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/businesses/biz-1/availability/booking-slots")
                    .query_param("filter[from]", "2025-10-07T00:00:00+01:00")
                    .query_param("filter[to]", "2025-10-07T23:59:59+01:00")
                    .query_param("filter[serviceId]", "s1")
                    .query_param("filter[resourceId]", "r9");
                then.status(200).json_body(json!({
                    "data": [
                        {"id": "a", "type": "bookingSlot", "attributes": {"start": "2025-10-07T15:30:00+01:00", "end": "2025-10-07T16:00:00+01:00"}},
                        {"id": "b", "type": "bookingSlot", "attributes": {"start": "2025-10-07T14:00:00+01:00", "end": "2025-10-07T14:30:00+01:00"}},
                        {"id": "c", "type": "bookingSlot", "attributes": {"start": "2025-10-07T14:00:00+01:00", "end": "2025-10-07T14:30:00+01:00"}}
                    ]
                }));
            })
            .await;

        let service = Service::new("s1", "Haircut", 30);
        let slots = platform(&server)
            .get_availability(
                &business(),
                &service,
                AvailabilityScope::Resource("r9".into()),
                window(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, Utc.with_ymd_and_hms(2025, 10, 7, 13, 0, 0).unwrap());
        assert_eq!(slots[1].start, Utc.with_ymd_and_hms(2025, 10, 7, 14, 30, 0).unwrap());
        assert_eq!(slots[0].resource_id.as_deref(), Some("r9"));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/businesses/biz-1");
                then.status(401).body(r#"{"errors":[{"title":"Unauthorized"}]}"#);
            })
            .await;

        let err = platform(&server).business_info(&business()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.provider(), Some("reservio"));
        assert_eq!(err.upstream_details().unwrap().status, 401);
    }

    #[tokio::test]
    async fn server_error_keeps_endpoint_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/businesses/biz-1/resources");
                then.status(503).body("maintenance");
            })
            .await;

        let err = platform(&server)
            .list_resources(&business(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::UpstreamError);
        let details = err.upstream_details().unwrap();
        assert_eq!(details.endpoint, "/businesses/biz-1/resources");
        assert_eq!(details.status, 503);
        assert_eq!(details.body, "maintenance");
    }

    #[tokio::test]
    async fn errors_in_ok_body_are_upstream_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/businesses/biz-1/availability/booking-slots");
                then.status(200).json_body(json!({
                    "data": [],
                    "errors": [{"status": "403", "detail": "token revoked"}]
                }));
            })
            .await;

        let service = Service::new("s1", "Haircut", 30);
        let err = platform(&server)
            .get_availability(&business(), &service, AvailabilityScope::Unspecified, window())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::UpstreamError);
        let details = err.upstream_details().unwrap();
        assert_eq!(details.endpoint, "/businesses/biz-1/availability/booking-slots");
        assert_eq!(details.status, 200);
        assert_eq!(details.body, "token revoked");
    }

    #[tokio::test]
    async fn business_info_maps_attributes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/businesses/biz-1");
                then.status(200).json_body(json!({
                    "data": {"id": "biz-1", "type": "business", "attributes": {
                        "name": "Rico Studio", "street": "Dlouhá 12", "city": "Praha",
                        "country": "CZ", "phone": "+420222333444",
                        "settings": {"timezone": "Europe/Prague"}
                    }}
                }));
            })
            .await;

        let info = platform(&server).business_info(&business()).await.unwrap();
        assert_eq!(info.name, "Rico Studio");
        assert_eq!(info.timezone.as_deref(), Some("Europe/Prague"));
        assert_eq!(info.address().as_deref(), Some("Dlouhá 12, Praha, CZ"));
    }

    #[tokio::test]
    async fn missing_token_is_authentication_error_without_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let mut business = business();
        business.credential = "env::_BARBERBOT_UNSET_RESERVIO_TOKEN".into();
        let err = platform(&server).list_services(&business).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn find_or_create_reuses_existing_client() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/businesses/biz-1/clients")
                    .query_param("filter[search]", "+420777123456");
                then.status(200)
                    .json_body(json!({"data": [{"id": "cl-1", "type": "client"}]}));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/businesses/biz-1/clients");
                then.status(201)
                    .json_body(json!({"data": {"id": "cl-new", "type": "client"}}));
            })
            .await;

        let customer = CustomerDetails::new("Jan", "Novák").with_phone("+420777123456");
        let platform = platform(&server);
        let first = platform.find_or_create_customer(&business(), &customer).await.unwrap();
        let second = platform.find_or_create_customer(&business(), &customer).await.unwrap();

        assert_eq!(first, "cl-1");
        assert_eq!(first, second);
        assert_eq!(search.hits_async().await, 2);
        assert_eq!(create.hits_async().await, 0);
    }

    #[tokio::test]
    async fn find_or_create_creates_unknown_client() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/businesses/biz-1/clients");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/businesses/biz-1/clients")
                    .header("content-type", "application/vnd.api+json")
                    .body_contains("\"name\":\"Eva Malá\"");
                then.status(201)
                    .json_body(json!({"data": {"id": "cl-new", "type": "client"}}));
            })
            .await;

        let customer = CustomerDetails::new("Eva", "Malá").with_email("eva@example.cz");
        let id = platform(&server)
            .find_or_create_customer(&business(), &customer)
            .await
            .unwrap();
        assert_eq!(id, "cl-new");
        create.assert_async().await;
    }

    #[tokio::test]
    async fn create_booking_returns_id_and_state() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/businesses/biz-1/bookings")
                    .body_contains("\"eventType\":\"appointment\"")
                    .body_contains("\"start\":\"2025-10-07T14:00:00+01:00\"");
                then.status(201).json_body(json!({
                    "data": {"id": "bk-5", "type": "booking", "attributes": {"state": "confirmed", "cost": 450.0}}
                }));
            })
            .await;

        let request = BookingRequest {
            service: Service::new("s1", "Haircut", 30),
            resource_id: None,
            customer_id: Some("cl-1".into()),
            customer: CustomerDetails::new("Jan", "Novák"),
            start: Utc.with_ymd_and_hms(2025, 10, 7, 13, 0, 0).unwrap(),
            note: None,
        };
        let confirmation = platform(&server)
            .create_booking(&business(), &request)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(confirmation.booking_id, "bk-5");
        assert_eq!(confirmation.status, "confirmed");
        assert_eq!(confirmation.price, Some(450.0));
    }

    #[tokio::test]
    async fn cancellation_is_unsupported() {
        let server = MockServer::start_async().await;
        let err = platform(&server)
            .cancel_booking(&business(), "bk-5")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Unsupported);
    }
}
