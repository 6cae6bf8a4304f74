//! Customer resolution and booking creation.

use std::sync::Arc;

use barberbot_core::{
    BookingConfirmation, BookingRequest, Business, CustomerDetails, Service, Slot, SlotView,
    normalize_phone, validate_email,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};
use crate::registry::PlatformRegistry;

/// A confirmed choice: which slot, for whom.
#[derive(Debug, Clone)]
pub struct BookingOrder {
    pub service: Service,
    pub resource_id: Option<String>,
    pub customer: CustomerDetails,
    pub start: DateTime<Utc>,
    pub note: Option<String>,
}

impl BookingOrder {
    pub fn new(service: Service, customer: CustomerDetails, start: DateTime<Utc>) -> Self {
        Self {
            service,
            resource_id: None,
            customer,
            start,
            note: None,
        }
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// What a successful booking reports back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub business_id: String,
    pub business_name: String,
    pub customer_id: String,
    pub service_name: String,
    pub slot: SlotView,
    #[serde(flatten)]
    pub confirmation: BookingConfirmation,
}

#[derive(Debug, Clone)]
pub struct BookingService {
    registry: Arc<PlatformRegistry>,
    config: BookingConfig,
}

impl BookingService {
    pub fn new(registry: Arc<PlatformRegistry>, config: BookingConfig) -> Self {
        Self { registry, config }
    }

    pub async fn book(&self, business: &Business, order: BookingOrder) -> BookingResult<BookingOutcome> {
        self.book_at(business, order, Utc::now()).await
    }

    /// Resolves the customer, then creates the booking. Either failure
    /// ends the operation.
    pub async fn book_at(
        &self,
        business: &Business,
        order: BookingOrder,
        now: DateTime<Utc>,
    ) -> BookingResult<BookingOutcome> {
        if order.start <= now {
            return Err(BookingError::validation("start", "the slot is in the past"));
        }
        let customer = validated_customer(order.customer)?;

        let platform = self.registry.for_business(business);
        let customer_id = platform.find_or_create_customer(business, &customer).await?;

        let request = BookingRequest {
            service: order.service,
            resource_id: order.resource_id,
            customer_id: Some(customer_id.clone()),
            customer,
            start: order.start,
            note: order.note,
        };
        let confirmation = platform.create_booking(business, &request).await?;

        info!(
            business = %business.name,
            booking_id = %confirmation.booking_id,
            "booking confirmed"
        );

        let slot = Slot::starting_at(request.start, request.service.duration());
        Ok(BookingOutcome {
            business_id: business.id.clone(),
            business_name: business.name.clone(),
            customer_id,
            service_name: request.service.name,
            slot: slot.view(&self.config.utc_offset),
            confirmation,
        })
    }

    pub async fn cancel(&self, business: &Business, booking_id: &str) -> BookingResult<()> {
        let booking_id = booking_id.trim();
        if booking_id.is_empty() {
            return Err(BookingError::validation("booking id", "must not be empty"));
        }
        self.registry
            .for_business(business)
            .cancel_booking(business, booking_id)
            .await?;
        info!(business = %business.name, booking_id = %booking_id, "booking cancelled");
        Ok(())
    }
}

/// Checks names and contact details, normalizing email and phone.
pub fn validated_customer(mut customer: CustomerDetails) -> BookingResult<CustomerDetails> {
    customer.first_name = customer.first_name.trim().to_string();
    customer.last_name = customer.last_name.trim().to_string();
    if customer.first_name.is_empty() {
        return Err(BookingError::validation("name", "a first name is required"));
    }

    customer.email = customer
        .email
        .filter(|e| !e.trim().is_empty())
        .map(|e| validate_email(&e))
        .transpose()?;
    customer.phone = customer
        .phone
        .filter(|p| !p.trim().is_empty())
        .map(|p| normalize_phone(&p))
        .transpose()?;

    if !customer.has_contact() {
        return Err(BookingError::validation("phone", "a phone number or email is required"));
    }
    Ok(customer)
}
