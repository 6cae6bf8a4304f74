//! Catalog and booking types shared by every platform adapter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Slot length used when a platform lists a service without a duration.
pub const FALLBACK_SERVICE_MINUTES: u32 = 30;

/// A bookable service (e.g. "Haircut", 30 minutes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Service {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            duration_minutes,
            price: None,
            currency: None,
        }
    }

    /// Length of one appointment. A zero duration means the platform did
    /// not report one and [`FALLBACK_SERVICE_MINUTES`] applies.
    pub fn duration(&self) -> Duration {
        let minutes = match self.duration_minutes {
            0 => FALLBACK_SERVICE_MINUTES,
            minutes => minutes,
        };
        Duration::minutes(i64::from(minutes))
    }

    /// Service ids are platform-local, so cross-business matching uses names:
    /// trimmed and case-insensitive.
    pub fn same_name_as(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// A staff member or chair that can be booked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

/// A physical branch of a business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Who the booking is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerDetails {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Splits a single "First Last" string; everything after the first word
    /// becomes the last name.
    pub fn from_full_name(full: &str) -> Self {
        let mut parts = full.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        Self::new(first, last)
    }

    /// Whether there is anything to search a customer by.
    pub fn has_contact(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// Everything needed to place one booking on a platform.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub service: Service,
    pub resource_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer: CustomerDetails,
    pub start: DateTime<Utc>,
    pub note: Option<String>,
}

impl BookingRequest {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.service.duration()
    }
}

/// What the platform answered after accepting a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}
