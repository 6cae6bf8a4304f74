//! Slot data as the platforms report it, before normalization.

use serde::{Deserialize, Serialize};

/// An instant in one of the two upstream encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawInstant {
    /// Seconds since the Unix epoch (Reservanto).
    Epoch(i64),
    /// ISO-8601 with offset (Reservio).
    Iso(String),
}

/// A slot exactly as an upstream returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlot {
    pub start: RawInstant,
    /// Missing when the platform only reports start times.
    pub end: Option<RawInstant>,
    pub resource_id: Option<String>,
}

impl RawSlot {
    /// A start-only slot in epoch seconds.
    pub fn epoch(start: i64) -> Self {
        Self {
            start: RawInstant::Epoch(start),
            end: None,
            resource_id: None,
        }
    }

    /// A slot with ISO start and end.
    pub fn iso(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: RawInstant::Iso(start.into()),
            end: Some(RawInstant::Iso(end.into())),
            resource_id: None,
        }
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }
}
