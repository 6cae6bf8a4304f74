//! Normalized availability slots.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{display_time, to_local_iso};

/// One bookable start time.
///
/// Both platforms are normalized into this shape before anything else sees
/// the data. `resource_id` is set when the upstream says which staff member
/// the slot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            resource_id: None,
        }
    }

    /// A slot whose end is derived from the service duration.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Presentation form in the business's local offset.
    pub fn view(&self, offset: &FixedOffset) -> SlotView {
        SlotView {
            start: to_local_iso(self.start, offset),
            end: to_local_iso(self.end, offset),
            start_time: display_time(self.start, offset),
            end_time: display_time(self.end, offset),
            resource_id: self.resource_id.clone(),
        }
    }
}

/// A slot rendered for a conversation: ISO timestamps plus short labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub start: String,
    pub end: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

/// Sorts ascending by start and drops later duplicates of the same start.
pub fn dedup_sorted(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.sort_by_key(|slot| slot.start);
    slots.dedup_by_key(|slot| slot.start);
    slots
}
