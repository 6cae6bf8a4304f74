//! RawSlot to Slot conversion.
//!
//! Both encodings end up as UTC instants. A slot without an end gets
//! `start + duration` of the requested service. The output of
//! [`normalize_slots`] is sorted by start with duplicate starts removed.

use barberbot_core::{Slot, dedup_sorted, from_epoch_seconds, parse_instant};
use chrono::{DateTime, Duration, Utc};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_slot::{RawInstant, RawSlot};

pub fn normalize_slot(raw: &RawSlot, duration: Duration) -> ProviderResult<Slot> {
    let start = convert_instant(&raw.start)?;
    let end = match &raw.end {
        Some(end) => convert_instant(end)?,
        None => start + duration,
    };
    if end <= start {
        return Err(ProviderError::invalid_response(format!(
            "slot ends before it starts ({start} .. {end})"
        )));
    }

    let mut slot = Slot::new(start, end);
    if let Some(ref resource_id) = raw.resource_id {
        slot = slot.with_resource(resource_id);
    }
    Ok(slot)
}

/// Normalizes every slot; a single unreadable instant fails the batch.
pub fn normalize_slots(raws: &[RawSlot], duration: Duration) -> ProviderResult<Vec<Slot>> {
    let slots = raws
        .iter()
        .map(|raw| normalize_slot(raw, duration))
        .collect::<ProviderResult<Vec<_>>>()?;
    Ok(dedup_sorted(slots))
}

fn convert_instant(raw: &RawInstant) -> ProviderResult<DateTime<Utc>> {
    match raw {
        RawInstant::Epoch(secs) => from_epoch_seconds(*secs).ok_or_else(|| {
            ProviderError::invalid_response(format!("epoch seconds out of range: {secs}"))
        }),
        RawInstant::Iso(text) => parse_instant(text).map_err(|e| {
            ProviderError::invalid_response(format!("unparseable timestamp '{text}'")).with_source(e)
        }),
    }
}
