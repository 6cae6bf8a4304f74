//! Core types: businesses, services, slots, time normalization, preferences

pub mod booking;
pub mod business;
pub mod directory;
pub mod preference;
pub mod secret;
pub mod slot;
pub mod time;
pub mod tracing;
pub mod validate;

pub use booking::{
    BookingConfirmation, BookingRequest, CustomerDetails, FALLBACK_SERVICE_MINUTES, Location,
    Resource, Service,
};
pub use business::{Business, BusinessInfo, Category, Platform};
pub use directory::{Directory, builtin_businesses};
pub use preference::TimePreference;
pub use secret::{SecretError, resolve as resolve_secret};
pub use slot::{Slot, SlotView, dedup_sorted};
pub use time::{TimeWindow, default_offset, display_time, from_epoch_seconds, parse_instant, to_local_iso};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use validate::{ValidationError, normalize_phone, parse_date, validate_email};
