//! BookingPlatform trait and implementations.
//!
//! This crate provides the abstraction layer over the scheduling platforms
//! the businesses are hosted on:
//!
//! - [`BookingPlatform`] - The trait both platforms implement
//! - [`RawSlot`] - Slots exactly as an upstream reported them
//! - [`normalize_slots`] - Raw slots to canonical, sorted, deduplicated slots
//! - [`ProviderError`] - Error types for platform operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │  Reservio API   │    │  Reservanto API  │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │ SessionManager
//!          ▼                      ▼
//! ┌─────────────────┐    ┌────────────────────┐
//! │ReservioPlatform │    │ ReservantoPlatform │
//! └────────┬────────┘    └────────┬───────────┘
//!          │                      │
//!          │   BookingPlatform    │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │   RawSlot   │
//!              └──────┬──────┘
//!                     │
//!                     ▼ normalize_slots()
//!              ┌─────────────┐
//!              │    Slot     │
//!              └─────────────┘
//! ```

pub mod error;
pub mod normalize;
pub mod platform;
pub mod raw_slot;
pub mod reservanto;
pub mod reservio;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult, UpstreamDetails};
pub use normalize::{normalize_slot, normalize_slots};
pub use platform::{AvailabilityScope, BookingPlatform, BoxFuture, UnavailablePlatform};
pub use raw_slot::{RawInstant, RawSlot};
pub use reservanto::{ReservantoConfig, ReservantoPlatform, SessionManager};
pub use reservio::{ReservioConfig, ReservioPlatform};
