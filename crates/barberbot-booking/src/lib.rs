//! Booking engine: availability with cross-business fallback, customer
//! resolution, booking creation and the record store.
//!
//! This crate sits between a conversation layer and the booking platforms:
//! - Resolves free slots for a service and offers sibling businesses when
//!   the requested one is full
//! - Finds or creates the customer before placing a booking
//! - Runs each conversation turn under a deadline with bounded retries
//! - Loads the business directory from config, the record store or the
//!   built-in list
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use barberbot_booking::{AvailabilityRequest, AvailabilityResolver, BookingConfig, PlatformRegistry};
//! use barberbot_core::{Directory, parse_date};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Arc::new(Directory::builtin());
//! let registry = Arc::new(PlatformRegistry::new());
//! let resolver = AvailabilityResolver::new(registry, directory.clone(), BookingConfig::default());
//!
//! let rico = directory.find("Rico Studio").ok_or("missing")?.clone();
//! let haircut = barberbot_core::Service::new("s1", "Haircut", 30);
//! let request = AvailabilityRequest::new(rico, haircut, parse_date("2025-10-07")?);
//! let resolution = resolver.resolve(&request).await?;
//! println!("{} slots", resolution.slots.len());
//! # Ok(())
//! # }
//! ```

mod booking;
mod catalog;
mod config;
mod directory;
mod error;
#[cfg(test)]
mod fake;
mod registry;
mod resolver;
mod store;
mod turn;

pub use booking::{BookingOrder, BookingOutcome, BookingService, validated_customer};
pub use catalog::{BusinessDetails, BusinessServices, Catalog};
pub use config::BookingConfig;
pub use directory::{DirectorySource, load_directory};
pub use error::{BookingError, BookingResult};
pub use registry::PlatformRegistry;
pub use resolver::{
    Alternative, AlternativeView, AvailabilityRequest, AvailabilityResolver, Fallback, Resolution,
    ResolutionView, offerable,
};
pub use store::{RecordStore, StoreConfig, StoreError, StoreResult, UserRecord};
pub use turn::TurnRunner;
