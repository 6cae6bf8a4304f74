//! Reservio booking platform.
//!
//! JSON:API over HTTPS with one static bearer token per business.
//!
//! ```ignore
//! use barberbot_providers::reservio::{ReservioConfig, ReservioPlatform};
//!
//! let platform = ReservioPlatform::new(ReservioConfig::new())?;
//! let services = platform.list_services(&business).await?;
//! ```

mod client;
mod config;
mod payload;
mod platform;

pub use config::ReservioConfig;
pub use payload::BookingPayload;
pub use platform::ReservioPlatform;
