//! Reservanto booking platform.
//!
//! A POST-only JSON API. Every call is authorized with a session token
//! exchanged from a long-lived merchant token; [`SessionManager`] caches
//! those per long-lived token.
//!
//! ```ignore
//! use barberbot_providers::reservanto::{ReservantoConfig, ReservantoPlatform};
//!
//! let config = ReservantoConfig::new().with_long_lived_token("env::RESERVANTO_LTT");
//! let platform = ReservantoPlatform::new(config)?;
//! let slots = platform
//!     .get_availability(&business, &service, AvailabilityScope::Unspecified, window)
//!     .await?;
//! ```

mod client;
mod config;
mod payload;
mod platform;
mod session;

pub use client::ReservantoClient;
pub use config::ReservantoConfig;
pub use platform::ReservantoPlatform;
pub use session::{SessionManager, SessionToken};
