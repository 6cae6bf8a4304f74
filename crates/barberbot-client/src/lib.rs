//! Operator CLI for the booking engine.
//!
//! This crate provides the `barberbot` command-line interface: listing
//! businesses and services, finding free slots with fallback to sibling
//! businesses, booking, cancelling and managing the user registry.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

pub use app::App;
pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
