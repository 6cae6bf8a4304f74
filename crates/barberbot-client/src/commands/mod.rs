//! Command implementations.

pub mod booking;
pub mod catalog;
pub mod config;
pub mod users;
