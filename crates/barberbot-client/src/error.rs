//! Client error types.

use barberbot_booking::{BookingError, StoreError};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration file missing, unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("record store: {0}")]
    Store(#[from] StoreError),

    /// A command needs the record store but none is configured.
    #[error("record store is not configured; add a [store] section to config.toml")]
    StoreMissing,

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// What to print for the operator.
    ///
    /// Booking failures use their conversational message; the full chain
    /// goes to the debug log.
    pub fn user_message(&self) -> String {
        match self {
            Self::Booking(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Whether running the same command again later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Booking(e) => e.is_retryable(),
            Self::Store(e) => e.is_transport(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_errors_use_friendly_message() {
        let err = ClientError::from(BookingError::not_found("a service called 'Massage'"));
        assert_eq!(
            err.user_message(),
            BookingError::not_found("a service called 'Massage'").user_message()
        );
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(ClientError::from(BookingError::Timeout { attempts: 3 }).is_retryable());
        assert!(!ClientError::from(BookingError::not_found("service")).is_retryable());
        assert!(!ClientError::StoreMissing.is_retryable());
    }

    #[test]
    fn other_errors_use_display() {
        let err = ClientError::Config("bad offset".to_string());
        assert_eq!(err.user_message(), "configuration error: bad offset");
        assert!(ClientError::StoreMissing.user_message().contains("[store]"));
    }
}
