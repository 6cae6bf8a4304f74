//! Booking error types.
//!
//! Provider failures are folded into a small taxonomy that decides what the
//! end user is told. Upstream payloads are logged, never shown.

use barberbot_core::ValidationError;
use barberbot_providers::{ProviderError, ProviderErrorCode};
use thiserror::Error;

use crate::store::StoreError;

/// Result type for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;

/// Errors surfaced by the booking layer.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Credential missing, invalid, expired or rejected.
    #[error("authentication failed: {0}")]
    Authentication(#[source] ProviderError),

    /// Non-success response, error flag, unknown shape or transport failure.
    #[error("upstream failure: {0}")]
    Upstream(#[source] ProviderError),

    /// Unknown business, service or customer.
    ///
    /// `what` is shown to the end user; a platform 404 keeps its endpoint
    /// in `source` only.
    #[error("not found: {what}")]
    NotFound {
        what: String,
        #[source]
        source: Option<ProviderError>,
    },

    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The platform cannot do this.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The record store failed.
    #[error("record store: {0}")]
    Store(#[from] StoreError),

    /// The turn deadline elapsed on every attempt.
    #[error("timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },
}

impl BookingError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            source: None,
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, reason))
    }

    /// Text safe to send back to the person chatting.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(_) | Self::Timeout { .. } => {
                "Sorry, something went wrong on our side. Please try again in a moment.".to_string()
            }
            Self::Upstream(_) | Self::Store(_) => {
                "I'm having trouble connecting to the booking system right now. Please try again."
                    .to_string()
            }
            Self::NotFound { what, .. } => {
                format!("I couldn't find {what}. Please pick one from the list.")
            }
            Self::Validation(e) => match e.field {
                "date" => "Please give the date as YYYY-MM-DD.".to_string(),
                "email" => "That email address doesn't look right. Could you check it?".to_string(),
                "phone" => "That phone number doesn't look right. Could you check it?".to_string(),
                "time preference" => {
                    "Please say morning, afternoon, evening, or a time like 'after 15:00'."
                        .to_string()
                }
                _ => format!("Could you check the {}? {}", e.field, e.reason),
            },
            Self::Unsupported(_) => {
                "That isn't possible through the assistant for this business. Please contact them directly."
                    .to_string()
            }
        }
    }

    /// Whether trying the same thing later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Upstream(e) => e.is_retryable(),
            Self::Store(e) => e.is_transport(),
            _ => false,
        }
    }

    /// Short machine-readable kind, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::Upstream(_) => "upstream",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Unsupported(_) => "unsupported",
            Self::Store(_) => "store",
            Self::Timeout { .. } => "timeout",
        }
    }
}

impl From<ProviderError> for BookingError {
    fn from(err: ProviderError) -> Self {
        match err.code() {
            ProviderErrorCode::AuthenticationFailed | ProviderErrorCode::ConfigurationError => {
                Self::Authentication(err)
            }
            ProviderErrorCode::NotFound => Self::NotFound {
                what: "that business or service".to_string(),
                source: Some(err),
            },
            ProviderErrorCode::BadRequest => {
                Self::Validation(ValidationError::new("id", err.message().to_string()))
            }
            ProviderErrorCode::Unsupported => Self::Unsupported(err.message().to_string()),
            ProviderErrorCode::NetworkError
            | ProviderErrorCode::UpstreamError
            | ProviderErrorCode::InvalidResponse
            | ProviderErrorCode::InternalError => Self::Upstream(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_onto_taxonomy() {
        let auth: BookingError = ProviderError::authentication("expired").into();
        assert!(matches!(auth, BookingError::Authentication(_)));

        let missing_config: BookingError = ProviderError::configuration("no token").into();
        assert!(matches!(missing_config, BookingError::Authentication(_)));

        let flagged: BookingError = ProviderError::rejected("/Customer/Create", None).into();
        assert!(matches!(flagged, BookingError::Upstream(_)));

        let shape: BookingError = ProviderError::invalid_response("no id").into();
        assert!(matches!(shape, BookingError::Upstream(_)));

        let bad_id: BookingError = ProviderError::bad_request("invalid service id").into();
        assert!(matches!(bad_id, BookingError::Validation(_)));

        let gone: BookingError = ProviderError::not_found("/businesses/x: not found").into();
        assert_eq!(gone.kind(), "not_found");
    }

    #[test]
    fn platform_404_keeps_endpoint_out_of_user_message() {
        use std::error::Error;
        let err = BookingError::from(ProviderError::not_found(
            "/businesses/rico-123/services: not found",
        ));
        let text = err.user_message();
        assert_eq!(
            text,
            "I couldn't find that business or service. Please pick one from the list."
        );
        assert!(!text.contains('/'));
        let source = err.source().unwrap().to_string();
        assert!(source.contains("/businesses/rico-123/services"));
    }

    #[test]
    fn user_message_hides_upstream_payload() {
        let err: BookingError = ProviderError::upstream("/OneToOne/CreateBooking", 500, "SQL error at line 3")
            .with_provider("reservanto")
            .into();
        let text = err.user_message();
        assert!(text.contains("trouble connecting"));
        assert!(!text.contains("SQL"));
        assert!(!text.contains("CreateBooking"));
    }

    #[test]
    fn validation_messages_are_targeted() {
        let err = BookingError::validation("date", "'tomorrow' is not a YYYY-MM-DD date");
        assert_eq!(err.user_message(), "Please give the date as YYYY-MM-DD.");

        let err = BookingError::validation("email", "bad");
        assert!(err.user_message().contains("email"));
    }

    #[test]
    fn retryability() {
        assert!(BookingError::Timeout { attempts: 3 }.is_retryable());
        assert!(BookingError::from(ProviderError::network("reset")).is_retryable());
        assert!(!BookingError::from(ProviderError::authentication("no")).is_retryable());
        assert!(!BookingError::not_found("service").is_retryable());
    }
}
