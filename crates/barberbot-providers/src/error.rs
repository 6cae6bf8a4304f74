//! Error types for booking platform operations.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credential missing, rejected, or the session exchange failed.
    AuthenticationFailed,
    /// Connection failed, transport timeout, DNS resolution.
    NetworkError,
    /// Non-success HTTP status, or an error flag inside a 200 body.
    UpstreamError,
    /// The body did not match any known response shape.
    InvalidResponse,
    /// Upstream answered 404, or a referenced entity does not exist.
    NotFound,
    /// The request could not be built from the given input (e.g. a
    /// non-numeric id for a platform with numeric ids).
    BadRequest,
    /// Missing or invalid configuration.
    ConfigurationError,
    /// The platform has no equivalent of the requested operation.
    Unsupported,
    /// Unexpected state.
    InternalError,
}

impl ProviderErrorCode {
    /// Transport-level failures are the only ones worth trying again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::UpstreamError => "upstream_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::Unsupported => "unsupported",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an upstream failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamDetails {
    /// Endpoint path, e.g. `/OneToOne/CreateBooking`.
    pub endpoint: String,
    /// HTTP status; `200` for in-payload error flags.
    pub status: u16,
    /// Response body or the upstream's error message.
    pub body: String,
}

/// An error that occurred while talking to a booking platform.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Platform that produced the error ("reservio", "reservanto").
    provider: Option<String>,
    upstream: Option<UpstreamDetails>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            upstream: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// A non-success HTTP response.
    pub fn upstream(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let mut err = Self::new(
            ProviderErrorCode::UpstreamError,
            format!("{endpoint} returned status {status}"),
        );
        err.upstream = Some(UpstreamDetails {
            endpoint,
            status,
            body: body.into(),
        });
        err
    }

    /// A 200 response whose payload carries an error flag.
    ///
    /// Reported exactly like a non-success status so callers need not care
    /// which way the platform chose to fail.
    pub fn rejected(endpoint: impl Into<String>, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| "unknown error".to_string());
        Self::upstream(endpoint, 200, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::BadRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unsupported, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn upstream_details(&self) -> Option<&UpstreamDetails> {
        self.upstream.as_ref()
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// Copies code, message and upstream details; the source chain is dropped.
    pub fn duplicate(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            provider: self.provider.clone(),
            upstream: self.upstream.clone(),
            source: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Maps a non-success HTTP status onto an error, keeping upstream details.
pub(crate) fn status_error(
    endpoint: &str,
    status: reqwest::StatusCode,
    body: String,
) -> ProviderError {
    let mut err = ProviderError::upstream(endpoint, status.as_u16(), body);
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            err.code = ProviderErrorCode::AuthenticationFailed;
            err.message = format!("{endpoint}: credential rejected ({status})");
        }
        reqwest::StatusCode::NOT_FOUND => {
            err.code = ProviderErrorCode::NotFound;
            err.message = format!("{endpoint}: not found");
        }
        _ => {}
    }
    err
}

/// Maps a reqwest transport error onto a network error.
pub(crate) fn transport_error(endpoint: &str, err: reqwest::Error) -> ProviderError {
    let message = if err.is_timeout() {
        format!("{endpoint}: request timeout")
    } else if err.is_connect() {
        format!("{endpoint}: connection failed")
    } else {
        format!("{endpoint}: request failed")
    };
    ProviderError::network(message).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_retry() {
        assert!(ProviderErrorCode::NetworkError.is_retryable());
        assert!(!ProviderErrorCode::UpstreamError.is_retryable());
        assert!(!ProviderErrorCode::AuthenticationFailed.is_retryable());
        assert!(!ProviderErrorCode::InvalidResponse.is_retryable());
    }

    #[test]
    fn upstream_carries_details() {
        let err = ProviderError::upstream("/businesses/b1/services", 502, "bad gateway")
            .with_provider("reservio");
        let details = err.upstream_details().unwrap();
        assert_eq!(details.endpoint, "/businesses/b1/services");
        assert_eq!(details.status, 502);
        assert_eq!(details.body, "bad gateway");
        assert_eq!(
            err.to_string(),
            "[reservio] upstream_error: /businesses/b1/services returned status 502"
        );
    }

    #[test]
    fn rejected_payload_looks_like_upstream_error() {
        let err = ProviderError::rejected("/Customer/Create", Some("Invalid phone".into()));
        assert_eq!(err.code(), ProviderErrorCode::UpstreamError);
        let details = err.upstream_details().unwrap();
        assert_eq!(details.status, 200);
        assert_eq!(details.body, "Invalid phone");

        let anonymous = ProviderError::rejected("/Location/GetList", None);
        assert_eq!(anonymous.upstream_details().unwrap().body, "unknown error");
    }

    #[test]
    fn status_mapping() {
        let auth = status_error("/services", reqwest::StatusCode::UNAUTHORIZED, String::new());
        assert_eq!(auth.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(auth.upstream_details().unwrap().status, 401);

        let missing = status_error("/businesses/x", reqwest::StatusCode::NOT_FOUND, "{}".into());
        assert_eq!(missing.code(), ProviderErrorCode::NotFound);

        let broken = status_error("/bookings", reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops".into());
        assert_eq!(broken.code(), ProviderErrorCode::UpstreamError);
        assert_eq!(broken.upstream_details().unwrap().body, "oops");
    }

    #[test]
    fn duplicate_keeps_everything_but_source() {
        use std::error::Error;
        let original = ProviderError::network("boom")
            .with_provider("reservanto")
            .with_source(std::io::Error::other("reset"));
        assert!(original.source().is_some());

        let copy = original.duplicate();
        assert_eq!(copy.code(), ProviderErrorCode::NetworkError);
        assert_eq!(copy.provider(), Some("reservanto"));
        assert!(copy.source().is_none());
    }
}
