//! Reservio platform configuration.

use std::time::Duration;

use barberbot_core::time::default_offset;
use chrono::FixedOffset;
use url::Url;

#[derive(Debug, Clone)]
pub struct ReservioConfig {
    /// API root, e.g. `https://api.reservio.com/v2`.
    pub base_url: Url,

    /// Offset used to encode booking start/end times.
    pub utc_offset: FixedOffset,

    /// Transport timeout for each HTTP call.
    pub timeout: Duration,

    pub user_agent: String,
}

impl ReservioConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.reservio.com/v2";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    pub fn new() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("valid default URL"),
            utc_offset: default_offset(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("barberbot/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Points the adapter at a different API root (staging, mock server).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        self.base_url = Url::parse(url.as_ref())?;
        Ok(self)
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Absolute URL for an API path starting with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl Default for ReservioConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReservioConfig::new();
        assert_eq!(config.base_url.as_str(), "https://api.reservio.com/v2");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.utc_offset.local_minus_utc(), 3600);
        assert!(config.user_agent.starts_with("barberbot/"));
    }

    #[test]
    fn endpoint_keeps_version_segment() {
        let config = ReservioConfig::new();
        assert_eq!(
            config.endpoint("/businesses/b1/services"),
            "https://api.reservio.com/v2/businesses/b1/services"
        );

        let trailing = ReservioConfig::new()
            .with_base_url("http://127.0.0.1:9999/")
            .unwrap();
        assert_eq!(trailing.endpoint("/businesses/b1"), "http://127.0.0.1:9999/businesses/b1");
    }

    #[test]
    fn invalid_base_url() {
        assert!(ReservioConfig::new().with_base_url("not a url").is_err());
    }
}
