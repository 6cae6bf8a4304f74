//! Reservanto platform configuration.

use std::time::Duration;

use url::Url;

#[derive(Debug, Clone)]
pub struct ReservantoConfig {
    /// API root, e.g. `https://api.reservanto.cz/v1`.
    pub base_url: Url,

    /// Secret reference of the long-lived merchant token, used for
    /// businesses that do not carry their own credential.
    pub long_lived_token: Option<String>,

    /// How long an exchanged session token is reused. Upstream tokens live
    /// 30 minutes; the default keeps 5 minutes of margin.
    pub session_ttl: Duration,

    /// Transport timeout for each HTTP call.
    pub timeout: Duration,

    pub user_agent: String,
}

impl ReservantoConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.reservanto.cz/v1";

    pub const DEFAULT_SESSION_TTL_SECS: u64 = 25 * 60;

    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Environment variable conventionally holding the long-lived token.
    pub const DEFAULT_TOKEN_REFERENCE: &'static str = "env::RESERVANTO_LTT";

    pub fn new() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("valid default URL"),
            long_lived_token: None,
            session_ttl: Duration::from_secs(Self::DEFAULT_SESSION_TTL_SECS),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("barberbot/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        self.base_url = Url::parse(url.as_ref())?;
        Ok(self)
    }

    pub fn with_long_lived_token(mut self, reference: impl Into<String>) -> Self {
        self.long_lived_token = Some(reference.into());
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
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

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl Default for ReservantoConfig {
    fn default() -> Self {
        Self::new()
    }
}
