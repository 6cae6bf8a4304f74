//! Session tokens for Reservanto.
//!
//! Every Reservanto call is authorized with a short-lived session token
//! obtained by exchanging the merchant's long-lived token. Exchanged tokens
//! are cached in memory per long-lived token until they expire.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};

use super::client::{PROVIDER, decode_reply, send_json};
use super::config::ReservantoConfig;

const EXCHANGE_ENDPOINT: &str = "/Authorize/GetShortTimeToken";

/// A cached session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExchangeRequest<'a> {
    long_time_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExchangeReply {
    short_time_token: Option<String>,
}

/// Exchanges long-lived tokens for session tokens and caches the result.
///
/// Shared between every Reservanto call of the process. Two callers that
/// miss the cache at the same time may both exchange; the later write wins
/// and both tokens are valid upstream.
#[derive(Debug)]
pub struct SessionManager {
    http: reqwest::Client,
    url: String,
    ttl: Duration,
    tokens: RwLock<HashMap<String, SessionToken>>,
}

impl SessionManager {
    pub fn new(http: reqwest::Client, config: &ReservantoConfig) -> Self {
        let ttl = Duration::from_std(config.session_ttl)
            .unwrap_or_else(|_| Duration::seconds(ReservantoConfig::DEFAULT_SESSION_TTL_SECS as i64));
        Self {
            http,
            url: config.endpoint(EXCHANGE_ENDPOINT),
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a valid session token for `long_lived`, exchanging if needed.
    pub async fn session_token(&self, long_lived: &str) -> ProviderResult<String> {
        self.session_token_at(long_lived, Utc::now()).await
    }

    /// Same as [`Self::session_token`] with an explicit clock.
    pub async fn session_token_at(
        &self,
        long_lived: &str,
        now: DateTime<Utc>,
    ) -> ProviderResult<String> {
        if let Some(cached) = self.cached(long_lived, now) {
            debug!(
                expires_in_secs = cached.time_until_expiry(now).num_seconds(),
                "reusing reservanto session token"
            );
            return Ok(cached.token);
        }

        let token = self.exchange(long_lived, now).await?;
        let entry = SessionToken {
            token: token.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        info!(expires_at = %entry.expires_at, "reservanto session token issued");
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(long_lived.to_string(), entry);
        Ok(token)
    }

    /// The cached token for `long_lived`, if still valid at `now`.
    pub fn cached(&self, long_lived: &str, now: DateTime<Utc>) -> Option<SessionToken> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(long_lived)
            .filter(|token| token.is_valid_at(now))
            .cloned()
    }

    /// Drops the cached token, e.g. after the upstream rejected it.
    pub fn invalidate(&self, long_lived: &str) {
        let removed = self
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(long_lived);
        if removed.is_some() {
            debug!("reservanto session token invalidated");
        }
    }

    async fn exchange(&self, long_lived: &str, now: DateTime<Utc>) -> ProviderResult<String> {
        let request = ExchangeRequest {
            long_time_token: long_lived,
        };
        let text = send_json(&self.http, &self.url, None, EXCHANGE_ENDPOINT, &request, now).await?;

        let reply: ExchangeReply = decode_reply(EXCHANGE_ENDPOINT, &text).map_err(|e| {
            if e.code() == ProviderErrorCode::UpstreamError {
                let reason = e
                    .upstream_details()
                    .map(|d| d.body.clone())
                    .unwrap_or_default();
                ProviderError::authentication(format!("session exchange rejected: {reason}"))
                    .with_provider(PROVIDER)
            } else {
                e
            }
        })?;

        reply
            .short_time_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ProviderError::authentication("session exchange returned no token")
                    .with_provider(PROVIDER)
            })
    }
}
