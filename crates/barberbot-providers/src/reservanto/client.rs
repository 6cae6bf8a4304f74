//! Reservanto HTTP client.
//!
//! Every call is a `POST` with a JSON body that carries a `TimeStamp`
//! field. Replies carry `IsError` and an optional `ErrorMessage`; a set
//! flag is reported exactly like a non-success status.

use std::sync::Arc;

use barberbot_core::time::request_timestamp;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{
    ProviderError, ProviderErrorCode, ProviderResult, status_error, transport_error,
};

use super::config::ReservantoConfig;
use super::session::SessionManager;

pub(crate) const PROVIDER: &str = "reservanto";

/// Request body with the timestamp merged in.
#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    #[serde(flatten)]
    body: &'a B,
    #[serde(rename = "TimeStamp")]
    time_stamp: i64,
}

/// The error flag present on every reply.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorFlag {
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    error_message: Option<String>,
}

/// Body for endpoints that take no parameters.
#[derive(Serialize)]
pub(crate) struct EmptyBody {}

/// Sends one Reservanto request and returns the raw body of a 2xx reply.
pub(crate) async fn send_json<B: Serialize>(
    http: &reqwest::Client,
    url: &str,
    authorization: Option<&str>,
    endpoint: &str,
    body: &B,
    now: DateTime<Utc>,
) -> ProviderResult<String> {
    let envelope = Envelope {
        body,
        time_stamp: request_timestamp(now),
    };
    let payload = serde_json::to_vec(&envelope).map_err(|e| {
        ProviderError::internal(format!("{endpoint}: failed to encode request body"))
            .with_source(e)
            .with_provider(PROVIDER)
    })?;

    let mut request = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .body(payload);
    if let Some(token) = authorization {
        request = request.header(AUTHORIZATION, token);
    }

    debug!(endpoint = %endpoint, "reservanto request");
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(endpoint, e).with_provider(PROVIDER))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(endpoint, e).with_provider(PROVIDER))?;

    if !status.is_success() {
        return Err(status_error(endpoint, status, text).with_provider(PROVIDER));
    }
    Ok(text)
}

/// Decodes a reply, failing on a set `IsError` flag or an unknown shape.
pub(crate) fn decode_reply<R: DeserializeOwned>(endpoint: &str, text: &str) -> ProviderResult<R> {
    let flag: ErrorFlag = parse_json(endpoint, text)?;
    if flag.is_error {
        return Err(ProviderError::rejected(endpoint, flag.error_message).with_provider(PROVIDER));
    }
    parse_json(endpoint, text)
}

fn parse_json<R: DeserializeOwned>(endpoint: &str, text: &str) -> ProviderResult<R> {
    serde_json::from_str(text).map_err(|e| {
        ProviderError::invalid_response(format!("{endpoint}: unexpected response shape"))
            .with_source(e)
            .with_provider(PROVIDER)
    })
}

/// Authenticated Reservanto client.
#[derive(Debug)]
pub struct ReservantoClient {
    http: reqwest::Client,
    config: ReservantoConfig,
    sessions: Arc<SessionManager>,
}

impl ReservantoClient {
    pub fn new(config: ReservantoConfig) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client")
                    .with_source(e)
                    .with_provider(PROVIDER)
            })?;
        let sessions = Arc::new(SessionManager::new(http.clone(), &config));
        Ok(Self {
            http,
            config,
            sessions,
        })
    }

    pub fn config(&self) -> &ReservantoConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Calls `endpoint` and decodes the reply; `IsError` is an error.
    pub async fn call<B, R>(&self, long_lived: &str, endpoint: &str, body: &B) -> ProviderResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let text = self.post(long_lived, endpoint, body).await?;
        decode_reply(endpoint, &text)
    }

    /// Like [`Self::call`], but a reply with `IsError` set yields `None`.
    ///
    /// Only for lookups where the platform uses the flag to say "nothing
    /// matched". Transport and HTTP failures are still errors.
    pub async fn call_optional<B, R>(
        &self,
        long_lived: &str,
        endpoint: &str,
        body: &B,
    ) -> ProviderResult<Option<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let text = self.post(long_lived, endpoint, body).await?;
        match decode_reply(endpoint, &text) {
            Ok(reply) => Ok(Some(reply)),
            Err(e) if e.code() == ProviderErrorCode::UpstreamError => {
                let reason = e.upstream_details().map(|d| d.body.as_str()).unwrap_or_default();
                warn!(endpoint = %endpoint, reason = %reason, "reservanto flagged lookup, treating as no match");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn post<B: Serialize>(
        &self,
        long_lived: &str,
        endpoint: &str,
        body: &B,
    ) -> ProviderResult<String> {
        let token = self.sessions.session_token(long_lived).await?;
        let url = self.config.endpoint(endpoint);
        let result = send_json(&self.http, &url, Some(&token), endpoint, body, Utc::now()).await;

        if let Err(ref e) = result {
            if e.code() == ProviderErrorCode::AuthenticationFailed {
                self.sessions.invalidate(long_lived);
            }
        }
        result
    }
}
