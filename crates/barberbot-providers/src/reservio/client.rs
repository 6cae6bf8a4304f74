//! Reservio HTTP client.
//!
//! Thin transport layer: authentication headers, status handling and JSON
//! decoding. Knows nothing about the booking domain.

use barberbot_core::time::request_timestamp;
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult, status_error, transport_error};

use super::config::ReservioConfig;

pub(crate) const PROVIDER: &str = "reservio";

/// Media type for both requests and responses.
const JSON_API: &str = "application/vnd.api+json";

const TIMESTAMP_HEADER: &str = "X-Request-Timestamp";

/// The JSON:API `errors` member, which may accompany a 2xx status.
#[derive(Debug, Default, Deserialize)]
struct ErrorMembers {
    #[serde(default)]
    errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug)]
pub struct ReservioClient {
    http: reqwest::Client,
    config: ReservioConfig,
}

impl ReservioClient {
    pub fn new(config: ReservioConfig) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client")
                    .with_source(e)
                    .with_provider(PROVIDER)
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ReservioConfig {
        &self.config
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<R> {
        let request = self.http.get(self.config.endpoint(path)).query(query);
        self.send(token, path, request).await
    }

    pub async fn post<B, R>(&self, token: &str, path: &str, body: &B) -> ProviderResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| {
            ProviderError::internal(format!("{path}: failed to encode request body"))
                .with_source(e)
                .with_provider(PROVIDER)
        })?;
        let request = self
            .http
            .post(self.config.endpoint(path))
            .header(CONTENT_TYPE, JSON_API)
            .body(payload);
        self.send(token, path, request).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> ProviderResult<R> {
        debug!(endpoint = %path, "reservio request");

        let response = request
            .bearer_auth(token)
            .header(ACCEPT, JSON_API)
            .header(TIMESTAMP_HEADER, request_timestamp(Utc::now()).to_string())
            .send()
            .await
            .map_err(|e| transport_error(path, e).with_provider(PROVIDER))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(path, e).with_provider(PROVIDER))?;

        if !status.is_success() {
            debug!(endpoint = %path, status = %status, "reservio error response");
            return Err(status_error(path, status, body).with_provider(PROVIDER));
        }

        decode_document(path, &body)
    }
}

/// Decodes a 2xx body, failing when it carries a non-empty `errors` member.
pub(crate) fn decode_document<R: DeserializeOwned>(path: &str, body: &str) -> ProviderResult<R> {
    let members: ErrorMembers = parse_json(path, body)?;
    if let Some(first) = members.errors.into_iter().next() {
        debug!(endpoint = %path, "reservio error document");
        let message = first.detail.or(first.title);
        return Err(ProviderError::rejected(path, message).with_provider(PROVIDER));
    }
    parse_json(path, body)
}

fn parse_json<R: DeserializeOwned>(path: &str, body: &str) -> ProviderResult<R> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("{path}: unexpected response shape"))
            .with_source(e)
            .with_provider(PROVIDER)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[derive(Debug, Deserialize)]
    struct Data {
        data: Vec<serde_json::Value>,
    }

    #[test]
    fn errors_member_fails_even_with_data() {
        let body = r#"{"data": [], "errors": [{"status": "403", "detail": "token revoked"}]}"#;
        let err = decode_document::<Data>("/businesses/b1/services", body).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::UpstreamError);
        let details = err.upstream_details().unwrap();
        assert_eq!(details.status, 200);
        assert_eq!(details.body, "token revoked");
    }

    #[test]
    fn title_is_used_without_detail() {
        let body = r#"{"errors": [{"title": "Forbidden"}]}"#;
        let err = decode_document::<Data>("/businesses/b1", body).unwrap_err();
        assert_eq!(err.upstream_details().unwrap().body, "Forbidden");
    }

    #[test]
    fn empty_errors_member_is_success() {
        let body = r#"{"data": [{"id": "s1"}], "errors": []}"#;
        let doc = decode_document::<Data>("/businesses/b1/services", body).unwrap();
        assert_eq!(doc.data.len(), 1);
    }
}
