//! PostgREST-style record store.
//!
//! Holds the business directory (`/rest/v1/businesses`) and the registry
//! of end users who have talked to the assistant (`/rest/v1/users`). Only
//! selects and upserts are used.

use std::time::Duration;

use barberbot_core::{Business, Category, Platform, normalize_phone, resolve_secret};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

const BUSINESSES: &str = "/rest/v1/businesses";
const USERS: &str = "/rest/v1/users";

/// Errors talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Connection failure or timeout.
    #[error("{endpoint}: request failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body did not match the expected rows.
    #[error("{endpoint}: unexpected response shape")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Store URL or key missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] barberbot_core::ValidationError),
}

impl StoreError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Connection settings for the record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. No store when unset.
    pub url: Option<String>,
    /// Secret reference of the anonymous API key.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    /// Environment variable conventionally holding the API key.
    pub const DEFAULT_KEY_REFERENCE: &'static str = "env::SUPABASE_ANON_KEY";

    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// A business row as stored.
#[derive(Debug, Clone, Deserialize)]
struct BusinessRow {
    id: String,
    name: String,
    category: String,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    is_default: Option<bool>,
    #[serde(default)]
    token_env_var: Option<String>,
    #[serde(default)]
    location_id: Option<String>,
    #[serde(default)]
    google_rating: Option<f32>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    instagram: Option<String>,
}

impl BusinessRow {
    fn into_business(self) -> Option<Business> {
        let category: Category = match self.category.parse() {
            Ok(category) => category,
            Err(e) => {
                warn!(business = %self.name, error = %e, "skipping stored business");
                return None;
            }
        };
        let platform: Platform = match self.platform.as_deref().map(str::parse::<Platform>).transpose() {
            Ok(platform) => platform.unwrap_or_default(),
            Err(e) => {
                warn!(business = %self.name, error = %e, "skipping stored business");
                return None;
            }
        };
        let credential = self
            .token_env_var
            .filter(|var| !var.trim().is_empty())
            .map(|var| format!("env::{}", var.trim()))
            .unwrap_or_default();

        Some(Business {
            id: self.id,
            name: self.name,
            category,
            platform,
            credential,
            is_default: self.is_default.unwrap_or(false),
            location_id: self.location_id,
            rating: self.google_rating,
            image_url: self.image_url,
            website: self.website,
            instagram: self.instagram,
        })
    }
}

/// An end user known to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
struct NewUser<'a> {
    phone_number: &'a str,
}

/// Client for the record store.
#[derive(Debug, Clone)]
pub struct RecordStore {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RecordStore {
    /// Builds a client from configuration; `Ok(None)` when no URL is set.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Option<Self>> {
        let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        let reference = config
            .api_key
            .as_deref()
            .unwrap_or(StoreConfig::DEFAULT_KEY_REFERENCE);
        let api_key = resolve_secret(reference)
            .map_err(|e| StoreError::Configuration(format!("store API key: {e}")))?;
        Self::new(url, api_key, config.timeout).map(Some)
    }

    pub fn new(url: &str, api_key: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let base_url = Url::parse(url.trim().trim_matches(|c| c == '\'' || c == '"'))
            .map_err(|e| StoreError::Configuration(format!("store URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
    }

    async fn send<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> StoreResult<R> {
        let response = request.send().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(StoreError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Every stored business; rows with an unknown category are skipped.
    pub async fn businesses(&self) -> StoreResult<Vec<Business>> {
        let request = self
            .request(reqwest::Method::GET, BUSINESSES)
            .query(&[("select", "*")]);
        let rows: Vec<BusinessRow> = self.send(BUSINESSES, request).await?;
        debug!(rows = rows.len(), "stored businesses");
        Ok(rows.into_iter().filter_map(BusinessRow::into_business).collect())
    }

    /// Registers a phone number. Registering the same number again is a
    /// no-op upstream.
    pub async fn register_user(&self, phone: &str) -> StoreResult<UserRecord> {
        let phone_number = normalize_phone(phone)?;
        let body = serde_json::to_vec(&[NewUser {
            phone_number: &phone_number,
        }])
        .map_err(|source| StoreError::Decode {
            endpoint: USERS.to_string(),
            source,
        })?;

        let request = self
            .request(reqwest::Method::POST, USERS)
            .query(&[("on_conflict", "phone_number")])
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .body(body);
        let rows: Vec<UserRecord> = self.send(USERS, request).await?;
        info!("user registered");

        Ok(rows.into_iter().next().unwrap_or(UserRecord {
            phone_number,
            created_at: None,
        }))
    }

    pub async fn users(&self) -> StoreResult<Vec<UserRecord>> {
        let request = self
            .request(reqwest::Method::GET, USERS)
            .query(&[("select", "phone_number,created_at")]);
        self.send(USERS, request).await
    }
}
