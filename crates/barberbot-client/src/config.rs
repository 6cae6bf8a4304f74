//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/barberbot/config.toml` by default.
//!
//! Credential values (`long_lived_token`, `api_key`, and each business's
//! `credential`) are secret references:
//! - `env::VAR_NAME` resolved from the environment
//! - `file::/path` first line of the file
//! - plain text used as-is
//!
//! ```toml
//! [reservanto]
//! long_lived_token = "env::RESERVANTO_LTT"
//!
//! [store]
//! url = "https://xyz.supabase.co"
//! api_key = "env::SUPABASE_ANON_KEY"
//!
//! [booking]
//! utc_offset = "+01:00"
//! closed_weekdays = ["sat", "sun"]
//!
//! [[businesses]]
//! id = "ef525423-dabf-4750-bf11-dc5182d68695"
//! name = "Rico Studio"
//! category = "barbershop"
//! credential = "env::RICO_STUDIO_TOKEN"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use barberbot_booking::{BookingConfig, StoreConfig};
use barberbot_core::{Business, resolve_secret};
use barberbot_providers::{ReservantoConfig, ReservioConfig};
use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

/// Configuration for the barberbot CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    pub reservio: ReservioSettings,

    pub reservanto: ReservantoSettings,

    /// Record store holding businesses and registered users.
    pub store: StoreSettings,

    pub booking: BookingSettings,

    /// Replaces the record store and built-in directory when non-empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub businesses: Vec<Business>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservioSettings {
    /// API root override (staging, mock server).
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservantoSettings {
    pub base_url: Option<String>,

    /// Fallback long-lived token for businesses without their own.
    pub long_lived_token: Option<String>,

    /// Session token lifetime in seconds.
    pub session_ttl: Option<u64>,

    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub url: Option<String>,

    /// Defaults to `env::SUPABASE_ANON_KEY` when a URL is set.
    pub api_key: Option<String>,

    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// Local offset of the businesses, e.g. `+01:00`.
    pub utc_offset: String,

    /// Deadline of one turn in seconds.
    pub turn_timeout: u64,

    pub max_attempts: u32,

    /// Backoff before the second attempt, in milliseconds.
    pub backoff_ms: u64,

    pub closed_weekdays: Vec<String>,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            utc_offset: "+01:00".to_string(),
            turn_timeout: 30,
            max_attempts: 3,
            backoff_ms: 1000,
            closed_weekdays: vec!["sat".to_string(), "sun".to_string()],
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("barberbot")
    }

    pub fn booking_config(&self) -> Result<BookingConfig, String> {
        self.booking.to_booking_config()
    }

    pub fn reservio_config(&self) -> Result<ReservioConfig, String> {
        let mut config = ReservioConfig::new();
        if let Some(ref url) = self.reservio.base_url {
            config = config
                .with_base_url(url)
                .map_err(|e| format!("invalid reservio base_url '{url}': {e}"))?;
        }
        if let Some(secs) = self.reservio.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config.with_utc_offset(self.booking.offset()?))
    }

    pub fn reservanto_config(&self) -> Result<ReservantoConfig, String> {
        let settings = &self.reservanto;
        let mut config = ReservantoConfig::new();
        if let Some(ref url) = settings.base_url {
            config = config
                .with_base_url(url)
                .map_err(|e| format!("invalid reservanto base_url '{url}': {e}"))?;
        }
        if let Some(ref token) = settings.long_lived_token {
            config = config.with_long_lived_token(token);
        }
        if let Some(secs) = settings.session_ttl {
            config = config.with_session_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = settings.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn store_config(&self) -> StoreConfig {
        let settings = &self.store;
        let mut config = StoreConfig {
            url: settings.url.clone(),
            api_key: settings.api_key.clone(),
            ..StoreConfig::default()
        };
        if config.is_configured() && config.api_key.is_none() {
            config.api_key = Some(StoreConfig::DEFAULT_KEY_REFERENCE.to_string());
        }
        if let Some(secs) = settings.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Checks everything that can be checked without network access.
    ///
    /// Returns one line per problem found.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Err(e) = self.booking_config() {
            problems.push(e);
        }
        if let Err(e) = self.reservio_config() {
            problems.push(e);
        }
        if let Err(e) = self.reservanto_config() {
            problems.push(e);
        }
        if let Some(ref token) = self.reservanto.long_lived_token {
            if let Err(e) = resolve_secret(token) {
                problems.push(format!("reservanto long_lived_token: {e}"));
            }
        }
        let store = self.store_config();
        if store.is_configured() {
            if let Some(ref key) = store.api_key {
                if let Err(e) = resolve_secret(key) {
                    problems.push(format!("store api_key: {e}"));
                }
            }
        }
        for business in &self.businesses {
            if business.credential.trim().is_empty() {
                continue;
            }
            if let Err(e) = resolve_secret(&business.credential) {
                problems.push(format!("business '{}' credential: {e}", business.name));
            }
        }
        problems
    }
}

impl BookingSettings {
    fn offset(&self) -> Result<FixedOffset, String> {
        self.utc_offset
            .trim()
            .parse::<FixedOffset>()
            .map_err(|e| format!("invalid booking utc_offset '{}': {e}", self.utc_offset))
    }

    fn weekdays(&self) -> Result<Vec<Weekday>, String> {
        self.closed_weekdays
            .iter()
            .map(|day| {
                day.trim()
                    .parse::<Weekday>()
                    .map_err(|_| format!("invalid closed weekday '{day}'"))
            })
            .collect()
    }

    pub fn to_booking_config(&self) -> Result<BookingConfig, String> {
        if self.turn_timeout == 0 {
            return Err("booking turn_timeout must be greater than zero".to_string());
        }
        Ok(BookingConfig::new()
            .with_utc_offset(self.offset()?)
            .with_turn_timeout(Duration::from_secs(self.turn_timeout))
            .with_retries(self.max_attempts, Duration::from_millis(self.backoff_ms))
            .with_closed_weekdays(self.weekdays()?))
    }
}
