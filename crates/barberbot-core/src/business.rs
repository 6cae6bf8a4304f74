//! Businesses the assistant can book into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Kind of service a business offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Barbershop,
    Physiotherapy,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Barbershop, Category::Physiotherapy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Barbershop => "barbershop",
            Self::Physiotherapy => "physiotherapy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Barbershop => "Barbershop",
            Self::Physiotherapy => "Physiotherapy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "barbershop" | "barber" => Ok(Self::Barbershop),
            "physiotherapy" | "physio" => Ok(Self::Physiotherapy),
            other => Err(ValidationError::new(
                "category",
                format!("unknown category '{other}'"),
            )),
        }
    }
}

/// Upstream booking platform a business is hosted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// JSON:API platform addressed by business id with per-business tokens.
    #[default]
    Reservio,
    /// POST-RPC platform with a shared long-lived credential.
    Reservanto,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reservio => "reservio",
            Self::Reservanto => "reservanto",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reservio" => Ok(Self::Reservio),
            "reservanto" => Ok(Self::Reservanto),
            other => Err(ValidationError::new(
                "platform",
                format!("unknown platform '{other}'"),
            )),
        }
    }
}

/// A bookable business.
///
/// `credential` is a secret reference (`env::VAR`, `file::/path` or a literal)
/// resolved only when an adapter is built for the business. It is read from
/// config and store rows but never written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub platform: Platform,
    #[serde(skip_serializing)]
    pub credential: String,
    #[serde(default)]
    pub is_default: bool,
    /// Reservanto location used when no resource is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl Business {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        platform: Platform,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            platform,
            credential: credential.into(),
            is_default: false,
            location_id: None,
            rating: None,
            image_url: None,
            website: None,
            instagram: None,
        }
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_instagram(mut self, url: impl Into<String>) -> Self {
        self.instagram = Some(url.into());
        self
    }

    /// Same category, different business.
    pub fn is_sibling_of(&self, other: &Business) -> bool {
        self.category == other.category && self.id != other.id
    }

    /// Matches on exact id or case-insensitive name.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.trim();
        self.id == key || self.name.to_lowercase() == key.to_lowercase()
    }
}

/// Contact and address details reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl BusinessInfo {
    /// One-line postal address from whatever parts are present.
    pub fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.street, &self.zip_code, &self.city, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
