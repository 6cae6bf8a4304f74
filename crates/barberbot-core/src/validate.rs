//! Validation of user-supplied booking inputs.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Prefix messaging channels put in front of sender numbers.
const WHATSAPP_PREFIX: &str = "whatsapp:";

/// A rejected input, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new("date", format!("'{}' is not a YYYY-MM-DD date", raw.trim()))
    })
}

/// Checks the basic `local@domain.tld` shape and returns the trimmed address.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if EMAIL_RE.is_match(email) {
        Ok(email.to_string())
    } else {
        Err(ValidationError::new(
            "email",
            format!("'{email}' is not a valid email address"),
        ))
    }
}

/// Normalizes a phone number to `+<digits>`.
///
/// Strips a `whatsapp:` channel prefix, spaces, dashes, dots and
/// parentheses. A leading `00` is rewritten to `+`.
pub fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let without_channel = trimmed.strip_prefix(WHATSAPP_PREFIX).unwrap_or(trimmed);

    let compact: String = without_channel
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let digits = if let Some(rest) = compact.strip_prefix('+') {
        rest
    } else if let Some(rest) = compact.strip_prefix("00") {
        rest
    } else {
        compact.as_str()
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "phone",
            format!("'{trimmed}' is not a phone number"),
        ));
    }
    if !(6..=15).contains(&digits.len()) {
        return Err(ValidationError::new(
            "phone",
            format!("'{trimmed}' has an implausible number of digits"),
        ));
    }
    Ok(format!("+{digits}"))
}
