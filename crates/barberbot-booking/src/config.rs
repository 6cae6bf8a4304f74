//! Booking engine configuration.

use std::time::Duration;

use barberbot_core::default_offset;
use chrono::{Datelike, FixedOffset, NaiveDate, Weekday};

/// Booking configuration.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Offset every local date and display time is expressed in.
    pub utc_offset: FixedOffset,

    /// Overall deadline of one conversation turn.
    pub turn_timeout: Duration,

    /// Total attempts of a turn, the first one included.
    pub max_attempts: u32,

    /// Delay before the second attempt; doubled for each later one.
    pub backoff_base: Duration,

    /// Weekdays the businesses never open.
    pub closed_weekdays: Vec<Weekday>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_offset(),
            turn_timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            closed_weekdays: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

impl BookingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the local offset.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Builder: set the turn deadline.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Builder: set attempts and backoff base. At least one attempt is made.
    pub fn with_retries(mut self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff_base = backoff_base;
        self
    }

    /// Builder: set closed weekdays.
    pub fn with_closed_weekdays(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.closed_weekdays = days.into_iter().collect();
        self
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        if failed_attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(failed_attempt - 1);
        self.backoff_base.saturating_mul(factor)
    }

    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_weekdays.contains(&date.weekday())
    }
}
