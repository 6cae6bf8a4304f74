//! Conversation turns under a deadline.
//!
//! A turn is one operation chain started by an inbound message. It runs
//! under an overall deadline; when the deadline elapses the in-flight
//! future is dropped and the turn starts over after an exponential
//! backoff, up to a bounded number of attempts. Any other error ends the
//! turn immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone)]
pub struct TurnRunner {
    config: BookingConfig,
}

impl TurnRunner {
    pub fn new(config: BookingConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        self.config.turn_timeout
    }

    /// Runs `operation` until it finishes inside the deadline or the
    /// attempts are used up.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> BookingResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BookingResult<T>>,
    {
        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            debug!(turn = %label, attempt, "turn started");
            match tokio::time::timeout(self.config.turn_timeout, operation()).await {
                Ok(result) => return result,
                Err(_) => {
                    warn!(
                        turn = %label,
                        attempt,
                        timeout_secs = self.config.turn_timeout.as_secs_f64(),
                        "turn deadline elapsed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.config.backoff_delay(attempt)).await;
                    }
                }
            }
        }
        Err(BookingError::Timeout { attempts })
    }
}
