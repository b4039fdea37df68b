//! Retry policy for catalog feed calls.
//!
//! Implements exponential backoff with configurable parameters.

use super::FeedError;
use crate::config::FeedSettings;
use std::time::Duration;

/// Retry policy implementing exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per call, the first one included.
    pub max_attempts: u32,
    /// Wait before the first retry in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum wait in milliseconds (cap for exponential growth).
    pub max_backoff_ms: u64,
    /// Multiplier applied to the wait after each retry.
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Create a new RetryPolicy from configuration settings.
    pub fn new(settings: &FeedSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            initial_backoff_ms: settings.initial_backoff_ms,
            max_backoff_ms: settings.max_backoff_ms,
            backoff_multiplier: settings.backoff_multiplier,
        }
    }

    /// Wait before retry number `retry` (1-based).
    ///
    /// `initial_backoff * multiplier^(retry - 1)`, capped at `max_backoff_ms`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let backoff = self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = backoff.min(self.max_backoff_ms as f64);
        Duration::from_millis(capped as u64)
    }

    /// Check if a call that failed on attempt `attempt` (1-based) should be
    /// attempted again.
    pub fn should_retry(&self, error: &FeedError, attempt: u32) -> bool {
        error.is_retryable() && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            backoff_multiplier: 2.0,
        }
    }
}
