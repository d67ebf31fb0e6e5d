//! Backoff policy for rate-limited requests.

use std::time::Duration;

use aivan_config::RetryConfig;
use tracing::{error, warn};

use crate::{backend::BackendError, error::Error};

/// How often, and how patiently, a rate-limited request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Base backoff delay in milliseconds.
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff_ms: 2000,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_backoff_ms: config.base_backoff_ms,
        }
    }
}

impl RetryPolicy {
    /// Start tracking a new logical request.
    #[must_use]
    pub const fn start(self) -> RetryState {
        RetryState {
            policy: self,
            attempt: 0,
        }
    }
}

/// Retry bookkeeping for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    /// Number of retries scheduled so far.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Classify a failed attempt.
    ///
    /// Returns the delay to wait before the next attempt, or the terminal
    /// error if the failure is not retryable or the budget is spent.
    pub fn on_error(&mut self, error: BackendError) -> Result<Duration, Error> {
        if !error.is_rate_limited() {
            error!(
                status = error.status,
                error = error.message,
                "Backend request failed."
            );

            return Err(Error::Backend {
                status: error.status,
                message: error.message,
            });
        }

        if self.attempt >= self.policy.max_retries {
            error!(
                retries = self.attempt,
                error = error.message,
                "Rate limited (exhausted retries)."
            );

            return Err(Error::RateLimited {
                retries: self.attempt,
            });
        }

        self.attempt += 1;
        let delay = exponential_backoff(self.attempt, self.policy.base_backoff_ms);

        warn!(
            attempt = self.attempt,
            max = self.policy.max_retries,
            delay_ms = delay.as_millis(),
            "Rate limited, backing off."
        );

        Ok(delay)
    }
}

/// Calculate exponential backoff delay.
///
/// Formula: `base * 2^attempt`, saturating instead of overflowing.
///
/// # Arguments
///
/// * `attempt` - Retry number (1-based). The first retry waits `2 * base`.
/// * `base_backoff_ms` - Base delay in milliseconds.
#[must_use]
pub fn exponential_backoff(attempt: u32, base_backoff_ms: u64) -> Duration {
    Duration::from_millis(base_backoff_ms.saturating_mul(2u64.saturating_pow(attempt)))
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
