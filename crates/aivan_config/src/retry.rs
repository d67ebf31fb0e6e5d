//! Rate-limit retry configuration.

use schematic::Config;
use serde::Serialize;

/// Retry policy for rate-limited backend requests.
#[derive(Debug, Clone, PartialEq, Config, Serialize)]
#[config(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    #[setting(default = 3)]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds.
    ///
    /// The delay before retry `n` (1-based) is `base_backoff_ms * 2^n`.
    #[setting(default = 2000)]
    pub base_backoff_ms: u64,
}
