//! Layered configuration for the generation pipeline.
//!
//! Values are resolved from built-in defaults, configuration files and
//! `AIVAN_*` environment variables, in that order. See [`fs`] for how files
//! are located.

pub mod assistant;
mod error;
pub mod fs;
pub mod gemini;
pub mod retry;

use schematic::Config;
use serde::Serialize;

pub use crate::{
    assistant::{AssistantConfig, ChatMode, PartialAssistantConfig},
    error::Error,
    gemini::{GeminiConfig, PartialGeminiConfig},
    retry::{PartialRetryConfig, RetryConfig},
};

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Config, Serialize)]
#[config(rename_all = "snake_case")]
pub struct AppConfig {
    /// Gemini API configuration.
    #[setting(nested)]
    pub gemini: GeminiConfig,

    /// Assistant behavior.
    #[setting(nested)]
    pub assistant: AssistantConfig,

    /// Rate-limit retry policy.
    #[setting(nested)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Render the configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(Into::into)
    }
}

/// Restores an environment variable to its original value when dropped.
#[cfg(test)]
pub(crate) struct EnvVarGuard {
    name: &'static str,
    original_value: Option<String>,
}

#[cfg(test)]
impl EnvVarGuard {
    pub(crate) fn set(name: &'static str, value: &str) -> Self {
        let original_value = std::env::var(name).ok();
        unsafe { std::env::set_var(name, value) };
        Self {
            name,
            original_value,
        }
    }

    pub(crate) fn remove(name: &'static str) -> Self {
        let original_value = std::env::var(name).ok();
        unsafe { std::env::remove_var(name) };
        Self {
            name,
            original_value,
        }
    }

    /// Unset every `AIVAN_*` variable the configuration reads.
    pub(crate) fn clear_all() -> Vec<Self> {
        [
            "AIVAN_GEMINI_API_KEY_ENV",
            "AIVAN_GEMINI_BASE_URL",
            "AIVAN_MODEL",
            "AIVAN_MODE",
            "AIVAN_PREMIUM",
            "AIVAN_DAILY_LIMIT",
            "AIVAN_RESEARCHER_MODEL",
        ]
        .into_iter()
        .map(Self::remove)
        .collect()
    }
}

#[cfg(test)]
impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(original) = &self.original_value {
            unsafe { std::env::set_var(self.name, original) };
        } else {
            unsafe { std::env::remove_var(self.name) };
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
