//! Gemini API configuration.

use schematic::Config;
use serde::Serialize;

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Config, Serialize)]
#[config(rename_all = "snake_case")]
pub struct GeminiConfig {
    /// Environment variable that contains the API key.
    #[setting(default = "GEMINI_API_KEY", env = "AIVAN_GEMINI_API_KEY_ENV")]
    pub api_key_env: String,

    /// The base URL to use for API requests.
    #[setting(
        default = "https://generativelanguage.googleapis.com/v1beta",
        env = "AIVAN_GEMINI_BASE_URL"
    )]
    pub base_url: String,
}
