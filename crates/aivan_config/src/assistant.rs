//! Assistant configuration.

use schematic::{Config, ConfigEnum};
use serde::{Deserialize, Serialize};

/// The persona the assistant adopts for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ConfigEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Produce or modify code. Every answer is a complete, regenerated
    /// artifact.
    #[default]
    Creator,

    /// Explain, answer questions and help debug, without regenerating the
    /// artifact unless asked.
    Question,

    /// Design-first persona that analyzes the request before writing code.
    Researcher,
}

/// Assistant configuration.
#[derive(Debug, Clone, PartialEq, Config, Serialize)]
#[config(rename_all = "snake_case")]
pub struct AssistantConfig {
    /// The model to use when none is given on the command line.
    #[setting(default = "gemini-2.5-flash", env = "AIVAN_MODEL")]
    pub model: String,

    /// The default chat mode.
    #[setting(default, env = "AIVAN_MODE")]
    pub mode: ChatMode,

    /// Whether the user is on the premium tier.
    ///
    /// Free-tier creator requests carry mandatory advertisement and
    /// disclosure instructions.
    #[setting(default = false, env = "AIVAN_PREMIUM")]
    pub premium: bool,

    /// Requests a free-tier user may make per day. Ignored for premium users.
    #[setting(default = 20, env = "AIVAN_DAILY_LIMIT")]
    pub daily_limit: u32,

    /// Symbolic model name that selects the researcher persona.
    #[setting(default = "researcher-designer")]
    pub researcher_alias: String,

    /// Backend model the researcher alias resolves to.
    #[setting(default = "gemini-3-pro-preview", env = "AIVAN_RESEARCHER_MODEL")]
    pub researcher_model: String,
}
