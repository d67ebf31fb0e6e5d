//! Turns a [`GenerationRequest`] into the payload sent to a backend.

pub mod instructions;

use aivan_config::ChatMode;
use tracing::trace;

use crate::{
    attachment::{self, Attachment},
    conversation::History,
    error::Result,
};

/// The default symbolic model id that selects the researcher persona.
pub const DEFAULT_RESEARCHER_ALIAS: &str = "researcher-designer";

const CURRENT_CODE_LABEL: &str = "[CURRENT CODE]";
const HISTORY_HEADING: &str = "Conversation history:";
const NEW_REQUEST_MARKER: &str = "New request:";

/// Everything the caller supplies for a single generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub history: History,
    pub attachments: Vec<Attachment>,
    pub current_code: Option<String>,
    pub mode: ChatMode,
    pub model: String,
    pub premium: bool,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            history: History::new(),
            attachments: vec![],
            current_code: None,
            mode: ChatMode::default(),
            model: model.into(),
            premium: false,
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: impl Into<History>) -> Self {
        self.history = history.into();
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    #[must_use]
    pub fn with_current_code(mut self, code: impl Into<String>) -> Self {
        self.current_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ChatMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_premium(mut self, premium: bool) -> Self {
        self.premium = premium;
        self
    }
}

/// One part of the user content sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

/// The assembled request: user content parts plus the system instruction.
///
/// The first part is always the text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub parts: Vec<ContentPart>,
    pub system_instruction: String,
}

impl RequestPayload {
    /// The text of the leading part.
    #[must_use]
    pub fn text(&self) -> &str {
        match self.parts.first() {
            Some(ContentPart::Text(text)) => text,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    researcher_alias: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RESEARCHER_ALIAS)
    }
}

impl PromptBuilder {
    #[must_use]
    pub fn new(researcher_alias: impl Into<String>) -> Self {
        Self {
            researcher_alias: researcher_alias.into(),
        }
    }

    /// Resolve attachments and assemble the payload.
    pub async fn build(&self, request: &GenerationRequest) -> Result<RequestPayload> {
        let files = attachment::resolve_all(&request.attachments).await?;
        Ok(self.assemble(request, files))
    }

    /// Assemble the payload from already resolved attachment parts.
    #[must_use]
    pub fn assemble(&self, request: &GenerationRequest, files: Vec<ContentPart>) -> RequestPayload {
        let text = user_text(
            &request.prompt,
            &request.history,
            request.current_code.as_deref(),
        );

        let mode = self.effective_mode(request);
        let system_instruction = instructions::system_instruction(mode, request.premium);

        trace!(
            ?mode,
            premium = request.premium,
            attachments = files.len(),
            text,
            "Assembled request payload."
        );

        let mut parts = Vec::with_capacity(files.len() + 1);
        parts.push(ContentPart::Text(text));
        parts.extend(files);

        RequestPayload {
            parts,
            system_instruction,
        }
    }

    /// The mode used for the system instruction.
    ///
    /// Requesting the researcher alias as the model selects the researcher
    /// persona, whatever mode was asked for.
    #[must_use]
    pub fn effective_mode(&self, request: &GenerationRequest) -> ChatMode {
        if request.model == self.researcher_alias {
            ChatMode::Researcher
        } else {
            request.mode
        }
    }
}

/// The text part: history, then current code, then the prompt.
#[must_use]
pub fn user_text(prompt: &str, history: &History, current_code: Option<&str>) -> String {
    let mut text = prompt.to_owned();

    if let Some(code) = current_code.filter(|code| !code.is_empty()) {
        text = format!(
            "{CURRENT_CODE_LABEL}\n(The user is viewing this version right now. Every change you \
             make must be based on this code):\n```\n{code}\n```\n\n{text}"
        );
    }

    if !history.is_empty() {
        text = format!(
            "{HISTORY_HEADING}\n{}\n\n{NEW_REQUEST_MARKER}\n{text}",
            history.transcript()
        );
    }

    text
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
