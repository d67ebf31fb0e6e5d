pub mod gemini;
pub mod mock;

use std::{fmt, pin::Pin};

use async_trait::async_trait;
use futures::Stream;

pub use self::{gemini::GeminiBackend, mock::MockBackend};
use crate::prompt::RequestPayload;

/// HTTP status the backend uses to signal rate limiting.
pub const RATE_LIMIT_STATUS: u16 = 429;

/// A stream of text fragments, in the order the backend produced them.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send>>;

/// A failure reported by a [`Backend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(Some(RATE_LIMIT_STATUS), "Resource has been exhausted.")
    }

    /// Whether the request should be retried after a backoff.
    ///
    /// Some transports only surface the status inside the message, so both
    /// are checked.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(RATE_LIMIT_STATUS)
            || self.message.contains(&RATE_LIMIT_STATUS.to_string())
    }
}

/// A generative-AI service that turns a [`RequestPayload`] into text.
#[async_trait]
pub trait Backend: fmt::Debug + Send + Sync {
    /// Generate the complete response in one call.
    async fn generate(&self, model: &str, payload: &RequestPayload) -> Result<String, BackendError>;

    /// Open a stream of response fragments.
    ///
    /// Errors returned here happen before any fragment is produced; errors
    /// yielded by the stream happen mid-response.
    async fn generate_stream(
        &self,
        model: &str,
        payload: &RequestPayload,
    ) -> Result<FragmentStream, BackendError>;
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
