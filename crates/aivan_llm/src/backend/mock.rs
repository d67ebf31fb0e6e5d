//! Scripted backend for testing the pipeline without network calls.
//!
//! Each call to the backend consumes the next scripted [`Attempt`]. Once the
//! script runs out, the last attempt is repeated, so a backend that always
//! rate limits is simply:
//!
//! ```
//! use aivan_llm::backend::{BackendError, MockBackend, mock::Attempt};
//!
//! let backend = MockBackend::new(vec![Attempt::Fail(BackendError::rate_limited())]);
//! ```

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::{Backend, BackendError, FragmentStream};
use crate::prompt::RequestPayload;

/// The scripted outcome of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Succeed with these fragments.
    Fragments(Vec<String>),

    /// Fail before producing anything.
    Fail(BackendError),

    /// Produce these fragments, then fail mid-stream.
    FailAfter(Vec<String>, BackendError),
}

impl Attempt {
    #[must_use]
    pub fn fragments<S: Into<String>>(fragments: impl IntoIterator<Item = S>) -> Self {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub at: Instant,
    pub model: String,
    pub stream: bool,
    pub payload: RequestPayload,
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    script: Arc<Mutex<VecDeque<Attempt>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockBackend {
    #[must_use]
    pub fn new(script: Vec<Attempt>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    /// A backend that always answers with the given fragments.
    #[must_use]
    pub fn with_fragments<S: Into<String>>(fragments: impl IntoIterator<Item = S>) -> Self {
        Self::new(vec![Attempt::fragments(fragments)])
    }

    /// Every call made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn next_attempt(&self, model: &str, stream: bool, payload: &RequestPayload) -> Attempt {
        self.calls.lock().push(Call {
            at: Instant::now(),
            model: model.to_owned(),
            stream,
            payload: payload.clone(),
        });

        let mut script = self.script.lock();
        let attempt = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };

        attempt.unwrap_or(Attempt::Fragments(vec![]))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(&self, model: &str, payload: &RequestPayload) -> Result<String, BackendError> {
        match self.next_attempt(model, false, payload) {
            Attempt::Fragments(fragments) => Ok(fragments.concat()),
            Attempt::Fail(error) | Attempt::FailAfter(_, error) => Err(error),
        }
    }

    async fn generate_stream(
        &self,
        model: &str,
        payload: &RequestPayload,
    ) -> Result<FragmentStream, BackendError> {
        let items = match self.next_attempt(model, true, payload) {
            Attempt::Fragments(fragments) => fragments.into_iter().map(Ok).collect::<Vec<_>>(),
            Attempt::Fail(error) => return Err(error),
            Attempt::FailAfter(fragments, error) => fragments
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
        };

        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
