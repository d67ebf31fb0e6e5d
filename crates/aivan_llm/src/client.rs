use std::{pin::Pin, sync::Arc};

use aivan_config::AppConfig;
use async_stream::stream;
use futures::{Stream, StreamExt as _};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    backend::Backend,
    error::Result,
    prompt::{DEFAULT_RESEARCHER_ALIAS, GenerationRequest, PromptBuilder},
    retry::RetryPolicy,
};

/// Returned by [`Client::generate`] when the backend produced no text.
pub const FALLBACK_RESPONSE: &str = "Sorry, I couldn't generate a response.";

const DEFAULT_RESEARCHER_MODEL: &str = "gemini-3-pro-preview";

/// Text fragments of a streamed response.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Runs generation requests against a [`Backend`], retrying on rate limits.
#[derive(Debug, Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
    prompt: PromptBuilder,
    retry: RetryPolicy,
    researcher_alias: String,
    researcher_model: String,
}

impl Client {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            prompt: PromptBuilder::default(),
            retry: RetryPolicy::default(),
            researcher_alias: DEFAULT_RESEARCHER_ALIAS.to_owned(),
            researcher_model: DEFAULT_RESEARCHER_MODEL.to_owned(),
        }
    }

    #[must_use]
    pub fn from_config(backend: Arc<dyn Backend>, config: &AppConfig) -> Self {
        Self::new(backend)
            .with_retry(RetryPolicy::from(&config.retry))
            .with_researcher_model(
                config.assistant.researcher_alias.clone(),
                config.assistant.researcher_model.clone(),
            )
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Map the symbolic `alias` model to the concrete backend `model`.
    #[must_use]
    pub fn with_researcher_model(
        mut self,
        alias: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        self.researcher_alias = alias.into();
        self.researcher_model = model.into();
        self.prompt = PromptBuilder::new(self.researcher_alias.clone());
        self
    }

    /// The backend model id used for a requested model.
    #[must_use]
    pub fn resolve_model<'a>(&'a self, model: &'a str) -> &'a str {
        if model == self.researcher_alias {
            &self.researcher_model
        } else {
            model
        }
    }

    /// Generate a response, yielding text fragments as they arrive.
    ///
    /// Cancelling `cancel` ends the stream without an error. A rate-limited
    /// attempt is rebuilt and resent from scratch, so fragments yielded
    /// before a mid-stream rate limit are followed by the retried response
    /// in full.
    #[must_use]
    pub fn generate_stream(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> TextStream {
        let client = self.clone();

        Box::pin(stream! {
            let model = client.resolve_model(&request.model).to_owned();
            let mut retry = client.retry.start();

            loop {
                let mut partial = false;

                if cancel.is_cancelled() {
                    info!("Generation cancelled.");
                    return;
                }

                let payload = match client.prompt.build(&request).await {
                    Ok(payload) => payload,
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                };

                debug!(model, attempt = retry.attempt(), "Starting generation stream.");

                let opened = tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        info!("Generation cancelled.");
                        return;
                    }
                    opened = client.backend.generate_stream(&model, &payload) => opened,
                };

                let failure = match opened {
                    Err(error) => error,
                    Ok(mut fragments) => loop {
                        let next = tokio::select! {
                            biased;
                            () = cancel.cancelled() => {
                                info!("Generation cancelled.");
                                return;
                            }
                            next = fragments.next() => next,
                        };

                        match next {
                            Some(Ok(fragment)) => {
                                partial = true;
                                yield Ok(fragment);
                            }
                            Some(Err(error)) => break error,
                            None => return,
                        }
                    },
                };

                let delay = match retry.on_error(failure) {
                    Ok(delay) => delay,
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                };

                if partial {
                    warn!(
                        attempt = retry.attempt(),
                        "Retrying after partial output, the response will restart."
                    );
                }

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        info!("Generation cancelled during backoff.");
                        return;
                    }
                    () = tokio::time::sleep(delay) => {}
                }
            }
        })
    }

    /// Generate a complete response.
    ///
    /// Returns [`FALLBACK_RESPONSE`] if the backend produced no text.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let model = self.resolve_model(&request.model);
        let mut retry = self.retry.start();

        loop {
            let payload = self.prompt.build(request).await?;

            debug!(model, attempt = retry.attempt(), "Starting generation.");

            let error = match self.backend.generate(model, &payload).await {
                Ok(text) if text.is_empty() => {
                    warn!("Backend returned an empty response.");
                    return Ok(FALLBACK_RESPONSE.to_owned());
                }
                Ok(text) => return Ok(text),
                Err(error) => error,
            };

            let delay = retry.on_error(error)?;
            tokio::time::sleep(delay).await;
        }
    }

    /// Like [`Client::generate_stream`], but collects the fragments into one
    /// string.
    pub async fn collect_stream(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<String> {
        let mut stream = self.generate_stream(request, cancel);
        let mut text = String::new();

        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment?);
        }

        Ok(text)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
