use std::env;

use aivan_config::GeminiConfig;
use aivan_gemini::{
    Client,
    types::{Content, GenerateContentRequest, Part},
};
use async_trait::async_trait;
use futures::{TryStreamExt as _, future};
use tracing::debug;

use super::{Backend, BackendError, FragmentStream};
use crate::{
    error::Error,
    prompt::{ContentPart, RequestPayload},
};

/// [`Backend`] backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
}

impl GeminiBackend {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl TryFrom<&GeminiConfig> for GeminiBackend {
    type Error = Error;

    fn try_from(config: &GeminiConfig) -> Result<Self, Self::Error> {
        let api_key = env::var(&config.api_key_env)
            .map_err(|_| Error::MissingEnv(config.api_key_env.clone()))?;

        Ok(Self::new(
            Client::new(api_key).with_base_url(config.base_url.clone()),
        ))
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn generate(&self, model: &str, payload: &RequestPayload) -> Result<String, BackendError> {
        debug!(model, stream = false, "Gemini generate request.");

        let response = self
            .client
            .generate_content(model, &create_request(payload))
            .await?;

        Ok(response.text().unwrap_or_default())
    }

    async fn generate_stream(
        &self,
        model: &str,
        payload: &RequestPayload,
    ) -> Result<FragmentStream, BackendError> {
        debug!(model, stream = true, "Gemini generate request.");

        let stream = self
            .client
            .stream_generate_content(model, &create_request(payload))
            .await?;

        Ok(Box::pin(
            stream
                .map_err(BackendError::from)
                .try_filter_map(|chunk| future::ready(Ok::<_, BackendError>(chunk.text()))),
        ))
    }
}

impl From<aivan_gemini::Error> for BackendError {
    fn from(error: aivan_gemini::Error) -> Self {
        let message = match &error {
            aivan_gemini::Error::Api { message, .. } => message.clone(),
            error => error.to_string(),
        };

        Self::new(error.status(), message)
    }
}

fn create_request(payload: &RequestPayload) -> GenerateContentRequest {
    let parts = payload
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part::text(text.clone()),
            ContentPart::InlineData { mime_type, data } => {
                Part::inline_data(mime_type.clone(), data.clone())
            }
        })
        .collect();

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: Some(Content::text(payload.system_instruction.clone())),
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
