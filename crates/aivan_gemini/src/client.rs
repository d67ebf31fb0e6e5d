use std::{io, pin::Pin};

use futures::{Stream, StreamExt as _, TryStreamExt as _};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};
use tracing::{error, trace};

use crate::{
    error::{Error, Result},
    types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A stream of partial responses, in the order the API emits them.
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a complete response in a single call.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.url(model, "generateContent");
        let response = self.send(&url, request).await?;

        let body = response.text().await?;
        trace!(body, "Received response body.");

        serde_json::from_str(&body).map_err(Into::into)
    }

    /// Generate a response as a stream of server-sent events.
    ///
    /// Errors returned by the API before the first event (e.g. rate limiting)
    /// are returned directly. Errors reported in the middle of the stream are
    /// yielded as stream items.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream> {
        let url = format!("{}?alt=sse", self.url(model, "streamGenerateContent"));
        let response = self.send(&url, request).await?;

        let byte_stream = response.bytes_stream().map_err(io::Error::other);
        let lines = FramedRead::new(StreamReader::new(byte_stream), LinesCodec::new());

        let chunks = lines
            .map_err(|e| Error::Stream(e.to_string()))
            .filter_map(|line| async move {
                match line {
                    Ok(line) => {
                        // Each event is a single `data:` line, anything else is
                        // framing.
                        let data = line.trim().strip_prefix("data:")?.trim();
                        if data.is_empty() {
                            return None;
                        }

                        Some(parse_chunk(data))
                    }
                    Err(error) => Some(Err(error)),
                }
            });

        Ok(Box::pin(chunks))
    }

    fn url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{model}:{method}", self.base_url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut api_key = HeaderValue::from_str(&self.api_key)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        Ok(headers)
    }

    /// POST `request` to `url`, turning non-success statuses into
    /// [`Error::Api`].
    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response> {
        trace!(%url, contents = request.contents.len(), "Sending Gemini request.");

        let response = self
            .http_client
            .post(url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        trace!(status = status.as_u16(), "Gemini responded.");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        error!(status = status.as_u16(), body, "Gemini request failed.");

        Err(api_error(status.as_u16(), &body))
    }
}

fn parse_chunk(chunk: &str) -> Result<GenerateContentResponse> {
    // Every field of a response is optional, so the error envelope has to be
    // checked first.
    if let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(chunk) {
        return Err(Error::Api {
            code: error.code,
            message: error.message,
        });
    }

    serde_json::from_str(chunk).map_err(Into::into)
}

/// Build an API error from a response body, preferring the message in the
/// Google error envelope over the raw body.
fn api_error(code: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_owned());

    Error::Api { code, message }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
