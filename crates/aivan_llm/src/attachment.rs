//! Files attached to a request, sent to the model as inline base64 data.

use std::{convert::Infallible, path::PathBuf, str::FromStr};

use base64::{Engine as _, prelude::BASE64_STANDARD};
use futures::future::try_join_all;
use tracing::debug;

use crate::{
    error::{Error, Result},
    prompt::ContentPart,
};

const TEXT_MIME_TYPE: &str = "text/plain";
const BINARY_MIME_TYPE: &str = "application/octet-stream";

/// A file to attach to a request.
///
/// When no MIME type is declared, it is detected from the file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub mime_type: Option<String>,
}

impl Attachment {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_type: None,
        }
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read the file and encode it as an inline data part.
    pub async fn to_part(&self) -> Result<ContentPart> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::Attachment {
                path: self.path.clone(),
                source,
            })?;

        let mime_type = self
            .mime_type
            .clone()
            .unwrap_or_else(|| detect_mime_type(&bytes));

        debug!(
            path = %self.path.display(),
            mime_type,
            size = bytes.len(),
            "Encoded attachment."
        );

        Ok(ContentPart::InlineData {
            mime_type,
            data: BASE64_STANDARD.encode(bytes),
        })
    }
}

/// Parses `PATH` or `PATH:MIME`.
///
/// The suffix after the last `:` is only treated as a MIME type if it looks
/// like one (`type/subtype`), so paths containing colons still work.
impl FromStr for Attachment {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some((path, mime)) = s.rsplit_once(':')
            && !path.is_empty()
            && is_mime_type(mime)
        {
            return Ok(Self::new(path).with_mime_type(mime));
        }

        Ok(Self::new(s))
    }
}

/// Encode all attachments, preserving their order.
pub async fn resolve_all(attachments: &[Attachment]) -> Result<Vec<ContentPart>> {
    try_join_all(attachments.iter().map(Attachment::to_part)).await
}

fn is_mime_type(s: &str) -> bool {
    s.split_once('/').is_some_and(|(kind, subtype)| {
        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
        };

        valid(kind) && valid(subtype)
    })
}

fn detect_mime_type(bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_owned();
    }

    if std::str::from_utf8(bytes).is_ok() {
        TEXT_MIME_TYPE.to_owned()
    } else {
        BINARY_MIME_TYPE.to_owned()
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
