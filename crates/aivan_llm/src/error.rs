use std::{io, path::PathBuf};

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend kept rate limiting the request after all retries.
    #[error("Rate limit reached. Please wait a minute and try again.")]
    RateLimited { retries: u32 },

    /// The backend failed with a non-retryable error.
    #[error(
        "Error communicating with the server (error code: {})",
        .status.map_or_else(|| "Unknown".to_owned(), |code| code.to_string())
    )]
    Backend {
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing env var: {0}")]
    MissingEnv(String),
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}
