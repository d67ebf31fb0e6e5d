use reqwest::header::InvalidHeaderValue;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The event stream broke off or could not be decoded.
    #[error("Event stream error: {0}")]
    Stream(String),

    #[error("Invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status, or reported an error
    /// inside the event stream.
    #[error("Gemini API error (status {code}): {message}")]
    Api { code: u16, message: String },

    #[error("API key is not a valid header value")]
    InvalidApiKey(#[from] InvalidHeaderValue),
}

impl Error {
    /// The HTTP status code associated with the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::Request(error) => error.status().map(|v| v.as_u16()),
            Self::Stream(_) | Self::Json(_) | Self::InvalidApiKey(_) => None,
        }
    }
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        format!("{self:?}") == format!("{other:?}")
    }
}
