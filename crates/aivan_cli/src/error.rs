use std::{io, path::PathBuf};

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// CLI Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] aivan_config::Error),

    #[error(transparent)]
    Llm(#[from] aivan_llm::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid history file {}: {source}", .path.display())]
    History {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid usage file {}: {source}", .path.display())]
    Usage {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No prompt given. Pass it as an argument or through stdin.")]
    MissingPrompt,

    #[error(
        "You have reached the daily request limit ({limit}). Upgrade to premium to keep working \
         without limits."
    )]
    QuotaExceeded { limit: u32 },
}
