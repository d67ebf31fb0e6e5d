//! Conversation transcripts stored as JSON files.

use std::{fs, io, path::Path};

use aivan_llm::History;
use tracing::debug;

use crate::error::{Error, Result};

/// Load a transcript. A missing file is an empty conversation.
pub(crate) fn load(path: &Path) -> Result<History> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No history file, starting a new conversation.");
            return Ok(History::new());
        }
        Err(source) => {
            return Err(Error::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(History::new());
    }

    let history: History = serde_json::from_str(&contents).map_err(|source| Error::History {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), turns = history.len(), "Loaded conversation history.");
    Ok(history)
}

pub(crate) fn save(path: &Path, history: &History) -> Result<()> {
    let json = serde_json::to_string_pretty(history).map_err(|source| Error::History {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json + "\n")?;
    debug!(path = %path.display(), turns = history.len(), "Saved conversation history.");

    Ok(())
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
