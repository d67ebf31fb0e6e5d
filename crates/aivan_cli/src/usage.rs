//! Daily request quota for free-tier users.

use std::{fs, io, path::Path};

use aivan_config::AssistantConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// File name of the usage counter inside the user data directory.
pub(crate) const USAGE_FILE: &str = "usage.json";

/// Requests made on a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Usage {
    pub date: Option<NaiveDate>,
    pub count: u32,
}

impl Usage {
    /// Requests made on `today`. Counts from earlier days do not carry over.
    pub(crate) fn count_on(&self, today: NaiveDate) -> u32 {
        if self.date == Some(today) {
            self.count
        } else {
            0
        }
    }

    /// Count one request made on `today`, unless `limit` is already reached.
    pub(crate) fn record(&mut self, today: NaiveDate, limit: u32) -> Result<()> {
        let count = self.count_on(today);
        if count >= limit {
            warn!(count, limit, "Daily request limit reached.");
            return Err(Error::QuotaExceeded { limit });
        }

        self.date = Some(today);
        self.count = count + 1;

        Ok(())
    }
}

/// Charge one request against the daily quota stored at `path`.
///
/// Premium users are not counted.
pub(crate) fn charge(path: &Path, config: &AssistantConfig, today: NaiveDate) -> Result<()> {
    if config.premium {
        debug!("Premium user, daily quota does not apply.");
        return Ok(());
    }

    let mut usage = load(path)?;
    usage.record(today, config.daily_limit)?;
    save(path, &usage)?;

    info!(
        count = usage.count,
        limit = config.daily_limit,
        "Recorded request against daily quota."
    );

    Ok(())
}

pub(crate) fn load(path: &Path) -> Result<Usage> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Usage::default()),
        Err(source) => {
            return Err(Error::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents).map_err(|source| Error::Usage {
        path: path.to_path_buf(),
        source,
    })
}

fn save(path: &Path, usage: &Usage) -> Result<()> {
    let json = serde_json::to_string(usage).map_err(|source| Error::Usage {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
