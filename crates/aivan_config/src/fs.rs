//! Configuration file discovery and loading.

use std::{
    env,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use schematic::ConfigLoader;
use tracing::{debug, info, trace};

use crate::{AppConfig, Error, Result};

/// Application name for configuration file storage paths.
const APPLICATION: &str = "aivan";

/// Environment variable used to specify the path to the global configuration
/// file.
const GLOBAL_CONFIG_ENV_VAR: &str = "AIVAN_GLOBAL_CONFIG_FILE";

/// File name of the per-project configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = ".aivan.toml";

/// Get the path to the user-global configuration file.
///
/// The file does not need to exist.
#[must_use]
pub fn user_global_config_path() -> Option<PathBuf> {
    env::var(GLOBAL_CONFIG_ENV_VAR)
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .inspect(|path| {
            debug!(
                path = %path.display(),
                "Custom global configuration file path configured."
            );
        })
        .or_else(|| {
            ProjectDirs::from("", "", APPLICATION).map(|p| p.config_dir().join("config.toml"))
        })
}

/// Get the directory for local application data, such as usage counters.
#[must_use]
pub fn user_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APPLICATION).map(|p| p.data_local_dir().to_path_buf())
}

/// Find the closest [`WORKSPACE_CONFIG_FILE`], starting at `directory` and
/// walking up to the filesystem root.
#[must_use]
pub fn find_workspace_config(directory: &Path) -> Option<PathBuf> {
    directory
        .ancestors()
        .map(|dir| dir.join(WORKSPACE_CONFIG_FILE))
        .inspect(|path| trace!(path = %path.display(), "Looking for workspace configuration."))
        .find(|path| path.is_file())
}

/// Load the configuration from the given files.
///
/// Files are applied in order, later files overriding earlier ones. Files that
/// do not exist are skipped. Environment variables are applied last.
pub fn load_files<P: AsRef<Path>>(files: &[P]) -> Result<AppConfig> {
    let mut loader = ConfigLoader::<AppConfig>::new();

    for path in files.iter().map(AsRef::as_ref) {
        if !path.is_file() {
            trace!(path = %path.display(), "Skipping missing configuration file.");
            continue;
        }

        info!(path = %path.display(), "Found configuration file.");
        loader.file(path.to_path_buf())?;
    }

    let config = loader.load()?.config;
    debug!(?config, "Loaded configuration.");

    Ok(config)
}

/// Load the configuration for a process running in `cwd`.
///
/// Sources, from lowest to highest precedence:
///
/// 1. built-in defaults
/// 2. the user-global configuration file
/// 3. the closest [`WORKSPACE_CONFIG_FILE`]
/// 4. `explicit`, which must exist if given
/// 5. `AIVAN_*` environment variables
pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<AppConfig> {
    let mut files = vec![];
    files.extend(user_global_config_path());
    files.extend(find_workspace_config(cwd));

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }

        files.push(path.to_path_buf());
    }

    load_files(&files)
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
