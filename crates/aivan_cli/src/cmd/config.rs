use aivan_config::AppConfig;

use super::Success;
use crate::error::Result;

#[derive(Debug, clap::Args)]
pub(crate) struct Config {
    #[command(subcommand)]
    command: Commands,
}

impl Config {
    pub(crate) fn run(self, config: &AppConfig) -> Result<Success> {
        match self.command {
            Commands::Show => Ok(config.to_toml()?.trim_end().to_owned().into()),
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Show the resolved configuration.
    #[command(name = "show")]
    Show,
}
