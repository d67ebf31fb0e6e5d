mod config;
mod query;

use aivan_config::AppConfig;

use crate::error::Result;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// Configuration management.
    #[command(visible_alias = "cfg")]
    Config(config::Config),

    /// Query the assistant.
    #[command(visible_alias = "q")]
    Query(query::Query),
}

impl Commands {
    pub(crate) async fn run(self, config: AppConfig) -> Result<Success> {
        match self {
            Commands::Config(args) => args.run(&config),
            Commands::Query(args) => args.run(config).await,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Config(_) => "config",
            Commands::Query(_) => "query",
        }
    }
}

/// The type of output that should be printed to the screen.
#[derive(Debug, PartialEq)]
pub(crate) enum Success {
    /// The command was successful.
    Ok,

    /// Single message to be printed to the screen.
    Message(String),
}

impl From<()> for Success {
    fn from(_value: ()) -> Self {
        Self::Ok
    }
}

impl From<String> for Success {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
