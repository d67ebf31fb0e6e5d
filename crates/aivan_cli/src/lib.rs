mod cmd;
pub mod error;
mod history;
mod signals;
mod usage;

use std::{
    fmt,
    io::{self, IsTerminal as _, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use aivan_config::AppConfig;
use clap::{ArgAction, Parser};
use cmd::{Commands, Success};
use crossterm::style::Stylize as _;
use error::Result;
use tracing::trace;

/// Aivan, a prompt-to-website coding assistant.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten, next_help_heading = "Global Options")]
    globals: Globals,

    #[command(subcommand, next_help_heading = "Options")]
    command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct Globals {
    /// Load an additional configuration file.
    ///
    /// Applied after the global and workspace configuration files, and before
    /// environment variables.
    #[arg(long = "cfg", value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    /// Increase verbosity of logging.
    ///
    /// Can be specified multiple times to increase verbosity.
    ///
    /// Defaults to printing "error" messages. For each increase in verbosity,
    /// the log level is set to "warn", "info", "debug", and "trace"
    /// respectively.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl fmt::Display for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entry(&"cfg", &self.globals.config_file)
            .entry(&"verbose", &self.globals.verbose)
            .entry(&"quiet", &self.globals.quiet)
            .finish()
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    configure_logging(cli.globals.verbose, cli.globals.quiet);
    trace!(command = cli.command.name(), arguments = %cli, "Starting CLI run.");

    match run_inner(cli).await {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            let written = match output {
                Success::Ok => Ok(()),
                Success::Message(message) => writeln!(stdout, "{message}"),
            };

            if written.and_then(|()| stdout.flush()).is_err() {
                return ExitCode::FAILURE;
            }

            ExitCode::SUCCESS
        }
        Err(error) => {
            let message = if io::stderr().is_terminal() {
                format!("{} {error}", "Error:".red().bold())
            } else {
                format!("Error: {error}")
            };

            _ = writeln!(io::stderr(), "{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run_inner(cli: Cli) -> Result<Success> {
    let config = load_config(&cli.globals)?;
    cli.command.run(config).await
}

/// Load the configuration for the current directory.
fn load_config(globals: &Globals) -> Result<AppConfig> {
    let cwd = std::env::current_dir()?;
    trace!(cwd = %cwd.display(), "Loading configuration.");

    aivan_config::fs::load(&cwd, globals.config_file.as_deref()).map_err(Into::into)
}

fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let mut filter = vec!["off".to_owned()];
    for krate in ["cli", "config", "gemini", "llm"] {
        filter.push(format!("aivan_{krate}={level}"));
    }

    let format = fmt::format().with_target(false).compact();
    let ansi = io::stderr().is_terminal();

    if level < LevelFilter::DEBUG {
        tracing_subscriber::fmt()
            .event_format(format)
            .without_time()
            .with_ansi(ansi)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    } else {
        tracing_subscriber::fmt()
            .event_format(format)
            .with_ansi(ansi)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    }
}
