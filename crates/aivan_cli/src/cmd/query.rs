use std::{
    io::{self, IsTerminal as _, Read as _, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use aivan_config::{AppConfig, ChatMode};
use aivan_llm::{
    Attachment, CancellationToken, Client, GenerationRequest, History, Turn,
    backend::GeminiBackend,
};
use clap::ArgAction;
use futures::StreamExt as _;
use tracing::{debug, info, warn};

use super::Success;
use crate::{
    error::{Error, Result},
    history, signals, usage,
};

#[derive(Debug, clap::Args)]
pub(crate) struct Query {
    /// The prompt to send. Read from stdin when omitted.
    prompt: Option<String>,

    /// The chat mode to use.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// The model to use.
    #[arg(short, long)]
    model: Option<String>,

    /// Generate as a premium-tier user.
    #[arg(long)]
    premium: bool,

    /// Attach a file, optionally with an explicit MIME type.
    #[arg(short = 'a', long = "attach", value_name = "FILE[:MIME]", action = ArgAction::Append)]
    attachments: Vec<Attachment>,

    /// File holding the code the assistant should build on.
    #[arg(long, value_name = "FILE")]
    code: Option<PathBuf>,

    /// JSON conversation transcript to replay and extend.
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Wait for the complete response instead of streaming it.
    #[arg(long)]
    no_stream: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    /// Write, fix or improve code.
    Creator,

    /// Explain and answer questions.
    Question,

    /// Analyze first, then design.
    Researcher,
}

impl From<Mode> for ChatMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Creator => Self::Creator,
            Mode::Question => Self::Question,
            Mode::Researcher => Self::Researcher,
        }
    }
}

impl Query {
    pub(crate) async fn run(self, mut config: AppConfig) -> Result<Success> {
        self.apply_cli_config(&mut config);

        let prompt = self.prompt()?;
        let history = match &self.history {
            Some(path) => history::load(path)?,
            None => History::new(),
        };

        let request = self.request(prompt, history, &config)?;
        charge_quota(&config)?;

        let backend = GeminiBackend::try_from(&config.gemini)?;
        let client = Client::from_config(Arc::new(backend), &config);

        let cancel = CancellationToken::new();
        let listener = signals::cancel_on_interrupt(cancel.clone());

        let response = self
            .respond(&client, request.clone(), &mut io::stdout(), &cancel)
            .await;

        listener.abort();

        if let Some(text) = response?
            && let Some(path) = &self.history
        {
            record_turns(path, request, text)?;
        }

        Ok(Success::Ok)
    }

    /// Apply command line overrides to the configuration.
    fn apply_cli_config(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.assistant.model.clone_from(model);
        }

        if let Some(mode) = self.mode {
            config.assistant.mode = mode.into();
        }

        config.assistant.premium |= self.premium;
    }

    fn prompt(&self) -> Result<String> {
        if let Some(prompt) = &self.prompt {
            return Ok(prompt.clone());
        }

        let mut stdin = io::stdin();
        if stdin.is_terminal() {
            return Err(Error::MissingPrompt);
        }

        let mut prompt = String::new();
        stdin.read_to_string(&mut prompt)?;

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::MissingPrompt);
        }

        Ok(prompt.to_owned())
    }

    fn request(
        &self,
        prompt: String,
        history: History,
        config: &AppConfig,
    ) -> Result<GenerationRequest> {
        let mut request = GenerationRequest::new(prompt, config.assistant.model.clone())
            .with_history(history)
            .with_mode(config.assistant.mode)
            .with_premium(config.assistant.premium);

        request.attachments.clone_from(&self.attachments);

        if let Some(path) = &self.code {
            request = request.with_current_code(read_file(path)?);
        }

        debug!(
            model = request.model,
            mode = ?request.mode,
            premium = request.premium,
            attachments = request.attachments.len(),
            turns = request.history.len(),
            "Prepared generation request."
        );

        Ok(request)
    }

    /// Write the response to `out`.
    ///
    /// Returns the complete response text, or `None` if the generation was
    /// cancelled.
    async fn respond(
        &self,
        client: &Client,
        request: GenerationRequest,
        out: &mut impl Write,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let text = if self.no_stream {
            let text = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                text = client.generate(&request) => Some(text?),
            };

            if let Some(text) = &text {
                writeln!(out, "{text}")?;
            }

            text
        } else {
            let mut stream = client.generate_stream(request, cancel.clone());
            let mut text = String::new();

            while let Some(fragment) = stream.next().await {
                let fragment = fragment?;
                write!(out, "{fragment}")?;
                out.flush()?;
                text.push_str(&fragment);
            }

            if !text.is_empty() {
                writeln!(out)?;
            }

            (!cancel.is_cancelled()).then_some(text)
        };

        if text.is_none() {
            info!("Generation cancelled, conversation left unchanged.");
        }

        Ok(text)
    }
}

/// Count the request against the free-tier daily quota.
fn charge_quota(config: &AppConfig) -> Result<()> {
    let Some(dir) = aivan_config::fs::user_data_dir() else {
        warn!("No user data directory, daily quota is not enforced.");
        return Ok(());
    };

    let today = chrono::Utc::now().date_naive();
    usage::charge(&dir.join(usage::USAGE_FILE), &config.assistant, today)
}

/// Append the exchange to the transcript at `path`.
fn record_turns(path: &Path, request: GenerationRequest, response: String) -> Result<()> {
    let mut history = request.history;
    history.push(Turn::user(request.prompt));
    history.push(Turn::assistant(response));

    history::save(path, &history)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
