use std::io;
use std::sync::OnceLock;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::LogLevel;
use config::ConfigError;
use tracing::info;

use crate::ai_backend::{AiBackend, BedrockAiBackend};
use crate::constants::DEFAULT_VERBOSITY;
use crate::conversation::ConverseRequest;
use crate::invoker::Invoker;
use crate::settings::Settings;

static CONFIGURED_LEVEL: OnceLock<Option<clap_verbosity_flag::Level>> = OnceLock::new();

/// Records `settings.verbosity` as the base level. Only the first call takes effect.
pub fn set_configured_verbosity(verbosity: Option<&str>) {
    let _ = CONFIGURED_LEVEL.set(parse_level(verbosity.unwrap_or(DEFAULT_VERBOSITY)));
}

/// Default log level taken from the `verbosity` setting; `-v`/`-q` move it from there.
#[derive(Debug)]
pub struct ConfigLogLevel {}

impl LogLevel for ConfigLogLevel {
    fn default() -> Option<clap_verbosity_flag::Level> {
        CONFIGURED_LEVEL
            .get()
            .copied()
            .unwrap_or_else(|| parse_level(DEFAULT_VERBOSITY))
    }
}

fn parse_level(level: &str) -> Option<clap_verbosity_flag::Level> {
    match level {
        "off" => None,
        "error" => Some(clap_verbosity_flag::Level::Error),
        "warn" => Some(clap_verbosity_flag::Level::Warn),
        "info" => Some(clap_verbosity_flag::Level::Info),
        "debug" => Some(clap_verbosity_flag::Level::Debug),
        "trace" => Some(clap_verbosity_flag::Level::Trace),
        _ => Some(clap_verbosity_flag::Level::Warn),
    }
}

/// Send one prompt to a Bedrock-hosted model and print the reply.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ConverseArgs {
    /// Enable tracing (generates a trace-timestamp.json file).
    #[arg(long)]
    pub tracing: bool,

    /// Prompt to send instead of the configured one.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Bedrock model identifier, e.g. meta.llama3-70b-instruct-v1:0.
    #[arg(long)]
    pub model_id: Option<String>,

    /// AWS region hosting the model.
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<ConfigLogLevel>,
}

pub struct ConverseCli {
    settings: Settings,
    args: ConverseArgs,
    start: Instant,
}

impl ConverseCli {
    pub fn new(settings: Settings, args: ConverseArgs, start: Option<Instant>) -> Self {
        Self {
            settings,
            args,
            start: start.unwrap_or(Instant::now()),
        }
    }

    /// Settings with command-line values taking precedence.
    pub fn resolved_settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = self.settings.clone();
        if let Some(prompt) = &self.args.prompt {
            settings.invocation.prompt = prompt.clone();
        }
        if let Some(model_id) = &self.args.model_id {
            settings.invocation.model_id = model_id.clone();
        }
        if let Some(region) = &self.args.region {
            settings.aws_settings.region = region.clone();
        }
        settings.invocation.validate()?;
        Ok(settings)
    }

    /// Runs one invocation against Bedrock and returns the process exit status.
    pub fn exec(self) -> Result<u8> {
        let settings = self.resolved_settings()?;
        let backend = BedrockAiBackend::new(&settings.aws_settings)?;
        info!("Initialized bedrock backend in {:?}", self.start.elapsed());
        self.exec_with(&settings, backend)
    }

    pub fn exec_with<B: AiBackend>(&self, settings: &Settings, backend: B) -> Result<u8> {
        let request = ConverseRequest::single_turn(&settings.invocation);
        info!("Invoking model {}", request.model_id);
        let code = Invoker::new(backend).run(&request, &mut io::stdout(), &mut io::stderr())?;
        info!("Finished in {:?}", self.start.elapsed());
        Ok(code)
    }
}
