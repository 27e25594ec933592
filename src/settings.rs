use std::path::{Path, PathBuf};

use config::{Config, ConfigError};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_CONFIG_CONTENT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID,
    DEFAULT_PROMPT, DEFAULT_REGION, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, DEFAULT_VERBOSITY,
    ENV_PREFIX,
};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub verbosity: Option<String>,
    pub invocation: InvocationSettings,
    pub aws_settings: AwsSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AwsSettings {
    /// Named profile from the shared AWS config; ambient credential chain when unset.
    pub profile: Option<String>,
    pub region: String,
}

/// What gets sent to the model.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct InvocationSettings {
    /// Bedrock model identifier, e.g. `meta.llama3-70b-instruct-v1:0`.
    pub model_id: String,
    /// Text of the single user turn.
    pub prompt: String,
    /// Upper bound on generated tokens. Must be positive.
    pub max_tokens: i32,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Nucleus-sampling cutoff in `[0, 1]`.
    pub top_p: f32,
    /// Model-specific fields passed through untouched.
    #[serde(default)]
    pub additional_model_request_fields: Map<String, Value>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = dirs::config_dir()
            .map(|mut path| {
                path.push(CONFIG_DIR_NAME);
                path.push("config.toml");
                path
            })
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if !config_path.exists() {
            // a read-only config dir just means running on defaults
            std::fs::write(&config_path, DEFAULT_CONFIG_CONTENT).ok();
        }

        Self::load(&config_path)
    }

    /// Layers `path` (if it exists) and `CONVERSE_*` environment variables over the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, Self::environment())
    }

    /// `CONVERSE_` prefix, `__` between nested keys, e.g. `CONVERSE_INVOCATION__MODEL_ID`.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    pub fn load_with(path: &Path, environment: config::Environment) -> Result<Self, ConfigError> {
        debug!("Loading settings from {}", path.display());
        let settings = Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(environment)
            .set_default("verbosity", DEFAULT_VERBOSITY)?
            .set_default("invocation.model_id", DEFAULT_MODEL_ID)?
            .set_default("invocation.prompt", DEFAULT_PROMPT)?
            .set_default("invocation.max_tokens", DEFAULT_MAX_TOKENS)?
            .set_default("invocation.temperature", f64::from(DEFAULT_TEMPERATURE))?
            .set_default("invocation.top_p", f64::from(DEFAULT_TOP_P))?
            .set_default("aws_settings.region", DEFAULT_REGION)?
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.invocation.validate()?;
        Ok(settings)
    }
}

impl InvocationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::Message("invocation.model_id must not be empty".into()));
        }
        if self.max_tokens <= 0 {
            return Err(ConfigError::Message(format!(
                "invocation.max_tokens must be positive, got {}",
                self.max_tokens
            )));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Message(format!(
                "invocation.temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::Message(format!(
                "invocation.top_p must be within [0, 1], got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}
