//! Bridge configuration
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `TACTICS_AI_*` environment variables, then
//! command-line flags.

use crate::core::error::{BridgeError, Result};
use crate::llm::context::PromptLanguage;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Game-state file the engine writes before asking for an enemy turn
pub const DEFAULT_INPUT_PATH: &str = "ai_input.json";

/// Ollama's generate endpoint on its default port
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

pub const DEFAULT_MODEL: &str = "phi3";

pub const ENV_INPUT: &str = "TACTICS_AI_INPUT";
pub const ENV_ENDPOINT: &str = "TACTICS_AI_ENDPOINT";
pub const ENV_MODEL: &str = "TACTICS_AI_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "TACTICS_AI_TIMEOUT_SECS";
pub const ENV_LANG: &str = "TACTICS_AI_LANG";

/// Runtime configuration for one bridge invocation
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Path of the game-state JSON file
    pub input_path: PathBuf,

    /// Full URL of the generate endpoint
    pub endpoint: String,

    /// Model name passed through to the generation service
    pub model: String,

    /// Request timeout in seconds
    ///
    /// `None` means the request may block forever, which is what the
    /// game has always lived with.
    pub timeout_secs: Option<u64>,

    /// Language of the fixed prompt text
    pub language: PromptLanguage,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: None,
            language: PromptLanguage::default(),
        }
    }
}

/// Keys accepted in the TOML config file; all optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    input: Option<PathBuf>,
    endpoint: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    lang: Option<String>,
}

/// Command-line flags
#[derive(Debug, Default, Parser)]
#[command(
    name = "tactics-llm-bridge",
    version,
    about = "Ask a local language model for enemy moves and print them as JSON"
)]
pub struct CliArgs {
    /// TOML file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Game-state JSON file
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Generate endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds (none by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Prompt language: ja or en
    #[arg(long)]
    pub lang: Option<PromptLanguage>,
}

impl BridgeConfig {
    /// Resolve the full configuration from all layers
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = &args.config {
            config.apply_file(path)?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Overlay settings from a TOML file
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.apply_toml(&content)
    }

    /// Overlay settings from TOML text
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: FileConfig =
            toml::from_str(content).map_err(|e| BridgeError::ConfigError(e.to_string()))?;

        if let Some(input) = file.input {
            self.input_path = input;
        }
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if file.timeout_secs.is_some() {
            self.timeout_secs = file.timeout_secs;
        }
        if let Some(lang) = file.lang {
            self.language = lang.parse().map_err(BridgeError::ConfigError)?;
        }
        Ok(())
    }

    /// Overlay settings from environment variables
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup(ENV_INPUT) {
            self.input_path = PathBuf::from(input);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                BridgeError::ConfigError(format!("{} must be an integer: {}", ENV_TIMEOUT_SECS, e))
            })?;
            self.timeout_secs = Some(secs);
        }
        if let Some(lang) = lookup(ENV_LANG) {
            self.language = lang.parse().map_err(BridgeError::ConfigError)?;
        }
        Ok(())
    }

    /// Overlay settings given on the command line
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(input) = &args.input {
            self.input_path = input.clone();
        }
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if args.timeout_secs.is_some() {
            self.timeout_secs = args.timeout_secs;
        }
        if let Some(lang) = args.lang {
            self.language = lang;
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(BridgeError::ConfigError(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }

        if self.model.trim().is_empty() {
            return Err(BridgeError::ConfigError("model must not be empty".into()));
        }

        if self.timeout_secs == Some(0) {
            return Err(BridgeError::ConfigError(
                "timeout_secs must be positive when set".into(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
