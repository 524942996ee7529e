//! Layered runtime settings
//!
//! Values come from, in increasing priority:
//! 1. built-in defaults
//! 2. a TOML file (`tally.toml` in the working directory, or an explicit path)
//! 3. `TALLY_*` environment variables, after loading `.env`

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::timeouts;
use crate::error::{TallyError, TallyResult};

/// Settings file picked up from the working directory when present
pub const SETTINGS_FILE: &str = "tally.toml";

/// Instruction sent as the system message of every sample request
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Please format your final answer starting with 'answer: '.";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TallyError::config(format!("Unknown log format '{}'", other))),
        }
    }
}

/// Runtime settings for the engine and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory of the local store
    pub data_dir: PathBuf,
    /// Per-request timeout, `0` disables it
    pub request_timeout_secs: u64,
    /// TCP connect timeout for the HTTP client
    pub connect_timeout_secs: u64,
    /// Output-length cap sent with every request
    pub max_tokens: u32,
    /// System instruction sent with every request
    pub system_prompt: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".tally"))
        .unwrap_or_else(|| PathBuf::from(".tally"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            request_timeout_secs: timeouts::llm::REQUEST_SECS,
            connect_timeout_secs: timeouts::llm::CONNECTION_SECS,
            max_tokens: 1024,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Load settings from file and environment
    ///
    /// An explicit `path` must exist; the implicit `tally.toml` is optional.
    pub fn load(path: Option<&Path>) -> TallyResult<Self> {
        dotenv::dotenv().ok();

        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(SETTINGS_FILE).exists() => Self::from_file(Path::new(SETTINGS_FILE))?,
            None => Self::default(),
        };

        settings.apply_env(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> TallyResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TallyError::io_with_path(e.to_string(), path.display().to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> TallyResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `TALLY_*` variables returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> TallyResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("TALLY_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("TALLY_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("TALLY_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("TALLY_CONNECT_TIMEOUT_SECS") {
            self.connect_timeout_secs = parse_env("TALLY_CONNECT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("TALLY_MAX_TOKENS") {
            self.max_tokens = parse_env("TALLY_MAX_TOKENS", &value)?;
        }
        if let Some(prompt) = lookup("TALLY_SYSTEM_PROMPT") {
            self.system_prompt = prompt;
        }
        if let Some(level) = lookup("TALLY_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(format) = lookup("TALLY_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        Ok(())
    }

    /// Per-request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> TallyResult<T> {
    value.trim().parse().map_err(|_| {
        TallyError::config_with_context(
            format!("Invalid {} value", key),
            format!("Parsing value '{}'", value),
        )
    })
}
