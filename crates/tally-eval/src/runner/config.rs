//! Sample runner configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_core::Settings;
use tally_core::config::{DEFAULT_SYSTEM_PROMPT, timeouts};

/// Request shaping shared by every sample of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// System instruction asking for the `answer: ` prefix
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Output-length cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds, `0` disables it
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout() -> u64 {
    timeouts::llm::REQUEST_SECS
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl RunnerConfig {
    /// Take request shaping from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            system_prompt: settings.system_prompt.clone(),
            max_tokens: settings.max_tokens,
            request_timeout_secs: settings.request_timeout_secs,
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
