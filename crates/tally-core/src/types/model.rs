//! Model endpoint configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ModelId;

/// Concurrency limit applied when none is configured
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;

fn default_concurrency_limit() -> usize {
    DEFAULT_CONCURRENCY_LIMIT
}

/// An OpenAI-compatible chat endpoint to evaluate
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: ModelId,
    /// Unique human-readable name
    pub name: String,
    /// Endpoint base URL, `/chat/completions` is appended
    pub base_url: String,
    /// Bearer credential
    pub api_key: String,
    /// Model string sent in the request body
    pub model_identifier: String,
    /// Maximum in-flight requests for one run
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    pub created_at: DateTime<Utc>,
}

impl ModelConfig {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_identifier: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            id: ModelId::new(),
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_identifier: model_identifier.into(),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            created_at: Utc::now(),
        }
    }

    /// Set the concurrency limit
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Concurrency limit clamped to at least one slot
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency_limit.max(1)
    }

    /// Full URL of the chat completions route
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Keep the credential out of logs.
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model_identifier", &self.model_identifier)
            .field("concurrency_limit", &self.concurrency_limit)
            .finish()
    }
}
