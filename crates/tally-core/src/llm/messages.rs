//! Wire types for the chat completions route

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body posted to `{base_url}/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Deterministic single-question request with a system instruction
    pub fn for_question(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        question: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(question)],
            temperature: 0.0,
            max_tokens,
        }
    }
}

/// The parts of a successful completion the evaluator uses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatCompletion {
    pub content: String,
    /// `usage.total_tokens`, zero when the endpoint omits usage
    pub total_tokens: u64,
}
