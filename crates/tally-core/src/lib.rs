//! Tally core library
//!
//! Shared building blocks for the tally evaluation engine: the data model,
//! layered settings, the error type and the OpenAI-compatible chat client.

pub mod config;
pub mod error;
pub mod llm;
pub mod types;

// Re-export commonly used types
pub use config::{LogFormat, Settings};
pub use error::{TallyError, TallyResult};
pub use llm::{ChatCompletion, ChatEndpoint, ChatRequest, OpenAiCompatClient};
pub use types::*;
