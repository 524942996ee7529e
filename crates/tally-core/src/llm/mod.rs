//! OpenAI-compatible chat completion client

mod client;
mod messages;
mod parser;

pub use client::{ChatEndpoint, OpenAiCompatClient};
pub use messages::{ChatCompletion, ChatMessage, ChatRequest, ChatRole};
pub use parser::parse_chat_completion;
