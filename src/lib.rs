//! Tally: batch evaluation of LLM endpoints
//!
//! Umbrella crate over the workspace members:
//! - [`core`]: data model, settings, errors and the chat endpoint client
//! - [`store`]: run, result, model and dataset persistence
//! - [`eval`]: extraction, scoring, gated execution, aggregation and reports

pub use tally_core as core;
pub use tally_eval as eval;
pub use tally_store as store;

pub use tally_core::{ChatEndpoint, OpenAiCompatClient, Settings, TallyError, TallyResult};
pub use tally_eval::{ReportFormat, RunOrchestrator, RunReport, RunnerConfig, generate_report};
pub use tally_store::{LocalStore, MemoryStore, StoreHandles};
