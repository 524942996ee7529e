//! Tally evaluation engine
//!
//! Executes a run of a model endpoint against a labeled dataset:
//!
//! - **Extraction and scoring**: pull the final answer out of raw model text
//!   and compare it leniently with the ground truth
//! - **Gated execution**: samples fan out concurrently, bounded per run by the
//!   model's concurrency limit; request failures are recorded, never fatal
//! - **Aggregation**: accuracy, mean latency and mean tokens folded from
//!   per-sample summaries in any completion order
//! - **Reporting**: live progress pages and JSON, Markdown or table reports
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_eval::{RunOrchestrator, RunnerConfig};
//!
//! let orchestrator = Arc::new(RunOrchestrator::new(stores, endpoint, RunnerConfig::default()));
//! orchestrator.clone().spawn(run.id);
//! ```

pub mod dataset;
pub mod extract;
pub mod gate;
pub mod metrics;
pub mod progress;
pub mod report;
pub mod runner;
pub mod score;

// Re-exports for convenience
pub use dataset::DatasetReader;
pub use extract::{AnswerExtractor, instruction_followed};
pub use gate::{ConcurrencyGate, GatePermit};
pub use metrics::{MetricsAggregator, RunReport};
pub use progress::RunProgress;
pub use report::{ReportFormat, generate_report};
pub use runner::{RunOrchestrator, RunnerConfig, SampleRunner};
pub use score::is_correct;
