//! Evaluation runner components
//!
//! [`SampleRunner`] executes one sample; [`RunOrchestrator`] drives a whole run.

mod config;
mod orchestrator;
mod sample;

pub use config::RunnerConfig;
pub use orchestrator::RunOrchestrator;
pub use sample::SampleRunner;
