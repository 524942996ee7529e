//! Data model shared by the store, the engine and the CLI

mod dataset;
mod ids;
mod model;
mod run;
mod sample;

pub use dataset::DatasetRef;
pub use ids::{DatasetId, ModelId, RunId};
pub use model::{DEFAULT_CONCURRENCY_LIMIT, ModelConfig};
pub use run::{InvalidTransition, Run, RunAggregates, RunStatus, RunUpdate};
pub use sample::{Sample, SampleResult, SampleSummary};
