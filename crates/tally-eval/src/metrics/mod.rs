//! Run metrics
//!
//! Folding sample summaries into run aggregates, and report-level metrics
//! computed from persisted results.

mod aggregator;
mod types;

pub use aggregator::MetricsAggregator;
pub use types::RunReport;

#[cfg(test)]
pub(crate) use types::fixtures;
