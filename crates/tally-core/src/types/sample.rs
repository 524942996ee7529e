//! Samples and their persisted outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RunId;

/// One question/ground-truth pair read from a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// 1-based line number in the dataset file
    pub line: usize,
    pub question: String,
    pub ground_truth: String,
}

impl Sample {
    pub fn new(line: usize, question: impl Into<String>, ground_truth: impl Into<String>) -> Self {
        Self {
            line,
            question: question.into(),
            ground_truth: ground_truth.into(),
        }
    }
}

/// Persisted outcome of executing one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub run_id: RunId,
    /// Dataset line this result belongs to
    pub line: usize,
    pub question: String,
    pub ground_truth: String,
    /// Model text, or a description of the request failure
    pub raw_output: Option<String>,
    /// The request failed and `raw_output` describes the failure
    #[serde(default)]
    pub request_failed: bool,
    pub extracted_answer: String,
    pub is_correct: bool,
    pub instruction_followed: bool,
    pub latency_ms: f64,
    pub tokens_used: u64,
    pub completed_at: DateTime<Utc>,
}

impl SampleResult {
    /// Metrics handed back to the orchestrator for aggregation
    pub fn summary(&self) -> SampleSummary {
        SampleSummary {
            is_correct: self.is_correct,
            latency_ms: self.latency_ms,
            tokens_used: self.tokens_used,
        }
    }
}

/// The part of a result the run aggregates are computed from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleSummary {
    pub is_correct: bool,
    pub latency_ms: f64,
    pub tokens_used: u64,
}
