//! Evaluation run entity and its state machine
//!
//! A run moves `Pending -> Running -> {Completed, Failed}` and never back.
//! All mutation goes through [`Run::apply`], so every store backend enforces
//! the same transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{DatasetId, ModelId, RunId};
use crate::error::TallyError;

/// Lifecycle status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created, not yet picked up
    Pending,
    /// Samples are being executed
    Running,
    /// All samples executed and aggregates recorded
    Completed,
    /// Aborted by a run-level failure
    Failed,
}

impl RunStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Pending, RunStatus::Running)
                | (RunStatus::Running, RunStatus::Completed)
                | (RunStatus::Running, RunStatus::Failed)
        )
    }

    /// Lowercase name used in storage and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-level statistics folded from every sample summary
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunAggregates {
    /// Fraction of correct samples in `[0, 1]`
    pub accuracy: f64,
    /// Mean request latency in milliseconds
    pub avg_latency_ms: f64,
    /// Mean tokens reported by the endpoint
    pub avg_tokens: f64,
}

/// One field-set update applied atomically to a stored run
#[derive(Debug, Clone, PartialEq)]
pub enum RunUpdate {
    /// `Pending -> Running`
    Started { at: DateTime<Utc> },
    /// Dataset parsed; only valid while running
    SamplesLoaded { total: usize },
    /// `Running -> Completed` with the final aggregates
    Completed {
        at: DateTime<Utc>,
        processed: usize,
        aggregates: RunAggregates,
    },
    /// `Running -> Failed`
    Failed { at: DateTime<Utc>, reason: String },
}

impl RunUpdate {
    /// Status the run must be in after this update
    pub fn target_status(&self) -> RunStatus {
        match self {
            RunUpdate::Started { .. } | RunUpdate::SamplesLoaded { .. } => RunStatus::Running,
            RunUpdate::Completed { .. } => RunStatus::Completed,
            RunUpdate::Failed { .. } => RunStatus::Failed,
        }
    }
}

/// Rejected status transition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("run {run_id}: cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub run_id: RunId,
    pub from: RunStatus,
    pub to: RunStatus,
}

impl From<InvalidTransition> for TallyError {
    fn from(error: InvalidTransition) -> Self {
        TallyError::invalid_state(error.to_string())
    }
}

/// One evaluation execution of a model against a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub model_id: ModelId,
    pub dataset_id: DatasetId,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_samples: usize,
    #[serde(default)]
    pub processed_samples: usize,
    pub accuracy: Option<f64>,
    pub avg_latency_ms: Option<f64>,
    pub avg_tokens: Option<f64>,
    /// Top-level error message recorded on the failed transition
    #[serde(default)]
    pub failure_reason: Option<String>,
}

impl Run {
    /// Create a run waiting to be executed
    pub fn pending(model_id: ModelId, dataset_id: DatasetId) -> Self {
        Self {
            id: RunId::new(),
            model_id,
            dataset_id,
            status: RunStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            total_samples: 0,
            processed_samples: 0,
            accuracy: None,
            avg_latency_ms: None,
            avg_tokens: None,
            failure_reason: None,
        }
    }

    /// Aggregates, present only once the run completed
    pub fn aggregates(&self) -> Option<RunAggregates> {
        Some(RunAggregates {
            accuracy: self.accuracy?,
            avg_latency_ms: self.avg_latency_ms?,
            avg_tokens: self.avg_tokens?,
        })
    }

    /// Apply an update, enforcing the status state machine
    pub fn apply(&mut self, update: RunUpdate) -> Result<(), InvalidTransition> {
        let to = update.target_status();
        let allowed = match &update {
            RunUpdate::SamplesLoaded { .. } => self.status == RunStatus::Running,
            _ => self.status.can_transition_to(to),
        };
        if !allowed {
            return Err(InvalidTransition {
                run_id: self.id,
                from: self.status,
                to,
            });
        }

        match update {
            RunUpdate::Started { at } => {
                self.status = RunStatus::Running;
                self.started_at = Some(at);
            }
            RunUpdate::SamplesLoaded { total } => {
                self.total_samples = total;
            }
            RunUpdate::Completed {
                at,
                processed,
                aggregates,
            } => {
                self.status = RunStatus::Completed;
                self.finished_at = Some(at);
                self.processed_samples = processed;
                self.accuracy = Some(aggregates.accuracy);
                self.avg_latency_ms = Some(aggregates.avg_latency_ms);
                self.avg_tokens = Some(aggregates.avg_tokens);
            }
            RunUpdate::Failed { at, reason } => {
                self.status = RunStatus::Failed;
                self.finished_at = Some(at);
                self.failure_reason = Some(reason);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_run() -> Run {
        Run::pending(ModelId::new(), DatasetId::new())
    }

    fn aggregates() -> RunAggregates {
        RunAggregates {
            accuracy: 0.5,
            avg_latency_ms: 120.0,
            avg_tokens: 33.0,
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut run = new_run();
        assert_eq!(run.status, RunStatus::Pending);
        assert!(run.aggregates().is_none());

        run.apply(RunUpdate::Started { at: Utc::now() }).unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.started_at.is_some());

        run.apply(RunUpdate::SamplesLoaded { total: 4 }).unwrap();
        assert_eq!(run.total_samples, 4);

        run.apply(RunUpdate::Completed {
            at: Utc::now(),
            processed: 4,
            aggregates: aggregates(),
        })
        .unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.processed_samples, 4);
        assert_eq!(run.aggregates(), Some(aggregates()));
    }

    #[test]
    fn test_cannot_skip_running() {
        let mut run = new_run();
        let err = run
            .apply(RunUpdate::Completed {
                at: Utc::now(),
                processed: 0,
                aggregates: RunAggregates::default(),
            })
            .unwrap_err();
        assert_eq!(err.from, RunStatus::Pending);
        assert_eq!(err.to, RunStatus::Completed);
        assert_eq!(run.status, RunStatus::Pending);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut run = new_run();
        run.apply(RunUpdate::Started { at: Utc::now() }).unwrap();
        run.apply(RunUpdate::Failed {
            at: Utc::now(),
            reason: "dataset unreadable".to_string(),
        })
        .unwrap();
        assert_eq!(run.failure_reason.as_deref(), Some("dataset unreadable"));

        assert!(run.apply(RunUpdate::Started { at: Utc::now() }).is_err());
        assert!(
            run.apply(RunUpdate::Completed {
                at: Utc::now(),
                processed: 0,
                aggregates: RunAggregates::default(),
            })
            .is_err()
        );
        assert!(run.apply(RunUpdate::SamplesLoaded { total: 1 }).is_err());
        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.accuracy.is_none());
    }

    #[test]
    fn test_samples_loaded_requires_running() {
        let mut run = new_run();
        assert!(run.apply(RunUpdate::SamplesLoaded { total: 3 }).is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&RunStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }
}
