//! Report-level metrics for a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::TallyResult;
use tally_core::types::{Run, RunAggregates, RunId, RunStatus, SampleResult};
use tally_store::StoreHandles;

use super::MetricsAggregator;

/// Summary of a run and its persisted results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub model: String,
    pub dataset: String,
    pub status: RunStatus,
    /// Samples parsed from the dataset
    pub total_samples: usize,
    /// Results persisted so far
    pub results: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_latency_ms: f64,
    pub avg_tokens: f64,
    /// Fraction of results whose output carried the answer marker
    pub instruction_following_rate: f64,
    /// Results whose request failed
    pub failed_requests: usize,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<f64>,
}

impl RunReport {
    /// Build a report from a run and its results
    ///
    /// A completed run reports its stored aggregates; otherwise they are
    /// folded from whatever results exist.
    pub fn build(
        run: &Run,
        model: impl Into<String>,
        dataset: impl Into<String>,
        results: &[SampleResult],
    ) -> Self {
        let mut aggregator = MetricsAggregator::new();
        for result in results {
            aggregator.record(&result.summary());
        }
        let RunAggregates {
            accuracy,
            avg_latency_ms,
            avg_tokens,
        } = run.aggregates().unwrap_or_else(|| aggregator.finish());

        let followed = results.iter().filter(|r| r.instruction_followed).count();
        let instruction_following_rate = if results.is_empty() {
            0.0
        } else {
            followed as f64 / results.len() as f64
        };

        let duration_secs = match (run.started_at, run.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        };

        Self {
            run_id: run.id,
            model: model.into(),
            dataset: dataset.into(),
            status: run.status,
            total_samples: run.total_samples,
            results: results.len(),
            correct: aggregator.correct(),
            accuracy,
            avg_latency_ms,
            avg_tokens,
            instruction_following_rate,
            failed_requests: results.iter().filter(|r| r.request_failed).count(),
            created_at: run.created_at,
            started_at: run.started_at,
            finished_at: run.finished_at,
            duration_secs,
        }
    }

    /// Load the run, its model and dataset names, and every result
    pub async fn load(stores: &StoreHandles, run_id: RunId) -> TallyResult<Self> {
        let run = stores.runs.get_run(run_id).await?;
        let model = stores.models.get_model(run.model_id).await?;
        let dataset = stores.datasets.get_dataset(run.dataset_id).await?;
        let results = stores.result_log.all(run_id).await?;
        Ok(Self::build(&run, model.name, dataset.name, &results))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use tally_core::types::{DatasetId, ModelId, RunUpdate};

    #[test]
    fn test_report_counts() {
        let (run, results) = completed_run();
        let report = RunReport::build(&run, "gpt", "gsm8k", &results);

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.results, 3);
        assert_eq!(report.correct, 1);
        assert!((report.accuracy - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.avg_latency_ms, 200.0);
        assert_eq!(report.avg_tokens, 20.0);
        assert_eq!(report.failed_requests, 1);
        assert!((report.instruction_following_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!(report.duration_secs.is_some());
    }

    #[test]
    fn test_report_for_unfinished_run_folds_results() {
        let mut run = Run::pending(ModelId::new(), DatasetId::new());
        run.apply(RunUpdate::Started { at: Utc::now() }).unwrap();
        let results = vec![result(run.id, 1, "answer: 42", true)];

        let report = RunReport::build(&run, "m", "d", &results);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.duration_secs, None);
    }

    #[test]
    fn test_failed_requests_use_the_recorded_flag() {
        let run_id = RunId::new();
        let mut model_reply = result(run_id, 1, "Error: the premise is wrong", false);
        model_reply.request_failed = false;
        let mut timed_out = result(run_id, 2, "Exception: request timed out after 5s", false);
        timed_out.request_failed = true;

        let run = Run::pending(ModelId::new(), DatasetId::new());
        let report = RunReport::build(&run, "m", "d", &[model_reply, timed_out]);
        assert_eq!(report.failed_requests, 1);
    }
}
