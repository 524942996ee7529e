//! Store interfaces used by the evaluation engine and the CLI

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_core::types::{
    DatasetId, DatasetRef, ModelConfig, ModelId, Run, RunId, RunUpdate, SampleResult,
};

use crate::error::StoreResult;

/// Default number of results returned per page
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Offset/limit window over a run's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Window covering every result
    pub fn all() -> Self {
        Self::new(0, usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// One page of persisted results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<SampleResult>,
    pub offset: usize,
    /// Results persisted for the run when the page was read
    pub total: usize,
}

impl ResultPage {
    /// Slice `results` (in persistence order) by `page`
    pub fn from_slice(results: &[SampleResult], page: PageRequest) -> Self {
        let items = results
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect();
        Self {
            items,
            offset: page.offset,
            total: results.len(),
        }
    }
}

/// Run records
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Persist a new run
    async fn create_run(&self, run: &Run) -> StoreResult<()>;

    /// Load a run by ID
    async fn get_run(&self, id: RunId) -> StoreResult<Run>;

    /// Apply one update atomically and return the updated run
    ///
    /// The transition is validated by [`Run::apply`]; a rejected update
    /// leaves the stored run untouched.
    async fn update_run(&self, id: RunId, update: RunUpdate) -> StoreResult<Run>;

    /// All runs, newest first
    async fn list_runs(&self) -> StoreResult<Vec<Run>>;
}

/// Append-only sink for sample results
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist one result; each call is an independent write
    async fn append(&self, result: &SampleResult) -> StoreResult<()>;
}

/// Read side of the result log
#[async_trait]
pub trait ResultLog: Send + Sync {
    /// Number of results persisted for a run
    async fn count(&self, run_id: RunId) -> StoreResult<usize>;

    /// Page through a run's results in persistence order
    async fn page(&self, run_id: RunId, page: PageRequest) -> StoreResult<ResultPage>;

    /// Every result of a run
    async fn all(&self, run_id: RunId) -> StoreResult<Vec<SampleResult>> {
        Ok(self.page(run_id, PageRequest::all()).await?.items)
    }
}

/// Registered model endpoints
#[async_trait]
pub trait ModelConfigStore: Send + Sync {
    /// Register a model; names are unique
    async fn create_model(&self, model: &ModelConfig) -> StoreResult<()>;

    async fn get_model(&self, id: ModelId) -> StoreResult<ModelConfig>;

    async fn find_model(&self, name: &str) -> StoreResult<Option<ModelConfig>>;

    async fn list_models(&self) -> StoreResult<Vec<ModelConfig>>;
}

/// Registered datasets
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Register a dataset; names are unique
    async fn create_dataset(&self, dataset: &DatasetRef) -> StoreResult<()>;

    async fn get_dataset(&self, id: DatasetId) -> StoreResult<DatasetRef>;

    async fn find_dataset(&self, name: &str) -> StoreResult<Option<DatasetRef>>;

    async fn list_datasets(&self) -> StoreResult<Vec<DatasetRef>>;
}

/// The set of stores the engine talks to
#[derive(Clone)]
pub struct StoreHandles {
    pub runs: Arc<dyn RunStore>,
    pub results: Arc<dyn ResultSink>,
    pub result_log: Arc<dyn ResultLog>,
    pub models: Arc<dyn ModelConfigStore>,
    pub datasets: Arc<dyn DatasetStore>,
}

impl StoreHandles {
    /// Use one backend for every store
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RunStore + ResultSink + ResultLog + ModelConfigStore + DatasetStore + 'static,
    {
        Self {
            runs: backend.clone(),
            results: backend.clone(),
            result_log: backend.clone(),
            models: backend.clone(),
            datasets: backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(line: usize, run_id: RunId) -> SampleResult {
        SampleResult {
            run_id,
            line,
            question: format!("q{}", line),
            ground_truth: "a".to_string(),
            raw_output: Some("answer: a".to_string()),
            request_failed: false,
            extracted_answer: "a".to_string(),
            is_correct: true,
            instruction_followed: true,
            latency_ms: 1.0,
            tokens_used: 1,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_page_window() {
        let run_id = RunId::new();
        let results: Vec<_> = (1..=5).map(|i| result(i, run_id)).collect();

        let page = ResultPage::from_slice(&results, PageRequest::new(1, 2));
        assert_eq!(page.total, 5);
        assert_eq!(
            page.items.iter().map(|r| r.line).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let past_end = ResultPage::from_slice(&results, PageRequest::new(10, 2));
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[test]
    fn test_default_page() {
        assert_eq!(PageRequest::default(), PageRequest::new(0, DEFAULT_PAGE_LIMIT));
    }
}
