//! In-memory store backend

use async_trait::async_trait;
use std::collections::HashMap;
use tally_core::types::{
    DatasetId, DatasetRef, ModelConfig, ModelId, Run, RunId, RunUpdate, SampleResult,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    DatasetStore, ModelConfigStore, PageRequest, ResultLog, ResultPage, ResultSink, RunStore,
};

/// Store backend kept entirely in process memory
///
/// Used by tests and by embedders that do not need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: RwLock<HashMap<RunId, Run>>,
    results: RwLock<HashMap<RunId, Vec<SampleResult>>>,
    models: RwLock<HashMap<ModelId, ModelConfig>>,
    datasets: RwLock<HashMap<DatasetId, DatasetRef>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunStore for MemoryStore {
    async fn create_run(&self, run: &Run) -> StoreResult<()> {
        self.runs.write().await.insert(run.id, run.clone());
        debug!(run_id = %run.id, "Created run");
        Ok(())
    }

    async fn get_run(&self, id: RunId) -> StoreResult<Run> {
        self.runs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("run", id))
    }

    async fn update_run(&self, id: RunId, update: RunUpdate) -> StoreResult<Run> {
        let mut runs = self.runs.write().await;
        let stored = runs
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("run", id))?;

        // Apply to a copy so a rejected transition leaves the record intact.
        let mut run = stored.clone();
        run.apply(update)?;
        *stored = run.clone();
        Ok(run)
    }

    async fn list_runs(&self) -> StoreResult<Vec<Run>> {
        let mut runs: Vec<Run> = self.runs.read().await.values().cloned().collect();
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(runs)
    }
}

#[async_trait]
impl ResultSink for MemoryStore {
    async fn append(&self, result: &SampleResult) -> StoreResult<()> {
        self.results
            .write()
            .await
            .entry(result.run_id)
            .or_default()
            .push(result.clone());
        Ok(())
    }
}

#[async_trait]
impl ResultLog for MemoryStore {
    async fn count(&self, run_id: RunId) -> StoreResult<usize> {
        Ok(self
            .results
            .read()
            .await
            .get(&run_id)
            .map(Vec::len)
            .unwrap_or(0))
    }

    async fn page(&self, run_id: RunId, page: PageRequest) -> StoreResult<ResultPage> {
        let results = self.results.read().await;
        let slice = results.get(&run_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ResultPage::from_slice(slice, page))
    }
}

#[async_trait]
impl ModelConfigStore for MemoryStore {
    async fn create_model(&self, model: &ModelConfig) -> StoreResult<()> {
        let mut models = self.models.write().await;
        if models.values().any(|m| m.name == model.name) {
            return Err(StoreError::InvalidData(format!(
                "model '{}' already exists",
                model.name
            )));
        }
        models.insert(model.id, model.clone());
        Ok(())
    }

    async fn get_model(&self, id: ModelId) -> StoreResult<ModelConfig> {
        self.models
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("model", id))
    }

    async fn find_model(&self, name: &str) -> StoreResult<Option<ModelConfig>> {
        Ok(self
            .models
            .read()
            .await
            .values()
            .find(|m| m.name == name)
            .cloned())
    }

    async fn list_models(&self) -> StoreResult<Vec<ModelConfig>> {
        let mut models: Vec<_> = self.models.read().await.values().cloned().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    async fn create_dataset(&self, dataset: &DatasetRef) -> StoreResult<()> {
        let mut datasets = self.datasets.write().await;
        if datasets.values().any(|d| d.name == dataset.name) {
            return Err(StoreError::InvalidData(format!(
                "dataset '{}' already exists",
                dataset.name
            )));
        }
        datasets.insert(dataset.id, dataset.clone());
        Ok(())
    }

    async fn get_dataset(&self, id: DatasetId) -> StoreResult<DatasetRef> {
        self.datasets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("dataset", id))
    }

    async fn find_dataset(&self, name: &str) -> StoreResult<Option<DatasetRef>> {
        Ok(self
            .datasets
            .read()
            .await
            .values()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn list_datasets(&self) -> StoreResult<Vec<DatasetRef>> {
        let mut datasets: Vec<_> = self.datasets.read().await.values().cloned().collect();
        datasets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(datasets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::types::RunStatus;

    #[tokio::test]
    async fn test_update_run_rejects_illegal_transition() {
        let store = MemoryStore::new();
        let run = Run::pending(ModelId::new(), DatasetId::new());
        store.create_run(&run).await.unwrap();

        let err = store
            .update_run(
                run.id,
                RunUpdate::Failed {
                    at: Utc::now(),
                    reason: "boom".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition(_)));

        let stored = store.get_run(run.id).await.unwrap();
        assert_eq!(stored.status, RunStatus::Pending);
        assert!(stored.failure_reason.is_none());
    }

    #[tokio::test]
    async fn test_missing_run() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_run(RunId::new()).await,
            Err(StoreError::NotFound { kind: "run", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_model_name_rejected() {
        let store = MemoryStore::new();
        let model = ModelConfig::new("gpt", "http://localhost", "k", "gpt-4o");
        store.create_model(&model).await.unwrap();

        let dup = ModelConfig::new("gpt", "http://other", "k", "gpt-4o");
        assert!(matches!(
            store.create_model(&dup).await,
            Err(StoreError::InvalidData(_))
        ));
        assert_eq!(
            store.find_model("gpt").await.unwrap().map(|m| m.id),
            Some(model.id)
        );
    }

    #[tokio::test]
    async fn test_results_are_per_run() {
        let store = MemoryStore::new();
        let (a, b) = (RunId::new(), RunId::new());
        for (line, run_id) in [(1, a), (2, a), (1, b)] {
            store
                .append(&SampleResult {
                    run_id,
                    line,
                    question: String::new(),
                    ground_truth: String::new(),
                    raw_output: None,
                    request_failed: false,
                    extracted_answer: String::new(),
                    is_correct: false,
                    instruction_followed: false,
                    latency_ms: 0.0,
                    tokens_used: 0,
                    completed_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.count(a).await.unwrap(), 2);
        assert_eq!(store.count(b).await.unwrap(), 1);
        assert_eq!(store.count(RunId::new()).await.unwrap(), 0);
    }
}
