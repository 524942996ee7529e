//! Local filesystem store backend
//!
//! Layout under the base directory:
//! - `runs/<id>.json`
//! - `models/<id>.json`
//! - `datasets/<id>.json` (copied dataset files live in `datasets/files/`)
//! - `results/<run_id>.jsonl`, one sample result per line

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tally_core::types::{
    DatasetId, DatasetRef, ModelConfig, ModelId, Run, RunId, RunUpdate, SampleResult,
};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    DatasetStore, ModelConfigStore, PageRequest, ResultLog, ResultPage, ResultSink, RunStore,
};

const RUNS_DIR: &str = "runs";
const MODELS_DIR: &str = "models";
const DATASETS_DIR: &str = "datasets";
const RESULTS_DIR: &str = "results";

/// JSON-file store rooted at a data directory
#[derive(Debug)]
pub struct LocalStore {
    base_path: PathBuf,
    /// Serializes read-modify-write of records
    record_lock: Mutex<()>,
    /// Serializes appends to result logs
    append_lock: Mutex<()>,
}

impl LocalStore {
    /// Create a store rooted at `base_path`; directories are created on demand
    pub fn with_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            record_lock: Mutex::new(()),
            append_lock: Mutex::new(()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory registered dataset files are copied into
    pub fn dataset_files_dir(&self) -> PathBuf {
        self.base_path.join(DATASETS_DIR).join("files")
    }

    fn record_path(&self, dir: &str, id: impl std::fmt::Display) -> PathBuf {
        self.base_path.join(dir).join(format!("{}.json", id))
    }

    fn results_path(&self, run_id: RunId) -> PathBuf {
        self.base_path
            .join(RESULTS_DIR)
            .join(format!("{}.jsonl", run_id))
    }

    async fn ensure_dir(&self, dir: &str) -> StoreResult<PathBuf> {
        let path = self.base_path.join(dir);
        fs::create_dir_all(&path).await?;
        Ok(path)
    }

    async fn read_record<T: DeserializeOwned>(
        &self,
        dir: &str,
        kind: &'static str,
        id: impl std::fmt::Display,
    ) -> StoreResult<T> {
        let path = self.record_path(dir, &id);
        if !fs::try_exists(&path).await? {
            return Err(StoreError::not_found(kind, id));
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write via a temporary file and rename so readers never see a partial record
    async fn write_record<T: Serialize>(
        &self,
        dir: &str,
        id: impl std::fmt::Display,
        record: &T,
    ) -> StoreResult<()> {
        self.ensure_dir(dir).await?;
        let path = self.record_path(dir, &id);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn list_records<T: DeserializeOwned>(&self, dir: &str) -> StoreResult<Vec<T>> {
        let dir_path = self.ensure_dir(dir).await?;
        let mut entries = fs::read_dir(&dir_path).await?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let parsed = match fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str(&content).map_err(StoreError::from),
                Err(e) => Err(e.into()),
            };
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!("Failed to read record from {:?}: {}", path, e),
            }
        }

        Ok(records)
    }

    async fn read_results(&self, run_id: RunId) -> StoreResult<Vec<SampleResult>> {
        let path = self.results_path(run_id);
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut results = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(result) => results.push(result),
                Err(e) => warn!(
                    run_id = %run_id,
                    line = index + 1,
                    "Skipping unreadable result entry: {}",
                    e
                ),
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl RunStore for LocalStore {
    async fn create_run(&self, run: &Run) -> StoreResult<()> {
        let _guard = self.record_lock.lock().await;
        self.write_record(RUNS_DIR, run.id, run).await?;
        debug!(run_id = %run.id, "Saved run");
        Ok(())
    }

    async fn get_run(&self, id: RunId) -> StoreResult<Run> {
        self.read_record(RUNS_DIR, "run", id).await
    }

    async fn update_run(&self, id: RunId, update: RunUpdate) -> StoreResult<Run> {
        let _guard = self.record_lock.lock().await;
        let mut run: Run = self.read_record(RUNS_DIR, "run", id).await?;
        run.apply(update)?;
        self.write_record(RUNS_DIR, id, &run).await?;
        debug!(run_id = %id, status = %run.status, "Updated run");
        Ok(run)
    }

    async fn list_runs(&self) -> StoreResult<Vec<Run>> {
        let mut runs: Vec<Run> = self.list_records(RUNS_DIR).await?;
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(runs)
    }
}

#[async_trait]
impl ResultSink for LocalStore {
    async fn append(&self, result: &SampleResult) -> StoreResult<()> {
        let mut line = serde_json::to_string(result)?;
        line.push('\n');

        self.ensure_dir(RESULTS_DIR).await?;
        let _guard = self.append_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.results_path(result.run_id))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ResultLog for LocalStore {
    async fn count(&self, run_id: RunId) -> StoreResult<usize> {
        Ok(self.read_results(run_id).await?.len())
    }

    async fn page(&self, run_id: RunId, page: PageRequest) -> StoreResult<ResultPage> {
        let results = self.read_results(run_id).await?;
        Ok(ResultPage::from_slice(&results, page))
    }
}

#[async_trait]
impl ModelConfigStore for LocalStore {
    async fn create_model(&self, model: &ModelConfig) -> StoreResult<()> {
        let _guard = self.record_lock.lock().await;
        if self.find_model(&model.name).await?.is_some() {
            return Err(StoreError::InvalidData(format!(
                "model '{}' already exists",
                model.name
            )));
        }
        self.write_record(MODELS_DIR, model.id, model).await
    }

    async fn get_model(&self, id: ModelId) -> StoreResult<ModelConfig> {
        self.read_record(MODELS_DIR, "model", id).await
    }

    async fn find_model(&self, name: &str) -> StoreResult<Option<ModelConfig>> {
        Ok(self
            .list_records::<ModelConfig>(MODELS_DIR)
            .await?
            .into_iter()
            .find(|m| m.name == name))
    }

    async fn list_models(&self) -> StoreResult<Vec<ModelConfig>> {
        let mut models: Vec<ModelConfig> = self.list_records(MODELS_DIR).await?;
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }
}

#[async_trait]
impl DatasetStore for LocalStore {
    async fn create_dataset(&self, dataset: &DatasetRef) -> StoreResult<()> {
        let _guard = self.record_lock.lock().await;
        if self.find_dataset(&dataset.name).await?.is_some() {
            return Err(StoreError::InvalidData(format!(
                "dataset '{}' already exists",
                dataset.name
            )));
        }
        self.write_record(DATASETS_DIR, dataset.id, dataset).await
    }

    async fn get_dataset(&self, id: DatasetId) -> StoreResult<DatasetRef> {
        self.read_record(DATASETS_DIR, "dataset", id).await
    }

    async fn find_dataset(&self, name: &str) -> StoreResult<Option<DatasetRef>> {
        Ok(self
            .list_records::<DatasetRef>(DATASETS_DIR)
            .await?
            .into_iter()
            .find(|d| d.name == name))
    }

    async fn list_datasets(&self) -> StoreResult<Vec<DatasetRef>> {
        let mut datasets: Vec<DatasetRef> = self.list_records(DATASETS_DIR).await?;
        datasets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(datasets)
    }
}
