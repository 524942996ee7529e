//! Run-level orchestration
//!
//! Drives one run through `Pending -> Running -> {Completed, Failed}`:
//! load the run context, parse the dataset, fan every sample out through a
//! run-scoped [`ConcurrencyGate`], then fold the summaries into aggregates.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tally_core::llm::ChatEndpoint;
use tally_core::types::{DatasetRef, ModelConfig, Run, RunId, RunStatus, RunUpdate};
use tally_core::{TallyError, TallyResult};
use tally_store::StoreHandles;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::{RunnerConfig, SampleRunner};
use crate::dataset::DatasetReader;
use crate::gate::ConcurrencyGate;
use crate::metrics::MetricsAggregator;

/// Executes runs against the configured stores and chat endpoint
pub struct RunOrchestrator {
    stores: StoreHandles,
    endpoint: Arc<dyn ChatEndpoint>,
    config: RunnerConfig,
}

impl RunOrchestrator {
    pub fn new(stores: StoreHandles, endpoint: Arc<dyn ChatEndpoint>, config: RunnerConfig) -> Self {
        Self {
            stores,
            endpoint,
            config,
        }
    }

    pub fn stores(&self) -> &StoreHandles {
        &self.stores
    }

    /// Start `execute` in the background
    ///
    /// The run record is the only channel back to the caller; poll it for status.
    pub fn spawn(self: Arc<Self>, run_id: RunId) -> JoinHandle<()> {
        tokio::spawn(async move { self.execute(run_id).await })
    }

    /// Execute a pending run to completion
    ///
    /// Never returns an error. A missing run, model or dataset, or a run that
    /// is not pending, is logged and leaves the stores untouched. Failures
    /// after the run started mark it failed. Individual sample failures are
    /// recorded on their results and do not fail the run.
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub async fn execute(&self, run_id: RunId) {
        let (model, dataset) = match self.load_context(run_id).await {
            Ok(context) => context,
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Run not started");
                return;
            }
        };

        if let Err(e) = self
            .stores
            .runs
            .update_run(run_id, RunUpdate::Started { at: Utc::now() })
            .await
        {
            error!(error = %e, "Failed to mark run as running");
            return;
        }
        info!(model = %model.name, dataset = %dataset.name, "Run started");

        match self.evaluate(run_id, &model, &dataset).await {
            Ok(run) => info!(
                processed = run.processed_samples,
                accuracy = run.accuracy.unwrap_or_default(),
                "Run completed"
            ),
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Run failed");
                self.mark_failed(run_id, &e).await;
            }
        }
    }

    /// Resolve the run's model and dataset; the run must still be pending
    async fn load_context(&self, run_id: RunId) -> TallyResult<(ModelConfig, DatasetRef)> {
        let run: Run = self.stores.runs.get_run(run_id).await?;
        if run.status != RunStatus::Pending {
            return Err(TallyError::invalid_state(format!(
                "run {} is {}, expected pending",
                run_id, run.status
            )));
        }
        let model = self.stores.models.get_model(run.model_id).await?;
        let dataset = self.stores.datasets.get_dataset(run.dataset_id).await?;
        Ok((model, dataset))
    }

    async fn evaluate(
        &self,
        run_id: RunId,
        model: &ModelConfig,
        dataset: &DatasetRef,
    ) -> TallyResult<Run> {
        let samples = DatasetReader::open(&dataset.file_path).await?;
        self.stores
            .runs
            .update_run(
                run_id,
                RunUpdate::SamplesLoaded {
                    total: samples.len(),
                },
            )
            .await?;

        let gate = ConcurrencyGate::new(model.effective_concurrency());
        let runner = SampleRunner::new(
            self.endpoint.clone(),
            self.stores.results.clone(),
            self.config.clone(),
        );
        info!(
            samples = samples.len(),
            concurrency = gate.capacity(),
            "Dispatching samples"
        );

        let executions = samples.iter().map(|sample| {
            let gate = &gate;
            let runner = &runner;
            async move {
                let _permit = gate.acquire().await?;
                Ok::<_, TallyError>(runner.run(run_id, sample, model).await.summary())
            }
        });
        let summaries = join_all(executions)
            .await
            .into_iter()
            .collect::<TallyResult<Vec<_>>>()?;

        let aggregates = MetricsAggregator::aggregate(&summaries);
        let run = self
            .stores
            .runs
            .update_run(
                run_id,
                RunUpdate::Completed {
                    at: Utc::now(),
                    processed: summaries.len(),
                    aggregates,
                },
            )
            .await?;
        Ok(run)
    }

    async fn mark_failed(&self, run_id: RunId, cause: &TallyError) {
        let update = RunUpdate::Failed {
            at: Utc::now(),
            reason: cause.to_string(),
        };
        if let Err(e) = self.stores.runs.update_run(run_id, update).await {
            error!(error = %e, "Failed to mark run as failed");
        }
    }
}
