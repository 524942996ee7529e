//! Launch an evaluation run and follow it to completion

use anyhow::{Context, Result, anyhow, bail};
use std::sync::Arc;
use tally_core::OpenAiCompatClient;
use tally_core::config::timeouts;
use tally_core::types::{Run, RunStatus};
use tally_eval::{ReportFormat, RunOrchestrator, RunProgress, RunReport, RunnerConfig, generate_report};
use tally_store::PageRequest;

use crate::console::status_label;
use crate::router::CommandContext;

/// Create a pending run, execute it in the background and poll its progress
pub async fn execute(
    ctx: &CommandContext,
    model_name: &str,
    dataset_name: &str,
    show_progress: bool,
) -> Result<()> {
    let model = ctx
        .stores
        .models
        .find_model(model_name)
        .await?
        .ok_or_else(|| anyhow!("Unknown model '{}'", model_name))?;
    let dataset = ctx
        .stores
        .datasets
        .find_dataset(dataset_name)
        .await?
        .ok_or_else(|| anyhow!("Unknown dataset '{}'", dataset_name))?;

    let run = Run::pending(model.id, dataset.id);
    ctx.stores.runs.create_run(&run).await?;
    ctx.console.info(&format!(
        "Run {} created: {} x {} ({} lines, concurrency {})",
        run.id,
        model.name,
        dataset.name,
        dataset.total_count,
        model.effective_concurrency()
    ));

    let client = OpenAiCompatClient::new(&ctx.settings)?;
    let orchestrator = Arc::new(RunOrchestrator::new(
        ctx.stores.clone(),
        Arc::new(client),
        RunnerConfig::from_settings(&ctx.settings),
    ));
    let handle = orchestrator.spawn(run.id);
    tracing::debug!(run_id = %run.id, "Spawned run");

    let pb = ctx.console.sample_progress(!show_progress);
    let mut ticker = tokio::time::interval(timeouts::run::poll_interval());
    loop {
        ticker.tick().await;
        let progress = RunProgress::load(&ctx.stores, run.id, PageRequest::new(0, 0)).await?;
        pb.set_length(progress.run.total_samples as u64);
        pb.set_position(progress.persisted() as u64);
        pb.set_message(status_label(progress.run.status).to_string());

        if progress.run.status.is_terminal() || handle.is_finished() {
            break;
        }
    }

    handle.await.context("Run task panicked")?;
    pb.finish_and_clear();

    let finished = ctx.stores.runs.get_run(run.id).await?;
    match finished.status {
        RunStatus::Completed => {
            let report = RunReport::load(&ctx.stores, run.id).await?;
            println!("{}", generate_report(&report, ReportFormat::Table)?);
            ctx.console.success(&format!("Run {} completed", run.id));
            Ok(())
        }
        RunStatus::Failed => {
            let reason = finished.failure_reason.unwrap_or_default();
            bail!("Run {} failed: {}", run.id, reason)
        }
        status => bail!(
            "Run {} stopped in state {}; rerun with --verbose for details",
            run.id,
            status
        ),
    }
}
