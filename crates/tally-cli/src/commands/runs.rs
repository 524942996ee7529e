//! Run inspection commands

use anyhow::{Result, anyhow};
use colored::*;
use tally_core::types::RunId;
use tally_eval::{ReportFormat, RunProgress, RunReport, generate_report};
use tally_store::PageRequest;

use crate::console::status_label;
use crate::router::CommandContext;

/// List runs, newest first
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let runs = ctx.stores.runs.list_runs().await?;
    if runs.is_empty() {
        ctx.console.warn("No runs yet");
        return Ok(());
    }

    ctx.console.print_header("Runs");
    for run in runs {
        let accuracy = run
            .accuracy
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:<9} {:>7} {}",
            run.id.to_string().bold(),
            status_label(run.status),
            accuracy,
            run.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    Ok(())
}

/// Show a run's state and one page of its persisted results
pub async fn show(ctx: &CommandContext, id: RunId, offset: usize, limit: usize) -> Result<()> {
    let progress = RunProgress::load(&ctx.stores, id, PageRequest::new(offset, limit)).await?;
    let run = &progress.run;

    ctx.console.print_header(&format!("Run {}", run.id));
    println!("  Status:    {}", status_label(run.status));
    println!(
        "  Progress:  {}/{}",
        progress.persisted(),
        run.total_samples
    );
    if let Some(accuracy) = run.accuracy {
        println!("  Accuracy:  {:.1}%", accuracy * 100.0);
    }
    if let Some(reason) = &run.failure_reason {
        println!("  Failure:   {}", reason.red());
    }

    if progress.page.items.is_empty() {
        ctx.console.info("No results in this page");
        return Ok(());
    }

    println!();
    for result in &progress.page.items {
        let mark = if result.is_correct {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} line {:>4}  expected {:?}  got {:?}  {:.0}ms",
            mark, result.line, result.ground_truth, result.extracted_answer, result.latency_ms
        );
    }

    let shown_to = progress.page.offset + progress.page.items.len();
    if shown_to < progress.page.total {
        println!(
            "{}",
            format!(
                "  ... {} more (use --offset {})",
                progress.page.total - shown_to,
                shown_to
            )
            .dimmed()
        );
    }
    Ok(())
}

/// Render a run report in the requested format
pub async fn report(ctx: &CommandContext, id: RunId, format: &str) -> Result<()> {
    let format = ReportFormat::parse(format)
        .ok_or_else(|| anyhow!("Unknown report format '{}' (table, json, markdown)", format))?;
    let report = RunReport::load(&ctx.stores, id).await?;
    println!("{}", generate_report(&report, format)?);
    Ok(())
}
