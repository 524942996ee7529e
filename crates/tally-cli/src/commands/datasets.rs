//! Dataset registration

use anyhow::{Result, bail};
use colored::*;
use std::path::PathBuf;
use tally_core::types::DatasetRef;

use crate::router::CommandContext;

/// Copy a dataset file into the data directory and register it
pub async fn add(ctx: &CommandContext, name: String, path: PathBuf) -> Result<()> {
    if ctx.stores.datasets.find_dataset(&name).await?.is_some() {
        bail!("A dataset named '{}' already exists", name);
    }

    let dest_dir = ctx.local.dataset_files_dir().join(&name);
    let dataset = DatasetRef::register(name, &path, dest_dir).await?;
    ctx.stores.datasets.create_dataset(&dataset).await?;

    ctx.console.success(&format!(
        "Registered dataset '{}' with {} lines",
        dataset.name, dataset.total_count
    ));
    Ok(())
}

pub async fn list(ctx: &CommandContext) -> Result<()> {
    let datasets = ctx.stores.datasets.list_datasets().await?;
    if datasets.is_empty() {
        ctx.console.warn("No datasets registered");
        return Ok(());
    }

    ctx.console.print_header("Datasets");
    for dataset in datasets {
        println!(
            "  {} {} {}",
            dataset.name.bold(),
            format!("{} lines", dataset.total_count).cyan(),
            dataset.file_path.display().to_string().dimmed()
        );
    }
    Ok(())
}
