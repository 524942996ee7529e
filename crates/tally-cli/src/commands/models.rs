//! Model endpoint registration

use anyhow::{Result, bail};
use colored::*;
use tally_core::types::ModelConfig;

use crate::router::CommandContext;

/// Register an endpoint under a unique name
pub async fn add(
    ctx: &CommandContext,
    name: String,
    base_url: String,
    api_key: String,
    model_identifier: String,
    concurrency: usize,
) -> Result<()> {
    if ctx.stores.models.find_model(&name).await?.is_some() {
        bail!("A model named '{}' already exists", name);
    }
    if concurrency == 0 {
        ctx.console
            .warn("Concurrency 0 is treated as 1 request at a time");
    }

    let model = ModelConfig::new(name, base_url, api_key, model_identifier)
        .with_concurrency_limit(concurrency);
    ctx.stores.models.create_model(&model).await?;

    ctx.console.success(&format!(
        "Registered model '{}' ({}) at {}",
        model.name,
        model.id,
        model.completions_url()
    ));
    Ok(())
}

/// List registered endpoints; credentials are never printed
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let models = ctx.stores.models.list_models().await?;
    if models.is_empty() {
        ctx.console.warn("No models registered");
        return Ok(());
    }

    ctx.console.print_header("Models");
    for model in models {
        println!(
            "  {} {} {} {}",
            model.name.bold(),
            model.model_identifier.cyan(),
            model.base_url.dimmed(),
            format!("concurrency={}", model.concurrency_limit).dimmed()
        );
    }
    Ok(())
}
