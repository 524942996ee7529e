//! Command routing logic for CLI

use anyhow::Result;
use std::sync::Arc;
use tally_core::Settings;
use tally_store::{LocalStore, StoreHandles};

use crate::args::{Cli, Commands, DatasetsAction, ModelsAction, RunsAction};
use crate::commands;
use crate::console::CliConsole;

/// Shared state handed to every command
pub struct CommandContext {
    pub settings: Settings,
    pub local: Arc<LocalStore>,
    pub stores: StoreHandles,
    pub console: CliConsole,
}

impl CommandContext {
    pub fn new(settings: Settings, verbose: bool) -> Self {
        let local = Arc::new(LocalStore::with_path(settings.data_dir.clone()));
        let stores = StoreHandles::from_backend(local.clone());
        Self {
            settings,
            local,
            stores,
            console: CliConsole::new(verbose),
        }
    }
}

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, settings: Settings) -> Result<()> {
    let ctx = CommandContext::new(settings, cli.verbose);
    ctx.console
        .info(&format!("Data directory: {}", ctx.settings.data_dir.display()));

    match cli.command {
        Commands::Models { action } => match action {
            ModelsAction::Add {
                name,
                base_url,
                api_key,
                model_identifier,
                concurrency,
            } => {
                commands::models::add(&ctx, name, base_url, api_key, model_identifier, concurrency)
                    .await
            }
            ModelsAction::List => commands::models::list(&ctx).await,
        },
        Commands::Datasets { action } => match action {
            DatasetsAction::Add { name, path } => commands::datasets::add(&ctx, name, path).await,
            DatasetsAction::List => commands::datasets::list(&ctx).await,
        },
        Commands::Run {
            model,
            dataset,
            no_progress,
        } => commands::run::execute(&ctx, &model, &dataset, !no_progress).await,
        Commands::Runs { action } => match action {
            RunsAction::List => commands::runs::list(&ctx).await,
            RunsAction::Show { id, offset, limit } => {
                commands::runs::show(&ctx, id, offset, limit).await
            }
            RunsAction::Report { id, format } => commands::runs::report(&ctx, id, &format).await,
        },
    }
}
