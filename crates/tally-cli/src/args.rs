//! CLI argument definitions using clap
//!
//! - tally models add|list          # Register and list model endpoints
//! - tally datasets add|list        # Register and list datasets
//! - tally run --model M --dataset D
//! - tally runs list|show|report    # Inspect runs and their results

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::types::{DEFAULT_CONCURRENCY_LIMIT, RunId};
use tally_store::DEFAULT_PAGE_LIMIT;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Batch evaluation of LLM endpoints against labeled question/answer datasets")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file (defaults to ./tally.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for runs, results, models and datasets
    #[arg(long, global = true, env = "TALLY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage model endpoints
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// Manage datasets
    Datasets {
        #[command(subcommand)]
        action: DatasetsAction,
    },

    /// Evaluate a model against a dataset
    Run {
        /// Registered model name
        #[arg(long)]
        model: String,

        /// Registered dataset name
        #[arg(long)]
        dataset: String,

        /// Wait without drawing a progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Inspect runs
    Runs {
        #[command(subcommand)]
        action: RunsAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ModelsAction {
    /// Register an OpenAI-compatible endpoint
    Add {
        /// Unique name
        name: String,

        /// Base URL; `/chat/completions` is appended
        #[arg(long)]
        base_url: String,

        /// Bearer credential
        #[arg(long, env = "TALLY_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Model string sent in the request body
        #[arg(long = "model-id")]
        model_identifier: String,

        /// Maximum concurrent requests per run
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
        concurrency: usize,
    },

    /// List registered models
    List,
}

#[derive(Subcommand, Clone)]
pub enum DatasetsAction {
    /// Register a line-delimited JSON file of `{"q": ..., "a": ...}` objects
    Add {
        /// Unique name
        name: String,

        /// Source file, copied into the data directory
        path: PathBuf,
    },

    /// List registered datasets
    List,
}

#[derive(Subcommand, Clone)]
pub enum RunsAction {
    /// List runs, newest first
    List,

    /// Show a run and a page of its results
    Show {
        id: RunId,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },

    /// Render a run report
    Report {
        id: RunId,

        /// Output format: table, json, markdown
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "tally", "--data-dir", "/tmp/t", "run", "--model", "gpt", "--dataset", "gsm8k",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/t")));
        match cli.command {
            Commands::Run {
                model,
                dataset,
                no_progress,
            } => {
                assert_eq!(model, "gpt");
                assert_eq!(dataset, "gsm8k");
                assert!(!no_progress);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_runs_show_defaults() {
        let id = RunId::new();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from(["tally", "runs", "show", id_arg.as_str()]).unwrap();
        match cli.command {
            Commands::Runs {
                action: RunsAction::Show { id: parsed, offset, limit },
            } => {
                assert_eq!(parsed, id);
                assert_eq!(offset, 0);
                assert_eq!(limit, DEFAULT_PAGE_LIMIT);
            }
            _ => panic!("expected runs show"),
        }
    }

    #[test]
    fn test_invalid_run_id_rejected() {
        assert!(Cli::try_parse_from(["tally", "runs", "report", "nope"]).is_err());
    }
}
