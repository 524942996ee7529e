//! Tally command-line interface
//!
//! Register model endpoints and datasets, launch evaluation runs and inspect
//! their results.
//!
//! ```bash
//! tally models add gpt --base-url http://localhost:8000/v1 --model-id gpt-4o-mini
//! tally datasets add arith ./arith.jsonl
//! tally run --model gpt --dataset arith
//! tally runs report <RUN_ID> --format markdown
//! ```

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;
use tally_core::{LogFormat, Settings};
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }

    init_tracing(&settings, cli.verbose);

    if let Err(e) = router::route(cli, settings).await {
        console::CliConsole::new(false).error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over settings
fn init_tracing(settings: &Settings, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { settings.log_level.as_str() };
        EnvFilter::new(level)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match settings.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
