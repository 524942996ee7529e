//! CLI console utilities

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    /// Create a new CLI console
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Progress bar over the samples of a run
    ///
    /// Starts as a spinner; call [`ProgressBar::set_length`] once the
    /// dataset size is known.
    pub fn sample_progress(&self, hidden: bool) -> ProgressBar {
        if hidden {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.blue} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Color a run status for terminal output
pub fn status_label(status: tally_core::types::RunStatus) -> ColoredString {
    use tally_core::types::RunStatus;

    match status {
        RunStatus::Pending => status.as_str().dimmed(),
        RunStatus::Running => status.as_str().cyan(),
        RunStatus::Completed => status.as_str().green(),
        RunStatus::Failed => status.as_str().red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::types::RunStatus;

    #[test]
    fn test_hidden_progress_is_hidden() {
        let console = CliConsole::new(false);
        assert!(console.sample_progress(true).is_hidden());
    }

    #[test]
    fn test_status_label_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(status_label(RunStatus::Failed).to_string(), "failed");
    }
}
