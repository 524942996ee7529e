//! Markdown report generation

use crate::metrics::RunReport;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report
    pub fn generate(report: &RunReport) -> String {
        let mut md = String::new();

        md.push_str("# Tally Run Report\n\n");

        md.push_str("## Overview\n\n");
        md.push_str(&format!("- **Run**: `{}`\n", report.run_id));
        md.push_str(&format!("- **Model**: {}\n", report.model));
        md.push_str(&format!("- **Dataset**: {}\n", report.dataset));
        md.push_str(&format!("- **Status**: {}\n", report.status));
        md.push_str(&format!(
            "- **Created**: {}\n",
            report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(duration) = report.duration_secs {
            md.push_str(&format!("- **Duration**: {:.1}s\n", duration));
        }
        md.push('\n');

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n|--------|-------|\n");
        md.push_str(&format!(
            "| Accuracy | {}/{} ({:.1}%) |\n",
            report.correct,
            report.results,
            report.accuracy * 100.0
        ));
        md.push_str(&format!(
            "| Samples | {}/{} |\n",
            report.results, report.total_samples
        ));
        md.push_str(&format!(
            "| Avg Latency | {:.1} ms |\n",
            report.avg_latency_ms
        ));
        md.push_str(&format!("| Avg Tokens | {:.1} |\n", report.avg_tokens));
        md.push_str(&format!(
            "| Instruction Following | {:.1}% |\n",
            report.instruction_following_rate * 100.0
        ));
        md.push_str(&format!(
            "| Failed Requests | {} |\n",
            report.failed_requests
        ));

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::completed_run;

    #[test]
    fn test_markdown_generation() {
        let (run, results) = completed_run();
        let report = RunReport::build(&run, "test-model", "arith", &results);
        let md = MarkdownReporter::generate(&report);

        assert!(md.contains("# Tally Run Report"));
        assert!(md.contains("- **Model**: test-model"));
        assert!(md.contains("| Accuracy | 1/3 (33.3%) |"));
        assert!(md.contains("| Failed Requests | 1 |"));
        assert!(md.contains("**Duration**"));
    }
}
