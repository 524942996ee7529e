//! Report generation for runs
//!
//! Renders a [`RunReport`] as JSON, Markdown or a terminal table.

mod json;
mod markdown;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

use tally_core::TallyResult;

use crate::metrics::RunReport;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    Json,
    Markdown,
    #[default]
    Table,
}

impl ReportFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "table" => Some(ReportFormat::Table),
            _ => None,
        }
    }
}

/// Generate a report in the specified format
pub fn generate_report(report: &RunReport, format: ReportFormat) -> TallyResult<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(report),
        ReportFormat::Markdown => Ok(MarkdownReporter::generate(report)),
        ReportFormat::Table => Ok(generate_table(report)),
    }
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Generate a simple table report for terminal output
fn generate_table(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{:=<60}\n", "= Tally Run Report "));
    output.push_str(&format!("Run: {}\n", report.run_id));
    output.push_str(&format!(
        "Model: {} | Dataset: {} | Status: {}\n",
        report.model, report.dataset, report.status
    ));
    output.push_str(&format!(
        "Created: {}\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("{:=<60}\n\n", ""));

    output.push_str(&format!("{:<28} {:>30}\n", "Metric", "Value"));
    output.push_str(&format!("{:-<60}\n", ""));
    let rows = [
        (
            "Accuracy",
            format!(
                "{}/{} ({})",
                report.correct,
                report.results,
                percent(report.accuracy)
            ),
        ),
        (
            "Samples",
            format!("{}/{}", report.results, report.total_samples),
        ),
        ("Avg latency", format!("{:.1} ms", report.avg_latency_ms)),
        ("Avg tokens", format!("{:.1}", report.avg_tokens)),
        (
            "Instruction following",
            percent(report.instruction_following_rate),
        ),
        ("Failed requests", report.failed_requests.to_string()),
    ];
    for (name, value) in rows {
        output.push_str(&format!("{:<28} {:>30}\n", name, value));
    }
    if let Some(duration) = report.duration_secs {
        output.push_str(&format!("{:<28} {:>30}\n", "Duration", format!("{:.1}s", duration)));
    }
    output.push_str(&format!("{:-<60}\n", ""));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::completed_run;

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("md"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::parse("table"), Some(ReportFormat::Table));
        assert_eq!(ReportFormat::parse("html"), None);
    }

    #[test]
    fn test_table_report() {
        let (run, results) = completed_run();
        let report = RunReport::build(&run, "gpt-4o-mini", "arith", &results);
        let table = generate_report(&report, ReportFormat::Table).unwrap();

        assert!(table.contains("Tally Run Report"));
        assert!(table.contains("gpt-4o-mini"));
        assert!(table.contains("1/3 (33.3%)"));
        assert!(table.contains("Failed requests"));
    }
}
