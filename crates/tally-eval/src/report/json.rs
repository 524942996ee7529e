//! JSON report generation

use tally_core::TallyResult;

use crate::metrics::RunReport;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generate a JSON report
    pub fn generate(report: &RunReport) -> TallyResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Generate a compact JSON report (no pretty printing)
    pub fn generate_compact(report: &RunReport) -> TallyResult<String> {
        Ok(serde_json::to_string(report)?)
    }
}
