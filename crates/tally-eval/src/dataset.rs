//! Line-delimited JSON dataset reader

use serde_json::Value;
use std::path::Path;
use tally_core::types::Sample;
use tally_core::{TallyError, TallyResult};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

const QUESTION_FIELD: &str = "q";
const ANSWER_FIELD: &str = "a";

/// Reads `{"q": ..., "a": ...}` objects, one per line
pub struct DatasetReader;

impl DatasetReader {
    /// Parse every sample of the file, in file order
    ///
    /// Every line is one sample. A line that is blank or not a JSON object
    /// fails the whole read with its line number; the final newline does not
    /// start a new line.
    pub async fn open(path: impl AsRef<Path>) -> TallyResult<Vec<Sample>> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            TallyError::dataset(format!("cannot open {}: {}", path.display(), e))
        })?;

        let mut lines = BufReader::new(file).lines();
        let mut samples = Vec::new();
        let mut line_no = 0;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| TallyError::dataset(format!("cannot read {}: {}", path.display(), e)))?
        {
            line_no += 1;
            samples.push(Self::parse_line(&line, line_no)?);
        }

        Ok(samples)
    }

    /// Parse one dataset line
    pub fn parse_line(line: &str, line_no: usize) -> TallyResult<Sample> {
        if line.trim().is_empty() {
            return Err(TallyError::dataset_line("blank line", line_no));
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| TallyError::dataset_line(format!("invalid JSON: {}", e), line_no))?;
        let object = value
            .as_object()
            .ok_or_else(|| TallyError::dataset_line("expected a JSON object", line_no))?;

        let question = field_text(object.get(QUESTION_FIELD), QUESTION_FIELD, line_no)?;
        let ground_truth = field_text(object.get(ANSWER_FIELD), ANSWER_FIELD, line_no)?;
        Ok(Sample::new(line_no, question, ground_truth))
    }
}

/// Missing or null fields read as empty; scalars are stringified
fn field_text(value: Option<&Value>, name: &str, line_no: usize) -> TallyResult<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(TallyError::dataset_line(
            format!("field '{}' must be a string or number", name),
            line_no,
        )),
    }
}
