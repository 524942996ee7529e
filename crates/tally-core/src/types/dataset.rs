//! Registered dataset files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::ids::DatasetId;
use crate::error::{TallyError, TallyResult};

/// A line-delimited JSON dataset on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: DatasetId,
    /// Unique human-readable name
    pub name: String,
    pub file_path: PathBuf,
    /// Line count recorded at registration
    pub total_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl DatasetRef {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>, total_count: usize) -> Self {
        Self {
            id: DatasetId::new(),
            name: name.into(),
            file_path: file_path.into(),
            total_count,
            uploaded_at: Utc::now(),
        }
    }

    /// Copy `source` into `dest_dir` and record its line count
    pub async fn register(
        name: impl Into<String>,
        source: impl AsRef<Path>,
        dest_dir: impl AsRef<Path>,
    ) -> TallyResult<Self> {
        let source = source.as_ref();
        let file_name = source.file_name().ok_or_else(|| {
            TallyError::io_with_path("dataset path has no file name", source.display().to_string())
        })?;

        fs::create_dir_all(dest_dir.as_ref()).await?;
        let dest = dest_dir.as_ref().join(file_name);
        if dest != source {
            fs::copy(source, &dest).await.map_err(|e| {
                TallyError::io_with_path(e.to_string(), source.display().to_string())
            })?;
        }

        let total_count = count_lines(&dest).await?;
        tracing::debug!(path = %dest.display(), total_count, "Registered dataset file");
        Ok(Self::new(name, dest, total_count))
    }
}

/// Count lines the same way a line reader would see them
async fn count_lines(path: impl AsRef<Path>) -> TallyResult<usize> {
    let file = fs::File::open(path.as_ref()).await?;
    let mut lines = BufReader::new(file).lines();
    let mut count = 0;
    while lines.next_line().await?.is_some() {
        count += 1;
    }
    Ok(count)
}
