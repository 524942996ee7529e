//! Core error type for tally

use thiserror::Error;

/// Result type alias for tally operations
pub type TallyResult<T> = Result<T, TallyError>;

/// Main error type for tally
#[derive(Error, Debug, Clone)]
pub enum TallyError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// A referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Dataset could not be read or contained a malformed line
    #[error("Dataset error: {message}")]
    Dataset {
        message: String,
        /// 1-based line number of the offending line, if any
        line: Option<usize>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// Model endpoint returned something we could not use
    #[error("LLM error: {message}")]
    Llm { message: String },

    /// Operation exceeded its time budget
    #[error("Timeout after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// Persistence errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Entity is in a state that does not allow the operation
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Anything else
    #[error("{message}")]
    Other { message: String },
}

impl TallyError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "TALLY_CONFIG",
            Self::NotFound { .. } => "TALLY_NOT_FOUND",
            Self::Dataset { .. } => "TALLY_DATASET",
            Self::Http { .. } => "TALLY_HTTP",
            Self::Llm { .. } => "TALLY_LLM",
            Self::Timeout { .. } => "TALLY_TIMEOUT",
            Self::Storage { .. } => "TALLY_STORAGE",
            Self::InvalidState { .. } => "TALLY_INVALID_STATE",
            Self::Io { .. } => "TALLY_IO",
            Self::Json { .. } => "TALLY_JSON",
            Self::Other { .. } => "TALLY_OTHER",
        }
    }

    /// Whether the error means a run could not even start
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::NotFound { .. } | Self::InvalidState { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TallyError::config("x").error_code(), "TALLY_CONFIG");
        assert_eq!(
            TallyError::not_found("run", "abc").error_code(),
            "TALLY_NOT_FOUND"
        );
        assert_eq!(TallyError::dataset("bad").error_code(), "TALLY_DATASET");
    }

    #[test]
    fn test_display() {
        let err = TallyError::not_found("model", "m-1");
        assert_eq!(err.to_string(), "model not found: m-1");

        let err = TallyError::dataset_line("expected value", 3);
        assert_eq!(err.to_string(), "Dataset error: line 3: expected value");
    }

    #[test]
    fn test_is_configuration() {
        assert!(TallyError::not_found("run", "r").is_configuration());
        assert!(!TallyError::dataset("bad").is_configuration());
        assert!(!TallyError::storage("disk full").is_configuration());
    }
}
