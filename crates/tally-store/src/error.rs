//! Store error type

use tally_core::TallyError;
use tally_core::types::InvalidTransition;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for TallyError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, id } => TallyError::not_found(kind, id),
            StoreError::InvalidTransition(e) => e.into(),
            other => TallyError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::types::{RunId, RunStatus};

    #[test]
    fn test_not_found_keeps_kind() {
        let err: TallyError = StoreError::not_found("run", "abc").into();
        assert!(matches!(err, TallyError::NotFound { kind: "run", .. }));
        assert_eq!(err.to_string(), "run not found: abc");
    }

    #[test]
    fn test_invalid_transition_becomes_invalid_state() {
        let err: TallyError = StoreError::from(InvalidTransition {
            run_id: RunId::new(),
            from: RunStatus::Completed,
            to: RunStatus::Running,
        })
        .into();
        assert!(matches!(err, TallyError::InvalidState { .. }));
    }

    #[test]
    fn test_io_becomes_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TallyError = StoreError::from(io).into();
        assert!(matches!(err, TallyError::Storage { .. }));
    }
}
