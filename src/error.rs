use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error as reported by the engine client: a code and a message.
///
/// Both fields are empty when the engine has nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeError {
    pub code: String,
    pub message: String,
}

impl NativeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns true if neither a code nor a message is set.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Error type for orars operations
#[derive(Debug, Error)]
pub enum OraRsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(NativeError),

    #[error("Not connected")]
    NotConnected,

    #[error("Execution failed: {0}")]
    Execution(NativeError),

    #[error("{0}")]
    SchemaQuery(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Result type alias for orars operations
pub type Result<T> = std::result::Result<T, OraRsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_display() {
        let err = NativeError::new("942", "table or view does not exist");
        assert_eq!(err.to_string(), "942: table or view does not exist");

        let err = NativeError::new("", "no code");
        assert_eq!(err.to_string(), "no code");
    }

    #[test]
    fn test_native_error_default_is_empty() {
        assert!(NativeError::default().is_empty());
        assert!(!NativeError::new("1", "").is_empty());
    }

    #[test]
    fn test_execution_error_message() {
        let err = OraRsError::Execution(NativeError::new("1", "unique constraint violated"));
        assert_eq!(
            err.to_string(),
            "Execution failed: 1: unique constraint violated"
        );
    }
}
