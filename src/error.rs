//! Custom error types for Tally
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Component boundaries (loader, writer, suggester) turn these into
//! [`crate::outcome::Outcome`] values instead of propagating them.

use thiserror::Error;

/// The main error type for Tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV table errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Transport-level HTTP failures (connection refused, timeouts, bad bodies)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote tabular store answered but the answer is unusable
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// A table's header row does not contain an expected column
    #[error("Table '{table}' is missing header '{header}' on row {row}")]
    MissingHeader {
        table: String,
        header: String,
        row: usize,
    },

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Classification service errors
    #[error("Classifier error: {0}")]
    Classifier(String),
}

impl TallyError {
    /// Create a "missing header" error
    pub fn missing_header(table: impl Into<String>, header: impl Into<String>, row: usize) -> Self {
        Self::MissingHeader {
            table: table.into(),
            header: header.into(),
            row,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<reqwest::Error> for TallyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TallyError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_missing_header_error() {
        let err = TallyError::missing_header("Transactions", "Amount", 4);
        assert_eq!(
            err.to_string(),
            "Table 'Transactions' is missing header 'Amount' on row 4"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(TallyError::Validation("bad".into()).is_validation());
        assert!(!TallyError::Sheet("bad".into()).is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TallyError = io_err.into();
        assert!(matches!(err, TallyError::Io(_)));
    }
}
