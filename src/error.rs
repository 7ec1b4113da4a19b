//! Error types for the batch run
//!
//! Fatal errors abort the run before any output is written. Per-role
//! configuration problems are not fatal and live in [`crate::signal::SignalIssue`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch run
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to write report to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl AnalyticsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = AnalyticsError::parse("tickets.json", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Failed to parse tickets.json: expected value at line 1"
        );
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = AnalyticsError::InvalidPattern {
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern '(unclosed'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
