//! Parse Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A parse error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for parse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is not well-formed XML. Lines count from 1, columns are
    /// byte offsets into the line counting from 0.
    #[display("{message} at line {line}:{column}")]
    Malformed {
        /// What the tokenizer choked on.
        message: String,
        line: u64,
        column: u64,
    },
    /// Reading the input stream failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }

    /// `(line, column)` of a malformed document.
    pub fn location(&self) -> Option<(u64, u64)> {
        match self {
            ErrorKind::Malformed { line, column, .. } => Some((*line, *column)),
            ErrorKind::Io => None,
        }
    }
}
