//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a directory ingestion failure.
///
/// ### Fatal
/// - [`ErrorKind::ListDirectory`]
///
/// ### Per-file (collected in the [`IngestReport`](crate::IngestReport))
/// - [`ErrorKind::Open`]
/// - [`ErrorKind::Parse`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The metadata directory itself could not be read.
    #[display("could not list directory {}", _0.display())]
    ListDirectory(#[error(not(source))] PathBuf),
    /// A metadata document could not be opened.
    #[display("could not open file: {_0}")]
    Open(#[error(not(source))] String),
    /// A metadata document was rejected by the parser.
    #[display("{_0}")]
    Parse(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::ListDirectory(_) | ErrorKind::Open(_) => true,
            ErrorKind::Parse(_) => false,
        }
    }
}
