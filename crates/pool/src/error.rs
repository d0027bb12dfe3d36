//! Pool Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::RecordId;
use derive_more::{Display, Error};

/// A pool error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record handle does not refer to a live record (never allocated,
    /// or discarded after a failed import).
    #[display("record not found: {_0}")]
    RecordNotFound(#[error(not(source))] RecordId),
    /// The interned string id is unknown to this pool.
    #[display("unknown string id: {_0}")]
    UnknownId(#[error(not(source))] u32),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Handles are either valid or they're not.
        false
    }
}
