use crate::error::Error;
use appdata_pool::RecordId;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// A document that could not be ingested.
#[derive(Debug)]
pub struct FileError {
    pub path: PathBuf,
    pub error: Error,
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.path.display(), *self.error)
    }
}

/// Outcome of ingesting a directory.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Records created, in ingestion order.
    pub records: Vec<RecordId>,
    /// Documents that were skipped.
    pub errors: Vec<FileError>,
    /// Number of documents that were ingested without error.
    pub documents: usize,
}

impl IngestReport {
    /// `true` when every document was ingested.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
