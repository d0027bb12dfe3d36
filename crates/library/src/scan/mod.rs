//! Batch ingestion of a metadata directory.
//!
//! Every `*.appdata.xml` and `*.metainfo.xml` entry is ingested as its own
//! document. Failures to open or parse one document are collected in the
//! [`IngestReport`] and never stop the batch.

mod dir;
mod report;

pub use self::dir::{APPDATA_DIR, DirectoryIngestor, add_appdata_dir, is_metadata_file};
pub use self::report::{FileError, IngestReport};
