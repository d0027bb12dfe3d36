//! Filesystem side of metadata ingestion.
//!
//! [`appdata_parse`] turns one document into records. This crate feeds it
//! from disk: every `*.appdata.xml` / `*.metainfo.xml` in a metadata
//! directory ([`DirectoryIngestor`]), with desktop entries read from the
//! applications directory ([`DesktopFileResolver`]) and records linked to
//! the packages whose file lists install each document.

mod desktop;
pub mod error;
mod path;
mod scan;

pub use crate::desktop::{APPLICATIONS_DIR, DesktopFileResolver};
pub use crate::path::prefix_root;
pub use crate::scan::{APPDATA_DIR, DirectoryIngestor, FileError, IngestReport, add_appdata_dir, is_metadata_file};
