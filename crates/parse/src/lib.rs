//! AppStream/AppData metadata ingestion.
//!
//! Metadata documents describe desktop applications, fonts, codecs and the
//! like. This crate streams such a document through a table-driven state
//! machine and writes one record per `<application>`/`<component>` element
//! into a [`PackageStore`], including:
//!
//! - **Fields**: name, summary, url, category, licenses, groups, keywords
//!   and `extends` links, with localized (`xml:lang`) duplicates dropped
//! - **Descriptions** reflowed from `<p>`, `<ul>` and `<ol>` markup into
//!   plain text
//! - **Relations** tying each record to the package that ships its metadata
//!   file, plus a versioned self-provide
//!
//! Tokenizing is done by [`XmlTokenizer`] (backed by `quick-xml`); any other
//! [`Tokenizer`] can drive the state machine through
//! [`Ingestor::ingest_with`].

mod content;
mod context;
mod description;
mod desktop;
mod driver;
pub mod error;
mod flags;
mod ingest;
mod state;
mod synth;

use appdata_pool::{PackageStore, RecordId};
use std::io::Read;

pub use crate::content::{ContentBuffer, indent, wsstrip};
pub use crate::description::DescriptionAssembler;
pub use crate::desktop::{DesktopEntry, DesktopResolver};
pub use crate::driver::{Attributes, Handler, Tokenizer, XmlTokenizer};
use crate::error::Result;
pub use crate::flags::Flags;
pub use crate::ingest::Ingestor;
pub use crate::state::{ElementState, STATE_TABLE, StateTable, Transition};
pub use crate::synth::{APPLICATION_PREFIX, appdata_link, appdata_requirement, guess_filename, name_from_desktop_file};

/// Easy, top-level entrypoint: ingest one document with no filename, owners
/// or desktop entry lookups.
pub fn add_appdata<S>(store: &mut S, input: impl Read, flags: Flags) -> Result<Vec<RecordId>>
where
    S: PackageStore + ?Sized,
{
    Ingestor::new(flags).ingest(store, input)
}
