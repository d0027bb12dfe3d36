use crate::context::ParseContext;
use crate::desktop::DesktopResolver;
use crate::driver::{Tokenizer, XmlTokenizer};
use crate::error::Result;
use crate::flags::Flags;
use appdata_pool::{PackageStore, RecordId};
use std::io::Read;
use tracing::{debug, instrument};

/// Ingests a single metadata document into a [`PackageStore`].
///
/// Every completed `<application>`/`<component>` element becomes one record.
/// If the document turns out to be malformed, the record of the element
/// that was still open is discarded while records completed before the
/// error are kept.
///
/// # Examples
///
/// ```
/// use appdata_parse::{Flags, Ingestor};
/// use appdata_pool::{Key, Pool};
///
/// let mut pool = Pool::new();
/// let xml = "<component><id>foo.desktop</id><name>Foo</name><summary>Does foo</summary></component>";
/// let records = Ingestor::new(Flags::empty()).ingest(&mut pool, xml.as_bytes()).unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(pool.lookup_str(records[0], Key::Summary), Some("Does foo"));
/// assert_eq!(pool.render_requires(records[0]), vec!["appdata(foo.appdata.xml)"]);
/// ```
#[derive(Clone, Copy)]
pub struct Ingestor<'a> {
    flags: Flags,
    filename: Option<&'a str>,
    owners: &'a [RecordId],
    desktop: Option<&'a dyn DesktopResolver>,
}

impl<'a> Ingestor<'a> {
    pub fn new(flags: Flags) -> Self {
        Self { flags, filename: None, owners: &[], desktop: None }
    }

    /// Name of the document, used to link records to the package that
    /// ships it.
    pub fn filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Records known to install the document.
    pub fn owners(mut self, owners: &'a [RecordId]) -> Self {
        self.owners = owners;
        self
    }

    /// Where to look up desktop entries when [`Flags::CHECK_DESKTOP_FILE`]
    /// is set.
    pub fn desktop_resolver(mut self, resolver: &'a dyn DesktopResolver) -> Self {
        self.desktop = Some(resolver);
        self
    }

    /// Parse `input` as XML. See [`ingest_with`](Self::ingest_with).
    #[instrument(skip_all, fields(filename = self.filename, flags = ?self.flags))]
    pub fn ingest<S, R>(&self, store: &mut S, input: R) -> Result<Vec<RecordId>>
    where
        S: PackageStore + ?Sized,
        R: Read,
    {
        self.ingest_with(store, XmlTokenizer::new(input))
    }

    /// Run the state machine over the events of any tokenizer.
    ///
    /// Unless [`Flags::NO_INTERNALIZE`] is set the store is internalized
    /// afterwards, whether or not the document was well-formed.
    pub fn ingest_with<S, T>(&self, store: &mut S, tokenizer: T) -> Result<Vec<RecordId>>
    where
        S: PackageStore + ?Sized,
        T: Tokenizer,
    {
        let mut context = ParseContext::new(&mut *store, self.flags)
            .with_filename(self.filename)
            .with_owners(self.owners)
            .with_desktop_resolver(self.desktop);
        let result = tokenizer.tokenize(&mut context);
        if result.is_err() {
            context.abort();
        }
        let records = context.into_records();
        if !self.flags.contains(Flags::NO_INTERNALIZE) {
            store.internalize();
        }
        result?;
        debug!(records = records.len(), "document ingested");
        Ok(records)
    }
}
