use crate::{ArrayKey, Id, Key, RecordId, Relation};

/// The record store that ingestion writes into.
///
/// Ingestion never owns records: it allocates them here, mutates fields as
/// elements close, and hands the handle back. Handles passed to these methods
/// must come from [`add_record`](Self::add_record) on the same store;
/// operations on discarded handles are ignored.
///
/// # Examples
///
/// ```
/// use appdata_pool::{Key, PackageStore, Pool, Relation};
///
/// let mut pool = Pool::new();
/// let record = pool.add_record();
/// let name = pool.intern("application:Foo");
/// pool.set_name(record, name);
/// pool.set_str(record, Key::Summary, "Does foo");
/// let capability = pool.intern("application-appdata(foo.appdata.xml)");
/// pool.add_provides(record, Relation::named(capability));
/// pool.internalize();
///
/// assert_eq!(pool.lookup_str(record, Key::Summary), Some("Does foo"));
/// ```
pub trait PackageStore {
    /// Allocate a new, empty record.
    fn add_record(&mut self) -> RecordId;

    /// Drop a partially built record along with any writes staged for it.
    fn discard_record(&mut self, record: RecordId);

    /// Intern a string, returning its id.
    fn intern(&mut self, s: &str) -> Id;

    /// Resolve an interned id.
    fn resolve(&self, id: Id) -> Option<&str>;

    fn name(&self, record: RecordId) -> Option<Id>;
    fn set_name(&mut self, record: RecordId, name: Id);
    fn arch(&self, record: RecordId) -> Option<Id>;
    fn set_arch(&mut self, record: RecordId, arch: Id);
    fn evr(&self, record: RecordId) -> Option<Id>;
    fn set_evr(&mut self, record: RecordId, evr: Id);

    /// Returns `true` if at least one requires relation was recorded.
    fn has_requires(&self, record: RecordId) -> bool;
    fn add_requires(&mut self, record: RecordId, relation: Relation);
    fn add_provides(&mut self, record: RecordId, relation: Relation);

    /// Stage a scalar attribute write.
    fn set_str(&mut self, record: RecordId, key: Key, value: &str);

    /// Stage an append to an array attribute.
    fn add_array_str(&mut self, record: RecordId, key: ArrayKey, value: &str);

    /// Materialize all staged attribute writes.
    fn internalize(&mut self);
}
