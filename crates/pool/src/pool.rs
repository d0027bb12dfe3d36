use crate::error::{ErrorKind, Result};
use crate::models::Record;
use crate::{ArrayKey, AttrValue, Id, Key, PackageStore, RecordId, RecordView, Relation, StringPool};
use exn::OptionExt;
use std::collections::{BTreeMap, HashMap};

const METADATA_SUFFIXES: [&str; 2] = [".appdata.xml", ".metainfo.xml"];

#[derive(Debug, Clone)]
enum Staged {
    Set(Key, String),
    Push(ArrayKey, String),
}

#[derive(Debug, Clone, Default)]
struct Attributes {
    scalars: BTreeMap<Key, String>,
    arrays: BTreeMap<ArrayKey, Vec<Id>>,
}

/// In-memory [`PackageStore`].
///
/// Records live in a slot vector indexed by [`RecordId`]. Discarding the most
/// recently allocated record releases its slot, so a failed import leaves the
/// numbering exactly as it was before the import started.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    strings: StringPool,
    records: Vec<Option<Record>>,
    staged: Vec<(RecordId, Staged)>,
    attributes: HashMap<RecordId, Attributes>,
}

/// Pool Internals
impl Pool {
    fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index()).and_then(Option::as_ref)
    }

    fn record_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        let record = self.records.get_mut(id.index()).and_then(Option::as_mut);
        if record.is_none() {
            tracing::trace!(record = %id, "Ignoring write to unknown record");
        }
        record
    }

    fn is_live(&self, id: RecordId) -> bool {
        self.record(id).is_some()
    }

    fn render(&self, relation: &Relation) -> String {
        let name = self.strings.resolve(relation.name).unwrap_or_default();
        match relation.constraint {
            Some((op, evr)) => format!("{} {} {}", name, op.as_str(), self.strings.resolve(evr).unwrap_or_default()),
            None => name.to_string(),
        }
    }
}

/// Pool Public
impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles of every live record, in allocation order.
    pub fn records(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| RecordId::from(index as u32))
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of attribute writes waiting for [`internalize`](PackageStore::internalize).
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Look up a scalar attribute. Staged writes shadow internalized ones.
    pub fn lookup_str(&self, record: RecordId, key: Key) -> Option<&str> {
        let staged = self.staged.iter().rev().find_map(|(id, write)| match write {
            Staged::Set(k, value) if *id == record && *k == key => Some(value.as_str()),
            _ => None,
        });
        staged.or_else(|| self.attributes.get(&record)?.scalars.get(&key).map(String::as_str))
    }

    /// Look up an array attribute: internalized values first, then staged appends.
    pub fn lookup_array(&self, record: RecordId, key: ArrayKey) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .attributes
            .get(&record)
            .and_then(|attrs| attrs.arrays.get(&key))
            .map(|ids| ids.iter().filter_map(|id| self.strings.resolve(*id)).collect())
            .unwrap_or_default();
        values.extend(self.staged.iter().filter_map(|(id, write)| match write {
            Staged::Push(k, value) if *id == record && *k == key => Some(value.as_str()),
            _ => None,
        }));
        values
    }

    pub fn requires(&self, record: RecordId) -> &[Relation] {
        self.record(record).map(|r| r.requires.as_slice()).unwrap_or_default()
    }

    pub fn provides(&self, record: RecordId) -> &[Relation] {
        self.record(record).map(|r| r.provides.as_slice()).unwrap_or_default()
    }

    /// Render every relation as `name` or `name = evr`.
    pub fn render_requires(&self, record: RecordId) -> Vec<String> {
        self.requires(record).iter().map(|r| self.render(r)).collect()
    }

    pub fn render_provides(&self, record: RecordId) -> Vec<String> {
        self.provides(record).iter().map(|r| self.render(r)).collect()
    }

    /// Find metadata documents listed in record file lists.
    ///
    /// Returns `(owner, basename)` for every file-list entry that sits directly
    /// inside `dir` and whose basename ends in `.appdata.xml` or
    /// `.metainfo.xml`. Both staged and internalized file lists are searched.
    pub fn search_filelist(&self, dir: &str) -> Vec<(RecordId, String)> {
        let dir = dir.trim_end_matches('/');
        let matches = |path: &str| -> Option<String> {
            let (parent, basename) = path.rsplit_once('/')?;
            let listed = parent == dir
                && METADATA_SUFFIXES.iter().any(|suffix| basename.len() > suffix.len() && basename.ends_with(suffix));
            listed.then(|| basename.to_string())
        };

        let internalized = self.attributes.iter().flat_map(|(record, attrs)| {
            let ids = attrs.arrays.get(&ArrayKey::FileList).map(Vec::as_slice).unwrap_or_default();
            ids.iter().filter_map(|id| self.strings.resolve(*id)).map(move |path| (*record, path))
        });
        let staged = self.staged.iter().filter_map(|(record, write)| match write {
            Staged::Push(ArrayKey::FileList, path) => Some((*record, path.as_str())),
            _ => None,
        });
        let mut found: Vec<_> = internalized
            .chain(staged)
            .filter_map(|(record, path)| Some((record, matches(path)?)))
            .collect();
        // Stable, so each record keeps internalized entries ahead of staged ones.
        found.sort_by_key(|(record, _)| *record);
        found
    }

    /// Build an owned, fully resolved snapshot of a record.
    pub fn view(&self, id: RecordId) -> Result<RecordView> {
        let record = self.record(id).ok_or_raise(|| ErrorKind::RecordNotFound(id))?;
        let resolve = |id: Option<Id>| -> Result<Option<String>> {
            id.map(|id| {
                self.strings.resolve(id).map(str::to_string).ok_or_raise(|| ErrorKind::UnknownId(id.index()))
            })
            .transpose()
        };
        let mut attributes = BTreeMap::new();
        for key in [Key::Category, Key::Summary, Key::Description, Key::Url] {
            if let Some(value) = self.lookup_str(id, key) {
                attributes.insert(key.as_str(), AttrValue::Str(value.to_string()));
            }
        }
        for key in [ArrayKey::License, ArrayKey::Group, ArrayKey::Extends, ArrayKey::Keywords, ArrayKey::FileList] {
            let values = self.lookup_array(id, key);
            if !values.is_empty() {
                attributes.insert(key.as_str(), AttrValue::Array(values.into_iter().map(str::to_string).collect()));
            }
        }
        Ok(RecordView {
            id,
            name: resolve(record.name)?,
            arch: resolve(record.arch)?,
            evr: resolve(record.evr)?,
            requires: self.render_requires(id),
            provides: self.render_provides(id),
            attributes,
        })
    }
}

impl PackageStore for Pool {
    fn add_record(&mut self) -> RecordId {
        let id = RecordId::from(self.records.len() as u32);
        self.records.push(Some(Record::default()));
        id
    }

    fn discard_record(&mut self, record: RecordId) {
        if !self.is_live(record) {
            return;
        }
        if record.index() + 1 == self.records.len() {
            self.records.pop();
        } else {
            self.records[record.index()] = None;
        }
        self.staged.retain(|(id, _)| *id != record);
        self.attributes.remove(&record);
        tracing::debug!(record = %record, "Discarded record");
    }

    fn intern(&mut self, s: &str) -> Id {
        self.strings.intern(s)
    }

    fn resolve(&self, id: Id) -> Option<&str> {
        self.strings.resolve(id)
    }

    fn name(&self, record: RecordId) -> Option<Id> {
        self.record(record)?.name
    }

    fn set_name(&mut self, record: RecordId, name: Id) {
        if let Some(r) = self.record_mut(record) {
            r.name = Some(name);
        }
    }

    fn arch(&self, record: RecordId) -> Option<Id> {
        self.record(record)?.arch
    }

    fn set_arch(&mut self, record: RecordId, arch: Id) {
        if let Some(r) = self.record_mut(record) {
            r.arch = Some(arch);
        }
    }

    fn evr(&self, record: RecordId) -> Option<Id> {
        self.record(record)?.evr
    }

    fn set_evr(&mut self, record: RecordId, evr: Id) {
        if let Some(r) = self.record_mut(record) {
            r.evr = Some(evr);
        }
    }

    fn has_requires(&self, record: RecordId) -> bool {
        !self.requires(record).is_empty()
    }

    fn add_requires(&mut self, record: RecordId, relation: Relation) {
        if let Some(r) = self.record_mut(record) {
            r.add_requires(relation);
        }
    }

    fn add_provides(&mut self, record: RecordId, relation: Relation) {
        if let Some(r) = self.record_mut(record) {
            r.add_provides(relation);
        }
    }

    fn set_str(&mut self, record: RecordId, key: Key, value: &str) {
        if self.is_live(record) {
            self.staged.push((record, Staged::Set(key, value.to_string())));
        }
    }

    fn add_array_str(&mut self, record: RecordId, key: ArrayKey, value: &str) {
        if self.is_live(record) {
            self.staged.push((record, Staged::Push(key, value.to_string())));
        }
    }

    fn internalize(&mut self) {
        let staged = std::mem::take(&mut self.staged);
        tracing::debug!(writes = staged.len(), "Internalizing staged attributes");
        for (record, write) in staged {
            match write {
                Staged::Set(key, value) => {
                    self.attributes.entry(record).or_default().scalars.insert(key, value);
                },
                Staged::Push(key, value) => {
                    let id = self.strings.intern(&value);
                    self.attributes.entry(record).or_default().arrays.entry(key).or_default().push(id);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_staged_writes_visible_before_internalize() {
        let mut pool = Pool::new();
        let record = pool.add_record();
        pool.set_str(record, Key::Summary, "first");
        pool.set_str(record, Key::Summary, "second");
        assert_eq!(pool.staged_len(), 2);
        assert_eq!(pool.lookup_str(record, Key::Summary), Some("second"));
        pool.internalize();
        assert_eq!(pool.staged_len(), 0);
        assert_eq!(pool.lookup_str(record, Key::Summary), Some("second"));
    }

    #[test]
    fn test_array_order_spans_internalize() {
        let mut pool = Pool::new();
        let record = pool.add_record();
        pool.add_array_str(record, ArrayKey::Keywords, "one");
        pool.internalize();
        pool.add_array_str(record, ArrayKey::Keywords, "two");
        assert_eq!(pool.lookup_array(record, ArrayKey::Keywords), vec!["one", "two"]);
    }

    #[test]
    fn test_relations_are_deduplicated() {
        let mut pool = Pool::new();
        let record = pool.add_record();
        let name = pool.intern("foo");
        pool.add_requires(record, Relation::named(name));
        pool.add_requires(record, Relation::named(name));
        pool.add_provides(record, Relation::equals(name, Id::EMPTY));
        assert_eq!(pool.render_requires(record), vec!["foo"]);
        assert_eq!(pool.render_provides(record), vec!["foo = "]);
        assert!(pool.has_requires(record));
    }

    #[test]
    fn test_discard_last_record_releases_slot() {
        let mut pool = Pool::new();
        let kept = pool.add_record();
        let dropped = pool.add_record();
        pool.set_str(dropped, Key::Summary, "partial");
        pool.discard_record(dropped);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.staged_len(), 0);
        assert_eq!(pool.add_record(), dropped);
        assert!(pool.view(kept).is_ok());
    }

    #[test]
    fn test_discard_middle_record_leaves_hole() {
        let mut pool = Pool::new();
        let first = pool.add_record();
        let second = pool.add_record();
        let third = pool.add_record();
        pool.discard_record(second);
        assert_eq!(pool.records().collect::<Vec<_>>(), vec![first, third]);
        // Writes to a discarded handle are ignored.
        pool.set_str(second, Key::Url, "https://example.org");
        assert_eq!(pool.lookup_str(second, Key::Url), None);
        let err = pool.view(second).unwrap_err();
        assert_eq!(*err, ErrorKind::RecordNotFound(second));
    }

    #[rstest]
    #[case("/usr/share/metainfo/foo.appdata.xml", Some("foo.appdata.xml"))]
    #[case("/usr/share/metainfo/foo.metainfo.xml", Some("foo.metainfo.xml"))]
    #[case("/usr/share/metainfo/foo.xml", None)]
    #[case("/usr/share/metainfo/.appdata.xml", None)]
    #[case("/usr/share/metainfo/sub/foo.appdata.xml", None)]
    #[case("/usr/share/appdata/foo.appdata.xml", None)]
    fn test_search_filelist(#[case] path: &str, #[case] expected: Option<&str>) {
        let mut pool = Pool::new();
        let owner = pool.add_record();
        pool.add_array_str(owner, ArrayKey::FileList, path);
        let found = pool.search_filelist("/usr/share/metainfo/");
        assert_eq!(found, expected.map(|base| (owner, base.to_string())).into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_search_filelist_spans_records_and_internalize() {
        let mut pool = Pool::new();
        let first = pool.add_record();
        let second = pool.add_record();
        pool.add_array_str(second, ArrayKey::FileList, "/usr/share/metainfo/b.appdata.xml");
        pool.add_array_str(first, ArrayKey::FileList, "/usr/share/metainfo/a.appdata.xml");
        pool.internalize();
        pool.add_array_str(first, ArrayKey::FileList, "/usr/share/metainfo/c.metainfo.xml");
        pool.add_array_str(second, ArrayKey::License, "MIT");
        let found = pool.search_filelist("/usr/share/metainfo");
        assert_eq!(
            found,
            vec![
                (first, "a.appdata.xml".to_string()),
                (first, "c.metainfo.xml".to_string()),
                (second, "b.appdata.xml".to_string()),
            ]
        );
    }

    #[test]
    fn test_view_resolves_everything() {
        let mut pool = Pool::new();
        let record = pool.add_record();
        let name = pool.intern("application:Foo");
        pool.set_name(record, name);
        pool.set_arch(record, Id::ARCH_NOARCH);
        pool.set_evr(record, Id::EMPTY);
        pool.add_provides(record, Relation::equals(name, Id::EMPTY));
        pool.add_array_str(record, ArrayKey::License, "MIT");
        pool.set_str(record, Key::Category, "desktop");
        let view = pool.view(record).unwrap();
        assert_eq!(view.name.as_deref(), Some("application:Foo"));
        assert_eq!(view.arch.as_deref(), Some("noarch"));
        assert_eq!(view.evr.as_deref(), Some(""));
        assert_eq!(view.provides, vec!["application:Foo = "]);
        assert_eq!(view.attributes.get("category"), Some(&AttrValue::Str("desktop".to_string())));
        assert_eq!(view.attributes.get("license"), Some(&AttrValue::Array(vec!["MIT".to_string()])));
    }
}
