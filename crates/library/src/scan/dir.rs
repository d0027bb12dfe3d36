use crate::desktop::DesktopFileResolver;
use crate::error::{ErrorKind, Result};
use crate::path::prefix_root;
use crate::scan::report::{FileError, IngestReport};
use appdata_parse::{DesktopResolver, Flags, Ingestor};
use appdata_pool::{PackageStore, Pool, RecordId};
use exn::ResultExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Where metadata documents are installed.
pub const APPDATA_DIR: &str = "/usr/share/metainfo";

const METADATA_SUFFIXES: [&str; 2] = [".appdata.xml", ".metainfo.xml"];

/// `true` for visible file names ending in a metadata suffix.
pub fn is_metadata_file(name: &str) -> bool {
    !name.starts_with('.')
        && METADATA_SUFFIXES.iter().any(|suffix| name.len() > suffix.len() && name.ends_with(suffix))
}

/// Ingest every metadata document in `dir` with the default desktop entry
/// location and no root prefix.
pub fn add_appdata_dir(pool: &mut Pool, dir: impl AsRef<Path>, flags: Flags) -> Result<IngestReport> {
    DirectoryIngestor::new(flags).ingest(pool, dir)
}

/// Ingests a directory of metadata documents into a [`Pool`].
///
/// Each document is parsed with [`Flags::NO_INTERNALIZE`] forced on, and
/// with [`Flags::CHECK_DESKTOP_FILE`] forced on unless
/// [`DirectoryIngestor::desktop_fallback`] turned it off. The pool is
/// internalized once at the end unless the caller's own flags contain
/// [`Flags::NO_INTERNALIZE`].
///
/// With [`Flags::SEARCH_UNINTERNALIZED_FILELIST`], records already in the
/// pool whose file list contains a document become its owners, and the
/// ingested records are linked to them instead of to the file name.
pub struct DirectoryIngestor<'a> {
    flags: Flags,
    root: Option<PathBuf>,
    desktop_fallback: bool,
    desktop: DesktopFileResolver,
    custom_desktop: Option<&'a dyn DesktopResolver>,
}

/// DirectoryIngestor Internals
impl DirectoryIngestor<'_> {
    /// Names of the metadata documents in `dir`, sorted.
    fn list(dir: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).or_raise(|| ErrorKind::ListDirectory(dir.to_path_buf()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.or_raise(|| ErrorKind::ListDirectory(dir.to_path_buf()))?;
            match entry.file_name().into_string() {
                Ok(name) if is_metadata_file(&name) => names.push(name),
                Ok(_) => {},
                Err(name) => debug!(name = %name.to_string_lossy(), "skipping non UTF-8 file name"),
            }
        }
        names.sort();
        Ok(names)
    }

    /// File-list entries that name documents in `dir`, as `(owner, basename)`.
    fn owner_candidates(&self, pool: &Pool, dir: &Path) -> Vec<(RecordId, String)> {
        if !self.flags.contains(Flags::SEARCH_UNINTERNALIZED_FILELIST) {
            return Vec::new();
        }
        pool.search_filelist(&dir.to_string_lossy())
    }

    /// Flags for each document of the batch.
    fn document_flags(&self) -> Flags {
        let mut flags = self.flags | Flags::NO_INTERNALIZE;
        flags.set(Flags::CHECK_DESKTOP_FILE, self.desktop_fallback);
        flags
    }

    fn ingest_file(&self, pool: &mut Pool, path: &Path, name: &str, owners: &[RecordId]) -> Result<Vec<RecordId>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                let message = err.to_string();
                return Err(err).or_raise(|| ErrorKind::Open(message));
            },
        };
        let desktop: &dyn DesktopResolver = match self.custom_desktop {
            Some(resolver) => resolver,
            None => &self.desktop,
        };
        let ingestor = Ingestor::new(self.document_flags())
            .filename(name)
            .owners(owners)
            .desktop_resolver(desktop);
        match ingestor.ingest(pool, file) {
            Ok(records) => Ok(records),
            Err(err) => {
                let message = (*err).to_string();
                Err(err).or_raise(|| ErrorKind::Parse(message))
            },
        }
    }
}

/// DirectoryIngestor Public
impl<'a> DirectoryIngestor<'a> {
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            root: None,
            desktop_fallback: true,
            desktop: DesktopFileResolver::default(),
            custom_desktop: None,
        }
    }

    /// Whether missing names and summaries are filled in from desktop
    /// entries. On by default, whatever the flags say.
    pub fn desktop_fallback(mut self, enabled: bool) -> Self {
        self.desktop_fallback = enabled;
        self
    }

    /// Root used for [`Flags::USE_ROOTDIR`]; applies to the metadata
    /// directory and to desktop entry lookups.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.desktop = self.desktop.with_root(&root);
        self.root = Some(root);
        self
    }

    /// Directory holding desktop entries, instead of [`APPLICATIONS_DIR`](crate::APPLICATIONS_DIR).
    pub fn applications_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let desktop = DesktopFileResolver::new(dir);
        self.desktop = match &self.root {
            Some(root) => desktop.with_root(root),
            None => desktop,
        };
        self
    }

    /// Replace the filesystem desktop entry lookup altogether.
    pub fn desktop_resolver(mut self, resolver: &'a dyn DesktopResolver) -> Self {
        self.custom_desktop = Some(resolver);
        self
    }

    /// Ingest every metadata document in `dir`.
    ///
    /// Only a directory that cannot be listed is an error; problems with
    /// individual documents end up in [`IngestReport::errors`].
    #[instrument(skip(self, pool), fields(dir = %dir.as_ref().display(), flags = ?self.flags))]
    pub fn ingest(&self, pool: &mut Pool, dir: impl AsRef<Path>) -> Result<IngestReport> {
        let dir = dir.as_ref();
        let listed = self.owner_candidates(pool, dir);
        let dirpath = match self.flags.contains(Flags::USE_ROOTDIR) {
            true => prefix_root(self.root.as_deref(), dir),
            false => dir.to_path_buf(),
        };

        let names = Self::list(&dirpath)?;
        let mut report = IngestReport::default();
        let mut owners = Vec::new();
        for name in names {
            let path = dirpath.join(&name);
            owners.clear();
            owners.extend(listed.iter().filter(|(_, basename)| *basename == name).map(|(owner, _)| *owner));
            match self.ingest_file(pool, &path, &name, &owners) {
                Ok(records) => {
                    debug!(path = %path.display(), records = records.len(), "ingested");
                    report.records.extend(records);
                    report.documents += 1;
                },
                Err(error) => {
                    let message = (*error).to_string();
                    warn!(path = %path.display(), error = %message, "skipping metadata document");
                    report.errors.push(FileError { path, error });
                },
            }
        }

        if !self.flags.contains(Flags::NO_INTERNALIZE) {
            pool.internalize();
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use appdata_parse::DesktopEntry;
    use appdata_pool::{ArrayKey, Key};
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    const DOCUMENT: &str = "<component><id>bar.desktop</id><name>Bar</name><summary>Does bar</summary></component>";

    fn name(pool: &Pool, record: RecordId) -> Option<&str> {
        pool.name(record).and_then(|id| pool.resolve(id))
    }

    #[rstest]
    #[case("foo.appdata.xml", true)]
    #[case("foo.metainfo.xml", true)]
    #[case(".hidden.appdata.xml", false)]
    #[case(".appdata.xml", false)]
    #[case("foo.xml", false)]
    #[case("foo.appdata.xml.bak", false)]
    fn test_is_metadata_file(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_metadata_file(name), expected);
    }

    #[test]
    fn test_ingest_skips_non_matching_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README"), "not metadata").unwrap();
        fs::write(dir.path().join("bar.appdata.xml"), DOCUMENT).unwrap();
        let mut pool = Pool::new();
        let report = add_appdata_dir(&mut pool, dir.path(), Flags::empty()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.documents, 1);
        assert!(report.is_clean());
        assert_eq!(pool.staged_len(), 0);
        let record = report.records[0];
        assert_eq!(name(&pool, record), Some("application:Bar"));
        assert_eq!(pool.render_requires(record), vec!["appdata(bar.appdata.xml)"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.appdata.xml")).unwrap();
        let mut pool = Pool::new();
        let report = add_appdata_dir(&mut pool, dir.path(), Flags::empty()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(&*report.errors[0].error, ErrorKind::Open(_)));
        assert!(report.errors[0].path.ends_with("dangling.appdata.xml"));
    }

    #[test]
    fn test_malformed_document_is_reported_and_batch_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.metainfo.xml"), "<component>\n<name>A</oops>").unwrap();
        fs::write(dir.path().join("b.metainfo.xml"), DOCUMENT).unwrap();
        let mut pool = Pool::new();
        let report = add_appdata_dir(&mut pool, dir.path(), Flags::empty()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(report.errors.len(), 1);
        match &*report.errors[0].error {
            ErrorKind::Parse(message) => assert!(message.contains("line 2"), "{message}"),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_entries_ingested_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        for stem in ["c", "a", "b"] {
            let xml = format!("<component><name>{stem}</name></component>");
            fs::write(dir.path().join(format!("{stem}.appdata.xml")), xml).unwrap();
        }
        let mut pool = Pool::new();
        let report = add_appdata_dir(&mut pool, dir.path(), Flags::empty()).unwrap();
        let names: Vec<_> = report.records.iter().map(|r| name(&pool, *r)).collect();
        assert_eq!(names, vec![Some("application:a"), Some("application:b"), Some("application:c")]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut pool = Pool::new();
        let err = add_appdata_dir(&mut pool, dir.path().join("nope"), Flags::empty()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ListDirectory(_)));
    }

    #[test]
    fn test_owners_from_file_lists() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bar.appdata.xml"), DOCUMENT).unwrap();
        let mut pool = Pool::new();
        let owner = pool.add_record();
        let owner_name = pool.intern("bar-data");
        pool.set_name(owner, owner_name);
        let listed = format!("{}/bar.appdata.xml", dir.path().display());
        pool.add_array_str(owner, ArrayKey::FileList, &listed);

        let report = add_appdata_dir(&mut pool, dir.path(), Flags::SEARCH_UNINTERNALIZED_FILELIST).unwrap();
        let record = report.records[0];
        assert_eq!(pool.render_requires(record), vec!["bar-data"]);
        assert_eq!(pool.render_provides(record), vec!["application-appdata(bar-data)", "application:Bar = "]);
    }

    #[test]
    fn test_rootdir_prefixes_metadata_and_desktop_lookups() {
        let root = TempDir::new().unwrap();
        let metainfo = root.path().join("usr/share/metainfo");
        let applications = root.path().join("usr/share/applications");
        fs::create_dir_all(&metainfo).unwrap();
        fs::create_dir_all(&applications).unwrap();
        fs::write(metainfo.join("foo.appdata.xml"), "<component><id>foo.desktop</id></component>").unwrap();
        fs::write(applications.join("foo.desktop"), "[Desktop Entry]\nName=Foo\nComment=Does foo\n").unwrap();

        let mut pool = Pool::new();
        let report = DirectoryIngestor::new(Flags::USE_ROOTDIR)
            .root(root.path())
            .ingest(&mut pool, APPDATA_DIR)
            .unwrap();
        let record = report.records[0];
        assert_eq!(name(&pool, record), Some("application:Foo"));
        assert_eq!(pool.lookup_str(record, Key::Summary), Some("Does foo"));
    }

    #[test]
    fn test_desktop_fallback_is_forced() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("foo.appdata.xml"), "<component><id>foo.desktop</id></component>").unwrap();
        let resolver = |_: &str, _: bool| Some(DesktopEntry { name: Some("From Desktop".to_string()), comment: None });
        let mut pool = Pool::new();
        let report = DirectoryIngestor::new(Flags::empty())
            .desktop_resolver(&resolver)
            .ingest(&mut pool, dir.path())
            .unwrap();
        assert_eq!(name(&pool, report.records[0]), Some("application:From Desktop"));
    }

    #[test]
    fn test_desktop_fallback_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("foo.appdata.xml"), "<component><id>foo.desktop</id></component>").unwrap();
        let resolver = |_: &str, _: bool| {
            Some(DesktopEntry { name: Some("From Desktop".to_string()), comment: Some("Desktop summary".to_string()) })
        };
        let mut pool = Pool::new();
        let report = DirectoryIngestor::new(Flags::CHECK_DESKTOP_FILE)
            .desktop_fallback(false)
            .desktop_resolver(&resolver)
            .ingest(&mut pool, dir.path())
            .unwrap();
        let record = report.records[0];
        assert_eq!(name(&pool, record), Some("application:foo"));
        assert_eq!(pool.lookup_str(record, Key::Summary), None);
    }

    #[test]
    fn test_no_internalize_defers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bar.appdata.xml"), DOCUMENT).unwrap();
        let mut pool = Pool::new();
        let report = add_appdata_dir(&mut pool, dir.path(), Flags::NO_INTERNALIZE).unwrap();
        assert!(pool.staged_len() > 0);
        pool.internalize();
        assert_eq!(pool.lookup_str(report.records[0], Key::Summary), Some("Does bar"));
    }
}
