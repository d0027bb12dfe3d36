//! Relations synthesized when an application element closes.

use crate::desktop::DesktopResolver;
use crate::flags::Flags;
use appdata_pool::{Id, Key, PackageStore, RecordId, Relation};
use tracing::debug;

/// Prefix of every application record name.
pub const APPLICATION_PREFIX: &str = "application:";
const DESKTOP_SUFFIX: &str = ".desktop";

/// Desktop file id suffixes and the metadata file name suffix that replaces
/// them. The first match wins; ids matching none get [`FALLBACK_SUFFIX`]
/// appended whole.
const FILENAME_SUFFIXES: [(&str, &str); 5] = [
    (".desktop", ".appdata.xml"),
    (".ttf", ".metainfo.xml"),
    (".otf", ".metainfo.xml"),
    (".xml", ".metainfo.xml"),
    (".db", ".metainfo.xml"),
];
const FALLBACK_SUFFIX: &str = ".metainfo.xml";

/// `application-appdata(<target>)`, provided by a record to tie it to the
/// package shipping the metadata file.
pub fn appdata_link(target: &str) -> String {
    format!("application-appdata({target})")
}

/// `appdata(<filename>)`, required by a record from the package that
/// installs its metadata file.
pub fn appdata_requirement(filename: &str) -> String {
    format!("appdata({filename})")
}

/// Guess the metadata file name from a desktop file id.
///
/// ```
/// use appdata_parse::guess_filename;
///
/// assert_eq!(guess_filename("org.example.Foo.desktop").as_deref(), Some("org.example.Foo.appdata.xml"));
/// assert_eq!(guess_filename("Foo.ttf").as_deref(), Some("Foo.metainfo.xml"));
/// assert_eq!(guess_filename("foo.bin").as_deref(), Some("foo.bin.metainfo.xml"));
/// assert_eq!(guess_filename(""), None);
/// ```
pub fn guess_filename(id: &str) -> Option<String> {
    if id.is_empty() {
        return None;
    }
    let guessed = FILENAME_SUFFIXES
        .iter()
        .find_map(|(suffix, replacement)| {
            let stem = id.strip_suffix(suffix).filter(|stem| !stem.is_empty())?;
            Some(format!("{stem}{replacement}"))
        })
        .unwrap_or_else(|| format!("{id}{FALLBACK_SUFFIX}"));
    Some(guessed)
}

/// Record name derived from a desktop file id: `application:` plus the id
/// without its `.desktop` suffix.
pub fn name_from_desktop_file(desktop_file: &str) -> String {
    let stem = desktop_file.strip_suffix(DESKTOP_SUFFIX).unwrap_or(desktop_file);
    format!("{APPLICATION_PREFIX}{stem}")
}

/// Everything collected for one record besides what already sits in the
/// store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DependencyInputs<'a> {
    /// Contents of the `<id>` element.
    pub desktop_file: Option<&'a str>,
    /// Name of the document being ingested.
    pub filename: Option<&'a str>,
    /// Records whose file list contains the document.
    pub owners: &'a [RecordId],
    pub has_summary: bool,
}

/// Complete a record whose top element just closed.
pub(crate) fn synthesize<S: PackageStore + ?Sized>(
    store: &mut S,
    record: RecordId,
    inputs: &DependencyInputs<'_>,
    flags: Flags,
    desktop: Option<&dyn DesktopResolver>,
) {
    if store.arch(record).is_none() {
        store.set_arch(record, Id::ARCH_NOARCH);
    }
    if store.evr(record).is_none() {
        store.set_evr(record, Id::EMPTY);
    }

    if let Some(desktop_file) = inputs.desktop_file {
        if (store.name(record).is_none() || !inputs.has_summary)
            && flags.contains(Flags::CHECK_DESKTOP_FILE)
            && let Some(resolver) = desktop
            && let Some(entry) = resolver.resolve(desktop_file, flags.contains(Flags::USE_ROOTDIR))
        {
            debug!(desktop_file, ?entry, "filling in missing tags from desktop entry");
            if store.name(record).is_none()
                && let Some(name) = entry.name
            {
                let name = store.intern(&format!("{APPLICATION_PREFIX}{name}"));
                store.set_name(record, name);
            }
            if !inputs.has_summary
                && let Some(comment) = entry.comment
            {
                store.set_str(record, Key::Summary, &comment);
            }
        }
        if store.name(record).is_none() {
            let name = store.intern(&name_from_desktop_file(desktop_file));
            store.set_name(record, name);
        }
    }

    if !store.has_requires(record) && !inputs.owners.is_empty() {
        for owner in inputs.owners {
            let Some(owner_name) = store.name(*owner) else {
                continue;
            };
            let link = match store.resolve(owner_name) {
                Some(owner_name) => appdata_link(owner_name),
                None => continue,
            };
            let link = store.intern(&link);
            store.add_requires(record, Relation::named(owner_name));
            store.add_provides(record, Relation::named(link));
        }
    }

    if !store.has_requires(record) {
        let filename = match inputs.filename {
            Some(filename) => Some(filename.to_string()),
            None => inputs.desktop_file.and_then(guess_filename),
        };
        if let Some(filename) = filename {
            debug!(filename, "linking record to its metadata file");
            let requirement = store.intern(&appdata_requirement(&filename));
            let link = store.intern(&appdata_link(&filename));
            store.add_requires(record, Relation::named(requirement));
            store.add_provides(record, Relation::named(link));
        }
    }

    if let Some(name) = store.name(record)
        && let Some(arch) = store.arch(record)
        && !arch.is_source_arch()
    {
        let evr = store.evr(record).unwrap_or(Id::EMPTY);
        store.add_provides(record, Relation::equals(name, evr));
    }
}
