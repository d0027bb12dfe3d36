use crate::path::prefix_root;
use appdata_parse::{DesktopEntry, DesktopResolver};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{instrument, trace};

/// Where desktop entries are installed.
pub const APPLICATIONS_DIR: &str = "/usr/share/applications";

/// Reads desktop entries from the applications directory.
#[derive(Debug, Clone)]
pub struct DesktopFileResolver {
    applications_dir: PathBuf,
    root: Option<PathBuf>,
}

impl Default for DesktopFileResolver {
    fn default() -> Self {
        Self::new(APPLICATIONS_DIR)
    }
}

impl DesktopFileResolver {
    pub fn new(applications_dir: impl Into<PathBuf>) -> Self {
        Self { applications_dir: applications_dir.into(), root: None }
    }

    /// Root prepended to the applications directory when a lookup asks for
    /// it.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Full path of the desktop entry `desktop_file`.
    pub fn path(&self, desktop_file: &str, use_root: bool) -> PathBuf {
        let path = self.applications_dir.join(desktop_file);
        match use_root {
            true => prefix_root(self.root.as_deref(), &path),
            false => path,
        }
    }
}

impl DesktopResolver for DesktopFileResolver {
    #[instrument(level = "trace", skip(self))]
    fn resolve(&self, desktop_file: &str, use_root: bool) -> Option<DesktopEntry> {
        let path = self.path(desktop_file, use_root);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                trace!(path = %path.display(), %err, "no desktop entry");
                return None;
            },
        };
        let entry = DesktopEntry::parse(BufReader::new(file));
        (!entry.is_empty()).then_some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("foo.desktop"), "[Desktop Entry]\nName=Foo\nComment=Does foo\n").unwrap();
        let resolver = DesktopFileResolver::new(dir.path());
        let entry = resolver.resolve("foo.desktop", false).unwrap();
        assert_eq!(entry.name.as_deref(), Some("Foo"));
        assert_eq!(entry.comment.as_deref(), Some("Does foo"));
        assert!(resolver.resolve("missing.desktop", false).is_none());
    }

    #[test]
    fn test_resolve_below_root() {
        let root = TempDir::new().unwrap();
        let applications = root.path().join("usr/share/applications");
        fs::create_dir_all(&applications).unwrap();
        fs::write(applications.join("foo.desktop"), "[Desktop Entry]\nName=Rooted\n").unwrap();
        let resolver = DesktopFileResolver::default().with_root(root.path());
        assert!(resolver.resolve("foo.desktop", false).is_none_or(|entry| entry.name.as_deref() != Some("Rooted")));
        let entry = resolver.resolve("foo.desktop", true).unwrap();
        assert_eq!(entry.name.as_deref(), Some("Rooted"));
    }

    #[test]
    fn test_entry_without_keys_is_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.desktop"), "[Desktop Entry]\nExec=foo\n").unwrap();
        assert!(DesktopFileResolver::new(dir.path()).resolve("empty.desktop", false).is_none());
    }
}
