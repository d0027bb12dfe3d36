//! Desktop entry fallback.
//!
//! When a document names its companion `.desktop` file but leaves out the
//! application name or summary, those can be recovered from the desktop
//! entry's `Name=` and `Comment=` keys.

use std::io::BufRead;
use tracing::trace;

/// Longest line (including its newline) that is considered; longer lines
/// are skipped.
const MAX_LINE: usize = 1023;
const SECTION: &str = "[Desktop Entry]";

/// The keys recovered from a desktop entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub comment: Option<String>,
}

impl DesktopEntry {
    /// Read the `[Desktop Entry]` section of a desktop file.
    ///
    /// The first `Name=` and `Comment=` win. Blank lines, comments, lines
    /// without a key or value and overlong lines are skipped; reading stops
    /// early once both keys were found, and at the first read error.
    pub fn parse(mut reader: impl BufRead) -> Self {
        let mut entry = Self::default();
        let mut in_section = false;
        let mut line = Vec::with_capacity(MAX_LINE + 1);
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {},
            }
            if line.len() > MAX_LINE {
                trace!(length = line.len(), "skipping overlong desktop entry line");
                continue;
            }
            let text = String::from_utf8_lossy(&line);
            let text = text.trim_matches([' ', '\t', '\r', '\n']);
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text.starts_with('[') {
                in_section = text == SECTION;
                continue;
            }
            if !in_section {
                continue;
            }
            let Some((key, value)) = text.split_once('=') else {
                continue;
            };
            let key = key.trim_end_matches([' ', '\t']);
            let value = value.trim_start_matches([' ', '\t']);
            if key.is_empty() || value.is_empty() {
                continue;
            }
            match key {
                "Name" if entry.name.is_none() => entry.name = Some(value.to_string()),
                "Comment" if entry.comment.is_none() => entry.comment = Some(value.to_string()),
                _ => continue,
            }
            if entry.name.is_some() && entry.comment.is_some() {
                break;
            }
        }
        entry
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.comment.is_none()
    }
}

/// Looks up the desktop entry for a desktop file id such as `foo.desktop`.
///
/// Resolution is best effort: a missing or unreadable file is `None`, never
/// an error.
pub trait DesktopResolver {
    fn resolve(&self, desktop_file: &str, use_root: bool) -> Option<DesktopEntry>;
}

impl<F> DesktopResolver for F
where
    F: Fn(&str, bool) -> Option<DesktopEntry>,
{
    fn resolve(&self, desktop_file: &str, use_root: bool) -> Option<DesktopEntry> {
        self(desktop_file, use_root)
    }
}
