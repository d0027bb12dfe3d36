use appdata_library::{APPDATA_DIR, APPLICATIONS_DIR};
use appdata_parse::Flags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// System root that metadata and desktop entry paths are resolved
    /// below. Unset means `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Directory scanned for `*.appdata.xml` and `*.metainfo.xml`.
    pub appdata_dir: PathBuf,
    /// Directory holding the `.desktop` files used to fill in missing names
    /// and summaries.
    pub applications_dir: PathBuf,
    pub check_desktop_files: bool,
    /// Link documents to already known records whose file lists install
    /// them.
    pub search_filelist: bool,
    /// Leave attribute writes staged after ingestion.
    pub defer_internalize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            appdata_dir: PathBuf::from(APPDATA_DIR),
            applications_dir: PathBuf::from(APPLICATIONS_DIR),
            check_desktop_files: true,
            search_filelist: false,
            defer_internalize: false,
        }
    }
}

impl Config {
    /// Ingestion flags described by this configuration.
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::CHECK_DESKTOP_FILE, self.check_desktop_files);
        flags.set(Flags::SEARCH_UNINTERNALIZED_FILELIST, self.search_filelist);
        flags.set(Flags::USE_ROOTDIR, self.root.is_some());
        flags.set(Flags::NO_INTERNALIZE, self.defer_internalize);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_flags() {
        assert_eq!(Config::default().flags(), Flags::CHECK_DESKTOP_FILE);
    }

    #[rstest]
    #[case(Config { root: Some("/sysroot".into()), ..Config::default() }, Flags::CHECK_DESKTOP_FILE | Flags::USE_ROOTDIR)]
    #[case(Config { check_desktop_files: false, ..Config::default() }, Flags::empty())]
    #[case(
        Config { check_desktop_files: false, search_filelist: true, defer_internalize: true, ..Config::default() },
        Flags::SEARCH_UNINTERNALIZED_FILELIST | Flags::NO_INTERNALIZE
    )]
    fn test_flags(#[case] config: Config, #[case] expected: Flags) {
        assert_eq!(config.flags(), expected);
    }
}
