use crate::config::Config;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Prefix of environment variables overriding config values.
pub const ENV_PREFIX: &str = "APPDATA_";
const CONFIG_STEMS: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

/// The first config file present in the platform config directory
/// (`~/.config/appdata` on Linux).
pub fn default_config_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "appdata")?;
    CONFIG_STEMS.iter().map(|stem| dirs.config_dir().join(stem)).find(|path| path.is_file())
}

/// Figment file provider for `path`, chosen by extension.
fn file_layer(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    Ok(match extension {
        "toml" => figment.merge(Toml::file_exact(path)),
        "yaml" | "yml" => figment.merge(Yaml::file_exact(path)),
        "json" => figment.merge(Json::file_exact(path)),
        other => exn::bail!(ErrorKind::UnsupportedFormat(other.to_string())),
    })
}

impl Config {
    /// Defaults plus the config file layer, without environment overrides.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::MissingFile(path.to_path_buf())),
            Some(path) => file_layer(figment, path),
            None => match default_config_file() {
                Some(path) => {
                    debug!(path = %path.display(), "using default config file");
                    file_layer(figment, &path)
                },
                None => Ok(figment),
            },
        }
    }

    /// Load the configuration: defaults, then the config file (`path`, or
    /// the default location), then `APPDATA_*` environment variables.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::extract(Self::figment(path)?.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract a [`Config`] from an assembled figment.
    pub fn extract(figment: Figment) -> Result<Self> {
        figment.extract().or_raise(|| ErrorKind::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("config.toml", "root = \"/sysroot\"\nsearch_filelist = true\n")]
    #[case("config.yaml", "root: /sysroot\nsearch_filelist: true\n")]
    #[case("config.json", r#"{"root": "/sysroot", "search_filelist": true}"#)]
    fn test_file_layer(#[case] name: &str, #[case] contents: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        let config = Config::extract(Config::figment(Some(&path)).unwrap()).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/sysroot")));
        assert!(config.search_filelist);
        assert_eq!(config.appdata_dir, Config::default().appdata_dir);
        assert!(config.check_desktop_files);
    }

    #[test]
    fn test_later_layers_win() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "check_desktop_files = false\nappdata_dir = \"/opt/metainfo\"\n").unwrap();
        let figment = Config::figment(Some(&path)).unwrap().merge(Serialized::default("appdata_dir", "/srv/metainfo"));
        let config = Config::extract(figment).unwrap();
        assert_eq!(config.appdata_dir, PathBuf::from("/srv/metainfo"));
        assert!(!config.check_desktop_files);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::figment(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingFile(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "root=/").unwrap();
        let err = Config::figment(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(ext) if ext == "ini"));
    }

    #[test]
    fn test_invalid_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "search_filelist = \"sometimes\"\n").unwrap();
        let err = Config::extract(Config::figment(Some(&path)).unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid));
    }
}
