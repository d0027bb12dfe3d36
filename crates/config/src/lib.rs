//! Configuration for appdata ingestion.
//!
//! A [`Config`] is assembled from three layers, later ones winning:
//!
//! 1. Built-in defaults (the standard AppStream install locations)
//! 2. A config file: an explicit path, or the first of `config.toml`,
//!    `config.yaml`, `config.yml` and `config.json` found in the platform
//!    config directory
//! 3. `APPDATA_`-prefixed environment variables (`APPDATA_ROOT`,
//!    `APPDATA_SEARCH_FILELIST`, ...)

mod config;
pub mod error;
mod load;

pub use crate::config::Config;
pub use crate::load::{ENV_PREFIX, default_config_file};
