// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::model::Config;

/// Load a configuration file from a given path.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {:?}", path))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file if it exists, otherwise fall back to defaults.
///
/// A missing file is not an error: most projects run entirely on the
/// conventional `src` / `public` / `temp` layout. A file that exists but
/// fails to parse is still fatal.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if path.is_file() {
        load_from_path(path)
    } else {
        debug!(path = ?path, "no config file; using built-in defaults");
        Ok(Config::default())
    }
}
