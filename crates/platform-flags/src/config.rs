//! Locating and loading `platform-flags.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::options::BuildOptions;

pub const CONFIG_FILE: &str = "platform-flags.toml";

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent().unwrap_or(start).to_path_buf()
    };

    loop {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !dir.pop() {
            break;
        }
    }

    None
}

/// `<config dir>/platform-flags/config.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("platform-flags").join("config.toml"))
}

/// The nearest `platform-flags.toml` at or above `start`, falling back to the
/// user config file when it exists.
pub fn discover(start: &Path) -> Option<PathBuf> {
    find_upwards(start, CONFIG_FILE).or_else(|| user_config_path().filter(|p| p.is_file()))
}

pub fn load_file(path: &Path) -> Result<BuildOptions> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads options from `explicit` if given, otherwise from the discovered
/// config file, otherwise the defaults.
pub fn load(explicit: Option<&Path>, start: &Path) -> Result<BuildOptions> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(start),
    };

    match path {
        Some(path) => {
            log::debug!("loading options from {}", path.display());
            load_file(&path)
        }
        None => Ok(BuildOptions::default()),
    }
}
