use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The web target only builds for the architectures it lists.
    #[error("Only {supported} supported on {platform}. Exiting.")]
    UnsupportedArch {
        platform: &'static str,
        arch: String,
        supported: &'static str,
    },

    #[error("ThinLTO is only compatible with LLVM, use `use_llvm=yes` or `lto=full`.")]
    ThinLtoRequiresLlvm,

    #[error("Unrecognized {key}: {value}")]
    InvalidOption { key: &'static str, value: String },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            key,
            value: value.into(),
        }
    }
}
