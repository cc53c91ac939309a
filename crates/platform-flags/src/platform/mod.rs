//! Platform configurators.
//!
//! Each platform mutates a [`BuildEnv`] in place and then hands it to the
//! shared [`CompilerFlags`] collaborator for the flags common to every
//! platform.

pub mod linux;
pub mod web;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{CommonCompilerFlags, CompilerFlags};
use crate::env::{keys, BuildEnv};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Web,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[Platform::Linux, Platform::Web];

    /// Platform used when none is requested.
    pub fn host() -> Self {
        Platform::Linux
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Web => "web",
        }
    }

    pub fn configurator(&self) -> &'static dyn Configurator {
        match self {
            Platform::Linux => &linux::Linux,
            Platform::Web => &web::Web,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linux" | "linuxbsd" => Ok(Platform::Linux),
            "web" | "javascript" => Ok(Platform::Web),
            other => Err(ConfigError::UnknownPlatform(other.to_string())),
        }
    }
}

/// A boolean option a platform adds on top of the shared ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub help: &'static str,
    pub default: bool,
}

pub trait Configurator: Sync {
    fn name(&self) -> &'static str;

    /// Whether the platform's toolchain can be used on this host.
    fn exists(&self) -> bool;

    fn options(&self) -> &'static [OptionDecl] {
        &[]
    }

    /// Populates `env` for this platform, then runs `common`.
    fn generate(&self, env: &mut BuildEnv, common: &dyn CompilerFlags) -> Result<()>;
}

/// Rewrites `lto=auto` to the mode both platforms resolve it to.
pub(crate) fn resolve_auto_lto(env: &mut BuildEnv) {
    if env.get_str(keys::LTO) == Some("auto") {
        env.set(keys::LTO, "full");
    }
}

/// Configures `env` for the platform it names, using the default
/// collaborator.
pub fn configure(env: &mut BuildEnv) -> Result<()> {
    let platform: Platform = env
        .get_str(keys::PLATFORM)
        .ok_or_else(|| ConfigError::UnknownPlatform(String::new()))?
        .parse()?;
    log::debug!("configuring for {}", platform);
    platform
        .configurator()
        .generate(env, &CommonCompilerFlags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BuildOptionsBuilder, Lto};

    #[test]
    fn test_platform_parsing() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("web".parse::<Platform>().unwrap(), Platform::Web);
        assert_eq!("javascript".parse::<Platform>().unwrap(), Platform::Web);
        let err = "haiku".parse::<Platform>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown platform: haiku");
    }

    #[test]
    fn test_configurator_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.configurator().name(), platform.as_str());
        }
    }

    #[test]
    fn test_configure_dispatches_on_platform() {
        let mut env = BuildOptionsBuilder::default()
            .platform(Platform::Web)
            .build()
            .unwrap()
            .to_env();
        configure(&mut env).unwrap();
        assert!(env.has_flag(keys::CPPDEFINES, "WEB_ENABLED"));

        let mut env = BuildOptionsBuilder::default()
            .platform(Platform::Linux)
            .arch("x86_64")
            .build()
            .unwrap()
            .to_env();
        configure(&mut env).unwrap();
        assert!(env.has_flag(keys::CPPDEFINES, "LINUX_ENABLED"));
    }

    #[test]
    fn test_configure_without_platform_fails() {
        let mut env = BuildEnv::new();
        assert!(matches!(
            configure(&mut env),
            Err(ConfigError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_auto_lto_resolves_to_full_everywhere() {
        for (platform, arch) in [(Platform::Linux, "x86_64"), (Platform::Web, "wasm32")] {
            let mut env = BuildOptionsBuilder::default()
                .platform(platform)
                .arch(arch)
                .lto(Lto::Auto)
                .build()
                .unwrap()
                .to_env();
            configure(&mut env).unwrap();
            assert_eq!(env.get_str(keys::LTO), Some("full"), "{}", platform);
            assert!(env.has_flag(keys::LINKFLAGS, "-flto"));
        }
    }
}
