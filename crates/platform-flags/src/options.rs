//! Typed build options and their mapping onto a [`BuildEnv`].

use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::env::{keys, BuildEnv};
use crate::error::ConfigError;
use crate::platform::Platform;
use crate::spec::arch::{host_arch, normalize_arch};

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($key:literal) { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
        )]
        #[serde(rename_all = "snake_case")]
        #[value(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ConfigError::invalid($key, other)),
                }
            }
        }
    };
}

option_enum! {
    /// Which flavor of the extension library is built.
    BuildTarget ("target") {
        Editor => "editor",
        TemplateDebug => "template_debug",
        TemplateRelease => "template_release",
    }
}

option_enum! {
    /// Link-time optimization mode. `auto` is resolved by the platform.
    Lto ("lto") {
        None => "none",
        Auto => "auto",
        Thin => "thin",
        Full => "full",
    }
}

option_enum! {
    Optimize ("optimize") {
        None => "none",
        Speed => "speed",
        SpeedTrace => "speed_trace",
        Size => "size",
        Debug => "debug",
    }
}

option_enum! {
    Visibility ("symbols_visibility") {
        Auto => "auto",
        Visible => "visible",
        Hidden => "hidden",
    }
}

option_enum! {
    /// Floating-point precision of `real_t`.
    Precision ("precision") {
        Single => "single",
        Double => "double",
    }
}

/// Options for one build invocation.
///
/// Fields left as `None` are derived from the others when the environment is
/// built, mirroring how the defaults depend on `platform`, `target` and
/// `dev_build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default, deny_unknown_fields)]
#[builder(default)]
pub struct BuildOptions {
    pub platform: Platform,
    #[builder(setter(into, strip_option))]
    pub arch: Option<String>,
    pub target: BuildTarget,
    pub lto: Lto,
    pub threads: bool,
    pub use_llvm: bool,
    #[builder(setter(strip_option))]
    pub use_hot_reload: Option<bool>,
    pub dev_build: bool,
    #[builder(setter(strip_option))]
    pub optimize: Option<Optimize>,
    #[builder(setter(strip_option))]
    pub debug_symbols: Option<bool>,
    pub symbols_visibility: Visibility,
    pub disable_exceptions: bool,
    pub precision: Precision,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            platform: Platform::host(),
            arch: None,
            target: BuildTarget::TemplateDebug,
            lto: Lto::None,
            threads: true,
            use_llvm: false,
            use_hot_reload: None,
            dev_build: false,
            optimize: None,
            debug_symbols: None,
            symbols_visibility: Visibility::Hidden,
            disable_exceptions: true,
            precision: Precision::Single,
        }
    }
}

impl BuildOptions {
    /// Canonical architecture name; the host architecture on linux and
    /// `wasm32` on web when none was given.
    pub fn arch(&self) -> String {
        match &self.arch {
            Some(arch) => normalize_arch(arch).to_string(),
            None => match self.platform {
                Platform::Linux => host_arch().to_string(),
                Platform::Web => "wasm32".to_string(),
            },
        }
    }

    pub fn use_hot_reload(&self) -> bool {
        self.use_hot_reload
            .unwrap_or(self.target != BuildTarget::TemplateRelease)
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize.unwrap_or(if self.dev_build {
            Optimize::None
        } else {
            Optimize::SpeedTrace
        })
    }

    pub fn debug_symbols(&self) -> bool {
        self.debug_symbols.unwrap_or(self.dev_build)
    }

    /// Builds a fresh environment: resolved options, POSIX toolchain
    /// defaults and empty flag lists.
    pub fn to_env(&self) -> BuildEnv {
        let mut env = BuildEnv::new();

        env.set(keys::PLATFORM, self.platform.as_str());
        env.set(keys::ARCH, self.arch());
        env.set(keys::TARGET, self.target.as_str());
        env.set(keys::LTO, self.lto.as_str());
        env.set(keys::THREADS, self.threads);
        env.set(keys::USE_LLVM, self.use_llvm);
        env.set(keys::USE_HOT_RELOAD, self.use_hot_reload());
        env.set(keys::DEV_BUILD, self.dev_build);
        env.set(keys::OPTIMIZE, self.optimize().as_str());
        env.set(keys::DEBUG_SYMBOLS, self.debug_symbols());
        env.set(keys::SYMBOLS_VISIBILITY, self.symbols_visibility.as_str());
        env.set(keys::DISABLE_EXCEPTIONS, self.disable_exceptions);
        env.set(keys::PRECISION, self.precision.as_str());

        env.set(keys::CC, "cc");
        env.set(keys::CXX, "c++");
        env.set(keys::AR, "ar");
        env.set(keys::RANLIB, "ranlib");
        env.set(keys::ARCOM, "$AR $ARFLAGS $TARGET $SOURCES");
        env.set(keys::OBJSUFFIX, ".o");
        env.set(keys::SHOBJSUFFIX, ".os");
        env.set(keys::LIBPREFIX, "lib");
        env.set(keys::LIBSUFFIX, ".a");
        env.set(keys::SHLIBPREFIX, "lib");
        env.set(keys::SHLIBSUFFIX, ".so");

        for list in [keys::CCFLAGS, keys::CXXFLAGS, keys::LINKFLAGS, keys::CPPDEFINES] {
            env.append(list, std::iter::empty::<String>());
        }

        env
    }
}
