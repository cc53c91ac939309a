//! Compiler and linker flag configuration for the `linux` and `web` targets
//! of an extension build.
//!
//! ```no_run
//! use platform_flags::{configure, BuildOptionsBuilder, Platform};
//!
//! let opts = BuildOptionsBuilder::default()
//!     .platform(Platform::Web)
//!     .arch("wasm32")
//!     .build()
//!     .unwrap();
//! let mut env = opts.to_env();
//! configure(&mut env).unwrap();
//! println!("{}", env.to_shell());
//! ```

pub mod common;
pub mod config;
pub mod env;
pub mod error;
pub mod options;
pub mod platform;
pub mod spec;
pub mod toolchain;

pub use common::{CommonCompilerFlags, CompilerFlags};
pub use env::{keys, BuildEnv, Value};
pub use error::{ConfigError, Result};
pub use options::{
    BuildOptions, BuildOptionsBuilder, BuildTarget, Lto, Optimize, Precision, Visibility,
};
pub use platform::{configure, Configurator, OptionDecl, Platform};
pub use spec::target::TargetConfig;
