use crate::env::{keys, BuildEnv};
use crate::options::{BuildOptions, BuildTarget, Precision};
use crate::platform::Platform;

/// Names the library artifact of one build:
/// `.{platform}.{target}[.dev][.double].{arch}[.nothreads]`
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub platform: Platform,

    pub target: BuildTarget,
    /// Canonical architecture (e.g., "x86_64", "wasm32")
    pub arch: String,

    pub dev_build: bool,

    pub precision: Precision,

    pub threads: bool,
}

impl TargetConfig {
    pub fn new(platform: Platform, target: BuildTarget, arch: String) -> Self {
        Self {
            platform,
            target,
            arch,
            dev_build: false,
            precision: Precision::Single,
            threads: true,
        }
    }

    pub fn from_options(opts: &BuildOptions) -> Self {
        Self {
            platform: opts.platform,
            target: opts.target,
            arch: opts.arch(),
            dev_build: opts.dev_build,
            precision: opts.precision,
            threads: opts.threads,
        }
    }

    pub fn suffix(&self) -> String {
        let mut suffix = format!(".{}.{}", self.platform, self.target);
        if self.dev_build {
            suffix.push_str(".dev");
        }
        if self.precision == Precision::Double {
            suffix.push_str(".double");
        }
        suffix.push('.');
        suffix.push_str(&self.arch);
        if !self.threads {
            suffix.push_str(".nothreads");
        }
        suffix
    }

    /// Shared library file name, using the prefix and suffix the configured
    /// environment settled on.
    pub fn library_name(&self, stem: &str, env: &BuildEnv) -> String {
        format!(
            "{}{}{}{}",
            env.get_str(keys::SHLIBPREFIX).unwrap_or_default(),
            stem,
            self.suffix(),
            env.get_str(keys::SHLIBSUFFIX).unwrap_or_default(),
        )
    }
}
