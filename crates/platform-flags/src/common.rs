//! Flags shared by every platform, applied after the platform configurator.

use crate::env::{keys, BuildEnv};
use crate::error::{ConfigError, Result};
use crate::options::{BuildTarget, Lto, Optimize, Precision, Visibility};

pub trait CompilerFlags {
    fn generate(&self, env: &mut BuildEnv) -> Result<()>;
}

/// The default collaborator: language standard, exceptions, visibility,
/// debug info, optimization level, LTO and build defines.
pub struct CommonCompilerFlags;

fn parse_key<T>(env: &BuildEnv, key: &'static str) -> Result<T>
where
    T: std::str::FromStr<Err = ConfigError>,
{
    env.get_str(key)
        .ok_or_else(|| ConfigError::invalid(key, "<unset>"))?
        .parse()
}

impl CompilerFlags for CommonCompilerFlags {
    fn generate(&self, env: &mut BuildEnv) -> Result<()> {
        let lto: Lto = parse_key(env, keys::LTO)?;
        let optimize: Optimize = parse_key(env, keys::OPTIMIZE)?;
        let visibility: Visibility = parse_key(env, keys::SYMBOLS_VISIBILITY)?;
        let target: BuildTarget = parse_key(env, keys::TARGET)?;
        let precision: Precision = parse_key(env, keys::PRECISION)?;

        // Platforms must have resolved `auto` by now.
        if lto == Lto::Auto {
            return Err(ConfigError::invalid("lto", lto.as_str()));
        }
        let is_web = env.get_str(keys::PLATFORM) == Some("web");
        if lto == Lto::Thin && !is_web && !env.get_bool(keys::USE_LLVM) {
            return Err(ConfigError::ThinLtoRequiresLlvm);
        }
        if lto != Lto::None {
            log::info!("Using LTO: {}", lto);
        }

        env.append(keys::CXXFLAGS, ["-std=c++17"]);
        if env.get_bool(keys::DISABLE_EXCEPTIONS) {
            env.append(keys::CXXFLAGS, ["-fno-exceptions"]);
        }

        let visibility_flag = match visibility {
            Visibility::Visible => Some("-fvisibility=default"),
            Visibility::Hidden => Some("-fvisibility=hidden"),
            Visibility::Auto => None,
        };
        if let Some(flag) = visibility_flag {
            env.append(keys::CCFLAGS, [flag]);
            env.append(keys::LINKFLAGS, [flag]);
        }

        let dev_build = env.get_bool(keys::DEV_BUILD);
        if env.get_bool(keys::DEBUG_SYMBOLS) {
            // DWARF 4 keeps addr2line working on clang builds.
            env.append(keys::CCFLAGS, ["-gdwarf-4"]);
            env.append(keys::CCFLAGS, [if dev_build { "-g3" } else { "-g2" }]);
        } else {
            env.append(keys::LINKFLAGS, ["-s"]);
        }

        let opt_flag = match optimize {
            Optimize::Speed => "-O3",
            Optimize::SpeedTrace => "-O2",
            Optimize::Size => "-Os",
            Optimize::Debug => "-Og",
            Optimize::None => "-O0",
        };
        env.append(keys::CCFLAGS, [opt_flag]);

        match lto {
            Lto::Thin => {
                env.append(keys::CCFLAGS, ["-flto=thin"]);
                env.append(keys::LINKFLAGS, ["-flto=thin"]);
            }
            Lto::Full => {
                env.append(keys::CCFLAGS, ["-flto"]);
                env.append(keys::LINKFLAGS, ["-flto"]);
            }
            Lto::None | Lto::Auto => {}
        }

        let mut defines = Vec::new();
        if env.get_bool(keys::THREADS) {
            defines.push("THREADS_ENABLED");
        }
        if env.get_bool(keys::USE_HOT_RELOAD) {
            defines.push("HOT_RELOAD_ENABLED");
        }
        if target != BuildTarget::TemplateRelease {
            defines.push("DEBUG_ENABLED");
        }
        if target == BuildTarget::Editor {
            defines.push("TOOLS_ENABLED");
        }
        if dev_build {
            defines.push("DEV_ENABLED");
        }
        if precision == Precision::Double {
            defines.push("REAL_T_IS_DOUBLE");
        }
        env.append(keys::CPPDEFINES, defines);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BuildOptions, BuildOptionsBuilder};
    use crate::platform::Platform;

    fn common(opts: &BuildOptions) -> Result<BuildEnv> {
        let mut env = opts.to_env();
        CommonCompilerFlags.generate(&mut env)?;
        Ok(env)
    }

    #[test]
    fn test_default_release_like_flags() {
        let env = common(&BuildOptions::default()).unwrap();
        assert_eq!(env.list(keys::CXXFLAGS), ["-std=c++17", "-fno-exceptions"]);
        assert_eq!(env.list(keys::CCFLAGS), ["-fvisibility=hidden", "-O2"]);
        assert_eq!(env.list(keys::LINKFLAGS), ["-fvisibility=hidden", "-s"]);
        assert_eq!(
            env.list(keys::CPPDEFINES),
            ["THREADS_ENABLED", "HOT_RELOAD_ENABLED", "DEBUG_ENABLED"]
        );
    }

    #[test]
    fn test_dev_build_symbols() {
        let opts = BuildOptionsBuilder::default()
            .dev_build(true)
            .symbols_visibility(Visibility::Auto)
            .build()
            .unwrap();
        let env = common(&opts).unwrap();
        assert_eq!(env.list(keys::CCFLAGS), ["-gdwarf-4", "-g3", "-O0"]);
        assert!(!env.has_flag(keys::LINKFLAGS, "-s"));
        assert!(env.has_flag(keys::CPPDEFINES, "DEV_ENABLED"));
    }

    #[test]
    fn test_release_editor_and_double_defines() {
        let release = BuildOptionsBuilder::default()
            .target(BuildTarget::TemplateRelease)
            .threads(false)
            .precision(Precision::Double)
            .build()
            .unwrap();
        let env = common(&release).unwrap();
        assert_eq!(env.list(keys::CPPDEFINES), ["REAL_T_IS_DOUBLE"]);

        let editor = BuildOptionsBuilder::default()
            .target(BuildTarget::Editor)
            .build()
            .unwrap();
        let env = common(&editor).unwrap();
        assert!(env.has_flag(keys::CPPDEFINES, "DEBUG_ENABLED"));
        assert!(env.has_flag(keys::CPPDEFINES, "TOOLS_ENABLED"));
    }

    #[test]
    fn test_lto_modes() {
        let full = BuildOptionsBuilder::default().lto(Lto::Full).build().unwrap();
        let env = common(&full).unwrap();
        assert!(env.has_flag(keys::CCFLAGS, "-flto"));
        assert!(env.has_flag(keys::LINKFLAGS, "-flto"));

        let thin = BuildOptionsBuilder::default()
            .platform(Platform::Linux)
            .lto(Lto::Thin)
            .use_llvm(true)
            .build()
            .unwrap();
        let env = common(&thin).unwrap();
        assert!(env.has_flag(keys::LINKFLAGS, "-flto=thin"));
    }

    #[test]
    fn test_thin_lto_requires_llvm_on_linux() {
        let opts = BuildOptionsBuilder::default()
            .platform(Platform::Linux)
            .lto(Lto::Thin)
            .build()
            .unwrap();
        assert!(matches!(
            common(&opts),
            Err(ConfigError::ThinLtoRequiresLlvm)
        ));
    }

    #[test]
    fn test_unresolved_auto_lto_is_rejected() {
        let opts = BuildOptionsBuilder::default().lto(Lto::Auto).build().unwrap();
        let err = common(&opts).unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized lto: auto");
    }
}
