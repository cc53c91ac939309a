use super::{resolve_auto_lto, Configurator, OptionDecl};
use crate::common::CompilerFlags;
use crate::env::{keys, BuildEnv};
use crate::error::Result;
use crate::spec::arch::native_arch_flags;
use crate::spec::llvm;

pub struct Linux;

const OPTIONS: &[OptionDecl] = &[OptionDecl {
    name: keys::USE_LLVM,
    help: "Use the LLVM compiler - only effective when targeting Linux",
    default: false,
}];

impl Configurator for Linux {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn exists(&self) -> bool {
        true
    }

    fn options(&self) -> &'static [OptionDecl] {
        OPTIONS
    }

    fn generate(&self, env: &mut BuildEnv, common: &dyn CompilerFlags) -> Result<()> {
        if env.get_bool(keys::USE_LLVM) {
            llvm::LLVM.apply(env);
        } else if env.get_bool(keys::USE_HOT_RELOAD) {
            // Required for extensions to truly unload.
            env.append(keys::CXXFLAGS, ["-fno-gnu-unique"]);
        }

        env.append(keys::CCFLAGS, ["-fPIC", "-Wwrite-strings"]);
        env.append(keys::LINKFLAGS, ["-Wl,-R,'$$ORIGIN'"]);

        let arch = env.get_str(keys::ARCH).unwrap_or_default().to_string();
        match native_arch_flags(&arch) {
            Some(flags) => {
                env.append(keys::CCFLAGS, flags.ccflags.iter().copied());
                env.append(keys::LINKFLAGS, flags.linkflags.iter().copied());
            }
            None => log::debug!("no architecture flags for '{}'", arch),
        }

        env.append(keys::CPPDEFINES, ["LINUX_ENABLED", "UNIX_ENABLED"]);

        resolve_auto_lto(env);

        common.generate(env)
    }
}
