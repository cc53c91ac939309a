use super::{resolve_auto_lto, Configurator};
use crate::common::CompilerFlags;
use crate::env::{keys, BuildEnv};
use crate::error::{ConfigError, Result};
use crate::spec::arch::is_web_arch;
use crate::spec::llvm;
use crate::toolchain::find_executable;

pub struct Web;

impl Configurator for Web {
    fn name(&self) -> &'static str {
        "web"
    }

    fn exists(&self) -> bool {
        find_executable("emcc").is_some()
    }

    fn generate(&self, env: &mut BuildEnv, common: &dyn CompilerFlags) -> Result<()> {
        let arch = env.get_str(keys::ARCH).unwrap_or_default().to_string();
        if !is_web_arch(&arch) {
            return Err(ConfigError::UnsupportedArch {
                platform: "web",
                arch,
                supported: "wasm32 and wasm64",
            });
        }

        llvm::EMSCRIPTEN.apply(env);

        // Long AR invocations go through a response file, which needs POSIX
        // style paths.
        let arcom = env.get_str(keys::ARCOM).unwrap_or_default();
        let arcom_posix = arcom
            .replace("$TARGET", "$TARGET.posix")
            .replace("$SOURCES", "$SOURCES.posix");
        env.set(keys::ARCOM_POSIX, arcom_posix);
        env.set(keys::ARCOM, "${TEMPFILE(ARCOM_POSIX)}");

        env.set(keys::OBJSUFFIX, ".o");
        env.set(keys::SHOBJSUFFIX, ".o");
        env.set(keys::LIBPREFIX, "lib");
        env.set(keys::LIBSUFFIX, ".a");
        env.set(keys::SHLIBSUFFIX, ".wasm");

        if env.get_bool(keys::THREADS) {
            env.append(keys::CCFLAGS, ["-sUSE_PTHREADS=1"]);
            env.append(keys::LINKFLAGS, ["-sUSE_PTHREADS=1"]);

            // Oldest browsers with DedicatedWorkerGlobalScope.name.
            env.append(
                keys::LINKFLAGS,
                [
                    "-sMIN_FIREFOX_VERSION=79",
                    "-sMIN_CHROME_VERSION=75",
                    "-sMIN_SAFARI_VERSION=150000",
                ],
            );
        } else {
            // Oldest browsers Emscripten practically supports. Firefox needs
            // 65 for ReadableStream.
            env.append(
                keys::LINKFLAGS,
                [
                    "-sMIN_FIREFOX_VERSION=65",
                    "-sMIN_CHROME_VERSION=70",
                    "-sMIN_SAFARI_VERSION=120200",
                ],
            );
        }

        env.append(keys::CCFLAGS, ["-sSIDE_MODULE=1"]);
        env.append(keys::LINKFLAGS, ["-sSIDE_MODULE=1"]);

        if arch == "wasm64" {
            env.append(keys::CCFLAGS, ["-sMEMORY64=1"]);
            env.append(keys::LINKFLAGS, ["-sMEMORY64=1"]);
            // 64-bit pointers cross the JS boundary as BigInt.
            env.append(keys::LINKFLAGS, ["-sWASM_BIGINT=1"]);
            log::warn!("wasm64 is experimental, the output may not load in every browser");
        } else {
            env.append(keys::LINKFLAGS, ["-sWASM_BIGINT=0"]);
        }

        env.append(keys::CCFLAGS, ["-sSUPPORT_LONGJMP='emscripten'"]);
        env.append(keys::LINKFLAGS, ["-sSUPPORT_LONGJMP='emscripten'"]);

        // Older JS engines, while keeping WASM as a hard requirement.
        env.append(keys::LINKFLAGS, ["-sLEGACY_VM_SUPPORT=1", "-sWASM=1"]);
        env.append(keys::LINKFLAGS, ["-sPOLYFILL_OLD_MATH_FUNCTIONS=1"]);

        env.append(keys::CPPDEFINES, ["WEB_ENABLED", "UNIX_ENABLED"]);

        resolve_auto_lto(env);

        common.generate(env)
    }
}
