/// Architecture-tuning flags for one native architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchFlags {
    pub arch: &'static str,
    pub ccflags: &'static [&'static str],
    pub linkflags: &'static [&'static str],
}

/// Web architectures, in the order they are reported to the user.
pub const WEB_ARCHS: &[&str] = &["wasm32", "wasm64"];

/// Maps common spellings onto the canonical architecture names.
///
/// Unrecognized names are returned unchanged.
pub fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x64" | "amd64" => "x86_64",
        "x86" | "i386" | "i686" => "x86_32",
        "aarch64" | "armv8" | "arm64v8" => "arm64",
        "armv7" | "arm" => "arm32",
        "rv" | "riscv" | "riscv64" => "rv64",
        "loong64" => "loongarch64",
        _ => arch,
    }
}

/// Canonical name of the architecture this binary was compiled for.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "x86_32",
        "aarch64" => "arm64",
        "arm" => "arm32",
        "riscv64" => "rv64",
        other => normalize_arch(other),
    }
}

/// Returns the native architecture flags, `None` for architectures the
/// native target has no tuning for.
pub fn native_arch_flags(arch: &str) -> Option<ArchFlags> {
    let flags = match arch {
        "x86_64" => ArchFlags {
            arch: "x86_64",
            // -m64 already implies x86, -march keeps the baseline explicit.
            ccflags: &["-m64", "-march=x86-64"],
            linkflags: &["-m64", "-march=x86-64"],
        },
        "x86_32" => ArchFlags {
            arch: "x86_32",
            ccflags: &["-m32", "-march=i686"],
            linkflags: &["-m32", "-march=i686"],
        },
        "arm64" => ArchFlags {
            arch: "arm64",
            ccflags: &["-march=armv8-a"],
            linkflags: &["-march=armv8-a"],
        },
        "arm32" => ArchFlags {
            arch: "arm32",
            ccflags: &["-march=armv7-a"],
            linkflags: &["-march=armv7-a"],
        },
        "rv64" => ArchFlags {
            arch: "rv64",
            ccflags: &["-march=rv64gc"],
            linkflags: &["-march=rv64gc"],
        },
        "loongarch64" => ArchFlags {
            arch: "loongarch64",
            ccflags: &["-march=loongarch64", "-mabi=lp64d"],
            linkflags: &["-march=loongarch64", "-mabi=lp64d"],
        },
        "sparc64" => ArchFlags {
            arch: "sparc64",
            ccflags: &["-mcpu=ultrasparc", "-m64"],
            linkflags: &["-mcpu=ultrasparc", "-m64"],
        },
        "mips64" => ArchFlags {
            arch: "mips64",
            ccflags: &[
                "-march=mips3",
                "-mabi=64",
                "-mlong-calls",
                "-mxgot",
                "-ffunction-sections",
                "-fdata-sections",
                "-fPIC",
                "-fno-inline",
                "-fno-inline-functions",
            ],
            linkflags: &["-march=mips3", "-mabi=64"],
        },
        "alpha" => ArchFlags {
            arch: "alpha",
            ccflags: &[
                "-mcpu=ev56",
                "-mieee",
                "-mbuild-constants",
                "-mlarge-data",
                "-mtrap-precision=i",
            ],
            linkflags: &["-Wl,--no-relax", "-mlarge-data"],
        },
        _ => return None,
    };
    Some(flags)
}

pub fn is_web_arch(arch: &str) -> bool {
    WEB_ARCHS.contains(&arch)
}
