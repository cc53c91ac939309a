use crate::env::{keys, BuildEnv};

/// Compiler executables substituted into the environment for a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolchain {
    pub cc: &'static str,
    pub cxx: &'static str,
    /// Archiver and ranlib, left untouched when `None`.
    pub ar: Option<&'static str>,
    pub ranlib: Option<&'static str>,
}

pub const LLVM: Toolchain = Toolchain {
    cc: "clang",
    cxx: "clang++",
    ar: None,
    ranlib: None,
};

pub const EMSCRIPTEN: Toolchain = Toolchain {
    cc: "emcc",
    cxx: "em++",
    ar: Some("emar"),
    ranlib: Some("emranlib"),
};

impl Toolchain {
    pub fn apply(&self, env: &mut BuildEnv) {
        log::debug!("using toolchain {} / {}", self.cc, self.cxx);
        env.set(keys::CC, self.cc);
        env.set(keys::CXX, self.cxx);
        if let Some(ar) = self.ar {
            env.set(keys::AR, ar);
        }
        if let Some(ranlib) = self.ranlib {
            env.set(keys::RANLIB, ranlib);
        }
    }
}
