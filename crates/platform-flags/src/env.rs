//! The mutable build environment shared by every configurator.
//!
//! A [`BuildEnv`] is created once per build invocation, mutated in place by a
//! platform configurator and the common flag collaborator, and then handed to
//! the compilation driver. Flag lists only ever grow: there is no operation
//! that removes an entry from a list.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Well-known option and toolchain variable names.
pub mod keys {
    pub const PLATFORM: &str = "platform";
    pub const ARCH: &str = "arch";
    pub const TARGET: &str = "target";
    pub const LTO: &str = "lto";
    pub const THREADS: &str = "threads";
    pub const USE_LLVM: &str = "use_llvm";
    pub const USE_HOT_RELOAD: &str = "use_hot_reload";
    pub const DEV_BUILD: &str = "dev_build";
    pub const OPTIMIZE: &str = "optimize";
    pub const DEBUG_SYMBOLS: &str = "debug_symbols";
    pub const SYMBOLS_VISIBILITY: &str = "symbols_visibility";
    pub const DISABLE_EXCEPTIONS: &str = "disable_exceptions";
    pub const PRECISION: &str = "precision";

    pub const CCFLAGS: &str = "CCFLAGS";
    pub const CXXFLAGS: &str = "CXXFLAGS";
    pub const LINKFLAGS: &str = "LINKFLAGS";
    pub const CPPDEFINES: &str = "CPPDEFINES";

    pub const CC: &str = "CC";
    pub const CXX: &str = "CXX";
    pub const AR: &str = "AR";
    pub const RANLIB: &str = "RANLIB";
    pub const ARCOM: &str = "ARCOM";
    pub const ARCOM_POSIX: &str = "ARCOM_POSIX";
    pub const OBJSUFFIX: &str = "OBJSUFFIX";
    pub const SHOBJSUFFIX: &str = "SHOBJSUFFIX";
    pub const LIBPREFIX: &str = "LIBPREFIX";
    pub const LIBSUFFIX: &str = "LIBSUFFIX";
    pub const SHLIBPREFIX: &str = "SHLIBPREFIX";
    pub const SHLIBSUFFIX: &str = "SHLIBSUFFIX";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildEnv {
    vars: BTreeMap<String, Value>,
}

impl BuildEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Returns the value of a string option, `None` when unset or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.vars.get(key) {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Unset and non-boolean options read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.vars.get(key), Some(Value::Bool(true)))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.vars.insert(key.to_string(), value.into());
    }

    /// Appends `items` to the list stored under `key`, creating it if needed.
    ///
    /// A scalar already stored under `key` becomes the first list element.
    pub fn append<I, S>(&mut self, key: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = self
            .vars
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));

        if !matches!(slot, Value::List(_)) {
            let scalar = slot.to_string();
            *slot = Value::List(vec![scalar]);
        }

        if let Value::List(list) = slot {
            list.extend(items.into_iter().map(Into::into));
        }
    }

    /// Returns the list stored under `key`; empty when unset or scalar.
    pub fn list(&self, key: &str) -> &[String] {
        match self.vars.get(key) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    pub fn has_flag(&self, key: &str, flag: &str) -> bool {
        self.list(key).iter().any(|f| f == flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the environment as POSIX shell assignments, one per line.
    pub fn to_shell(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push('=');
            out.push_str(&shell_quote(&value.to_string()));
            out.push('\n');
        }
        out
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_and_extends_list() {
        let mut env = BuildEnv::new();
        env.append(keys::CCFLAGS, ["-fPIC"]);
        env.append(keys::CCFLAGS, vec!["-m64".to_string(), "-march=x86-64".to_string()]);
        assert_eq!(env.list(keys::CCFLAGS), ["-fPIC", "-m64", "-march=x86-64"]);
    }

    #[test]
    fn test_append_promotes_scalar() {
        let mut env = BuildEnv::new();
        env.set("EXTRA", "-Wall");
        env.append("EXTRA", ["-Wextra"]);
        assert_eq!(env.list("EXTRA"), ["-Wall", "-Wextra"]);
    }

    #[test]
    fn test_typed_getters() {
        let mut env = BuildEnv::new();
        env.set(keys::THREADS, true);
        env.set(keys::ARCH, "x86_64");

        assert!(env.get_bool(keys::THREADS));
        assert!(!env.get_bool(keys::USE_LLVM));
        assert!(!env.get_bool(keys::ARCH));
        assert_eq!(env.get_str(keys::ARCH), Some("x86_64"));
        assert_eq!(env.get_str(keys::THREADS), None);
        assert!(env.list(keys::ARCH).is_empty());
    }

    #[test]
    fn test_to_shell_quotes_values() {
        let mut env = BuildEnv::new();
        env.append(keys::LINKFLAGS, ["-Wl,-R,'$$ORIGIN'"]);
        env.set(keys::CC, "gcc");
        assert_eq!(
            env.to_shell(),
            "CC='gcc'\nLINKFLAGS='-Wl,-R,'\\''$$ORIGIN'\\'''\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let mut env = BuildEnv::new();
        env.set(keys::THREADS, false);
        env.set(keys::CC, "emcc");
        env.append(keys::CPPDEFINES, ["WEB_ENABLED"]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "CC": "emcc",
                "CPPDEFINES": ["WEB_ENABLED"],
                "threads": false,
            })
        );
    }
}
