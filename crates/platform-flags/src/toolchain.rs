use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Looks `name` up on `PATH`. A name containing a path separator is checked
/// directly.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    find_executable_in(name, env::var_os("PATH")?.as_os_str())
}

pub fn find_executable_in(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(name);
        return is_executable(&p).then_some(p);
    }

    env::split_paths(path_var)
        .flat_map(|dir| {
            executable_extensions()
                .into_iter()
                .map(move |ext| dir.join(format!("{}{}", name, ext)))
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn executable_extensions() -> Vec<String> {
    env::var("PATHEXT")
        .map(|v| v.split(';').map(|s| s.to_lowercase()).collect())
        .unwrap_or_else(|_| vec![".exe".into(), ".bat".into(), ".cmd".into()])
}

#[cfg(not(windows))]
fn executable_extensions() -> Vec<String> {
    vec![String::new()]
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        path.metadata()
            .map(|meta| meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_finds_executable_on_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let emcc = make_file(second.path(), "emcc", 0o755);

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_executable_in("emcc", &path_var), Some(emcc));
        assert_eq!(find_executable_in("em++", &path_var), None);
    }

    #[test]
    fn test_skips_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        make_file(dir.path(), "emcc", 0o644);
        let path_var = env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_executable_in("emcc", &path_var), None);
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let tool = make_file(dir.path(), "clang", 0o755);
        let name = tool.to_string_lossy().into_owned();
        assert_eq!(find_executable_in(&name, OsStr::new("")), Some(tool));
    }
}
