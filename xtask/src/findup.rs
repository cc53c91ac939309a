use std::path::{Path, PathBuf};

use anyhow::Context;

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent().unwrap_or(start).to_path_buf()
    };

    loop {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        if !dir.pop() {
            break;
        }
    }

    None
}

/// Directory holding `matrix.yaml`, searched from the current directory and
/// then from this crate's manifest.
pub fn workspace_root() -> anyhow::Result<PathBuf> {
    let start = std::env::current_dir()?;
    let found = find_upwards(&start, "matrix.yaml")
        .or_else(|| find_upwards(Path::new(env!("CARGO_MANIFEST_DIR")), "matrix.yaml"))
        .context("matrix.yaml not found (run from within the repo or pass --config)")?;

    Ok(found.parent().unwrap_or(found.as_path()).to_path_buf())
}
