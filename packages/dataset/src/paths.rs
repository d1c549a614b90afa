//! Canonical locations of the datasets and output directories.
//!
//! Defaults are relative to the workspace root; `DATASETS_DIR` and
//! `OUTPUT_DIR` override them.

use std::path::{Path, PathBuf};

/// Environment variable overriding [`datasets_dir`].
pub const DATASETS_DIR_ENV: &str = "DATASETS_DIR";

/// Environment variable overriding [`output_dir`].
pub const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

fn dir_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map_or_else(|| project_root().join(default), PathBuf::from)
}

/// Directory holding the downloaded datasets (`datasets/`).
#[must_use]
pub fn datasets_dir() -> PathBuf {
    dir_from_env(DATASETS_DIR_ENV, "datasets")
}

/// Directory the artifacts are written to (`gis-data/`).
#[must_use]
pub fn output_dir() -> PathBuf {
    dir_from_env(OUTPUT_DIR_ENV, "gis-data")
}

/// Path of the optional `.env.local` file at the workspace root.
#[must_use]
pub fn env_file() -> PathBuf {
    project_root().join(".env.local")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
