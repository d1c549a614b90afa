//! The "write artifact" contract.
//!
//! Artifacts are compact JSON documents named `<name>.json`. Writers go
//! through [`ArtifactSink`] so the orchestrator can target a directory in
//! production and memory in tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::{DatasetError, paths};

/// Destination for named JSON artifacts.
pub trait ArtifactSink: Send + Sync {
    /// Persists `json` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the artifact cannot be stored.
    fn write(&self, name: &str, json: String) -> Result<(), DatasetError>;

    /// Stores the file at `from` unchanged under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or stored.
    fn copy(&self, name: &str, from: &Path) -> Result<(), DatasetError> {
        self.write(name, std::fs::read_to_string(from)?)
    }
}

/// Serializes `value` and writes it to `sink` as `name`.
///
/// # Errors
///
/// Returns [`DatasetError`] if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    sink: &dyn ArtifactSink,
    name: &str,
    value: &T,
) -> Result<(), DatasetError> {
    let json = serde_json::to_string(value)?;
    sink.write(name, json)
}

/// Writes artifacts as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    /// Creates the output directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let dir = dir.into();
        paths::ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact named `name` is written to.
    #[must_use]
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ArtifactSink for OutputDir {
    fn write(&self, name: &str, json: String) -> Result<(), DatasetError> {
        let path = self.artifact_path(name);
        log::info!("Writing {name} ({} bytes) to {}", json.len(), path.display());
        std::fs::write(path, json)?;
        Ok(())
    }

    fn copy(&self, name: &str, from: &Path) -> Result<(), DatasetError> {
        let to = self.artifact_path(name);
        log::info!("Copying {} to {}", from.display(), to.display());
        std::fs::copy(from, to)?;
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<BTreeMap<String, String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parsed artifact named `name`, if written.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<serde_json::Value> {
        let artifacts = self.artifacts.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        artifacts
            .get(name)
            .and_then(|json| serde_json::from_str(json).ok())
    }

    /// Names of every artifact written so far.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let artifacts = self.artifacts.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        artifacts.keys().cloned().collect()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, name: &str, json: String) -> Result<(), DatasetError> {
        self.artifacts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), json);
        Ok(())
    }
}
