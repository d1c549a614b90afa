#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset registry, loading and artifact output.
//!
//! Raw datasets are downloaded and converted by external tooling into a
//! datasets directory. This crate resolves a [`DatasetId`] to its file,
//! parses it into the typed records from
//! [`subway_access_dataset_models`], and writes derived artifacts to an
//! output directory through an [`ArtifactSink`].

pub mod artifact;
pub mod load;
pub mod paths;
pub mod progress;
pub mod registry;

use std::path::PathBuf;

pub use artifact::{ArtifactSink, MemorySink, OutputDir, write_json};
pub use load::DatasetStore;
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use registry::{DatasetDefinition, DatasetId, DatasetSource, DatasetType};

use subway_access_spatial::SpatialError;

/// Errors that can occur while loading datasets or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file is not present in the datasets directory.
    #[error("Dataset {id} does not exist at {}", path.display())]
    Missing {
        /// Dataset that was requested.
        id: DatasetId,
        /// Path that was checked.
        path: PathBuf,
    },

    /// A loader was used on a dataset of the wrong file type.
    #[error("Dataset {id} is {actual}, expected {expected}")]
    WrongType {
        /// Dataset that was requested.
        id: DatasetId,
        /// Type the loader handles.
        expected: DatasetType,
        /// Type the registry declares.
        actual: DatasetType,
    },

    /// The dataset was read but does not match its schema.
    #[error("Dataset {id} failed validation: {message}")]
    Invalid {
        /// Dataset that failed.
        id: DatasetId,
        /// Description of the problem.
        message: String,
    },

    /// A dataset id string is not in the registry.
    #[error("Unknown dataset: {0}")]
    Unknown(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Geometry or feature conversion error.
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

impl DatasetError {
    /// Wraps a parse failure for `id` as a validation error.
    pub(crate) fn invalid(id: DatasetId, message: impl std::fmt::Display) -> Self {
        Self::Invalid {
            id,
            message: message.to_string(),
        }
    }
}
