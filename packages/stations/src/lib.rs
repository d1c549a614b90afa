#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Station enrichment stages.
//!
//! Stations move through the stages in a fixed order that the types
//! enforce: raw [`StationFeature`]s are deduplicated by
//! [`dedupe_stations`], classified into [`LabeledStation`]s by
//! [`label_stations`], and only labeled stations can receive project
//! associations ([`associate_projects`]) and ridership
//! ([`merge_ridership`]). Each stage consumes its input and returns the
//! enriched collection.
//!
//! The project ETL that feeds association (status tagging, supplement
//! merge, id assignment) lives in [`projects`].
//!
//! [`StationFeature`]: subway_access_dataset_models::StationFeature

pub mod dedupe;
pub mod labeled;
pub mod projects;
pub mod ridership;

pub use dedupe::dedupe_stations;
pub use labeled::{
    LabeledStation, LabeledStationProperties, StationRidership, label_stations,
    stations_to_collection,
};
pub use projects::{
    associate_projects, assign_project_ids, merge_project_supplement, prepare_projects,
    tag_project_status,
};
pub use ridership::merge_ridership;

use thiserror::Error;

/// Errors that can occur while enriching stations.
#[derive(Debug, Error)]
pub enum StationError {
    /// Station properties could not be merged or re-typed.
    #[error("Failed to merge station {stop_name}: {source}")]
    Merge {
        /// Name of the canonical station.
        stop_name: String,
        /// Underlying serialization error.
        source: serde_json::Error,
    },

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Feature conversion error.
    #[error(transparent)]
    Spatial(#[from] subway_access_spatial::SpatialError),
}
