#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood census merge, geometry normalization, and accessibility
//! scoring.
//!
//! Neighborhoods are first joined with their census row and converted to
//! right-hand-rule `MultiPolygon`s ([`prepare_neighborhoods`]). Scoring
//! ([`score_neighborhoods`]) then runs in two passes: a per-neighborhood
//! sample of nearby stations, followed by a global min-max rescale of the
//! per-capita metric that needs every neighborhood's value first.

pub mod prepare;
pub mod scoring;

pub use prepare::{NormalizedNeighborhood, merge_census, normalize_geometry, prepare_neighborhoods};
pub use scoring::{
    NeighborhoodScore, SampleScore, ScoredNeighborhood, ScoredNeighborhoodProperties,
    ScoringParams, accessible_per_10k, min_max_normalize, sample_stations, score_neighborhoods,
    scored_to_collection,
};

use subway_access_spatial::SpatialError;
use thiserror::Error;

/// Errors that can occur during neighborhood operations.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// A neighborhood geometry could not be normalized.
    #[error("Neighborhood {nta}: {source}")]
    Geometry {
        /// NTA code of the offending neighborhood.
        nta: String,
        /// Underlying spatial error.
        source: SpatialError,
    },

    /// Feature conversion error.
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}
