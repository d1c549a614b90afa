#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial primitives for the subway accessibility pipeline.
//!
//! Everything in this crate is pure: no file or network I/O. It provides
//! geodesic distances, nearest-N point searches (centroid-based and
//! boundary-aware), right-hand-rule winding normalization for polygons, an
//! R-tree backed point index for point-in-polygon lookups, and a typed
//! [`Feature`] wrapper that converts to and from `GeoJSON`.

pub mod distance;
pub mod feature;
pub mod index;
pub mod nearest;
pub mod winding;

pub use distance::{boundary_distance_meters, centroid, distance_meters};
pub use feature::{
    Feature, PointFeature, PolygonFeature, features_from_collection, to_feature_collection,
};
pub use index::PointIndex;
pub use nearest::{Located, Nearest, find_nearest_n, find_nearest_n_with_boundary};
pub use winding::enforce_right_hand_rule;

use thiserror::Error;

/// Errors produced by spatial operations and feature conversion.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The geometry type is not covered by the operation's contract.
    #[error("Unsupported geometry type for {operation}: {geometry_type}")]
    UnsupportedGeometry {
        /// Operation that rejected the geometry.
        operation: &'static str,
        /// `GeoJSON` type name of the rejected geometry.
        geometry_type: &'static str,
    },

    /// A feature could not be converted between `GeoJSON` and its typed form.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// Property (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` geometry conversion failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// Returns the `GeoJSON` type name for a geometry.
#[must_use]
pub const fn geometry_type_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
