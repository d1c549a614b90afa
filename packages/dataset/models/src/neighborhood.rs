//! Neighborhood tabulation area boundaries.

use serde::{Deserialize, Serialize};
use subway_access_spatial::PolygonFeature;

use crate::ExtraProperties;

/// Properties of a neighborhood boundary from `nyc-neighborhoods`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodProperties {
    /// NTA code, the census join key (e.g. `"BK0101"`).
    #[serde(rename = "NTA2020")]
    pub nta2020: String,
    /// Remaining upstream properties.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

impl NeighborhoodProperties {
    /// Total population (`Pop1`), present once census columns are merged.
    #[must_use]
    pub fn population(&self) -> Option<f64> {
        self.extra.get("Pop1").and_then(serde_json::Value::as_f64)
    }
}

/// A neighborhood boundary feature.
pub type NeighborhoodFeature = PolygonFeature<NeighborhoodProperties>;
