//! Borough boundaries and the derived borough centre points.

use serde::{Deserialize, Serialize};
use subway_access_spatial::PolygonFeature;

use crate::ExtraProperties;

/// Properties of a borough boundary feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoroughProperties {
    /// Borough name (e.g. `"Brooklyn"`).
    pub boroname: String,
    /// Trailing platform availability, or `-1` when the borough has no data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_availability: Option<f64>,
    /// Remaining upstream properties.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

/// A borough boundary feature.
pub type BoroughFeature = PolygonFeature<BoroughProperties>;

/// Properties of a borough centre point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoroughCenterProperties {
    /// Borough name.
    pub name: String,
    /// Trailing platform availability, or `-1`.
    pub platform_availability: f64,
}
