//! Subway line geometries and the hand-digitized line points file.

use geo::{Geometry, LineString};
use serde::{Deserialize, Serialize};
use subway_access_spatial::Feature;

use crate::ExtraProperties;

/// Properties of a subway line segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubwayLineProperties {
    /// Route symbol (`"A"`, `"7"`, `"SIR"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt_symbol: Option<String>,
    /// Display colour derived from the route symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Trip id, set on synthetic lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    /// Remaining upstream properties.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

/// A subway line feature (`LineString` or `MultiLineString`).
pub type SubwayLineFeature = Feature<Geometry<f64>, SubwayLineProperties>;

/// One vertex of a hand-digitized line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// A hand-digitized line (`sir-line-points`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePointsFile {
    /// Trip id of the digitized route.
    pub id: String,
    /// Ordered vertices.
    pub points: Vec<LinePoint>,
}

impl LinePointsFile {
    /// The vertices as a lon/lat line string.
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .into()
    }
}
