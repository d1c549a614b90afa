//! Stations with their accessibility class and downstream enrichments.

use geo::Point;
use serde::Serialize;
use subway_access_dataset_models::{
    AccessibilityClass, ProjectAssociation, StationFeature, StationProperties,
};
use subway_access_spatial::{Feature, Located, PointFeature, SpatialError, to_feature_collection};

/// Last-full-month ridership attached to a station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRidership {
    /// Human-readable month label (e.g. `"September, 2024"`).
    pub month: String,
    /// Riders in that month.
    pub last_full_month: f64,
}

/// A deduplicated station with its accessibility class.
///
/// The class is computed once from the direction flags when the station is
/// labeled; [`Self::ada_score`] is derived from it, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStation {
    /// The deduplicated station feature.
    pub feature: StationFeature,
    /// Accessibility class.
    pub ada: AccessibilityClass,
    /// Accessibility projects whose nearest station is this one.
    pub ada_projects: Vec<ProjectAssociation>,
    /// Ridership, once merged.
    pub ridership: Option<StationRidership>,
}

impl LabeledStation {
    /// Classifies a deduplicated station.
    #[must_use]
    pub fn label(feature: StationFeature) -> Self {
        let ada = AccessibilityClass::from_flags(
            feature.properties.is_southbound_accessible(),
            feature.properties.is_northbound_accessible(),
        );
        Self {
            feature,
            ada,
            ada_projects: Vec::new(),
            ridership: None,
        }
    }

    /// Display weighting score for [`Self::ada`].
    #[must_use]
    pub const fn ada_score(&self) -> u8 {
        self.ada.score()
    }

    /// Whether at least one direction is accessible.
    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.ada.is_accessible()
    }

    /// Upstream station properties.
    #[must_use]
    pub const fn properties(&self) -> &StationProperties {
        &self.feature.properties
    }

    /// Builds the output feature with every derived field.
    #[must_use]
    pub fn to_feature(&self) -> PointFeature<LabeledStationProperties> {
        Feature {
            id: self.feature.id.clone(),
            geometry: self.feature.geometry,
            properties: LabeledStationProperties {
                station: self.feature.properties.clone(),
                ada: self.ada,
                ada_score: self.ada_score(),
                ada_projects: self.ada_projects.clone(),
                ridership_month: self.ridership.as_ref().map(|r| r.month.clone()),
                ridership_last_full_month: self.ridership.as_ref().map(|r| r.last_full_month),
            },
        }
    }
}

impl Located for LabeledStation {
    fn location(&self) -> Point<f64> {
        self.feature.geometry
    }
}

/// Station properties as written to the stations artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStationProperties {
    /// Upstream properties, flattened.
    #[serde(flatten)]
    pub station: StationProperties,
    /// Accessibility class.
    pub ada: AccessibilityClass,
    /// 10 / 5 / 5 / 0 weighting of `ada`.
    pub ada_score: u8,
    /// Associated projects; omitted when there are none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ada_projects: Vec<ProjectAssociation>,
    /// Ridership month label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ridership_month: Option<String>,
    /// Ridership count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ridership_last_full_month: Option<f64>,
}

/// Classifies every station.
#[must_use]
pub fn label_stations(stations: Vec<StationFeature>) -> Vec<LabeledStation> {
    let labeled: Vec<_> = stations.into_iter().map(LabeledStation::label).collect();
    let accessible = labeled.iter().filter(|s| s.is_accessible()).count();
    log::info!(
        "Labeled {} stations, {accessible} with at least one accessible direction",
        labeled.len()
    );
    labeled
}

/// Builds the stations artifact.
///
/// # Errors
///
/// Returns [`SpatialError`] if a station's properties fail to serialize.
pub fn stations_to_collection(
    stations: &[LabeledStation],
) -> Result<geojson::FeatureCollection, SpatialError> {
    let features: Vec<_> = stations.iter().map(LabeledStation::to_feature).collect();
    to_feature_collection(&features)
}
