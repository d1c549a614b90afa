//! Subway station records and the ADA accessibility classification.

use serde::{Deserialize, Serialize};
use subway_access_spatial::PointFeature;

use crate::ExtraProperties;

/// Properties of a station in the `mta-subway-stations-geojson` dataset.
///
/// The upstream export delivers every value as a string, including the
/// `"0"`/`"1"` direction accessibility flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationProperties {
    /// Station identifier (unique per platform record upstream).
    pub station_id: String,
    /// Station complex identifier, the ridership join key.
    pub complex_id: String,
    /// Display name.
    pub stop_name: String,
    /// Space-separated daytime routes.
    #[serde(default)]
    pub daytime_routes: String,
    /// `"1"` if the northbound platform is accessible.
    pub ada_northbound: String,
    /// `"1"` if the southbound platform is accessible.
    pub ada_southbound: String,
    /// Remaining upstream columns.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

impl StationProperties {
    /// Whether the southbound flag is set.
    #[must_use]
    pub fn is_southbound_accessible(&self) -> bool {
        self.ada_southbound == "1"
    }

    /// Whether the northbound flag is set.
    #[must_use]
    pub fn is_northbound_accessible(&self) -> bool {
        self.ada_northbound == "1"
    }
}

/// A station point feature.
pub type StationFeature = PointFeature<StationProperties>;

/// Accessibility of a station, derived from its two direction flags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccessibilityClass {
    /// Both directions accessible.
    Full,
    /// Only the southbound platform is accessible.
    Southbound,
    /// Only the northbound platform is accessible.
    Northbound,
    /// Neither direction is accessible.
    No,
}

impl AccessibilityClass {
    /// Classifies a station from its direction flags.
    #[must_use]
    pub const fn from_flags(southbound: bool, northbound: bool) -> Self {
        match (southbound, northbound) {
            (true, true) => Self::Full,
            (true, false) => Self::Southbound,
            (false, true) => Self::Northbound,
            (false, false) => Self::No,
        }
    }

    /// Display weighting score: 10 for full, 5 for one direction, 0 for none.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Full => 10,
            Self::Southbound | Self::Northbound => 5,
            Self::No => 0,
        }
    }

    /// Whether at least one direction is accessible.
    #[must_use]
    pub const fn is_accessible(self) -> bool {
        !matches!(self, Self::No)
    }
}
