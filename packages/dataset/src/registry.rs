//! Compile-time registry of upstream datasets.
//!
//! The registry is embedded from `datasets.toml` via `include_str!`.
//! Adding a dataset requires a new [`DatasetId`] variant and a matching
//! `[[dataset]]` entry.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Embedded registry definition.
const REGISTRY_TOML: &str = include_str!("../datasets.toml");

static REGISTRY: LazyLock<Vec<DatasetDefinition>> = LazyLock::new(|| {
    toml::de::from_str::<Registry>(REGISTRY_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse dataset registry: {e}"))
        .dataset
});

/// Identifier of an upstream dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum DatasetId {
    /// Static elevator and escalator inventory (JSON).
    #[serde(rename = "mta-elevators-and-escalators")]
    #[strum(serialize = "mta-elevators-and-escalators")]
    ElevatorsAndEscalators,
    /// Station entrances and exits, copied unchanged to the output.
    #[serde(rename = "subway-entrances-exits")]
    #[strum(serialize = "subway-entrances-exits")]
    EntrancesExits,
    /// Station points (`GeoJSON`).
    #[serde(rename = "mta-subway-stations-geojson")]
    #[strum(serialize = "mta-subway-stations-geojson")]
    Stations,
    /// Monthly platform availability per borough (JSON).
    #[serde(rename = "station-platform-availability")]
    #[strum(serialize = "station-platform-availability")]
    PlatformAvailability,
    /// Monthly availability per elevator/escalator (CSV).
    #[serde(rename = "elevator-and-escalator-availability")]
    #[strum(serialize = "elevator-and-escalator-availability")]
    EquipmentAvailability,
    /// Ridership per station complex for the last full month (JSON).
    #[serde(rename = "mta-last-full-month-ridership")]
    #[strum(serialize = "mta-last-full-month-ridership")]
    Ridership,
    /// Neighborhood tabulation area boundaries (`GeoJSON`).
    #[serde(rename = "nyc-neighborhoods")]
    #[strum(serialize = "nyc-neighborhoods")]
    Neighborhoods,
    /// Borough boundaries (`GeoJSON`).
    #[serde(rename = "borough-boundaries-geojson")]
    #[strum(serialize = "borough-boundaries-geojson")]
    BoroughBoundaries,
    /// Subway line geometry (`GeoJSON`).
    #[serde(rename = "subway-lines-geojson")]
    #[strum(serialize = "subway-lines-geojson")]
    SubwayLines,
    /// 2020 census demographics (CSV).
    #[serde(rename = "2020-census-data")]
    #[strum(serialize = "2020-census-data")]
    Census2020,
    /// Accessibility project placemarks (KML, read as converted `GeoJSON`).
    #[serde(rename = "mta-ada-projects")]
    #[strum(serialize = "mta-ada-projects")]
    AdaProjects,
    /// Hand-curated project details (JSON).
    #[serde(rename = "mta-ada-projects-supplement")]
    #[strum(serialize = "mta-ada-projects-supplement")]
    AdaProjectsSupplement,
    /// Hand-digitized Staten Island Railway line points (JSON).
    #[serde(rename = "sir-line-points")]
    #[strum(serialize = "sir-line-points")]
    SirLinePoints,
}

impl DatasetId {
    /// Returns the registry definition for this dataset.
    ///
    /// # Panics
    ///
    /// Panics if the embedded registry has no entry for this id, which the
    /// registry tests rule out.
    #[must_use]
    pub fn definition(self) -> &'static DatasetDefinition {
        all_datasets()
            .iter()
            .find(|d| d.id == self)
            .unwrap_or_else(|| panic!("Dataset {self} missing from embedded registry"))
    }

    /// Parses a comma-separated list of dataset ids (as used by
    /// `SKIP_DATASETS`), ignoring blank entries.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Unknown`] for an id not in the registry.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, DatasetError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self::from_str(s).map_err(|_| DatasetError::Unknown(s.to_string())))
            .collect()
    }
}

/// Where a dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetSource {
    /// data.ny.gov Socrata API.
    NyOpenData,
    /// data.cityofnewyork.us Socrata API.
    NycOpenData,
    /// GTFS static feed.
    Gtfs,
    /// Anything else (`ArcGIS`, MTA endpoints, hand-curated files).
    Other,
}

/// File format of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DatasetType {
    /// JSON document.
    Json,
    /// `GeoJSON` `FeatureCollection`.
    Geojson,
    /// KML placemarks, consumed through a converted `GeoJSON` file.
    Kml,
    /// Comma-separated values with a header row.
    Csv,
    /// Zipped GTFS feed.
    Gtfs,
}

impl DatasetType {
    /// Extension of the downloaded file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json | Self::Geojson => ".json",
            Self::Kml => ".kml",
            Self::Csv => ".csv",
            Self::Gtfs => ".zip",
        }
    }

    /// Extension of the file the loader reads.
    #[must_use]
    pub const fn load_extension(self) -> &'static str {
        match self {
            Self::Kml => ".geojson",
            other => other.extension(),
        }
    }

    /// Whether the loaded file is a `GeoJSON` document.
    #[must_use]
    pub const fn is_geojson(self) -> bool {
        matches!(self, Self::Geojson | Self::Kml)
    }
}

/// A dataset registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Dataset identifier.
    pub id: DatasetId,
    /// Upstream location, absent for hand-made files.
    #[serde(default)]
    pub url: Option<String>,
    /// Upstream provider.
    pub source: DatasetSource,
    /// File format.
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    /// Whether the file is placed by hand instead of downloaded.
    #[serde(default)]
    pub manual: bool,
}

impl DatasetDefinition {
    /// File name the loader reads (`<id><ext>`).
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}{}", self.id, self.dataset_type.load_extension())
    }

    /// Full path of the loaded file inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

#[derive(Deserialize)]
struct Registry {
    dataset: Vec<DatasetDefinition>,
}

/// Returns every registered dataset. The embedded TOML is parsed on first
/// use.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn all_datasets() -> &'static [DatasetDefinition] {
    &REGISTRY
}
