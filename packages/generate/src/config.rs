//! Pipeline parameters.
//!
//! Defaults mirror `pipeline.toml` at the crate root. A config file only
//! needs the keys it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use subway_access_neighborhood::ScoringParams;

use crate::GenerateError;

/// Parameters of the stations group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationsConfig {
    /// Maximum project-to-station distance.
    pub project_max_distance_meters: f64,
    /// Label attached to every ridership figure.
    pub ridership_month: String,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            project_max_distance_meters: 200.0,
            ridership_month: "September, 2024".to_string(),
        }
    }
}

/// Parameters of neighborhood scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodsConfig {
    /// Stations sampled per neighborhood.
    pub sample_size: usize,
    /// Top-up radius around the centroid.
    pub fallback_distance_meters: f64,
    /// Optional top-up radius around the boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_distance_meters: Option<f64>,
}

impl Default for NeighborhoodsConfig {
    fn default() -> Self {
        let params = ScoringParams::default();
        Self {
            sample_size: params.sample_size,
            fallback_distance_meters: params.fallback_distance_meters,
            boundary_distance_meters: params.boundary_distance_meters,
        }
    }
}

impl NeighborhoodsConfig {
    /// The scoring parameters these settings describe.
    #[must_use]
    pub const fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            sample_size: self.sample_size,
            fallback_distance_meters: self.fallback_distance_meters,
            boundary_distance_meters: self.boundary_distance_meters,
        }
    }
}

/// Parameters of the equipment availability rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    /// Last month of the window.
    pub anchor_month: String,
    /// Window length in calendar months.
    pub window_months: u32,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            anchor_month: "2024-09-01T00:00:00.000".to_string(),
            window_months: 6,
        }
    }
}

/// Parameters of the borough platform rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Window length in months, ending at the latest month with data.
    pub window_months: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { window_months: 6 }
    }
}

/// Every tunable of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Station and project settings.
    pub stations: StationsConfig,
    /// Neighborhood scoring settings.
    pub neighborhoods: NeighborhoodsConfig,
    /// Equipment rollup settings.
    pub equipment: EquipmentConfig,
    /// Platform rollup settings.
    pub platform: PlatformConfig,
}

impl PipelineConfig {
    /// Parses a TOML config.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if the TOML is malformed.
    pub fn from_toml_str(raw: &str) -> Result<Self, GenerateError> {
        toml::from_str(raw).map_err(|e| GenerateError::Config(e.to_string()))
    }

    /// Reads the config at `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, GenerateError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::info!("Loading pipeline config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
