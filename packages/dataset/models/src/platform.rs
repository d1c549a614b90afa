//! Station platform availability rows (`station-platform-availability`).

use serde::{Deserialize, Serialize};

/// Monthly platform availability for one borough.
///
/// The upstream JSON carries the minute counts as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformAvailabilityRecord {
    /// Month timestamp.
    pub month: String,
    /// Borough name, matching the borough boundaries' `boroname`.
    pub borough: String,
    /// Platform minutes available.
    #[serde(deserialize_with = "crate::de::number_from_string")]
    pub minutes_platforms_available: f64,
    /// Platform minutes in service.
    #[serde(deserialize_with = "crate::de::number_from_string")]
    pub minutes_platforms_in_service: f64,
}
