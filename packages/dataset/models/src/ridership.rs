//! Station complex ridership for the last full month.

use serde::{Deserialize, Serialize};

/// Ridership for one station complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidershipRecord {
    /// Station complex id, matching stations' `complex_id`.
    pub station_complex_id: String,
    /// Total ridership over the month.
    #[serde(deserialize_with = "crate::de::number_from_string")]
    pub ridership: f64,
}
