#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Availability aggregation.
//!
//! Rolls monthly elevator/escalator rows into per-unit statistics over a
//! trailing window, rolls platform rows into per-borough availability, and
//! attaches the results to the equipment inventory and borough boundaries.
//!
//! All ratios resolve to `0` when their denominator is zero so no `NaN`
//! reaches an artifact.

pub mod borough;
pub mod equipment;
pub mod month;
pub mod platform;

pub use borough::{MISSING_AVAILABILITY, borough_centers, enrich_boroughs};
pub use equipment::{aggregate_equipment, summarize_equipment};
pub use month::{month_window, parse_month};
pub use platform::platform_availability_by_borough;

use thiserror::Error;

/// Errors that can occur while aggregating availability data.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// A month value is not in a recognized format.
    #[error("Invalid month {value:?}: expected YYYY-MM, YYYY-MM-DD or an ISO datetime")]
    InvalidMonth {
        /// The rejected value.
        value: String,
    },

    /// A window of zero months was requested.
    #[error("Aggregation window must cover at least one month")]
    EmptyWindow,
}

/// `numerator / denominator`, or `0` when the denominator is zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
