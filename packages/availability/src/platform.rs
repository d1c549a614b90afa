//! Borough platform availability over the trailing months of data.

use std::collections::BTreeMap;

use subway_access_dataset_models::PlatformAvailabilityRecord;

use crate::month::{month_window, parse_month};
use crate::{AvailabilityError, ratio};

/// Computes per-borough availability over the `months` calendar months
/// ending at the latest month present in `records`.
///
/// Availability is in-service minutes over available minutes, summed per
/// borough (`0` if no minutes were available). Boroughs without rows in
/// the window are absent from the result. Rows with an unparseable month
/// are logged and ignored.
///
/// # Errors
///
/// Returns [`AvailabilityError::EmptyWindow`] if `months` is zero.
pub fn platform_availability_by_borough(
    records: &[PlatformAvailabilityRecord],
    months: u32,
) -> Result<BTreeMap<String, f64>, AvailabilityError> {
    let dated: Vec<_> = records
        .iter()
        .filter_map(|record| match parse_month(&record.month) {
            Ok(month) => Some((month, record)),
            Err(e) => {
                log::warn!("Skipping platform row for {}: {e}", record.borough);
                None
            }
        })
        .collect();

    let Some(latest) = dated.iter().map(|(month, _)| *month).max() else {
        log::warn!("No platform availability rows with a valid month");
        return Ok(BTreeMap::new());
    };
    let (start, end) = month_window(latest, months)?;
    log::info!("Latest month with platform availability data: {latest}");

    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for (month, record) in &dated {
        if !(start..=end).contains(month) {
            continue;
        }
        let (available, in_service) = totals.entry(record.borough.as_str()).or_default();
        *available += record.minutes_platforms_available;
        *in_service += record.minutes_platforms_in_service;
    }

    Ok(totals
        .into_iter()
        .map(|(borough, (available, in_service))| {
            (borough.to_string(), ratio(in_service, available))
        })
        .collect())
}
