//! Per-unit elevator and escalator statistics over a trailing window.

use std::collections::BTreeMap;

use subway_access_dataset_models::{
    AggregateStats, EquipmentAvailabilityRecord, EquipmentInfo, EquipmentSummary,
};

use crate::month::{month_window, parse_month};
use crate::{AvailabilityError, ratio};

#[derive(Default)]
struct Totals {
    total_outages: u64,
    scheduled_outages: u64,
    unscheduled_outages: u64,
    entrapments: u64,
    am_available: f64,
    am_total: f64,
    pm_available: f64,
    pm_total: f64,
    day_available: f64,
    day_total: f64,
    data_missing: bool,
}

impl Totals {
    fn add(&mut self, record: &EquipmentAvailabilityRecord) {
        let count = |v: Option<u32>| u64::from(v.unwrap_or_default());
        let hours = |v: Option<f64>| v.unwrap_or_default();

        self.total_outages += count(record.total_outages);
        self.scheduled_outages += count(record.scheduled_outages);
        self.unscheduled_outages += count(record.unscheduled_outages);
        self.entrapments += count(record.entrapments);
        self.am_available += hours(record.am_peak_hours_available);
        self.am_total += hours(record.am_peak_total_hours);
        self.pm_available += hours(record.pm_peak_hours_available);
        self.pm_total += hours(record.pm_peak_total_hours);
        self.day_available += hours(record.day_hours_available);
        self.day_total += hours(record.day_total_hours);
        self.data_missing |= record.has_missing_fields();
    }

    fn into_stats(self) -> AggregateStats {
        AggregateStats {
            total_outages: self.total_outages,
            scheduled_outages: self.scheduled_outages,
            unscheduled_outages: self.unscheduled_outages,
            entrapments: self.entrapments,
            am_peak_availability: ratio(self.am_available, self.am_total),
            pm_peak_availability: ratio(self.pm_available, self.pm_total),
            day_availability: ratio(self.day_available, self.day_total),
            data_missing: self.data_missing,
        }
    }
}

/// Aggregates availability rows per equipment code over the months after
/// the cutoff `anchor_month - (months - 1)`, up to and including
/// `anchor_month`. Rows dated exactly at the cutoff are excluded.
///
/// Every code in `records` gets an entry, including codes with no rows in
/// the window (all-zero stats, `data_missing` false). Blank numeric fields
/// count as zero and set `data_missing`. Rows with an unparseable month are
/// logged and excluded from the sums.
///
/// # Errors
///
/// Returns [`AvailabilityError`] if `anchor_month` is not a valid month or
/// `months` is zero.
pub fn aggregate_equipment(
    records: &[EquipmentAvailabilityRecord],
    anchor_month: &str,
    months: u32,
) -> Result<BTreeMap<String, AggregateStats>, AvailabilityError> {
    let (cutoff, end) = month_window(parse_month(anchor_month)?, months)?;
    log::debug!("Aggregating equipment availability after {cutoff} through {end}");

    let mut totals: BTreeMap<&str, Totals> = BTreeMap::new();
    let mut in_window = 0_usize;
    for record in records {
        let entry = totals.entry(record.equipment_code.as_str()).or_default();
        match parse_month(&record.month) {
            Ok(month) if month > cutoff && month <= end => {
                entry.add(record);
                in_window += 1;
            }
            Ok(_) => {}
            Err(e) => log::warn!("Skipping {} row: {e}", record.equipment_code),
        }
    }

    log::info!(
        "Aggregated {in_window} of {} availability rows for {} units",
        records.len(),
        totals.len()
    );
    Ok(totals
        .into_iter()
        .map(|(code, totals)| (code.to_string(), totals.into_stats()))
        .collect())
}

/// Trims the equipment inventory and attaches each unit's stats.
///
/// Units without stats are logged and written without a `stats` field.
#[must_use]
pub fn summarize_equipment(
    info: Vec<EquipmentInfo>,
    stats: &BTreeMap<String, AggregateStats>,
) -> Vec<EquipmentSummary> {
    info.into_iter()
        .map(|unit| {
            let unit_stats = stats.get(&unit.equipmentno).cloned();
            if unit_stats.is_none() {
                log::warn!("No equipment stats found for {}", unit.equipmentno);
            }
            EquipmentSummary::new(unit, unit_stats)
        })
        .collect()
}
