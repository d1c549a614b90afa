//! Elevator and escalator records: monthly availability rows, static
//! equipment info, and the aggregated statistics attached to each unit.

use serde::{Deserialize, Serialize};

use crate::ExtraProperties;

/// One month of availability for one elevator or escalator.
///
/// Numeric columns may be blank in the upstream CSV; blanks deserialize
/// to `None` and are reported through [`AggregateStats::data_missing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentAvailabilityRecord {
    /// Month timestamp (`YYYY-MM`, `YYYY-MM-DD` or Socrata ISO datetime).
    pub month: String,
    /// Unique equipment unit code.
    pub equipment_code: String,
    /// Borough of the station.
    #[serde(default)]
    pub borough: Option<String>,
    /// `EL` or `ES`.
    #[serde(default)]
    pub equipment_type: Option<String>,
    /// Total outages in the month.
    #[serde(default)]
    pub total_outages: Option<u32>,
    /// Planned outages.
    #[serde(default)]
    pub scheduled_outages: Option<u32>,
    /// Unplanned outages.
    #[serde(default)]
    pub unscheduled_outages: Option<u32>,
    /// Entrapment incidents.
    #[serde(default)]
    pub entrapments: Option<u32>,
    /// AM peak hours the unit was available.
    #[serde(default)]
    pub am_peak_hours_available: Option<f64>,
    /// AM peak hours in the month.
    #[serde(default)]
    pub am_peak_total_hours: Option<f64>,
    /// PM peak hours the unit was available.
    #[serde(default)]
    pub pm_peak_hours_available: Option<f64>,
    /// PM peak hours in the month.
    #[serde(default)]
    pub pm_peak_total_hours: Option<f64>,
    /// Hours available around the clock.
    #[serde(rename = "_24_hour_hours_available", default)]
    pub day_hours_available: Option<f64>,
    /// Hours in the month.
    #[serde(rename = "_24_hour_total_hours", default)]
    pub day_total_hours: Option<f64>,
    /// Station name.
    #[serde(default)]
    pub station_name: Option<String>,
}

impl EquipmentAvailabilityRecord {
    /// Whether any of the fields the availability report requires is blank.
    #[must_use]
    pub const fn has_missing_fields(&self) -> bool {
        self.total_outages.is_none()
            || self.scheduled_outages.is_none()
            || self.unscheduled_outages.is_none()
            || self.entrapments.is_none()
            || self.am_peak_hours_available.is_none()
            || self.am_peak_total_hours.is_none()
            || self.pm_peak_hours_available.is_none()
    }
}

/// Trailing-window rollup for one equipment unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Sum of total outages.
    pub total_outages: u64,
    /// Sum of scheduled outages.
    pub scheduled_outages: u64,
    /// Sum of unscheduled outages.
    pub unscheduled_outages: u64,
    /// Sum of entrapments.
    pub entrapments: u64,
    /// Available / total AM peak hours, 0 when no hours were recorded.
    pub am_peak_availability: f64,
    /// Available / total PM peak hours, 0 when no hours were recorded.
    pub pm_peak_availability: f64,
    /// Available / total hours, 0 when no hours were recorded.
    #[serde(rename = "_24_hour_availability")]
    pub day_availability: f64,
    /// Set when any contributing row had a blank required field.
    #[serde(rename = "dataMissing")]
    pub data_missing: bool,
}

/// Elevator or escalator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum EquipmentType {
    /// Elevator.
    #[serde(rename = "EL")]
    #[strum(serialize = "EL")]
    Elevator,
    /// Escalator.
    #[serde(rename = "ES")]
    #[strum(serialize = "ES")]
    Escalator,
}

/// Upstream `Y`/`N` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum YesNo {
    /// Yes.
    Y,
    /// No.
    N,
}

/// Static information about an elevator or escalator
/// (`mta-elevators-and-escalators`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentInfo {
    /// Station name.
    pub station: String,
    /// Train lines at the station.
    pub trainno: String,
    /// Equipment unit code, the availability join key.
    pub equipmentno: String,
    /// Elevator or escalator.
    pub equipmenttype: EquipmentType,
    /// What the unit connects.
    pub serving: String,
    /// Whether the unit is part of the ADA accessible route.
    #[serde(rename = "ADA")]
    pub ada: YesNo,
    /// Whether the unit is in service.
    pub isactive: YesNo,
    /// Short description.
    pub shortdescription: String,
    /// Lines served by the unit.
    pub linesservedbyelevator: String,
    /// Station complex id.
    pub stationcomplexid: String,
    /// Remaining upstream fields.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

/// The trimmed equipment record written for the explorer, with stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    /// Station name.
    pub station: String,
    /// Station complex id.
    pub stationcomplexid: String,
    /// Equipment unit code.
    pub equipmentno: String,
    /// Elevator or escalator.
    pub equipmenttype: EquipmentType,
    /// ADA route flag.
    #[serde(rename = "ADA")]
    pub ada: YesNo,
    /// In-service flag.
    pub isactive: YesNo,
    /// Short description.
    pub shortdescription: String,
    /// Train lines at the station.
    pub trainno: String,
    /// Lines served by the unit.
    pub linesservedbyelevator: String,
    /// What the unit connects.
    pub serving: String,
    /// Aggregated availability, absent when the unit has no rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AggregateStats>,
}

impl EquipmentSummary {
    /// Trims an info record and attaches its stats.
    #[must_use]
    pub fn new(info: EquipmentInfo, stats: Option<AggregateStats>) -> Self {
        Self {
            station: info.station,
            stationcomplexid: info.stationcomplexid,
            equipmentno: info.equipmentno,
            equipmenttype: info.equipmenttype,
            ada: info.ada,
            isactive: info.isactive,
            shortdescription: info.shortdescription,
            trainno: info.trainno,
            linesservedbyelevator: info.linesservedbyelevator,
            serving: info.serving,
            stats,
        }
    }
}
