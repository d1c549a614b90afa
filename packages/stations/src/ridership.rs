//! Ridership merge.

use std::collections::BTreeMap;

use subway_access_dataset_models::RidershipRecord;

use crate::{LabeledStation, StationRidership};

/// Attaches last-full-month ridership to each station by complex id.
///
/// When several rows share a complex id the first one wins. Stations with
/// no matching row are logged and left without ridership; stations without
/// a complex id are skipped silently.
#[must_use]
pub fn merge_ridership(
    stations: Vec<LabeledStation>,
    rows: &[RidershipRecord],
    month_label: &str,
) -> Vec<LabeledStation> {
    let mut by_complex: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        by_complex
            .entry(row.station_complex_id.as_str())
            .or_insert(row.ridership);
    }

    stations
        .into_iter()
        .map(|mut station| {
            let complex_id = station.properties().complex_id.as_str();
            if complex_id.is_empty() {
                return station;
            }
            match by_complex.get(complex_id) {
                Some(&riders) => {
                    station.ridership = Some(StationRidership {
                        month: month_label.to_string(),
                        last_full_month: riders,
                    });
                }
                None => log::warn!(
                    "No ridership data found for station: {}",
                    station.properties().stop_name
                ),
            }
            station
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::tests::station_at;

    fn ridership(id: &str, riders: f64) -> RidershipRecord {
        RidershipRecord {
            station_complex_id: id.to_string(),
            ridership: riders,
        }
    }

    #[test]
    fn joins_on_complex_id() {
        let stations = vec![
            LabeledStation::label(station_at(0.0, 0.0, "611", "1", "1")),
            LabeledStation::label(station_at(1.0, 1.0, "612", "1", "1")),
        ];
        let rows = [ridership("612", 900.0), ridership("611", 1_000.0), ridership("611", 5.0)];

        let merged = merge_ridership(stations, &rows, "September, 2024");
        let first = merged[0].ridership.as_ref().unwrap();
        assert_eq!(first.month, "September, 2024");
        assert!((first.last_full_month - 1_000.0).abs() < f64::EPSILON);
        assert!((merged[1].ridership.as_ref().unwrap().last_full_month - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_row_leaves_station_unenriched() {
        let stations = vec![LabeledStation::label(station_at(0.0, 0.0, "999", "0", "0"))];
        let merged = merge_ridership(stations, &[ridership("1", 1.0)], "September, 2024");
        assert!(merged[0].ridership.is_none());
    }
}
