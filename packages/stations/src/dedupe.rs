//! Merging of station records that share a location.
//!
//! The upstream export has one record per platform, so complexes with
//! several platforms at the same point appear several times. Records are
//! duplicates only when their coordinates are exactly equal. The first
//! record at a location is kept, and every property that differs on a
//! later duplicate is appended to it as a comma-separated list.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use subway_access_dataset_models::{StationFeature, StationProperties};

use crate::StationError;

/// Exact-equality key for a coordinate pair. Adding `0.0` folds `-0.0`
/// into `0.0`, which compare equal as floats.
fn coordinate_key(x: f64, y: f64) -> (u64, u64) {
    let bits = |v: f64| (v + 0.0).to_bits();
    (bits(x), bits(y))
}

/// Collapses stations at identical coordinates into one record each.
///
/// Output keeps the order in which each location was first seen.
///
/// # Errors
///
/// Returns [`StationError::Merge`] if merged properties no longer fit the
/// station record type.
pub fn dedupe_stations(stations: Vec<StationFeature>) -> Result<Vec<StationFeature>, StationError> {
    let input_count = stations.len();
    let mut canonical: Vec<(StationFeature, Map<String, Value>)> = Vec::new();
    let mut by_location: BTreeMap<(u64, u64), usize> = BTreeMap::new();
    let mut merged = BTreeSet::new();

    for station in stations {
        let key = coordinate_key(station.geometry.x(), station.geometry.y());
        if let Some(&index) = by_location.get(&key) {
            let (kept, properties) = &mut canonical[index];
            log::debug!(
                "Merging duplicate station at {:?} into {}",
                key,
                kept.properties.stop_name
            );
            merge_properties(properties, properties_map(&station.properties)?);
            merged.insert(index);
        } else {
            by_location.insert(key, canonical.len());
            let properties = properties_map(&station.properties)?;
            canonical.push((station, properties));
        }
    }

    let deduped = canonical
        .into_iter()
        .enumerate()
        .map(|(index, (feature, properties))| {
            if !merged.contains(&index) {
                return Ok(feature);
            }
            let stop_name = feature.properties.stop_name.clone();
            let retyped: StationProperties = serde_json::from_value(Value::Object(properties))
                .map_err(|source| StationError::Merge { stop_name, source })?;
            Ok(feature.with_properties(retyped))
        })
        .collect::<Result<Vec<_>, StationError>>()?;

    log::info!(
        "Deduplicated {input_count} stations into {} locations",
        deduped.len()
    );
    Ok(deduped)
}

fn properties_map(properties: &StationProperties) -> Result<Map<String, Value>, StationError> {
    match serde_json::to_value(properties)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Folds `duplicate` into `canonical`.
///
/// Keys missing (or null) on the canonical record take the duplicate's
/// value. Differing values are appended after a comma unless the
/// duplicate's value is already one of the listed values.
fn merge_properties(canonical: &mut Map<String, Value>, duplicate: Map<String, Value>) {
    for (key, value) in duplicate {
        match canonical.get_mut(&key) {
            None => {
                canonical.insert(key, value);
            }
            Some(existing) if existing.is_null() => *existing = value,
            Some(existing) if *existing == value => {}
            Some(existing) => {
                let current = display_value(existing);
                let incoming = display_value(&value);
                if !current.split(',').any(|part| part == incoming) {
                    *existing = Value::String(format!("{current},{incoming}"));
                }
            }
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use subway_access_spatial::Feature;

    fn station(x: f64, y: f64, id: &str, routes: &str, south: &str) -> StationFeature {
        Feature::new(
            Point::new(x, y),
            StationProperties {
                station_id: id.to_string(),
                complex_id: "611".to_string(),
                stop_name: "Times Sq-42 St".to_string(),
                daytime_routes: routes.to_string(),
                ada_northbound: "1".to_string(),
                ada_southbound: south.to_string(),
                extra: Map::new(),
            },
        )
    }

    #[test]
    fn distinct_locations_pass_through() {
        let stations = vec![
            station(-73.98, 40.75, "1", "1 2 3", "1"),
            station(-73.99, 40.75, "2", "7", "1"),
        ];
        let deduped = dedupe_stations(stations.clone()).unwrap();
        assert_eq!(deduped, stations);
    }

    #[test]
    fn duplicates_concatenate_differing_values() {
        let deduped = dedupe_stations(vec![
            station(-73.98, 40.75, "1", "1 2 3", "1"),
            station(-73.98, 40.75, "2", "N Q R W", "1"),
        ])
        .unwrap();

        assert_eq!(deduped.len(), 1);
        let props = &deduped[0].properties;
        assert_eq!(props.station_id, "1,2");
        assert_eq!(props.daytime_routes, "1 2 3,N Q R W");
        assert_eq!(props.complex_id, "611", "equal values stay unchanged");
        assert_eq!(props.ada_southbound, "1");
    }

    #[test]
    fn values_accumulate_in_encounter_order_without_repeats() {
        let deduped = dedupe_stations(vec![
            station(-73.98, 40.75, "1", "A", "1"),
            station(-73.98, 40.75, "2", "B", "1"),
            station(-73.98, 40.75, "3", "A", "1"),
            station(-73.98, 40.75, "4", "C", "0"),
        ])
        .unwrap();

        let props = &deduped[0].properties;
        assert_eq!(props.station_id, "1,2,3,4");
        assert_eq!(props.daytime_routes, "A,B,C");
        assert_eq!(props.ada_southbound, "1,0");
        assert!(!props.is_southbound_accessible());
    }

    #[test]
    fn near_but_unequal_coordinates_are_not_merged() {
        let deduped = dedupe_stations(vec![
            station(-73.98, 40.75, "1", "A", "1"),
            station(-73.980_000_000_1, 40.75, "2", "A", "1"),
        ])
        .unwrap();
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn missing_keys_adopt_duplicate_value() {
        let mut first = station(-73.98, 40.75, "1", "A", "1");
        let mut second = station(-73.98, 40.75, "1", "A", "1");
        first.properties.extra.insert("borough".into(), Value::Null);
        second.properties.extra.insert("borough".into(), "M".into());
        second.properties.extra.insert("structure".into(), "Subway".into());

        let deduped = dedupe_stations(vec![first, second]).unwrap();
        let extra = &deduped[0].properties.extra;
        assert_eq!(extra["borough"], "M");
        assert_eq!(extra["structure"], "Subway");
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let deduped = dedupe_stations(vec![
            station(1.0, 1.0, "a", "", "0"),
            station(2.0, 2.0, "b", "", "0"),
            station(1.0, 1.0, "c", "", "0"),
            station(3.0, 3.0, "d", "", "0"),
        ])
        .unwrap();
        let ids: Vec<_> = deduped.iter().map(|s| s.properties.station_id.as_str()).collect();
        assert_eq!(ids, vec!["a,c", "b", "d"]);
    }
}
