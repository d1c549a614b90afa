//! Two-pass neighborhood accessibility scoring.
//!
//! Pass 1 scores every neighborhood from a local sample of stations and
//! records a per-capita metric keyed by NTA code. Pass 2 rescales those
//! metrics by their global minimum and maximum. The passes share nothing
//! but the explicit map returned by the first.

use std::collections::{BTreeMap, BTreeSet};

use geo::{Geometry, MultiPolygon, Point};
use serde::Serialize;
use subway_access_dataset_models::NeighborhoodProperties;
use subway_access_spatial::{
    Feature, Located, PointIndex, SpatialError, find_nearest_n, find_nearest_n_with_boundary,
    to_feature_collection,
};
use subway_access_stations::LabeledStation;

use crate::NormalizedNeighborhood;

/// Population unit of the per-capita metric.
const PER_CAPITA_UNIT: f64 = 10_000.0;

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Target number of stations per neighborhood.
    pub sample_size: usize,
    /// Radius around the centroid used to top up a short sample.
    pub fallback_distance_meters: f64,
    /// When set, top-up candidates within this distance of the boundary
    /// also qualify.
    pub boundary_distance_meters: Option<f64>,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            sample_size: 5,
            fallback_distance_meters: 1600.0,
            boundary_distance_meters: None,
        }
    }
}

/// Pass-1 result for one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleScore {
    /// Stations in the sample.
    pub num_nearest_stations: usize,
    /// Accessible stations in the sample.
    pub num_accessible_stations: usize,
    /// `accessible / sample`, 0 for an empty sample.
    pub accessible_station_score: f64,
}

/// Final scores for one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborhoodScore {
    /// Stations in the sample.
    pub num_nearest_stations: usize,
    /// Accessible stations in the sample.
    pub num_accessible_stations: usize,
    /// `accessible / sample`, 0 for an empty sample.
    pub accessible_station_score: f64,
    /// Min-max rescaled accessible stations per 10,000 residents.
    pub accessible_station_score_by_pop: f64,
}

/// Neighborhood properties as written to the neighborhoods artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNeighborhoodProperties {
    /// Boundary and census properties, flattened.
    #[serde(flatten)]
    pub neighborhood: NeighborhoodProperties,
    /// Scores, flattened.
    #[serde(flatten)]
    pub score: NeighborhoodScore,
}

/// A scored neighborhood feature.
pub type ScoredNeighborhood = Feature<MultiPolygon<f64>, ScoredNeighborhoodProperties>;

/// A station position tagged with its index in the station slice.
struct Candidate {
    index: usize,
    location: Point<f64>,
}

impl Located for Candidate {
    fn location(&self) -> Point<f64> {
        self.location
    }
}

/// Picks the stations a neighborhood is scored on.
///
/// Stations inside the boundary come first. If there are more than
/// `sample_size`, the ones nearest the centroid are kept. If there are
/// fewer, the sample is topped up with the nearest outside stations
/// within the fallback radius (or near the boundary, when configured).
/// Returns indices into `stations`.
#[must_use]
pub fn sample_stations(
    area: &MultiPolygon<f64>,
    stations: &[LabeledStation],
    index: &PointIndex,
    params: &ScoringParams,
) -> Vec<usize> {
    let n = params.sample_size;
    let inside = index.within(area);
    if inside.len() == n {
        return inside;
    }

    let target = Geometry::MultiPolygon(area.clone());
    let candidate = |i: usize| Candidate {
        index: i,
        location: stations[i].location(),
    };

    if inside.len() > n {
        let pool: Vec<Candidate> = inside.iter().copied().map(candidate).collect();
        return find_nearest_n(n, &pool, &target, f64::INFINITY)
            .iter()
            .map(|hit| hit.item.index)
            .collect();
    }

    let inside_set: BTreeSet<usize> = inside.iter().copied().collect();
    let pool: Vec<Candidate> = (0..stations.len())
        .filter(|i| !inside_set.contains(i))
        .map(candidate)
        .collect();
    let remaining = n - inside.len();
    let extra = match params.boundary_distance_meters {
        Some(boundary) => find_nearest_n_with_boundary(
            remaining,
            &pool,
            &target,
            params.fallback_distance_meters,
            boundary,
        ),
        None => find_nearest_n(remaining, &pool, &target, params.fallback_distance_meters),
    };

    let mut sample = inside;
    sample.extend(extra.iter().map(|hit| hit.item.index));
    sample
}

/// Scores a sample.
fn score_sample(sample: &[usize], stations: &[LabeledStation]) -> SampleScore {
    let num_nearest_stations = sample.len();
    let num_accessible_stations = sample
        .iter()
        .filter(|&&i| stations[i].is_accessible())
        .count();
    #[allow(clippy::cast_precision_loss)]
    let accessible_station_score = if num_nearest_stations == 0 {
        0.0
    } else {
        num_accessible_stations as f64 / num_nearest_stations as f64
    };
    SampleScore {
        num_nearest_stations,
        num_accessible_stations,
        accessible_station_score,
    }
}

/// Accessible stations per 10,000 residents, 0 when the population is
/// unknown or not positive.
#[must_use]
pub fn accessible_per_10k(accessible: usize, population: Option<f64>) -> f64 {
    match population {
        #[allow(clippy::cast_precision_loss)]
        Some(pop) if pop > 0.0 => accessible as f64 / (pop / PER_CAPITA_UNIT),
        _ => 0.0,
    }
}

/// Rescales every value to `(v - min) / (max - min)`.
///
/// When all values are equal the range is empty and every value maps to
/// 0. An empty map stays empty.
#[must_use]
pub fn min_max_normalize(raw: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let min = raw.values().copied().fold(f64::INFINITY, f64::min);
    let max = raw.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    raw.iter()
        .map(|(key, &value)| {
            let scaled = if range > 0.0 && range.is_finite() {
                (value - min) / range
            } else {
                0.0
            };
            (key.clone(), scaled)
        })
        .collect()
}

/// Scores every neighborhood against the labeled stations.
#[must_use]
pub fn score_neighborhoods(
    neighborhoods: Vec<NormalizedNeighborhood>,
    stations: &[LabeledStation],
    params: &ScoringParams,
) -> Vec<ScoredNeighborhood> {
    let index = PointIndex::build(stations);

    // Pass 1: local samples and the per-capita metric.
    let mut per_capita: BTreeMap<String, f64> = BTreeMap::new();
    let samples: Vec<SampleScore> = neighborhoods
        .iter()
        .map(|neighborhood| {
            let sample = sample_stations(&neighborhood.geometry, stations, &index, params);
            let score = score_sample(&sample, stations);
            let props = &neighborhood.properties;
            log::debug!(
                "{}: {} of {} sampled stations accessible",
                props.nta2020,
                score.num_accessible_stations,
                score.num_nearest_stations
            );
            per_capita.insert(
                props.nta2020.clone(),
                accessible_per_10k(score.num_accessible_stations, props.population()),
            );
            score
        })
        .collect();

    // Pass 2: global rescale.
    let by_pop = min_max_normalize(&per_capita);

    log::info!("Scored {} neighborhoods", neighborhoods.len());
    neighborhoods
        .into_iter()
        .zip(samples)
        .map(|(neighborhood, sample)| {
            let accessible_station_score_by_pop = by_pop
                .get(&neighborhood.properties.nta2020)
                .copied()
                .unwrap_or_default();
            Feature {
                id: neighborhood.id,
                geometry: neighborhood.geometry,
                properties: ScoredNeighborhoodProperties {
                    neighborhood: neighborhood.properties,
                    score: NeighborhoodScore {
                        num_nearest_stations: sample.num_nearest_stations,
                        num_accessible_stations: sample.num_accessible_stations,
                        accessible_station_score: sample.accessible_station_score,
                        accessible_station_score_by_pop,
                    },
                },
            }
        })
        .collect()
}

/// Builds the neighborhoods artifact.
///
/// # Errors
///
/// Returns [`SpatialError`] if a neighborhood's properties fail to
/// serialize.
pub fn scored_to_collection(
    neighborhoods: &[ScoredNeighborhood],
) -> Result<geojson::FeatureCollection, SpatialError> {
    to_feature_collection(neighborhoods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Polygon, polygon};
    use serde_json::Map;
    use subway_access_dataset_models::StationProperties;

    const LON: f64 = -73.95;
    const LAT: f64 = 40.70;

    fn station(dx: f64, dy: f64, accessible: bool) -> LabeledStation {
        let flag = if accessible { "1" } else { "0" };
        LabeledStation::label(Feature::new(
            Point::new(LON + dx, LAT + dy),
            StationProperties {
                station_id: format!("{dx},{dy}"),
                complex_id: String::new(),
                stop_name: format!("Station {dx},{dy}"),
                daytime_routes: String::new(),
                ada_northbound: flag.to_string(),
                ada_southbound: flag.to_string(),
                extra: Map::new(),
            },
        ))
    }

    /// Square of side `2 * half` degrees centred on (`LON + dx`, `LAT`).
    fn square(dx: f64, half: f64) -> MultiPolygon<f64> {
        let (x, y) = (LON + dx, LAT);
        let exterior: Polygon<f64> = polygon![
            (x: x - half, y: y - half),
            (x: x + half, y: y - half),
            (x: x + half, y: y + half),
            (x: x - half, y: y + half),
            (x: x - half, y: y - half),
        ];
        MultiPolygon::new(vec![exterior])
    }

    fn neighborhood(nta: &str, area: MultiPolygon<f64>, pop: Option<i64>) -> NormalizedNeighborhood {
        let mut extra = Map::new();
        if let Some(pop) = pop {
            extra.insert("Pop1".to_string(), pop.into());
        }
        Feature::new(
            area,
            NeighborhoodProperties {
                nta2020: nta.to_string(),
                extra,
            },
        )
    }

    fn five_inside_three_accessible() -> Vec<LabeledStation> {
        vec![
            station(0.001, 0.001, true),
            station(-0.001, 0.001, true),
            station(0.002, -0.002, true),
            station(-0.003, 0.0, false),
            station(0.0, 0.003, false),
            // Outside but close; must not be used.
            station(0.007, 0.0, true),
        ]
    }

    #[test]
    fn full_sample_inside_uses_only_inside_stations() {
        let stations = five_inside_three_accessible();
        let scored = score_neighborhoods(
            vec![neighborhood("BK01", square(0.0, 0.005), Some(10_000))],
            &stations,
            &ScoringParams::default(),
        );
        let score = scored[0].properties.score;
        assert_eq!(score.num_nearest_stations, 5);
        assert_eq!(score.num_accessible_stations, 3);
        assert!((score.accessible_station_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn short_sample_is_topped_up_from_fallback_radius() {
        let stations = vec![
            station(0.001, 0.0, true),
            station(-0.001, 0.0, false),
            // Outside the square, within 1600 m of its centroid.
            station(0.008, 0.0, true),
            station(-0.008, 0.0, false),
            station(0.0, 0.009, false),
            // Outside and beyond the fallback radius.
            station(0.1, 0.0, true),
        ];
        let scored = score_neighborhoods(
            vec![neighborhood("BK02", square(0.0, 0.005), Some(10_000))],
            &stations,
            &ScoringParams::default(),
        );
        let score = scored[0].properties.score;
        assert_eq!(score.num_nearest_stations, 5);
        assert_eq!(score.num_accessible_stations, 2);
        assert!((score.accessible_station_score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn crowded_neighborhood_keeps_nearest_to_centroid() {
        let mut stations = five_inside_three_accessible();
        stations.push(station(0.004, 0.004, true));
        let index = PointIndex::build(&stations);
        let sample = sample_stations(&square(0.0, 0.005), &stations, &index, &ScoringParams::default());

        assert_eq!(sample.len(), 5);
        assert!(!sample.contains(&6), "corner station is farthest from the centroid");
        assert!(!sample.contains(&5), "outside station is never sampled");
    }

    #[test]
    fn isolated_neighborhood_scores_zero() {
        let stations = five_inside_three_accessible();
        let scored = score_neighborhoods(
            vec![neighborhood("SI99", square(1.0, 0.005), Some(5_000))],
            &stations,
            &ScoringParams::default(),
        );
        let score = scored[0].properties.score;
        assert_eq!(score.num_nearest_stations, 0);
        assert!(score.accessible_station_score.abs() < f64::EPSILON);
        assert!(score.accessible_station_score_by_pop.abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_cap_admits_stations_near_the_edge() {
        // A long thin neighborhood: the far end is well outside the
        // fallback radius of the centroid but right next to the boundary.
        let area = MultiPolygon::new(vec![polygon![
            (x: LON - 0.05, y: LAT - 0.001),
            (x: LON + 0.05, y: LAT - 0.001),
            (x: LON + 0.05, y: LAT + 0.001),
            (x: LON - 0.05, y: LAT + 0.001),
            (x: LON - 0.05, y: LAT - 0.001),
        ]]);
        let stations = vec![station(0.049, 0.002, true)];
        let index = PointIndex::build(&stations);

        let centroid_only = ScoringParams::default();
        assert!(sample_stations(&area, &stations, &index, &centroid_only).is_empty());

        let with_boundary = ScoringParams {
            boundary_distance_meters: Some(400.0),
            ..ScoringParams::default()
        };
        assert_eq!(sample_stations(&area, &stations, &index, &with_boundary), vec![0]);
    }

    #[test]
    fn by_pop_score_is_rescaled_across_neighborhoods() {
        let stations = five_inside_three_accessible();
        let scored = score_neighborhoods(
            vec![
                neighborhood("BK01", square(0.0, 0.005), Some(10_000)),
                neighborhood("SI01", square(1.0, 0.005), Some(20_000)),
                neighborhood("XX01", square(2.0, 0.005), None),
            ],
            &stations,
            &ScoringParams::default(),
        );
        let by_pop: Vec<f64> = scored
            .iter()
            .map(|n| n.properties.score.accessible_station_score_by_pop)
            .collect();
        assert!((by_pop[0] - 1.0).abs() < 1e-12);
        assert!(by_pop[1].abs() < 1e-12);
        assert!(by_pop[2].abs() < 1e-12);
    }

    #[test]
    fn per_capita_guards_population() {
        assert!((accessible_per_10k(3, Some(20_000.0)) - 1.5).abs() < 1e-12);
        assert!(accessible_per_10k(3, Some(0.0)).abs() < f64::EPSILON);
        assert!(accessible_per_10k(3, None).abs() < f64::EPSILON);
    }

    #[test]
    fn min_max_handles_degenerate_ranges() {
        let raw = BTreeMap::from([
            ("a".to_string(), 2.0),
            ("b".to_string(), 4.0),
            ("c".to_string(), 3.0),
        ]);
        let scaled = min_max_normalize(&raw);
        assert!((scaled["a"]).abs() < 1e-12);
        assert!((scaled["b"] - 1.0).abs() < 1e-12);
        assert!((scaled["c"] - 0.5).abs() < 1e-12);

        let flat = BTreeMap::from([("a".to_string(), 1.5), ("b".to_string(), 1.5)]);
        assert!(min_max_normalize(&flat).values().all(|v| *v == 0.0));
        assert!(min_max_normalize(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn artifact_properties_flatten_scores() {
        let stations = five_inside_three_accessible();
        let scored = score_neighborhoods(
            vec![neighborhood("BK01", square(0.0, 0.005), Some(10_000))],
            &stations,
            &ScoringParams::default(),
        );
        let collection = scored_to_collection(&scored).unwrap();
        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props["NTA2020"], "BK01");
        assert_eq!(props["Pop1"], 10_000);
        assert_eq!(props["num_nearest_stations"], 5);
        assert!(props.contains_key("accessible_station_score_by_pop"));
        assert!(matches!(
            collection.features[0].geometry.as_ref().unwrap().value,
            geojson::Value::MultiPolygon(_)
        ));
    }
}
