//! Nearest-N point searches against a target geometry.
//!
//! Candidates are filtered by distance first, then sorted ascending with
//! a stable sort, so candidates at equal distance keep their input order.

use geo::{Geometry, Point};

use crate::distance::{boundary_distance_meters, centroid, distance_meters};
use crate::feature::Feature;

/// Anything with a single lon/lat location.
pub trait Located {
    /// The location of this item.
    fn location(&self) -> Point<f64>;
}

impl Located for Point<f64> {
    fn location(&self) -> Point<f64> {
        *self
    }
}

impl<P> Located for Feature<Point<f64>, P> {
    fn location(&self) -> Point<f64> {
        self.geometry
    }
}

/// A search hit: the candidate and the distance it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a, T> {
    /// The matched candidate.
    pub item: &'a T,
    /// Sort key in meters.
    pub distance_meters: f64,
}

/// Finds up to `n` candidates nearest to the centroid of `target`.
///
/// Candidates farther than `max_distance_meters` from the centroid are
/// discarded before sorting. Returns fewer than `n` hits (possibly none)
/// when not enough candidates are in range. Pass [`f64::INFINITY`] for an
/// unbounded search.
pub fn find_nearest_n<'a, T, I>(
    n: usize,
    candidates: I,
    target: &Geometry<f64>,
    max_distance_meters: f64,
) -> Vec<Nearest<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let Some(center) = centroid(target) else {
        log::warn!("Nearest-N search against an empty geometry, no candidates returned");
        return Vec::new();
    };

    let hits = candidates
        .into_iter()
        .filter_map(|item| {
            let distance = distance_meters(center, item.location());
            (distance <= max_distance_meters).then_some(Nearest {
                item,
                distance_meters: distance,
            })
        })
        .collect();

    take_nearest(n, hits)
}

/// Boundary-aware variant of [`find_nearest_n`].
///
/// A candidate passes if it is within `max_centroid_meters` of the target's
/// centroid **or** within `max_boundary_meters` of any of the target's
/// polygon rings. Hits are ranked by the smaller of the two distances.
/// For targets without rings (points) only the centroid filter applies.
pub fn find_nearest_n_with_boundary<'a, T, I>(
    n: usize,
    candidates: I,
    target: &Geometry<f64>,
    max_centroid_meters: f64,
    max_boundary_meters: f64,
) -> Vec<Nearest<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let Some(center) = centroid(target) else {
        log::warn!("Nearest-N search against an empty geometry, no candidates returned");
        return Vec::new();
    };

    let hits = candidates
        .into_iter()
        .filter_map(|item| {
            let location = item.location();
            let to_center = distance_meters(center, location);
            let to_boundary =
                boundary_distance_meters(location, target).unwrap_or(f64::INFINITY);

            (to_center <= max_centroid_meters || to_boundary <= max_boundary_meters).then_some(
                Nearest {
                    item,
                    distance_meters: to_center.min(to_boundary),
                },
            )
        })
        .collect();

    take_nearest(n, hits)
}

fn take_nearest<T>(n: usize, mut hits: Vec<Nearest<'_, T>>) -> Vec<Nearest<'_, T>> {
    hits.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    hits.truncate(n);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};

    /// Points due north of the origin, spaced roughly 111m apart.
    fn ladder() -> Vec<Point<f64>> {
        vec![
            Point::new(-74.0, 40.003),
            Point::new(-74.0, 40.001),
            Point::new(-74.0, 40.004),
            Point::new(-74.0, 40.002),
        ]
    }

    fn origin() -> Geometry<f64> {
        Geometry::Point(Point::new(-74.0, 40.0))
    }

    #[test]
    fn returns_nearest_sorted_ascending() {
        let points = ladder();
        let hits = find_nearest_n(2, &points, &origin(), f64::INFINITY);
        let lats: Vec<f64> = hits.iter().map(|h| h.item.y()).collect();
        assert_eq!(lats, vec![40.001, 40.002]);
        assert!(hits[0].distance_meters <= hits[1].distance_meters);
    }

    #[test]
    fn filters_by_max_distance_before_taking_n() {
        let points = ladder();
        let hits = find_nearest_n(10, &points, &origin(), 250.0);
        assert_eq!(hits.len(), 2, "only two points are within 250m");
        assert!(hits.iter().all(|h| h.distance_meters <= 250.0));
    }

    #[test]
    fn empty_when_nothing_in_range() {
        let points = ladder();
        assert!(find_nearest_n(3, &points, &origin(), 50.0).is_empty());
    }

    #[test]
    fn zero_n_returns_nothing() {
        let points = ladder();
        assert!(find_nearest_n(0, &points, &origin(), f64::INFINITY).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        // Equidistant east and west of the origin.
        let points = vec![Point::new(-73.999, 40.0), Point::new(-74.001, 40.0)];
        let hits = find_nearest_n(2, &points, &origin(), f64::INFINITY);
        assert_eq!(hits[0].item.x(), -73.999);
        assert_eq!(hits[1].item.x(), -74.001);
    }

    #[test]
    fn searches_from_polygon_centroid() {
        let square = Geometry::Polygon(polygon![
            (x: -74.01, y: 40.0),
            (x: -73.99, y: 40.0),
            (x: -73.99, y: 40.02),
            (x: -74.01, y: 40.02),
            (x: -74.01, y: 40.0),
        ]);
        let points = vec![Point::new(-74.0, 40.03), Point::new(-74.0, 40.0101)];
        let hits = find_nearest_n(1, &points, &square, f64::INFINITY);
        assert_eq!(hits[0].item.y(), 40.0101);
    }

    #[test]
    fn boundary_filter_admits_points_near_edge_of_large_polygon() {
        // A long, thin polygon whose centroid is far from its eastern tip.
        let strip = Geometry::MultiPolygon(MultiPolygon(vec![polygon![
            (x: -74.10, y: 40.0),
            (x: -73.90, y: 40.0),
            (x: -73.90, y: 40.001),
            (x: -74.10, y: 40.001),
            (x: -74.10, y: 40.0),
        ]]));
        let near_tip = Point::new(-73.899, 40.0005);
        let points = vec![near_tip];

        assert!(find_nearest_n(1, &points, &strip, 500.0).is_empty());

        let hits = find_nearest_n_with_boundary(1, &points, &strip, 500.0, 500.0);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance_meters < 150.0);
    }

    #[test]
    fn boundary_variant_ranks_by_smaller_distance() {
        let strip = Geometry::Polygon(polygon![
            (x: -74.10, y: 40.0),
            (x: -73.90, y: 40.0),
            (x: -73.90, y: 40.001),
            (x: -74.10, y: 40.001),
            (x: -74.10, y: 40.0),
        ]);
        let near_center = Point::new(-74.0, 40.003);
        let near_tip = Point::new(-73.8995, 40.0005);
        let points = vec![near_center, near_tip];

        let hits = find_nearest_n_with_boundary(2, &points, &strip, 1000.0, 1000.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item, &near_tip, "tip is ~40m from the boundary");
    }
}
