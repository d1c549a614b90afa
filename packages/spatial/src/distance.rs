//! Geodesic distance helpers.
//!
//! Distances are great-circle (haversine) meters on the mean Earth radius.
//! Boundary distances find the planar closest point on each ring in
//! lon/lat space and measure the haversine distance to it, which is
//! accurate enough at city scale.

use geo::{Closest, ClosestPoint, Coord, CoordsIter, Distance, Geometry, Haversine, LineString, Point};

/// Great-circle distance between two lon/lat points, in meters.
#[must_use]
pub fn distance_meters(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Vertex-mean centroid of any geometry. `None` for empty geometries.
///
/// Polygon rings are closed, so each ring's closing vertex is left out of
/// the mean. This is not the area-weighted centroid; for concave polygons
/// the two differ.
#[must_use]
pub fn centroid(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    let rings = polygon_rings(geometry);
    let (sum, count) = if rings.is_empty() {
        sum_coords(geometry.coords_iter())
    } else {
        rings.into_iter().fold((Coord::zero(), 0_usize), |(sum, count), ring| {
            let (ring_sum, ring_count) = sum_coords(open_ring(ring));
            (sum + ring_sum, count + ring_count)
        })
    };
    if count == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    Some(Point::from(sum / n))
}

fn sum_coords(coords: impl Iterator<Item = Coord<f64>>) -> (Coord<f64>, usize) {
    coords.fold((Coord::zero(), 0), |(sum, count), c| (sum + c, count + 1))
}

fn open_ring(ring: &LineString<f64>) -> impl Iterator<Item = Coord<f64>> + '_ {
    let len = if ring.is_closed() {
        ring.0.len().saturating_sub(1)
    } else {
        ring.0.len()
    };
    ring.0.iter().take(len).copied()
}

/// Distance in meters from `point` to the nearest polygon ring of
/// `geometry`.
///
/// `MultiPolygon`s are flattened into their member polygons and every
/// exterior and interior ring is considered. Returns `None` when the
/// geometry has no polygon rings (e.g. a `Point` target).
#[must_use]
pub fn boundary_distance_meters(point: Point<f64>, geometry: &Geometry<f64>) -> Option<f64> {
    polygon_rings(geometry)
        .into_iter()
        .filter_map(|ring| ring_distance_meters(point, ring))
        .min_by(f64::total_cmp)
}

fn ring_distance_meters(point: Point<f64>, ring: &LineString<f64>) -> Option<f64> {
    match ring.closest_point(&point) {
        Closest::Intersection(_) => Some(0.0),
        Closest::SinglePoint(closest) => Some(distance_meters(point, closest)),
        Closest::Indeterminate => None,
    }
}

fn polygon_rings(geometry: &Geometry<f64>) -> Vec<&LineString<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .collect(),
        Geometry::MultiPolygon(multi) => multi
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .collect(),
        _ => Vec::new(),
    }
}
