//! Polygon ring winding normalization.
//!
//! Exterior rings are made counter-clockwise (reversed iff clockwise) and
//! interior rings clockwise (reversed iff not clockwise), with orientation
//! measured in lon/lat space. Downstream boundary-distance computations
//! and map consumers assume this orientation.

use geo::{Geometry, MultiPolygon, Polygon, Winding};

use crate::{SpatialError, geometry_type_name};

/// Normalizes ring winding for `Polygon` and `MultiPolygon` geometries.
///
/// Applying this twice yields the same rings as applying it once.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedGeometry`] for any other geometry
/// type.
pub fn enforce_right_hand_rule(geometry: Geometry<f64>) -> Result<Geometry<f64>, SpatialError> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(Geometry::Polygon(enforce_polygon(polygon))),
        Geometry::MultiPolygon(multi) => Ok(Geometry::MultiPolygon(enforce_multi_polygon(multi))),
        other => Err(SpatialError::UnsupportedGeometry {
            operation: "right-hand rule enforcement",
            geometry_type: geometry_type_name(&other),
        }),
    }
}

/// Normalizes the rings of a single polygon.
#[must_use]
pub fn enforce_polygon(polygon: Polygon<f64>) -> Polygon<f64> {
    let (mut exterior, mut interiors) = polygon.into_inner();

    if exterior.is_cw() {
        exterior.0.reverse();
    }

    for hole in &mut interiors {
        if !hole.is_cw() {
            hole.0.reverse();
        }
    }

    let polygon = Polygon::new(exterior, interiors);
    debug_assert!(is_normalized(&polygon), "ring winding not normalized");
    polygon
}

/// Normalizes every member polygon of a multipolygon.
#[must_use]
pub fn enforce_multi_polygon(multi: MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon(multi.0.into_iter().map(enforce_polygon).collect())
}

/// Degenerate (zero-area) rings have no winding and pass either way.
fn is_normalized(polygon: &Polygon<f64>) -> bool {
    !polygon.exterior().is_cw() && !polygon.interiors().iter().any(Winding::is_ccw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};

    fn all_normalized(geometry: &Geometry<f64>) -> bool {
        match geometry {
            Geometry::Polygon(polygon) => is_normalized(polygon),
            Geometry::MultiPolygon(multi) => multi.iter().all(is_normalized),
            _ => false,
        }
    }

    fn cw_ring() -> LineString<f64> {
        LineString::from(vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])
    }

    fn ccw_hole() -> LineString<f64> {
        LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)])
    }

    #[test]
    fn reverses_clockwise_exterior() {
        let polygon = Polygon::new(cw_ring(), vec![]);
        let fixed = enforce_polygon(polygon);
        assert!(fixed.exterior().is_ccw());
    }

    #[test]
    fn leaves_counter_clockwise_exterior_alone() {
        let mut ring = cw_ring();
        ring.0.reverse();
        let polygon = Polygon::new(ring.clone(), vec![]);
        assert_eq!(enforce_polygon(polygon).exterior(), &ring);
    }

    #[test]
    fn reverses_counter_clockwise_holes() {
        let polygon = Polygon::new(cw_ring(), vec![ccw_hole()]);
        let fixed = enforce_polygon(polygon);
        assert!(fixed.interiors()[0].is_cw());
    }

    #[test]
    fn normalizes_each_member_of_a_multipolygon() {
        let multi = Geometry::MultiPolygon(MultiPolygon(vec![
            Polygon::new(cw_ring(), vec![ccw_hole()]),
            Polygon::new(cw_ring(), vec![]),
        ]));
        let fixed = enforce_right_hand_rule(multi).unwrap();
        assert!(all_normalized(&fixed));
    }

    #[test]
    fn normalization_is_idempotent() {
        let geometry = Geometry::Polygon(Polygon::new(cw_ring(), vec![ccw_hole()]));
        let once = enforce_right_hand_rule(geometry).unwrap();
        let twice = enforce_right_hand_rule(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert!(all_normalized(&twice));
    }

    #[test]
    fn degenerate_holes_are_left_as_they_are() {
        let flat = LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (2.0, 2.0)]);
        let fixed = enforce_polygon(Polygon::new(cw_ring(), vec![flat]));
        assert!(fixed.exterior().is_ccw());
        assert!(is_normalized(&fixed));
    }

    #[test]
    fn rejects_unsupported_geometry() {
        let err = enforce_right_hand_rule(Geometry::Point(Point::new(1.0, 2.0))).unwrap_err();
        assert!(
            matches!(
                err,
                SpatialError::UnsupportedGeometry {
                    geometry_type: "Point",
                    ..
                }
            ),
            "unexpected error: {err}"
        );
    }
}
