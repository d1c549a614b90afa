//! R-tree backed point index for point-in-polygon lookups.
//!
//! Points are bulk-loaded once. Queries first narrow by the polygon's
//! bounding box through the R-tree, then run an exact intersection test
//! (points on the boundary count as inside).

use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::nearest::Located;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Spatial index over a slice of located items, addressed by position.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Builds an index over `items`. Entries are identified by their
    /// position in the slice.
    #[must_use]
    pub fn build<T: Located>(items: &[T]) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let p = item.location();
                GeomWithData::new([p.x(), p.y()], i)
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of all indexed points inside `area`, in ascending order.
    #[must_use]
    pub fn within(&self, area: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = area.bounding_rect() else {
            return Vec::new();
        };

        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|entry| {
                let [x, y] = *entry.geom();
                area.intersects(&Point::new(x, y))
            })
            .map(|entry| entry.data)
            .collect();

        hits.sort_unstable();
        hits
    }
}
