//! Static nearest-neighbor index over reference path waypoints.
//!
//! Built once from the planar (x, y) projection of the path, in path order,
//! so the returned index addresses the path directly. The index is
//! read-only after construction.

use crate::common::Point2D;
use rstar::primitives::GeomWithData;
use rstar::RTree;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R*-tree backed nearest waypoint lookup
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Bulk-load an index over `points`; item `i` maps back to `points[i]`
    pub fn build(points: &[Point2D]) -> Self {
        let indexed = points
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPoint::new([p.x, p.y], i))
            .collect();

        SpatialIndex {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Index of the point closest to `query`, or None if the index is empty
    pub fn nearest(&self, query: Point2D) -> Option<usize> {
        self.tree
            .nearest_neighbor(&[query.x, query.y])
            .map(|indexed| indexed.data)
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}
