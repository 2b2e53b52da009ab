//! Reference path: the static base waypoints and their spatial index

use super::spatial_index::SpatialIndex;
use crate::common::{PathPoint, Point2D};
use crate::error::{Result, WaypointError};

/// Validated, immutable base waypoints together with their index
#[derive(Debug)]
pub struct ReferencePath {
    points: Vec<PathPoint>,
    index: SpatialIndex,
}

impl ReferencePath {
    /// Minimum number of waypoints for a usable path
    pub const MIN_LEN: usize = 2;

    /// Validate `points` and build the spatial index over them
    pub fn new(points: Vec<PathPoint>) -> Result<Self> {
        if points.len() < Self::MIN_LEN {
            return Err(WaypointError::MalformedPath { len: points.len() });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(WaypointError::NonFiniteWaypoint { index });
        }

        let planar: Vec<Point2D> = points.iter().map(PathPoint::xy).collect();
        let index = SpatialIndex::build(&planar);

        Ok(ReferencePath { points, index })
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Always at least [`ReferencePath::MIN_LEN`]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PathPoint> {
        self.points.get(index)
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Index of the waypoint nearest to `query` in the plane
    pub fn nearest(&self, query: Point2D) -> usize {
        // The index holds every point of a non-empty path
        self.index.nearest(query).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_paths() {
        for len in 0..2 {
            let points = (0..len).map(|i| PathPoint::planar(i as f64, 0.0, 0.0, 5.0)).collect();
            let err = ReferencePath::new(points).unwrap_err();
            assert!(matches!(err, WaypointError::MalformedPath { len: l } if l == len));
        }
    }

    #[test]
    fn test_rejects_non_finite_waypoints() {
        let mut points: Vec<PathPoint> = (0..20)
            .map(|i| PathPoint::planar(i as f64, 0.0, 0.0, 5.0))
            .collect();
        points[10] = PathPoint::planar(f64::NAN, 0.0, 0.0, 5.0);
        let err = ReferencePath::new(points.clone()).unwrap_err();
        assert!(matches!(err, WaypointError::NonFiniteWaypoint { index: 10 }));

        points[10] = PathPoint::planar(10.0, 0.0, 0.0, 5.0);
        points[3].position.z = f64::NEG_INFINITY;
        let err = ReferencePath::new(points).unwrap_err();
        assert!(matches!(err, WaypointError::NonFiniteWaypoint { index: 3 }));
    }

    #[test]
    fn test_indexes_every_point() {
        let points: Vec<PathPoint> = (0..50)
            .map(|i| PathPoint::planar(i as f64, 0.0, 0.0, 5.0))
            .collect();
        let path = ReferencePath::new(points).unwrap();
        assert_eq!(path.len(), 50);
        assert_eq!(path.spatial_index().len(), 50);
        assert_eq!(path.nearest(Point2D::new(17.2, 3.0)), 17);
    }
}
