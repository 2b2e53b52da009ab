//! Lookahead window extraction

use crate::common::PathPoint;

/// Forward slice of the reference path published to motion control
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryWindow {
    /// Reference path index of `points[0]`
    pub start_index: usize,
    pub points: Vec<PathPoint>,
}

impl TrajectoryWindow {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One past the reference path index of the last point
    pub fn end_index(&self) -> usize {
        self.start_index + self.points.len()
    }

    /// Target speeds in window order
    pub fn speeds(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.speed)
    }
}

/// Copy `path[start_index..start_index + length]`, truncated at the end of
/// the path. Never wraps; empty when `start_index` is at or past the end.
pub fn extract(path: &[PathPoint], start_index: usize, length: usize) -> TrajectoryWindow {
    let start = start_index.min(path.len());
    let end = start_index.saturating_add(length).min(path.len());

    TrajectoryWindow {
        start_index,
        points: path[start..end].to_vec(),
    }
}
