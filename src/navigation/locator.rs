//! Locating the next waypoint ahead of the vehicle

use super::reference_path::ReferencePath;
use crate::common::VehiclePose;

/// Index of the waypoint the vehicle should treat as next ahead.
///
/// Nearest-point search does not encode direction of travel, so the nearest
/// waypoint is checked against the hyperplane through it, normal to the
/// segment from its predecessor. If the vehicle is already past that plane
/// the following waypoint is returned instead. Only this adjacency check
/// treats the path as circular; the result is always in `[0, path.len())`.
pub fn locate(pose: &VehiclePose, path: &ReferencePath) -> usize {
    let len = path.len();
    let position = pose.xy();
    let closest = path.nearest(position);
    let prev = (closest + len - 1) % len;

    let points = path.points();
    let closest_xy = points[closest].xy();
    let prev_xy = points[prev].xy();

    let segment = closest_xy - prev_xy;
    let offset = position - closest_xy;

    if segment.dot(&offset) > 0.0 {
        (closest + 1) % len
    } else {
        closest
    }
}
