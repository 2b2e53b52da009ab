//! Trajectory generation module

use super::velocity_profile::VelocityProfiler;
use super::window::{extract, TrajectoryWindow};
use crate::common::{StopLine, VehiclePose};
use crate::config::UpdaterConfig;
use crate::navigation::{locate, ReferencePath};

/// Builds the final waypoints for one tick: locate, extract, profile
#[derive(Debug, Clone)]
pub struct TrajectoryGenerator {
    lookahead_wps: usize,
    profiler: VelocityProfiler,
}

impl TrajectoryGenerator {
    /// Create a new trajectory generator
    pub fn new(config: &UpdaterConfig) -> Self {
        TrajectoryGenerator {
            lookahead_wps: config.lookahead_wps,
            profiler: VelocityProfiler::from_config(config),
        }
    }

    /// Generate the lookahead window for `pose` on `path`
    pub fn generate(
        &self,
        pose: &VehiclePose,
        path: &ReferencePath,
        stop_line: StopLine,
    ) -> TrajectoryWindow {
        let start_index = locate(pose, path);
        let window = extract(path.points(), start_index, self.lookahead_wps);
        self.profiler.profile(window, stop_line)
    }
}
