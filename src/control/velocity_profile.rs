//! Stop-line deceleration profile

use super::window::TrajectoryWindow;
use crate::common::StopLine;
use crate::config::UpdaterConfig;

/// Rewrites window speeds so the vehicle comes to rest before a stop line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityProfiler {
    max_decel: f64,
    stop_margin: usize,
    min_speed: f64,
}

impl VelocityProfiler {
    pub fn new(max_decel: f64, stop_margin: usize, min_speed: f64) -> Self {
        VelocityProfiler {
            max_decel,
            stop_margin,
            min_speed,
        }
    }

    pub fn from_config(config: &UpdaterConfig) -> Self {
        VelocityProfiler::new(config.max_decel, config.stop_margin, config.min_speed)
    }

    /// Apply the stop profile to `window`.
    ///
    /// The window passes through unchanged when there is no stop line or the
    /// stop line is at or beyond the window end. Otherwise each point gets
    /// `min(sqrt(2 * a * d), nominal)` where `d` is the arc length to the
    /// stop target, and speeds under `min_speed` snap to zero.
    pub fn profile(&self, window: TrajectoryWindow, stop_line: StopLine) -> TrajectoryWindow {
        let stop_index = match stop_line.index() {
            Some(index) if index < window.end_index() => index,
            _ => return window,
        };

        let target = self.stop_target(window.start_index, stop_index, window.len());
        let arc = cumulative_arc_length(&window);

        let points = window
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let dist = if i < target { arc[target] - arc[i] } else { 0.0 };
                let speed = self.stop_speed(dist);
                point.with_speed(speed.min(point.speed))
            })
            .collect();

        TrajectoryWindow {
            start_index: window.start_index,
            points,
        }
    }

    /// Window-relative index of the point to stop at
    fn stop_target(&self, start_index: usize, stop_index: usize, window_len: usize) -> usize {
        let target = stop_index as i64 - start_index as i64 - self.stop_margin as i64;
        (target.max(0) as usize).min(window_len.saturating_sub(1))
    }

    /// Constant-deceleration speed with `dist` left to go, `v^2 = 2 * a * d`
    fn stop_speed(&self, dist: f64) -> f64 {
        let speed = (2.0 * self.max_decel * dist).sqrt();
        if speed < self.min_speed {
            0.0
        } else {
            speed
        }
    }
}

impl Default for VelocityProfiler {
    fn default() -> Self {
        VelocityProfiler::from_config(&UpdaterConfig::default())
    }
}

/// `arc[i]` is the distance along the window from point 0 to point i
fn cumulative_arc_length(window: &TrajectoryWindow) -> Vec<f64> {
    let mut arc = Vec::with_capacity(window.len());
    let mut total = 0.0;
    for (i, point) in window.points.iter().enumerate() {
        if i > 0 {
            total += window.points[i - 1].distance_to(point);
        }
        arc.push(total);
    }
    arc
}
