//! Final waypoint generation for a vehicle following a static reference path.
//!
//! Given the latest vehicle pose, the base waypoints and an optional stop
//! line, the updater publishes a short lookahead window of waypoints with a
//! target speed per point, decelerating smoothly in front of a stop line.
//!
//! Data flow per tick:
//! pose + reference path + stop line -> [`navigation::locate`] ->
//! [`control::extract`] -> [`control::VelocityProfiler`] -> window.
pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod updater;

pub use crate::common::{PathPoint, StopLine, VehiclePose};
pub use crate::config::UpdaterConfig;
pub use crate::control::{TrajectoryGenerator, TrajectoryWindow};
pub use crate::error::{Result, WaypointError};
pub use crate::navigation::ReferencePath;
pub use crate::updater::shared::{PathLoad, SharedInputs};
pub use crate::updater::WaypointUpdater;
