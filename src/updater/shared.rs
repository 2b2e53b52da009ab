//! Latest inputs shared between transport callbacks and the update loop.
//!
//! - Pose: whole-value replace behind a lock, so a reader never sees a
//!   half-written position.
//! - Stop line: a single atomic integer, negative meaning no stop.
//! - Reference path: written once (Uninitialized -> Ready), read without
//!   locking afterwards. Loads are serialized so the index is built once.

use crate::common::{PathPoint, StopLine, VehiclePose};
use crate::error::Result;
use crate::navigation::ReferencePath;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use tracing::{info, warn};

/// Outcome of offering a reference path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLoad {
    /// The path was accepted and indexed
    Loaded { len: usize },
    /// A path was already loaded; the new one was ignored
    AlreadyLoaded,
}

/// Consistent view of the inputs for one tick
#[derive(Debug, Clone)]
pub struct TickInputs {
    pub pose: VehiclePose,
    pub stop_line: StopLine,
    pub path: Arc<ReferencePath>,
}

#[derive(Debug)]
pub struct SharedInputs {
    pose: RwLock<Option<VehiclePose>>,
    stop_line: AtomicI64,
    path: OnceLock<Arc<ReferencePath>>,
    path_build: Mutex<()>,
}

impl SharedInputs {
    pub fn new() -> Self {
        SharedInputs {
            pose: RwLock::new(None),
            stop_line: AtomicI64::new(StopLine::SENTINEL),
            path: OnceLock::new(),
            path_build: Mutex::new(()),
        }
    }

    /// Replace the current pose
    pub fn set_pose(&self, pose: VehiclePose) {
        // A poisoned lock still holds a whole pose
        let mut current = self.pose.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(pose);
    }

    pub fn pose(&self) -> Option<VehiclePose> {
        *self.pose.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Store the raw traffic waypoint; negative values clear the stop
    pub fn set_stop_line(&self, raw: i64) {
        self.stop_line.store(raw, Ordering::Release);
    }

    pub fn stop_line(&self) -> StopLine {
        StopLine::from_raw(self.stop_line.load(Ordering::Acquire))
    }

    /// Accept the base waypoints if none are loaded yet.
    ///
    /// The spatial index is built only for the first accepted path.
    pub fn load_path(&self, points: Vec<PathPoint>) -> Result<PathLoad> {
        // Held across the check and the build. The guarded data is (), so a
        // poisoned lock is still usable.
        let _build = self.path_build.lock().unwrap_or_else(|e| e.into_inner());

        if self.path.get().is_some() {
            warn!("Reference path already loaded, ignoring {} waypoints", points.len());
            return Ok(PathLoad::AlreadyLoaded);
        }

        let path = Arc::new(ReferencePath::new(points)?);
        let len = path.len();
        // Only writer while the build lock is held
        let _ = self.path.set(path);

        info!("Loaded reference path with {} waypoints", len);
        Ok(PathLoad::Loaded { len })
    }

    pub fn path(&self) -> Option<&Arc<ReferencePath>> {
        self.path.get()
    }

    /// Inputs for one tick, or None until both pose and path are available.
    ///
    /// A pose with a non-finite coordinate counts as not available.
    pub fn snapshot(&self) -> Option<TickInputs> {
        let path = Arc::clone(self.path.get()?);
        let pose = self.pose().filter(VehiclePose::is_finite)?;
        Some(TickInputs {
            pose,
            stop_line: self.stop_line(),
            path,
        })
    }
}

impl Default for SharedInputs {
    fn default() -> Self {
        Self::new()
    }
}
