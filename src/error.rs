//! Error types for the waypoint updater

use crate::lifecycle::State;
use std::path::PathBuf;

/// Errors raised by the waypoint updater core.
///
/// Only load-time and configuration problems are errors. Per-tick conditions
/// (missing inputs, start index past the path end) are handled in place.
#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    /// A reference path needs at least two points for the locator's
    /// previous-point adjacency.
    #[error("reference path must have at least 2 points, got {len}")]
    MalformedPath { len: usize },

    /// A waypoint position has a NaN or infinite coordinate.
    #[error("reference path waypoint {index} has a non-finite position")]
    NonFiniteWaypoint { index: usize },

    /// A tunable is outside its allowed domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file could not be read.
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::UpdaterConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A lifecycle transition was requested from the wrong state.
    #[error("invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition { from: State, to: State },
}

pub type Result<T> = std::result::Result<T, WaypointError>;
