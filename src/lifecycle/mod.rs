//! Lifecycle management for waypoint updater components

use crate::error::{Result, WaypointError};
use std::sync::RwLock;
use tracing::info;

/// Trait for components that follow a managed-node lifecycle.
///
/// Transitions take `&self` so a node can be driven while it is shared
/// with its running loop.
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&self) -> Result<()>;

    /// Activate the node
    fn on_activate(&self) -> Result<()>;

    /// Deactivate the node
    fn on_deactivate(&self) -> Result<()>;

    /// Clean up the node
    fn on_cleanup(&self) -> Result<()>;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: RwLock<State>,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: RwLock::new(State::Unconfigured),
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        // State is a plain Copy value, never left half-written
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Move to `to`, provided the node is currently in `from`
    pub fn transition(&self, from: State, to: State) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if *state != from {
            return Err(WaypointError::InvalidTransition { from: *state, to });
        }
        *state = to;
        drop(state);

        info!(node = %self.name, ?from, ?to, "lifecycle transition");
        Ok(())
    }
}
