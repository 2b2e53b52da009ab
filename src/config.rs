//! Configuration loading for the waypoint updater

use crate::error::{Result, WaypointError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Tunables for trajectory window generation
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Number of waypoints published ahead of the vehicle (default: 80)
    #[serde(default = "default_lookahead_wps")]
    pub lookahead_wps: usize,

    /// Deceleration used for the stop profile, v^2 = 2 * a * d (default: 0.4)
    #[serde(default = "default_max_decel")]
    pub max_decel: f64,

    /// Waypoints to stop short of the stop line (default: 3)
    #[serde(default = "default_stop_margin")]
    pub stop_margin: usize,

    /// Profiled speeds below this snap to zero (default: 1.0)
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Update loop frequency in Hz (default: 20)
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
}

fn default_lookahead_wps() -> usize {
    80
}
fn default_max_decel() -> f64 {
    0.4
}
fn default_stop_margin() -> usize {
    3
}
fn default_min_speed() -> f64 {
    1.0
}
fn default_rate_hz() -> f64 {
    20.0
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        UpdaterConfig {
            lookahead_wps: default_lookahead_wps(),
            max_decel: default_max_decel(),
            stop_margin: default_stop_margin(),
            min_speed: default_min_speed(),
            rate_hz: default_rate_hz(),
        }
    }
}

/// Table name config files may nest the settings under
const CONFIG_TABLE: &str = "waypoint_updater";

impl UpdaterConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WaypointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// Settings are read from a `[waypoint_updater]` table when one is
    /// present, otherwise from the top level.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut table: toml::Table = contents.parse()?;
        let config: UpdaterConfig = match table.remove(CONFIG_TABLE) {
            Some(nested) => nested.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override values from a flat parameter map.
    ///
    /// Unknown keys are ignored. If any value is out of range the config is
    /// left unchanged.
    pub fn apply_params(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let mut updated = self.clone();

        if let Some(&lookahead) = params.get("lookahead_wps") {
            updated.lookahead_wps = count_param("lookahead_wps", lookahead)?;
        }
        if let Some(&decel) = params.get("max_decel") {
            updated.max_decel = decel;
        }
        if let Some(&margin) = params.get("stop_margin") {
            updated.stop_margin = count_param("stop_margin", margin)?;
        }
        if let Some(&min_speed) = params.get("min_speed") {
            updated.min_speed = min_speed;
        }
        if let Some(&rate) = params.get("rate_hz") {
            updated.rate_hz = rate;
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookahead_wps == 0 {
            return Err(invalid("lookahead_wps must be at least 1"));
        }
        if !(self.max_decel.is_finite() && self.max_decel > 0.0) {
            return Err(invalid("max_decel must be positive"));
        }
        if !(self.min_speed.is_finite() && self.min_speed >= 0.0) {
            return Err(invalid("min_speed must be non-negative"));
        }
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(invalid("rate_hz must be positive"));
        }
        Ok(())
    }

    /// Time between two update loop ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz)
    }
}

fn invalid(message: &str) -> WaypointError {
    WaypointError::InvalidConfig(message.to_string())
}

fn count_param(name: &str, value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(WaypointError::InvalidConfig(format!(
            "{} must be a non-negative integer, got {}",
            name, value
        )))
    }
}
