//! JSON configuration for the perception node.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ria_vision_obstacle::{ObstacleParams, ObstacleParamsError};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Obstacle(#[from] ObstacleParamsError),
    #[error("tick rate must be finite and positive (got {0} Hz)")]
    InvalidTickRate(f64),
}

/// Independent on/off switches for the two detectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorToggles {
    pub obstacle: bool,
    pub marker: bool,
}

impl Default for DetectorToggles {
    fn default() -> Self {
        Self {
            obstacle: true,
            marker: true,
        }
    }
}

fn default_tick_rate_hz() -> f64 {
    15.0
}

/// Tick period for a rate in Hz; the rate must be finite and positive.
pub(crate) fn period_from_rate_hz(hz: f64) -> Result<Duration, ConfigError> {
    if !hz.is_finite() || hz <= 0.0 {
        return Err(ConfigError::InvalidTickRate(hz));
    }
    Duration::try_from_secs_f64(1.0 / hz).map_err(|_| ConfigError::InvalidTickRate(hz))
}

/// Node configuration. Every field has a default, so partial files load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default)]
    pub obstacle: ObstacleParams,
    #[serde(default)]
    pub detectors: DetectorToggles,
    /// Render and publish a diagnostic overlay each processed cycle.
    #[serde(default)]
    pub visualize: bool,
    /// Promote per-cycle decision lines from `debug` to `info`.
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            obstacle: ObstacleParams::default(),
            detectors: DetectorToggles::default(),
            visualize: false,
            verbose: false,
            tick_rate_hz: default_tick_rate_hz(),
        }
    }
}

impl VisionConfig {
    /// Load and validate a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.obstacle.validate()?;
        self.tick_period()?;
        Ok(())
    }

    /// Period of the decision tick derived from `tick_rate_hz`.
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        period_from_rate_hz(self.tick_rate_hz)
    }
}
