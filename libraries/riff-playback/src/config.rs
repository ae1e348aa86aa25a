//! Controller configuration
//!
//! Loaded from (in order of precedence):
//! 1. Environment variables (`RIFF_*`, `__` for nesting)
//! 2. Config file (TOML)
//! 3. Defaults

use crate::error::{PlayerError, Result};
use crate::input::Keymap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RIFF";

/// Player controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Progress sampling period in milliseconds
    pub sample_interval_ms: u64,

    /// Volume applied on mount (0.0-1.0)
    pub initial_volume: f32,

    /// Start playback as soon as a track change becomes ready
    pub autoplay: bool,

    /// Step for the volume up/down shortcuts
    pub volume_step: f32,

    /// If set, `prev` past this many seconds restarts the current track
    /// instead of going back
    pub previous_restart_threshold_secs: Option<f64>,

    pub keymap: Keymap,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            initial_volume: 1.0,
            autoplay: true,
            volume_step: 0.1,
            previous_restart_threshold_secs: None,
            keymap: Keymap::default(),
        }
    }
}

impl ControllerConfig {
    /// Load from an optional TOML file and `RIFF_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`load`](Self::load) with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            return Err(PlayerError::Config(
                "sample_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(PlayerError::Config(format!(
                "initial_volume must be within 0.0-1.0, got {}",
                self.initial_volume
            )));
        }
        if !(self.volume_step > 0.0 && self.volume_step <= 1.0) {
            return Err(PlayerError::Config(format!(
                "volume_step must be within (0.0, 1.0], got {}",
                self.volume_step
            )));
        }
        if let Some(threshold) = self.previous_restart_threshold_secs {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(PlayerError::Config(format!(
                    "previous_restart_threshold_secs must be a non-negative number, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Sampling period
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}
