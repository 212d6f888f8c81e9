//! Game settings and tuning
//!
//! Every constant the simulation uses lives here so a session can be
//! reshaped from a JSON file without recompiling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "TILT_SHOOTER_CONFIG";
/// Environment variable overriding the RNG seed.
pub const SEED_ENV: &str = "TILT_SHOOTER_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid TILT_SHOOTER_SEED value {0:?}")]
    Seed(String),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Entity sizes ===
    pub player_width: f32,
    pub player_height: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub block_width: f32,
    pub block_height: f32,

    // === Motion ===
    /// Player displacement per unit of tilt per sample.
    pub tilt_sensitivity: f32,
    /// Upward travel of a projectile per projectile tick.
    pub bullet_step: f32,
    /// Downward travel of an obstacle per obstacle tick.
    pub block_step: f32,
    /// Vertical reference used for the player hitbox.  This is a fixed
    /// value, independent of where the player is drawn.
    pub player_hitbox_y: f32,

    // === Task intervals (ms) ===
    pub sensor_interval_ms: u64,
    pub bullet_interval_ms: u64,
    pub block_interval_ms: u64,
    pub spawn_interval_ms: u64,

    /// Fixed seed for obstacle placement; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 360.0,
            screen_height: 640.0,

            player_width: 50.0,
            player_height: 50.0,
            bullet_width: 10.0,
            bullet_height: 20.0,
            block_width: 40.0,
            block_height: 40.0,

            tilt_sensitivity: 30.0,
            bullet_step: 10.0,
            block_step: 15.0,
            player_hitbox_y: 20.0,

            sensor_interval_ms: 10,
            bullet_interval_ms: 100,
            block_interval_ms: 50,
            spawn_interval_ms: 1500,

            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from the file named by `TILT_SHOOTER_CONFIG`, falling
    /// back to defaults when the variable is unset.  `TILT_SHOOTER_SEED`
    /// overrides the seed either way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => {
                log::info!("{} not set, using default settings", CONFIG_ENV);
                Self::default()
            }
        };

        if let Ok(raw) = std::env::var(SEED_ENV) {
            let seed = raw.trim().parse().map_err(|_| ConfigError::Seed(raw.clone()))?;
            settings.seed = Some(seed);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a JSON settings file.  Missing fields take their
    /// default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
            ("bullet_step", self.bullet_step),
            ("block_step", self.block_step),
        ];
        for (field, value) in sizes {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        let intervals = [
            ("sensor_interval_ms", self.sensor_interval_ms),
            ("bullet_interval_ms", self.bullet_interval_ms),
            ("block_interval_ms", self.block_interval_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1 ms",
                });
            }
        }

        if self.player_width > self.screen_width {
            return Err(ConfigError::Invalid {
                field: "player_width",
                reason: "wider than the screen",
            });
        }
        if self.block_width > self.screen_width {
            return Err(ConfigError::Invalid {
                field: "block_width",
                reason: "wider than the screen",
            });
        }
        if !self.tilt_sensitivity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "tilt_sensitivity",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Rightmost legal player position.
    pub fn max_player_x(&self) -> f32 {
        self.screen_width - self.player_width
    }

    /// Rightmost legal obstacle spawn position.
    pub fn max_block_x(&self) -> f32 {
        self.screen_width - self.block_width
    }

    pub fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_interval_ms)
    }

    pub fn bullet_interval(&self) -> Duration {
        Duration::from_millis(self.bullet_interval_ms)
    }

    pub fn block_interval(&self) -> Duration {
        Duration::from_millis(self.block_interval_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}
