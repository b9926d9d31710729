//! User settings
//!
//! Persisted as JSON next to the binary (`parkour.json` unless the
//! `PARKOUR_SETTINGS` environment variable points elsewhere). Missing files
//! and missing keys fall back to defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Default settings file name
pub const SETTINGS_FILE: &str = "parkour.json";

/// Environment variable overriding the settings path
pub const SETTINGS_ENV: &str = "PARKOUR_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Logical screen width in world pixels
    pub width: f32,
    /// Logical screen height in world pixels
    pub height: f32,
    /// Size of the platform pool
    pub platform_count: usize,
    /// Fixed RNG seed; random per launch when absent
    pub seed: Option<u64>,

    // === Persistence ===
    pub high_score_path: PathBuf,

    // === Frontend ===
    pub frame_rate: u32,
    /// Terminal bell on game over and new high scores
    pub sound: bool,
    /// Frames a key stays held after a press on terminals without key release
    /// reporting
    pub key_hold_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            platform_count: 100,
            seed: None,

            high_score_path: PathBuf::from("highscore.txt"),

            frame_rate: 60,
            sound: true,
            key_hold_frames: 8,
        }
    }
}

impl Settings {
    /// Settings path from the environment, or the default file name
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings, using defaults when the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
