//! Parkour - an endless vertical runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics space, platform pool, contacts, scroll, score)
//! - `renderer`: Sprite/text drawing interface and the terminal backend
//! - `platform`: Terminal session, keyboard state and frame pacing
//! - `ui`: Main menu
//! - `config` / `settings`: Validated configuration derived from user settings
//! - `highscores`: Best-score persistence

pub mod audio;
pub mod config;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use config::{Config, ConfigError};
pub use highscores::{FileHighScoreStore, HighScoreError, HighScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
