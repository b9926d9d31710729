//! Immutable game configuration
//!
//! Built once at start-up from [`Settings`] and passed by reference into every
//! component constructor. All sizes are derived from the screen dimensions.

use std::path::PathBuf;

use glam::Vec2;
use thiserror::Error;

use crate::settings::Settings;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl ScreenConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: Vec2,
    /// Fraction of velocity kept per second
    pub damping: f32,
    /// Fixed integration step (seconds)
    pub timestep: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterConfig {
    pub width: f32,
    pub height: f32,
    pub mass: f32,
    pub spawn: Vec2,
    /// Cap on total speed
    pub max_velocity: f32,
    pub jump_force: f32,
    /// Extra jump impulse per unit of horizontal speed
    pub jump_velocity_factor: f32,
    pub move_force: f32,
    pub move_impulse: f32,
    pub elasticity: f32,
    pub friction: f32,
    /// Sensor segment reaches this far left and right of the body
    pub sensor_reach: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallConfig {
    pub thickness: f32,
    pub height: f32,
    pub right_x: f32,
    pub elasticity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformConfig {
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub thickness: f32,
    /// Vertical spacing between consecutive platforms
    pub distance: f32,
    /// y of the first platform
    pub start_y: f32,
    pub min_x: f32,
    pub max_x: f32,
    /// Every `wide_every`-th platform spans the full width
    pub wide_every: usize,
    pub screen_width: f32,
    pub friction: f32,
    /// Platforms below this y get recycled
    pub recycle_threshold: f32,
    /// Recycled platforms placed above this y advance the biome counter
    pub counter_zone: f32,
}

impl PlatformConfig {
    #[inline]
    pub fn is_wide(&self, index: usize) -> bool {
        index % self.wide_every == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConfig {
    /// Downward speed above which a landing is honoured
    pub landing_epsilon: f32,
    /// |vy| at or below this counts as standing
    pub in_air_threshold: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// The camera follows once the character rises above this y
    pub follow_height: f32,
    /// Pass count that switches on auto-scroll
    pub auto_scroll_threshold: i64,
    pub base_speed: f32,
    /// Seconds for the speed to grow by 1 px/frame
    pub ramp_seconds: f32,
    pub max_speed: f32,
    pub screen_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionConfig {
    pub points_per_platform: i64,
    /// Falling below this y ends the run
    pub game_over_y: f32,
    /// Counter units per biome tier
    pub biome_span: u32,
    pub biome_count: u32,
    /// Counter value after cycling through every biome
    pub biome_wrap_reset: u32,
}

impl ProgressionConfig {
    /// Counter value at which the biome cycle wraps
    pub fn biome_ceiling(&self) -> u32 {
        self.biome_span * self.biome_count
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub character: CharacterConfig,
    pub walls: WallConfig,
    pub platforms: PlatformConfig,
    pub contacts: ContactConfig,
    pub scroll: ScrollConfig,
    pub progression: ProgressionConfig,
    pub seed: Option<u64>,
    pub high_score_path: PathBuf,
    pub frame_rate: u32,
    pub sound: bool,
    /// Frames a key counts as held after a press when the terminal can't
    /// report releases
    pub key_hold_frames: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_screen(1280.0, 800.0)
    }
}

impl Config {
    /// Derive every size from the screen dimensions
    pub fn for_screen(width: f32, height: f32) -> Self {
        let wall_thickness = width * 0.10;
        let max_size = (width * 0.375).round();
        let max_half = (max_size / 2.0).floor();
        let jump_force = 1200.0;
        let max_velocity = 3000.0;

        Self {
            screen: ScreenConfig { width, height },
            physics: PhysicsConfig {
                gravity: Vec2::new(0.0, 2000.0),
                damping: 0.3,
                timestep: crate::consts::SIM_DT,
            },
            character: CharacterConfig {
                width: (width * 0.047).round(),
                height: (height * 0.094).round(),
                mass: 1.2,
                spawn: Vec2::new(width / 2.0, height * 0.75),
                max_velocity,
                jump_force,
                jump_velocity_factor: (8400.0 - jump_force) / max_velocity,
                move_force: 2000.0,
                move_impulse: 5.0,
                elasticity: 0.7,
                friction: 0.5,
                sensor_reach: width,
            },
            walls: WallConfig {
                thickness: wall_thickness,
                height,
                right_x: width,
                elasticity: 1.0,
            },
            platforms: PlatformConfig {
                count: 100,
                min_size: (width * 0.234).round(),
                max_size,
                thickness: width * 0.02,
                distance: (height / 5.0).round(),
                start_y: height,
                min_x: wall_thickness + max_half,
                max_x: width - wall_thickness - max_half,
                wide_every: 50,
                screen_width: width,
                friction: 1.0,
                recycle_threshold: height,
                counter_zone: height * 0.10,
            },
            contacts: ContactConfig {
                landing_epsilon: 1e-3,
                in_air_threshold: 0.01,
            },
            scroll: ScrollConfig {
                follow_height: height / 2.0,
                auto_scroll_threshold: 10,
                base_speed: 0.5,
                ramp_seconds: 60.0,
                max_speed: 3.0,
                screen_height: height,
            },
            progression: ProgressionConfig {
                points_per_platform: 10,
                game_over_y: height,
                biome_span: 100,
                biome_count: 4,
                biome_wrap_reset: 5,
            },
            seed: None,
            high_score_path: PathBuf::from("highscore.txt"),
            frame_rate: 60,
            sound: true,
            key_hold_frames: 8,
        }
    }

    /// Build the configuration described by user settings
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::for_screen(settings.width, settings.height);
        config.platforms.count = settings.platform_count;
        config.seed = settings.seed;
        config.high_score_path = settings.high_score_path.clone();
        config.frame_rate = settings.frame_rate;
        config.sound = settings.sound;
        config.key_hold_frames = settings.key_hold_frames;
        config
    }

    /// Reject configurations the simulation can't run with
    ///
    /// Everything downstream draws random values from these ranges, so they
    /// are checked once here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return invalid(format!(
                "screen must be positive, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        let p = &self.platforms;
        if p.count == 0 {
            return invalid("platform count must be at least 1".into());
        }
        if p.wide_every == 0 {
            return invalid("wide platform interval must be at least 1".into());
        }
        if !(p.min_size > 0.0 && p.min_size <= p.max_size) {
            return invalid(format!(
                "platform size range [{}, {}] is empty",
                p.min_size, p.max_size
            ));
        }
        if p.min_x > p.max_x {
            return invalid(format!(
                "screen too narrow: platform x range [{}, {}] is empty",
                p.min_x, p.max_x
            ));
        }
        if p.distance <= 0.0 {
            return invalid("platform spacing must be positive".into());
        }
        if !(self.physics.timestep > 0.0) {
            return invalid("timestep must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.physics.damping) {
            return invalid(format!("damping {} outside [0, 1]", self.physics.damping));
        }
        if self.frame_rate == 0 {
            return invalid("frame rate must be at least 1".into());
        }
        if self.progression.biome_span == 0 || self.progression.biome_count == 0 {
            return invalid("biome span and count must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes_follow_screen() {
        let config = Config::default();
        assert_eq!(config.character.width, 60.0);
        assert_eq!(config.character.height, 75.0);
        assert_eq!(config.character.spawn, Vec2::new(640.0, 600.0));
        assert_eq!(config.platforms.min_size, 300.0);
        assert_eq!(config.platforms.max_size, 480.0);
        assert_eq!(config.platforms.distance, 160.0);
        assert_eq!(config.platforms.min_x, 368.0);
        assert_eq!(config.platforms.max_x, 912.0);
        assert!((config.character.jump_velocity_factor - 2.4).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_platform_range_never_overlaps_walls() {
        let config = Config::for_screen(1920.0, 1080.0);
        let p = &config.platforms;
        assert!(p.min_x - p.max_size / 2.0 >= config.walls.thickness - 1.0);
        assert!(p.max_x + p.max_size / 2.0 <= config.screen.width - config.walls.thickness + 1.0);
    }

    #[test]
    fn test_from_settings_overrides() {
        let settings = Settings {
            platform_count: 12,
            seed: Some(7),
            ..Settings::default()
        };
        let config = Config::from_settings(&settings);
        assert_eq!(config.platforms.count, 12);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_narrow_screen() {
        let mut config = Config::default();
        config.platforms.min_x = config.platforms.max_x + 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = Config::default();
        config.platforms.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wide_every_fiftieth() {
        let p = Config::default().platforms;
        assert!(p.is_wide(0));
        assert!(!p.is_wide(1));
        assert!(p.is_wide(50));
        assert!(!p.is_wide(99));
    }
}
