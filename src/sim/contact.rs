//! Contact rules between the character and platforms
//!
//! Platforms are one-way: the character jumps up through them and lands on
//! them from above. A separate sensor segment under the character counts each
//! platform the first time it is crossed.

use glam::Vec2;

use super::platforms::PlatformPool;
use super::space::ContactEvent;
use crate::config::ContactConfig;

/// Whether the character can jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundState {
    Grounded,
    #[default]
    Airborne,
}

/// Decides which contacts are honoured and keeps the pass counter
#[derive(Debug, Clone)]
pub struct ContactResolver {
    ground: GroundState,
    /// Platforms passed this run; the spawn platform takes it from -1 to 0
    counter: i64,
    landing_epsilon: f32,
    in_air_threshold: f32,
}

impl ContactResolver {
    pub fn new(config: &ContactConfig) -> Self {
        Self {
            ground: GroundState::Grounded,
            counter: -1,
            landing_epsilon: config.landing_epsilon,
            in_air_threshold: config.in_air_threshold,
        }
    }

    /// Begin handler for character/platform contacts
    ///
    /// Only a clearly downward relative velocity becomes a landing. Moving
    /// up, or barely moving at all, passes through and leaves the character
    /// airborne.
    pub fn on_character_platform_contact(&mut self, event: &ContactEvent) -> bool {
        let vy = event.relative_velocity.y;
        if vy < 0.0 {
            self.ground = GroundState::Airborne;
            false
        } else if vy.abs() > self.landing_epsilon {
            self.ground = GroundState::Grounded;
            true
        } else {
            self.ground = GroundState::Airborne;
            false
        }
    }

    /// Begin handler for sensor/platform contacts; never blocks motion
    pub fn on_sensor_platform_contact(
        &mut self,
        event: &ContactEvent,
        platforms: &mut PlatformPool,
    ) -> bool {
        if let Some(id) = platforms.id_for_body(event.body_b) {
            if platforms.mark_passed(id) {
                self.counter += 1;
                log::debug!("Passed platform {id}, counter={}", self.counter);
            }
        }
        true
    }

    /// Per-frame check: any real vertical speed means airborne
    pub fn check_in_air(&mut self, velocity: Vec2) {
        self.ground = if velocity.y.abs() > self.in_air_threshold {
            GroundState::Airborne
        } else {
            GroundState::Grounded
        };
    }

    pub fn reset_counter(&mut self) {
        self.counter = -1;
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn ground(&self) -> GroundState {
        self.ground
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground == GroundState::Grounded
    }
}
