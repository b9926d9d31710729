//! Camera follow and auto-scroll
//!
//! The world scrolls instead of the camera: every movable body is shifted
//! down by the same amount, and the background follows.

use super::background::Background;
use super::platforms::PlatformPool;
use super::space::{BodyHandle, Space};
use crate::config::{Config, ScrollConfig};

#[derive(Debug, Clone)]
pub struct ScrollController {
    config: ScrollConfig,
    background: Background,
    /// Current auto-scroll speed in pixels per frame (0 until active)
    speed: f32,
    /// Tick at which auto-scroll switched on
    auto_scroll_start: Option<u64>,
    /// Platforms the character has risen above, indexed by platform id
    tracked: Vec<bool>,
    /// Platforms cleared across all laps of the tracking set
    cleared: u64,
}

impl ScrollController {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.scroll,
            background: Background::new(config.scroll.screen_height),
            speed: 0.0,
            auto_scroll_start: None,
            tracked: vec![false; config.platforms.count],
            cleared: 0,
        }
    }

    /// Keep the character at or below the follow line
    ///
    /// Returns the offset applied to the world this frame.
    pub fn move_camera(
        &mut self,
        space: &mut Space,
        character: BodyHandle,
        platforms: &PlatformPool,
    ) -> f32 {
        let y = space.position(character).y;
        let offset = (self.config.follow_height - y).max(0.0);
        if offset > 0.0 {
            space.translate_movable(offset);
            self.background.advance(offset);
        }
        self.platform_counter(space, character, platforms);
        offset
    }

    /// Count platforms newly below the character
    ///
    /// Once every platform has been tracked the set is cleared and the call
    /// reports 0 for that frame.
    pub fn platform_counter(
        &mut self,
        space: &Space,
        character: BodyHandle,
        platforms: &PlatformPool,
    ) -> usize {
        let character_y = space.position(character).y;
        let mut count = 0;
        for platform in platforms.iter() {
            let Some(seen) = self.tracked.get_mut(platform.id) else {
                continue;
            };
            if !*seen && character_y < space.position(platform.body).y {
                *seen = true;
                count += 1;
            }
        }
        self.cleared += count as u64;

        if !self.tracked.is_empty() && self.tracked.iter().all(|&seen| seen) {
            log::debug!("Every platform cleared, starting a new lap");
            self.tracked.fill(false);
            return 0;
        }
        count
    }

    /// Scroll the world at a speed that ramps with `elapsed_seconds`
    ///
    /// Returns the speed used, `min(base + elapsed / ramp, max)`.
    pub fn auto_scroll(&mut self, space: &mut Space, elapsed_seconds: f32) -> f32 {
        let cfg = &self.config;
        self.speed = (cfg.base_speed + elapsed_seconds / cfg.ramp_seconds).min(cfg.max_speed);
        space.translate_movable(self.speed);
        self.background.advance(self.speed);
        self.speed
    }

    /// Run auto-scroll once the pass count reaches the threshold
    ///
    /// Elapsed time is measured in simulation ticks from the frame it
    /// switched on. Returns the elapsed seconds, or `None` while inactive.
    pub fn update_auto_scroll(
        &mut self,
        space: &mut Space,
        pass_count: i64,
        tick: u64,
        dt: f32,
    ) -> Option<f32> {
        if self.auto_scroll_start.is_none() {
            if pass_count < self.config.auto_scroll_threshold {
                return None;
            }
            log::info!("Auto-scroll started at pass count {pass_count}");
            self.auto_scroll_start = Some(tick);
        }
        let start = self.auto_scroll_start.unwrap_or(tick);
        let elapsed = tick.saturating_sub(start) as f32 * dt;
        self.auto_scroll(space, elapsed);
        Some(elapsed)
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scroll_start.is_some()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn cleared(&self) -> u64 {
        self.cleared
    }

    pub fn is_tracked(&self, id: usize) -> bool {
        self.tracked.get(id).copied().unwrap_or(false)
    }

    /// Back to the start-of-run state
    pub fn reset(&mut self) {
        self.background.reset();
        self.speed = 0.0;
        self.auto_scroll_start = None;
        self.tracked.fill(false);
        self.cleared = 0;
    }
}
