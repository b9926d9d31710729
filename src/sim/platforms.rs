//! Platform pool
//!
//! A fixed set of kinematic platforms stacked upward from the bottom of the
//! screen. Platforms that scroll off the bottom are moved back to the top of
//! the stack with a fresh random width and x, so the pool never grows.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::space::{Body, BodyHandle, CollisionType, Geometry, Shape, ShapeHandle, Space};
use crate::config::{Config, PlatformConfig};

/// Index of a platform in its pool; stable for the pool's lifetime
pub type PlatformId = usize;

/// One pooled platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: PlatformId,
    pub body: BodyHandle,
    pub shape: ShapeHandle,
    pub half_width: f32,
    pub thickness: f32,
    /// Spans the whole screen (every `wide_every`-th slot)
    pub wide: bool,
    /// Already counted by the character's sensor since its last placement
    pub passed: bool,
}

impl Platform {
    #[inline]
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }
}

/// Pick `(center_x, half_width)` for the platform in slot `index`
fn draw_layout(config: &PlatformConfig, rng: &mut Pcg32, index: usize) -> (f32, f32) {
    if config.is_wide(index) {
        let half = config.screen_width / 2.0;
        (half, half)
    } else {
        let width = rng.random_range(config.min_size..=config.max_size);
        let x = rng.random_range(config.min_x..=config.max_x);
        (x, width / 2.0)
    }
}

/// Owns every platform body in the space
#[derive(Debug, Clone)]
pub struct PlatformPool {
    config: PlatformConfig,
    platforms: Vec<Platform>,
    by_body: HashMap<BodyHandle, PlatformId>,
    /// Recycles that landed near the top of the screen
    platform_counter: u32,
    rng: Pcg32,
}

impl PlatformPool {
    /// Create `config.platforms.count` platforms, bottom first
    pub fn generate(config: &Config, space: &mut Space, mut rng: Pcg32) -> Self {
        let cfg = config.platforms;
        let mut platforms = Vec::with_capacity(cfg.count);
        let mut by_body = HashMap::with_capacity(cfg.count);
        let mut y = cfg.start_y;

        for id in 0..cfg.count {
            let (x, half_width) = draw_layout(&cfg, &mut rng, id);
            let body = space.add_body(Body::kinematic(Vec2::new(x, y)));
            let shape = space.add_shape(
                Shape::new(
                    body,
                    Geometry::Segment {
                        a: Vec2::new(-half_width, 0.0),
                        b: Vec2::new(half_width, 0.0),
                        radius: cfg.thickness,
                    },
                    CollisionType::Platform,
                )
                .with_friction(cfg.friction),
            );

            platforms.push(Platform {
                id,
                body,
                shape,
                half_width,
                thickness: cfg.thickness,
                wide: cfg.is_wide(id),
                passed: false,
            });
            by_body.insert(body, id);
            y -= cfg.distance;
        }

        log::info!(
            "Generated {} platforms ({} wide)",
            platforms.len(),
            platforms.iter().filter(|p| p.wide).count()
        );

        Self {
            config: cfg,
            platforms,
            by_body,
            platform_counter: 0,
            rng,
        }
    }

    fn place(&mut self, space: &mut Space, id: PlatformId, x: f32, y: f32, half_width: f32) {
        let platform = &mut self.platforms[id];
        space.set_position(platform.body, Vec2::new(x, y));
        space.set_segment(
            platform.shape,
            Vec2::new(-half_width, 0.0),
            Vec2::new(half_width, 0.0),
        );
        platform.half_width = half_width;
        platform.passed = false;
    }

    /// Move a platform that fell off the bottom back above the stack
    ///
    /// Returns `false` (and does nothing) while the platform is still on
    /// screen or `id` is unknown.
    pub fn recycle(&mut self, id: PlatformId, space: &mut Space) -> bool {
        let Some(platform) = self.platforms.get(id) else {
            return false;
        };
        let y = space.position(platform.body).y;
        if y <= self.config.recycle_threshold {
            return false;
        }

        let new_y = self.top_y(space) - self.config.distance;
        let (x, half_width) = draw_layout(&self.config, &mut self.rng, id);
        self.place(space, id, x, new_y, half_width);

        if new_y < self.config.counter_zone {
            self.platform_counter += 1;
        }
        log::debug!("Recycled platform {id} from y={y:.1} to y={new_y:.1}");
        true
    }

    /// Recycle every platform below the threshold; returns how many moved
    pub fn recycle_all(&mut self, space: &mut Space) -> usize {
        (0..self.platforms.len())
            .filter(|&id| self.recycle(id, space))
            .count()
    }

    /// Replace the layout generator; takes effect at the next reset
    pub fn reseed(&mut self, rng: Pcg32) {
        self.rng = rng;
    }

    /// Lay the whole pool out again from the bottom with fresh random layouts
    pub fn reset(&mut self, space: &mut Space) {
        let mut y = self.config.start_y;
        for id in 0..self.platforms.len() {
            let (x, half_width) = draw_layout(&self.config, &mut self.rng, id);
            self.place(space, id, x, y, half_width);
            y -= self.config.distance;
        }
        self.platform_counter = 0;
        log::debug!("Platform pool reset");
    }

    /// Smallest y (highest on screen) of any platform
    pub fn top_y(&self, space: &Space) -> f32 {
        self.platforms
            .iter()
            .map(|p| space.position(p.body).y)
            .fold(f32::INFINITY, f32::min)
    }

    /// Flag a platform as counted; `true` only the first time
    pub fn mark_passed(&mut self, id: PlatformId) -> bool {
        match self.platforms.get_mut(id) {
            Some(platform) if !platform.passed => {
                platform.passed = true;
                true
            }
            _ => false,
        }
    }

    pub fn id_for_body(&self, body: BodyHandle) -> Option<PlatformId> {
        self.by_body.get(&body).copied()
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn platform_counter(&self) -> u32 {
        self.platform_counter
    }

    /// Reset the counter to `reset_to` once it reaches `ceiling`
    pub fn wrap_counter(&mut self, ceiling: u32, reset_to: u32) -> bool {
        if self.platform_counter >= ceiling {
            self.platform_counter = reset_to;
            true
        } else {
            false
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    use crate::sim::space::BodyKind;

    fn make_pool(count: usize, seed: u64) -> (Config, Space, PlatformPool) {
        let mut config = Config::default();
        config.platforms.count = count;
        let mut space = Space::new(config.physics.gravity, config.physics.damping);
        let pool = PlatformPool::generate(&config, &mut space, Pcg32::seed_from_u64(seed));
        (config, space, pool)
    }

    fn check_layout(config: &Config, space: &Space, pool: &PlatformPool) {
        let cfg = &config.platforms;
        for platform in pool.iter() {
            let x = space.position(platform.body).x;
            if cfg.is_wide(platform.id) {
                assert!(platform.wide);
                assert_eq!(platform.width(), cfg.screen_width);
                assert_eq!(x, cfg.screen_width / 2.0);
            } else {
                assert!(!platform.wide);
                assert!(platform.width() >= cfg.min_size - 1e-3);
                assert!(platform.width() <= cfg.max_size + 1e-3);
                assert!(x >= cfg.min_x && x <= cfg.max_x);
            }
        }
    }

    #[test]
    fn test_generate_stacks_upward() {
        let (config, space, pool) = make_pool(100, 1);
        assert_eq!(pool.len(), 100);
        check_layout(&config, &space, &pool);

        for (i, platform) in pool.iter().enumerate() {
            let expected = config.platforms.start_y - i as f32 * config.platforms.distance;
            assert_eq!(space.position(platform.body).y, expected);
            assert_eq!(space.body(platform.body).kind, BodyKind::Kinematic);
        }
    }

    #[test]
    fn test_wide_platforms_every_fifty() {
        let (_, _, pool) = make_pool(100, 2);
        let wide: Vec<_> = pool.iter().filter(|p| p.wide).map(|p| p.id).collect();
        assert_eq!(wide, vec![0, 50]);

        let (_, _, pool) = make_pool(120, 9);
        assert_eq!(pool.iter().filter(|p| p.wide).count(), 3);
    }

    #[test]
    fn test_single_platform_is_wide() {
        let (config, space, pool) = make_pool(1, 3);
        let only = pool.get(0).expect("one platform");
        assert!(only.wide);
        assert_eq!(space.position(only.body).y, config.platforms.start_y);
    }

    #[test]
    fn test_recycle_moves_above_topmost() {
        let (config, mut space, mut pool) = make_pool(10, 4);
        let top = pool.top_y(&space);
        let body = pool.get(3).map(|p| p.body).expect("platform 3");
        space.set_position(body, Vec2::new(500.0, config.screen.height + 10.0));
        pool.mark_passed(3);

        assert!(pool.recycle(3, &mut space));
        let platform = pool.get(3).expect("platform 3");
        assert_eq!(space.position(body).y, top - config.platforms.distance);
        assert!(!platform.passed);
        assert_eq!(pool.platform_counter(), 1, "new y is above the counter zone");
        check_layout(&config, &space, &pool);
    }

    #[test]
    fn test_recycle_keeps_on_screen_platforms() {
        let (config, mut space, mut pool) = make_pool(10, 5);
        let body = pool.get(2).map(|p| p.body).expect("platform 2");
        let before = space.position(body);
        space.set_position(body, Vec2::new(before.x, config.screen.height));

        assert!(!pool.recycle(2, &mut space), "exactly at the threshold stays");
        assert!(!pool.recycle(99, &mut space), "unknown id");
        assert_eq!(pool.platform_counter(), 0);
    }

    #[test]
    fn test_recycle_keeps_wide_slot_wide() {
        let (config, mut space, mut pool) = make_pool(10, 6);
        space.translate_movable(config.screen.height);
        let moved = pool.recycle_all(&mut space);
        assert!(moved >= 1);

        let wide = pool.get(0).expect("platform 0");
        assert_eq!(wide.width(), config.platforms.screen_width);
        assert_eq!(space.position(wide.body).x, config.platforms.screen_width / 2.0);
    }

    #[test]
    fn test_counter_ignores_low_recycles() {
        // Two platforms: the other one sits at the bottom, so the recycled
        // one lands low on screen and doesn't count.
        let (config, mut space, mut pool) = make_pool(2, 7);
        let low = pool.get(0).map(|p| p.body).expect("platform 0");
        let high = pool.get(1).map(|p| p.body).expect("platform 1");
        space.set_position(low, Vec2::new(640.0, config.screen.height * 0.9));
        space.set_position(high, Vec2::new(640.0, config.screen.height + 1.0));

        assert!(pool.recycle(1, &mut space));
        assert_eq!(pool.platform_counter(), 0);
    }

    #[test]
    fn test_reset_restores_stack_and_counter() {
        let (config, mut space, mut pool) = make_pool(60, 8);
        let before: Vec<f32> = pool.iter().map(|p| space.position(p.body).x).collect();
        space.translate_movable(3.0 * config.screen.height);
        pool.recycle_all(&mut space);
        pool.mark_passed(5);

        pool.reset(&mut space);
        check_layout(&config, &space, &pool);
        assert_eq!(pool.platform_counter(), 0);
        for (i, platform) in pool.iter().enumerate() {
            let expected = config.platforms.start_y - i as f32 * config.platforms.distance;
            assert_eq!(space.position(platform.body).y, expected);
            assert!(!platform.passed);
        }

        let after: Vec<f32> = pool.iter().map(|p| space.position(p.body).x).collect();
        assert_ne!(before, after, "layouts are redrawn");
    }

    #[test]
    fn test_consecutive_resets_draw_new_layouts() {
        let (config, mut space, mut pool) = make_pool(60, 9);
        let xs = |space: &Space, pool: &PlatformPool| -> Vec<f32> {
            pool.iter().map(|p| space.position(p.body).x).collect()
        };

        pool.reset(&mut space);
        check_layout(&config, &space, &pool);
        let first = xs(&space, &pool);

        pool.reset(&mut space);
        check_layout(&config, &space, &pool);
        let second = xs(&space, &pool);

        assert_ne!(first, second);
        assert_eq!(pool.len(), 60);
    }

    #[test]
    fn test_mark_passed_once() {
        let (_, _, mut pool) = make_pool(3, 10);
        assert!(pool.mark_passed(1));
        assert!(!pool.mark_passed(1));
        assert!(!pool.mark_passed(7));
    }

    #[test]
    fn test_id_for_body_maps_back() {
        let (_, _, pool) = make_pool(5, 11);
        for platform in pool.iter() {
            assert_eq!(pool.id_for_body(platform.body), Some(platform.id));
        }
    }

    #[test]
    fn test_wrap_counter() {
        let (config, mut space, mut pool) = make_pool(20, 12);
        // One platform drops off the bottom per shift and lands far above
        for _ in 0..50 {
            space.translate_movable(config.platforms.distance);
            assert_eq!(pool.recycle_all(&mut space), 1);
        }
        assert_eq!(pool.platform_counter(), 50);
        assert!(!pool.wrap_counter(51, 5));
        assert!(pool.wrap_counter(50, 5));
        assert_eq!(pool.platform_counter(), 5);
    }

    proptest! {
        #[test]
        fn prop_layout_stays_in_bounds(seed in any::<u64>(), count in 1usize..160, shifts in 0usize..6) {
            let (config, mut space, mut pool) = make_pool(count, seed);
            check_layout(&config, &space, &pool);

            for _ in 0..shifts {
                space.translate_movable(config.screen.height * 0.75);
                pool.recycle_all(&mut space);
                check_layout(&config, &space, &pool);
                prop_assert_eq!(pool.len(), count);
            }
        }

        #[test]
        fn prop_recycled_platforms_go_above_everything(seed in any::<u64>(), count in 6usize..40) {
            let (config, mut space, mut pool) = make_pool(count, seed);
            space.translate_movable(config.screen.height);
            let others_top = pool
                .iter()
                .filter(|p| space.position(p.body).y <= config.platforms.recycle_threshold)
                .map(|p| space.position(p.body).y)
                .fold(f32::INFINITY, f32::min);

            pool.recycle_all(&mut space);
            for platform in pool.iter() {
                prop_assert!(space.position(platform.body).y <= config.platforms.recycle_threshold);
            }
            let new_top = pool.top_y(&space);
            prop_assert!(new_top < others_top);
        }
    }
}
