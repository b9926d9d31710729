//! The player character and the side walls

use glam::Vec2;

use super::collision::clamp_speed;
use super::space::{Body, BodyHandle, CollisionType, Geometry, Shape, ShapeHandle, Space};
use crate::config::{CharacterConfig, Config, WallConfig};

/// Dynamic box with a wide sensor segment just below its feet
#[derive(Debug, Clone)]
pub struct Character {
    pub body: BodyHandle,
    pub shape: ShapeHandle,
    pub sensor: ShapeHandle,
    config: CharacterConfig,
}

impl Character {
    pub fn spawn(config: &Config, space: &mut Space) -> Self {
        let cfg = config.character;
        let half = Vec2::new(cfg.width, cfg.height) / 2.0;
        let body = space.add_body(Body::dynamic(cfg.mass, cfg.spawn));
        let shape = space.add_shape(
            Shape::new(body, Geometry::Box { half_extents: half }, CollisionType::Character)
                .with_elasticity(cfg.elasticity)
                .with_friction(cfg.friction),
        );
        // A body-height below the centre, spanning the whole playfield
        let sensor = space.add_shape(
            Shape::new(
                body,
                Geometry::Segment {
                    a: Vec2::new(-cfg.sensor_reach, cfg.height),
                    b: Vec2::new(cfg.sensor_reach, cfg.height),
                    radius: 0.0,
                },
                CollisionType::CharacterSensor,
            )
            .as_sensor(),
        );

        Self {
            body,
            shape,
            sensor,
            config: cfg,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    pub fn position(&self, space: &Space) -> Vec2 {
        space.position(self.body)
    }

    pub fn velocity(&self, space: &Space) -> Vec2 {
        space.velocity(self.body)
    }

    /// Horizontal control: a small impulse plus a steady force
    ///
    /// Each held direction replaces the previous force, so holding both
    /// leaves the right-hand force and cancelling impulses.
    pub fn apply_movement(&self, space: &mut Space, left: bool, right: bool) {
        let cfg = &self.config;
        let body = space.body_mut(self.body);
        if left {
            body.reset_force();
            body.apply_impulse(Vec2::new(-cfg.move_impulse, 0.0));
            body.apply_force(Vec2::new(-cfg.move_force, 0.0));
        }
        if right {
            body.reset_force();
            body.apply_impulse(Vec2::new(cfg.move_impulse, 0.0));
            body.apply_force(Vec2::new(cfg.move_force, 0.0));
        }
    }

    /// Upward impulse that grows with horizontal speed
    pub fn jump(&self, space: &mut Space) {
        let cfg = &self.config;
        let body = space.body_mut(self.body);
        let strength = cfg.jump_force + body.velocity.x.abs() * cfg.jump_velocity_factor;
        body.apply_impulse(Vec2::new(0.0, -strength));
        log::trace!("Jump with impulse {strength:.1}");
    }

    pub fn limit_velocity(&self, space: &mut Space) {
        let body = space.body_mut(self.body);
        body.velocity = clamp_speed(body.velocity, self.config.max_velocity);
    }

    /// Back to the spawn point, at rest
    pub fn reset(&self, space: &mut Space) {
        let body = space.body_mut(self.body);
        body.position = self.config.spawn;
        body.velocity = Vec2::ZERO;
        body.reset_force();
    }
}

/// Static vertical segments at both screen edges
#[derive(Debug, Clone)]
pub struct Walls {
    pub left: ShapeHandle,
    pub right: ShapeHandle,
    pub thickness: f32,
}

impl Walls {
    pub fn build(config: &WallConfig, space: &mut Space) -> Self {
        let mut wall = |x: f32| {
            let body = space.add_body(Body::fixed(Vec2::new(x, 0.0)));
            space.add_shape(
                Shape::new(
                    body,
                    Geometry::Segment {
                        a: Vec2::ZERO,
                        b: Vec2::new(0.0, config.height),
                        radius: config.thickness,
                    },
                    CollisionType::Wall,
                )
                .with_elasticity(config.elasticity),
            )
        };
        let left = wall(0.0);
        let right = wall(config.right_x);

        Self {
            left,
            right,
            thickness: config.thickness,
        }
    }
}
