//! Contact response for accepted (non-sensor) contacts
//!
//! The space only ever moves one side of a contact: the dynamic body. The
//! other side is kinematic (platforms) or static (walls) and is treated as
//! having infinite mass.

use glam::Vec2;

use super::aabb::Penetration;

/// Result of resolving one contact against a dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Position correction applied to the dynamic body
    pub correction: Vec2,
    /// Velocity after restitution and friction
    pub velocity: Vec2,
    /// Normal impulse magnitude (per unit mass) that was applied
    pub normal_impulse: f32,
}

/// Velocity response off a surface
///
/// Restitution: v' = v - (1 + e)(v·n)n, only when moving into the surface.
/// Friction then removes up to `friction * |Δv_n|` of the tangential speed.
pub fn resolve_velocity(velocity: Vec2, normal: Vec2, elasticity: f32, friction: f32) -> (Vec2, f32) {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        // Already separating
        return (velocity, 0.0);
    }

    let jn = -(1.0 + elasticity) * vn;
    let mut v = velocity + normal * jn;

    let tangent = normal.perp();
    let vt = v.dot(tangent);
    let max_friction = friction * jn;
    let jt = (-vt).clamp(-max_friction, max_friction);
    v += tangent * jt;

    (v, jn)
}

/// Resolve a penetration between a dynamic body and an immovable shape
///
/// `penetration.normal` must point from the immovable shape toward the body.
pub fn resolve_contact(
    velocity: Vec2,
    penetration: Penetration,
    elasticity: f32,
    friction: f32,
) -> CollisionResult {
    let (velocity, normal_impulse) =
        resolve_velocity(velocity, penetration.normal, elasticity, friction);
    CollisionResult {
        correction: penetration.normal * penetration.depth,
        velocity,
        normal_impulse,
    }
}

/// Clamp a velocity's magnitude
#[inline]
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_kills_downward_speed() {
        // Falling onto a floor (normal points up, y grows downward)
        let (v, jn) = resolve_velocity(Vec2::new(0.0, 300.0), Vec2::new(0.0, -1.0), 0.0, 0.5);
        assert!(v.y.abs() < 1e-4);
        assert!((jn - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_wall_bounce_keeps_elasticity() {
        let (v, _) = resolve_velocity(Vec2::new(-100.0, 0.0), Vec2::new(1.0, 0.0), 0.7, 0.0);
        assert!((v.x - 70.0).abs() < 1e-3);
        assert!(v.y.abs() < 1e-4);
    }

    #[test]
    fn test_separating_velocity_untouched() {
        let before = Vec2::new(20.0, -50.0);
        let (v, jn) = resolve_velocity(before, Vec2::new(0.0, -1.0), 0.5, 1.0);
        assert_eq!(v, before);
        assert_eq!(jn, 0.0);
    }

    #[test]
    fn test_friction_is_bounded_by_normal_impulse() {
        // Sliding fast with a tiny landing: friction only removes a little
        let (v, _) = resolve_velocity(Vec2::new(500.0, 10.0), Vec2::new(0.0, -1.0), 0.0, 0.5);
        assert!((v.x - 495.0).abs() < 1e-3);

        // Slow slide fully stopped
        let (v, _) = resolve_velocity(Vec2::new(2.0, 10.0), Vec2::new(0.0, -1.0), 0.0, 0.5);
        assert!(v.x.abs() < 1e-4);
    }

    #[test]
    fn test_resolve_contact_corrects_position() {
        let p = Penetration {
            normal: Vec2::new(0.0, -1.0),
            depth: 3.0,
        };
        let result = resolve_contact(Vec2::new(0.0, 40.0), p, 0.0, 0.0);
        assert_eq!(result.correction, Vec2::new(0.0, -3.0));
        assert!(result.velocity.y.abs() < 1e-4);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(3000.0, 4000.0), 3000.0);
        assert!((v.length() - 3000.0).abs() < 1e-2);
        assert_eq!(clamp_speed(Vec2::new(1.0, 1.0), 3000.0), Vec2::new(1.0, 1.0));
    }
}
