//! Minimal 2D rigid-body space
//!
//! Just enough physics for the runner:
//! - dynamic, kinematic and static bodies (no rotation)
//! - axis-aligned box and segment shapes, optionally sensors
//! - gravity and velocity damping, fixed-timestep integration
//! - contact-begin handlers registered per collision-type pair
//!
//! Contacts are tracked per shape pair. A handler runs once when a pair starts
//! touching; if it rejects the contact, the pair is ignored until the shapes
//! separate. Iteration order is by shape handle so steps are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::aabb::Aabb;
use super::collision::resolve_contact;

/// Stable handle to a body owned by a [`Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

/// Stable handle to a shape owned by a [`Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(u32);

impl BodyHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ShapeHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated under gravity and forces, pushed out of contacts
    Dynamic,
    /// Positioned externally, unaffected by forces, still produces contacts
    Kinematic,
    /// Never moves (walls)
    Static,
}

/// A rigid body (translation only)
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    force: Vec2,
}

impl Body {
    pub fn dynamic(mass: f32, position: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            velocity: Vec2::ZERO,
            mass,
            force: Vec2::ZERO,
        }
    }

    pub fn kinematic(position: Vec2) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            position,
            velocity: Vec2::ZERO,
            mass: 0.0,
            force: Vec2::ZERO,
        }
    }

    pub fn fixed(position: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            velocity: Vec2::ZERO,
            mass: 0.0,
            force: Vec2::ZERO,
        }
    }

    /// Instantaneous change of momentum (dynamic bodies only)
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.kind == BodyKind::Dynamic && self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    /// Accumulate a force for the next step; cleared after every step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.kind == BodyKind::Dynamic {
            self.force += force;
        }
    }

    pub fn reset_force(&mut self) {
        self.force = Vec2::ZERO;
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Dynamic and kinematic bodies move with the world when it scrolls
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.kind != BodyKind::Static
    }
}

/// Collision-type tag carried by every shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollisionType {
    Character,
    Platform,
    CharacterSensor,
    Wall,
}

/// Shape geometry in body-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { half_extents: Vec2 },
    Segment { a: Vec2, b: Vec2, radius: f32 },
}

impl Geometry {
    /// World-space bounds for a body at `position`
    pub fn bounds(&self, position: Vec2) -> Aabb {
        match *self {
            Geometry::Box { half_extents } => Aabb::from_center(position, half_extents),
            Geometry::Segment { a, b, radius } => Aabb::from_segment(position + a, position + b, radius),
        }
    }
}

/// A collision shape attached to a body
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub body: BodyHandle,
    pub geometry: Geometry,
    pub collision_type: CollisionType,
    /// Sensors report contacts but never push bodies apart
    pub sensor: bool,
    pub elasticity: f32,
    pub friction: f32,
}

impl Shape {
    pub fn new(body: BodyHandle, geometry: Geometry, collision_type: CollisionType) -> Self {
        Self {
            body,
            geometry,
            collision_type,
            sensor: false,
            elasticity: 0.0,
            friction: 0.0,
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }
}

/// A contact that just started, oriented to match the registered pair
///
/// `shape_a`/`body_a` carry the first collision type the handler was
/// registered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub shape_a: ShapeHandle,
    pub shape_b: ShapeHandle,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Velocity of body A relative to body B
    pub relative_velocity: Vec2,
}

/// Contact-begin callback. Return `true` to process the contact normally,
/// `false` to ignore it until the shapes separate.
pub type BeginHandler<C> = fn(&mut C, &ContactEvent) -> bool;

/// Typed handlers per collision-type pair
pub struct CollisionHandlers<C> {
    entries: Vec<(CollisionType, CollisionType, BeginHandler<C>)>,
}

impl<C> std::fmt::Debug for CollisionHandlers<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(a, b, _)| (a, b)))
            .finish()
    }
}

impl<C> Default for CollisionHandlers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CollisionHandlers<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` for contacts between `a` and `b` (either order)
    pub fn add(&mut self, a: CollisionType, b: CollisionType, handler: BeginHandler<C>) {
        self.entries.retain(|&(x, y, _)| !(x == a && y == b));
        self.entries.push((a, b, handler));
    }

    /// Handler for a pair plus whether the shapes must be swapped to match it
    fn find(&self, a: CollisionType, b: CollisionType) -> Option<(BeginHandler<C>, bool)> {
        self.entries.iter().find_map(|&(x, y, handler)| {
            if x == a && y == b {
                Some((handler, false))
            } else if x == b && y == a {
                Some((handler, true))
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The physics world
#[derive(Debug, Clone)]
pub struct Space {
    pub gravity: Vec2,
    /// Fraction of velocity kept per second
    pub damping: f32,
    bodies: Vec<Body>,
    shapes: Vec<Shape>,
    /// Shape pairs currently touching, with the begin handler's verdict
    contacts: BTreeMap<(ShapeHandle, ShapeHandle), bool>,
}

impl Space {
    pub fn new(gravity: Vec2, damping: f32) -> Self {
        Self {
            gravity,
            damping,
            bodies: Vec::new(),
            shapes: Vec::new(),
            contacts: BTreeMap::new(),
        }
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(body);
        handle
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        debug_assert!(shape.body.index() < self.bodies.len(), "shape attached to unknown body");
        let handle = ShapeHandle(self.shapes.len() as u32);
        self.shapes.push(shape);
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.index()]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        &mut self.bodies[handle.index()]
    }

    pub fn shape(&self, handle: ShapeHandle) -> &Shape {
        &self.shapes[handle.index()]
    }

    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        self.body(handle).position
    }

    pub fn velocity(&self, handle: BodyHandle) -> Vec2 {
        self.body(handle).velocity
    }

    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        self.body_mut(handle).position = position;
    }

    /// Reshape a segment in place (platforms change width when recycled)
    pub fn set_segment(&mut self, handle: ShapeHandle, a: Vec2, b: Vec2) {
        let shape = &mut self.shapes[handle.index()];
        if let Geometry::Segment { radius, .. } = shape.geometry {
            shape.geometry = Geometry::Segment { a, b, radius };
        }
    }

    /// World-space bounds of a shape
    pub fn shape_bounds(&self, handle: ShapeHandle) -> Aabb {
        self.bounds_of(self.shape(handle))
    }

    fn bounds_of(&self, shape: &Shape) -> Aabb {
        shape.geometry.bounds(self.body(shape.body).position)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of shape pairs currently touching
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Shift every dynamic and kinematic body vertically
    pub fn translate_movable(&mut self, dy: f32) {
        for body in self.bodies.iter_mut().filter(|b| b.is_movable()) {
            body.position.y += dy;
        }
    }

    /// Forget all tracked contacts so touching pairs fire `begin` again
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// Advance the space by one fixed timestep
    pub fn step<C>(&mut self, dt: f32, handlers: &CollisionHandlers<C>, ctx: &mut C) {
        let damping = self.damping.powf(dt);
        let gravity = self.gravity;

        for body in &mut self.bodies {
            match body.kind {
                BodyKind::Dynamic => {
                    let accel = if body.mass > 0.0 {
                        body.force / body.mass
                    } else {
                        Vec2::ZERO
                    };
                    body.velocity = body.velocity * damping + (gravity + accel) * dt;
                    body.position += body.velocity * dt;
                }
                BodyKind::Kinematic => {
                    body.position += body.velocity * dt;
                }
                BodyKind::Static => {}
            }
            body.force = Vec2::ZERO;
        }

        self.update_contacts(handlers, ctx);
    }

    fn update_contacts<C>(&mut self, handlers: &CollisionHandlers<C>, ctx: &mut C) {
        let mut touching = BTreeSet::new();

        for i in 0..self.shapes.len() {
            for j in (i + 1)..self.shapes.len() {
                let (a, b) = (self.shapes[i], self.shapes[j]);
                if a.body == b.body {
                    continue;
                }
                let kind_a = self.body(a.body).kind;
                let kind_b = self.body(b.body).kind;
                if kind_a != BodyKind::Dynamic && kind_b != BodyKind::Dynamic {
                    continue;
                }
                if !self.bounds_of(&a).intersects(&self.bounds_of(&b)) {
                    continue;
                }

                let key = (ShapeHandle(i as u32), ShapeHandle(j as u32));
                touching.insert(key);

                let accepted = match self.contacts.get(&key) {
                    Some(&accepted) => accepted,
                    None => {
                        let accepted = self.begin_contact(key, handlers, ctx);
                        self.contacts.insert(key, accepted);
                        accepted
                    }
                };

                if accepted && !a.sensor && !b.sensor {
                    self.separate(a, b);
                }
            }
        }

        self.contacts.retain(|key, _| touching.contains(key));
    }

    fn begin_contact<C>(
        &self,
        (first, second): (ShapeHandle, ShapeHandle),
        handlers: &CollisionHandlers<C>,
        ctx: &mut C,
    ) -> bool {
        let (a, b) = (self.shape(first), self.shape(second));
        let Some((handler, swapped)) = handlers.find(a.collision_type, b.collision_type) else {
            return true;
        };

        let (shape_a, shape_b) = if swapped { (second, first) } else { (first, second) };
        let body_a = self.shape(shape_a).body;
        let body_b = self.shape(shape_b).body;
        let event = ContactEvent {
            shape_a,
            shape_b,
            body_a,
            body_b,
            relative_velocity: self.velocity(body_a) - self.velocity(body_b),
        };

        let accepted = handler(ctx, &event);
        log::trace!(
            "contact begin {:?}/{:?} -> {}",
            self.shape(shape_a).collision_type,
            self.shape(shape_b).collision_type,
            accepted
        );
        accepted
    }

    /// Push the dynamic side(s) of an accepted contact apart
    fn separate(&mut self, a: Shape, b: Shape) {
        let kind_a = self.body(a.body).kind;
        let kind_b = self.body(b.body).kind;
        let elasticity = a.elasticity * b.elasticity;
        let friction = a.friction * b.friction;

        match (kind_a, kind_b) {
            (BodyKind::Dynamic, BodyKind::Dynamic) => {
                // Positions only; dynamic-vs-dynamic never happens in the game
                if let Some(pen) = self.bounds_of(&a).penetration(&self.bounds_of(&b)) {
                    let half = pen.normal * (pen.depth * 0.5);
                    self.body_mut(a.body).position += half;
                    self.body_mut(b.body).position -= half;
                }
            }
            (BodyKind::Dynamic, _) => self.push_out(a, b, elasticity, friction),
            (_, BodyKind::Dynamic) => self.push_out(b, a, elasticity, friction),
            _ => {}
        }
    }

    fn push_out(&mut self, moving: Shape, fixed: Shape, elasticity: f32, friction: f32) {
        let Some(pen) = self.bounds_of(&moving).penetration(&self.bounds_of(&fixed)) else {
            return;
        };
        let fixed_velocity = self.velocity(fixed.body);
        let body = self.body_mut(moving.body);
        let result = resolve_contact(body.velocity - fixed_velocity, pen, elasticity, friction);
        body.position += result.correction;
        body.velocity = result.velocity + fixed_velocity;
    }
}
