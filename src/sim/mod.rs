//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by handle or platform id)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod background;
pub mod character;
pub mod collision;
pub mod contact;
pub mod platforms;
pub mod progression;
pub mod scroll;
pub mod space;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, Penetration};
pub use background::Background;
pub use character::{Character, Walls};
pub use collision::{CollisionResult, clamp_speed, resolve_contact};
pub use contact::{ContactResolver, GroundState};
pub use platforms::{Platform, PlatformId, PlatformPool};
pub use progression::{Biome, ProgressionTracker};
pub use scroll::ScrollController;
pub use space::{
    Body, BodyHandle, BodyKind, CollisionHandlers, CollisionType, ContactEvent, Geometry, Shape,
    ShapeHandle, Space,
};
pub use state::{GameEvent, GamePhase, GameState, World};
pub use tick::{TickInput, tick};
