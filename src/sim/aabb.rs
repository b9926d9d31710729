//! Axis-aligned box geometry for bodies, platforms and walls
//!
//! Every shape in the world is axis-aligned:
//! - character: a box around the body position
//! - platforms: horizontal segments thickened by a radius
//! - walls: vertical segments thickened by a radius
//!
//! so overlap tests reduce to box-vs-box in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

/// Minimum translation needed to separate two overlapping boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit axis pointing from the other box toward this one
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub depth: f32,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centred on `center` extending `half_extents` each way
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Bounds of a segment `a`→`b` thickened by `radius`
    ///
    /// Exact for axis-aligned segments, which is all the world uses.
    pub fn from_segment(a: Vec2, b: Vec2, radius: f32) -> Self {
        let r = Vec2::splat(radius.max(0.0));
        Self::new(a.min(b) - r, a.max(b) + r)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Touching or overlapping
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Separation of `self` out of `other` along the shallower axis
    ///
    /// Returns `None` when the boxes don't touch.
    pub fn penetration(&self, other: &Aabb) -> Option<Penetration> {
        if !self.intersects(other) {
            return None;
        }

        let overlap_x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let overlap_y = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        let delta = self.center() - other.center();

        if overlap_y <= overlap_x {
            let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
            Some(Penetration {
                normal: Vec2::new(0.0, sign),
                depth: overlap_y,
            })
        } else {
            let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
            Some(Penetration {
                normal: Vec2::new(sign, 0.0),
                depth: overlap_x,
            })
        }
    }
}
