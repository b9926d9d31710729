//! Two-layer scrolling background
//!
//! Two screen-tall layers stacked vertically. As the world scrolls down, the
//! layer that leaves the bottom of the screen is moved above the other one,
//! so the screen is always covered.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Background {
    height: f32,
    /// Scroll accumulated since the last full two-layer cycle
    offset: f32,
    cycles: u64,
}

impl Background {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            offset: 0.0,
            cycles: 0,
        }
    }

    /// Scroll by `amount` pixels (positive moves the layers down)
    pub fn advance(&mut self, amount: f32) {
        let cycle = 2.0 * self.height;
        self.offset += amount;
        if self.offset >= cycle {
            self.offset = self.offset.rem_euclid(cycle);
            self.cycles += 1;
        }
    }

    /// Top edge y of each layer
    pub fn layers(&self) -> [f32; 2] {
        let second = self.offset - self.height;
        let first = if self.offset >= self.height {
            second - self.height
        } else {
            self.offset
        };
        [first, second]
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Completed two-layer cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.cycles = 0;
    }
}
