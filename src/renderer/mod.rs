//! Rendering module
//!
//! The game draws through the [`Renderer`] trait in world pixels (y grows
//! downward). [`scene`] turns game state into draw calls; [`canvas`] and
//! [`terminal`] rasterise them into a coloured character grid.

pub mod canvas;
pub mod scene;
pub mod terminal;

use std::io;

use glam::Vec2;

pub use canvas::{Canvas, Cell};
pub use terminal::TerminalRenderer;

use crate::sim::Biome;

/// Everything the game knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// One of the two scrolling background layers
    Background(u8),
    Platform(Biome),
    Character,
    CharacterJump,
    CharacterGameOver,
    Wall,
    MenuBackground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Title,
    Highlight,
    Dim,
}

/// Drawing surface
pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self);
    /// Draw `sprite` scaled to the rectangle at `top_left` with `size`
    fn draw_sprite(&mut self, sprite: Sprite, top_left: Vec2, size: Vec2);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle);
    /// Show the finished frame
    fn present(&mut self) -> io::Result<()>;
}
