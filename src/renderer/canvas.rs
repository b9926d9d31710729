//! Character-grid rasteriser
//!
//! World rectangles are mapped onto a `cols × rows` grid of cells. Anything
//! that covers part of a cell paints the whole cell, so thin platforms stay
//! visible at low resolutions.

use crossterm::style::Color;
use glam::Vec2;

use super::{Sprite, TextStyle};
use crate::sim::Biome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Black,
    };
}

/// Glyph and colours for a sprite
fn sprite_style(sprite: Sprite) -> (char, Color, Color) {
    match sprite {
        Sprite::Background(0) => (' ', Color::Grey, Color::Rgb { r: 14, g: 18, b: 42 }),
        Sprite::Background(_) => (' ', Color::Grey, Color::Rgb { r: 22, g: 14, b: 40 }),
        Sprite::Platform(biome) => {
            let fg = match biome {
                Biome::Earth => Color::Rgb { r: 130, g: 90, b: 50 },
                Biome::Water => Color::Rgb { r: 40, g: 120, b: 220 },
                Biome::Lava => Color::Rgb { r: 230, g: 80, b: 20 },
                Biome::Air => Color::Rgb { r: 210, g: 225, b: 245 },
            };
            ('█', fg, Color::Black)
        }
        Sprite::Character => ('█', Color::Rgb { r: 80, g: 220, b: 120 }, Color::Black),
        Sprite::CharacterJump => ('▒', Color::Rgb { r: 240, g: 220, b: 80 }, Color::Black),
        Sprite::CharacterGameOver => ('x', Color::Rgb { r: 230, g: 60, b: 60 }, Color::Black),
        Sprite::Wall => ('▓', Color::Rgb { r: 110, g: 110, b: 125 }, Color::Black),
        Sprite::MenuBackground => (' ', Color::White, Color::Rgb { r: 8, g: 8, b: 16 }),
    }
}

fn text_color(style: TextStyle) -> Color {
    match style {
        TextStyle::Normal => Color::White,
        TextStyle::Title => Color::Rgb { r: 255, g: 200, b: 60 },
        TextStyle::Highlight => Color::Rgb { r: 90, g: 230, b: 255 },
        TextStyle::Dim => Color::DarkGrey,
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    world: Vec2,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(world: Vec2, cols: u16, rows: u16) -> Self {
        Self {
            world,
            cols,
            rows,
            cells: vec![Cell::BLANK; usize::from(cols) * usize::from(rows)],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.cols, self.rows) {
            log::debug!("Canvas resized to {cols}x{rows}");
            *self = Self::new(self.world, cols, rows);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells
                .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        let start = usize::from(row) * usize::from(self.cols);
        self.cells
            .get(start..start + usize::from(self.cols))
            .unwrap_or(&[])
    }

    /// Cell scale along each axis
    fn scale(&self) -> Vec2 {
        Vec2::new(
            f32::from(self.cols) / self.world.x,
            f32::from(self.rows) / self.world.y,
        )
    }

    /// Cell range `[start, end)` covered by `[min, max)` on one axis
    fn span(min: f32, max: f32, scale: f32, limit: u16) -> Option<(u16, u16)> {
        let start = (min * scale).floor();
        let mut end = (max * scale).ceil();
        if end <= start {
            end = start + 1.0;
        }
        let start = start.max(0.0);
        let end = end.min(f32::from(limit));
        (start < end).then_some((start as u16, end as u16))
    }

    pub fn fill_sprite(&mut self, sprite: Sprite, top_left: Vec2, size: Vec2) {
        let scale = self.scale();
        let bottom_right = top_left + size;
        let Some((c0, c1)) = Self::span(top_left.x, bottom_right.x, scale.x, self.cols) else {
            return;
        };
        let Some((r0, r1)) = Self::span(top_left.y, bottom_right.y, scale.y, self.rows) else {
            return;
        };

        let (ch, fg, bg) = sprite_style(sprite);
        let is_background = matches!(sprite, Sprite::Background(_));
        // Stars stick to the layer so they scroll with it
        let layer_row = (top_left.y * scale.y).floor() as i32;

        for row in r0..r1 {
            for col in c0..c1 {
                let index = usize::from(row) * usize::from(self.cols) + usize::from(col);
                let glyph = if is_background
                    && (i32::from(row) - layer_row).rem_euclid(7) == 3
                    && (i32::from(col) * 5 + i32::from(row) * 3) % 11 == 0
                {
                    '.'
                } else {
                    ch
                };
                self.cells[index] = Cell { ch: glyph, fg, bg };
            }
        }
    }

    /// Write text starting at the cell under `pos`, keeping cell backgrounds
    pub fn write_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        let scale = self.scale();
        let row = (pos.y * scale.y).floor();
        let col = (pos.x * scale.x).floor();
        if row < 0.0 || row >= f32::from(self.rows) {
            return;
        }
        let row = row as usize;
        let fg = text_color(style);

        for (i, ch) in text.chars().enumerate() {
            let c = col + i as f32;
            if c < 0.0 {
                continue;
            }
            if c >= f32::from(self.cols) {
                break;
            }
            let index = row * usize::from(self.cols) + c as usize;
            let cell = &mut self.cells[index];
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Text of one row, for tests and logs
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|c| c.ch).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        // 10 world pixels per cell on both axes
        Canvas::new(Vec2::new(800.0, 400.0), 80, 40)
    }

    #[test]
    fn test_sprite_covers_touched_cells() {
        let mut c = canvas();
        c.fill_sprite(Sprite::Wall, Vec2::new(15.0, 20.0), Vec2::new(20.0, 10.0));
        assert_eq!(c.cell(1, 2).map(|x| x.ch), Some('▓'));
        assert_eq!(c.cell(3, 2).map(|x| x.ch), Some('▓'));
        assert_eq!(c.cell(4, 2).map(|x| x.ch), Some(' '));
        assert_eq!(c.cell(1, 3).map(|x| x.ch), Some(' '));
    }

    #[test]
    fn test_thin_sprite_gets_one_row() {
        let mut c = canvas();
        c.fill_sprite(Sprite::Platform(Biome::Lava), Vec2::new(100.0, 51.0), Vec2::new(50.0, 2.0));
        assert!(c.row_text(5).contains('█'));
        assert!(!c.row_text(6).contains('█'));
    }

    #[test]
    fn test_offscreen_sprites_are_clipped() {
        let mut c = canvas();
        c.fill_sprite(Sprite::Wall, Vec2::new(-100.0, -100.0), Vec2::new(50.0, 50.0));
        c.fill_sprite(Sprite::Wall, Vec2::new(900.0, 10.0), Vec2::new(50.0, 50.0));
        c.fill_sprite(Sprite::Wall, Vec2::new(-40.0, 0.0), Vec2::new(60.0, 10.0));
        assert_eq!(c.row_text(0).chars().filter(|&ch| ch == '▓').count(), 2);
    }

    #[test]
    fn test_text_keeps_background() {
        let mut c = canvas();
        c.fill_sprite(Sprite::MenuBackground, Vec2::ZERO, Vec2::new(800.0, 400.0));
        c.write_text("Score: 40", Vec2::new(10.0, 30.0), TextStyle::Normal);
        assert!(c.row_text(3).starts_with(" Score: 40"));
        let bg = sprite_style(Sprite::MenuBackground).2;
        assert_eq!(c.cell(1, 3).map(|x| x.bg), Some(bg));
    }

    #[test]
    fn test_text_clipped_at_edge() {
        let mut c = canvas();
        c.write_text("overflowing", Vec2::new(750.0, 0.0), TextStyle::Dim);
        assert!(c.row_text(0).ends_with("overf"));
        c.write_text("gone", Vec2::new(0.0, 500.0), TextStyle::Dim);
    }

    #[test]
    fn test_resize_clears() {
        let mut c = canvas();
        c.write_text("x", Vec2::ZERO, TextStyle::Normal);
        c.resize(40, 20);
        assert_eq!(c.cols(), 40);
        assert_eq!(c.row_text(0), " ".repeat(40));
    }
}
