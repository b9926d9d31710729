//! Crossterm backend
//!
//! Draw calls land in a [`Canvas`] sized to the terminal; `present` writes
//! the grid out row by row, switching colours only where they change.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal;
use glam::Vec2;

use super::{Canvas, Renderer, Sprite, TextStyle};

pub struct TerminalRenderer {
    canvas: Canvas,
    out: BufWriter<Stdout>,
}

impl TerminalRenderer {
    /// Renderer mapping a `world` sized screen onto the whole terminal
    pub fn new(world: Vec2) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        log::info!("Terminal renderer {cols}x{rows} for {}x{} world", world.x, world.y);
        Ok(Self {
            canvas: Canvas::new(world, cols, rows),
            out: BufWriter::new(io::stdout()),
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Raw output stream, for bells and other out-of-band writes
    pub fn output(&mut self) -> &mut impl Write {
        &mut self.out
    }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self) {
        match terminal::size() {
            Ok((cols, rows)) => self.canvas.resize(cols, rows),
            Err(e) => log::warn!("Could not read terminal size: {e}"),
        }
        self.canvas.clear();
    }

    fn draw_sprite(&mut self, sprite: Sprite, top_left: Vec2, size: Vec2) {
        self.canvas.fill_sprite(sprite, top_left, size);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.canvas.write_text(text, pos, style);
    }

    fn present(&mut self) -> io::Result<()> {
        let mut colors: Option<(Color, Color)> = None;
        let mut run = String::new();

        for row in 0..self.canvas.rows() {
            queue!(self.out, MoveTo(0, row))?;
            for cell in self.canvas.row(row) {
                if colors != Some((cell.fg, cell.bg)) {
                    if !run.is_empty() {
                        queue!(self.out, Print(&run))?;
                        run.clear();
                    }
                    queue!(
                        self.out,
                        SetForegroundColor(cell.fg),
                        SetBackgroundColor(cell.bg)
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                queue!(self.out, Print(&run))?;
                run.clear();
            }
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}
