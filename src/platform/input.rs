//! Keyboard state
//!
//! Terminals differ in what they report. With the kitty keyboard protocol we
//! get real press/release events; otherwise only presses and auto-repeats
//! arrive, so a press keeps the key held for a few frames.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::TickInput;

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Up,
    Down,
    Enter,
    Escape,
    Mute,
}

impl Key {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }

    /// Map a terminal key code (arrows, WASD, space, enter, escape, m)
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
            KeyCode::Char(' ') => Some(Key::Jump),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc | KeyCode::Char('q') => Some(Key::Escape),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(Key::Mute),
            _ => None,
        }
    }
}

/// Which keys are down for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub up: bool,
    pub down: bool,
    pub enter: bool,
    pub escape: bool,
    /// Toggle sound
    pub mute: bool,
}

impl InputSnapshot {
    fn from_flags(flags: [bool; Key::COUNT]) -> Self {
        Self {
            left: flags[Key::Left.index()],
            right: flags[Key::Right.index()],
            jump: flags[Key::Jump.index()],
            up: flags[Key::Up.index()],
            down: flags[Key::Down.index()],
            enter: flags[Key::Enter.index()],
            escape: flags[Key::Escape.index()],
            mute: flags[Key::Mute.index()],
        }
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Input for one frame: keys held, and keys newly pressed this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub held: InputSnapshot,
    pub pressed: InputSnapshot,
}

#[derive(Debug, Clone)]
pub struct KeyboardState {
    /// Frames left before a key counts as released; `u32::MAX` while held
    /// on terminals that report releases
    held: [u32; Key::COUNT],
    pressed: [bool; Key::COUNT],
    reports_release: bool,
    hold_frames: u32,
}

impl KeyboardState {
    pub fn new(reports_release: bool, hold_frames: u32) -> Self {
        Self {
            held: [0; Key::COUNT],
            pressed: [false; Key::COUNT],
            reports_release,
            hold_frames: hold_frames.max(1),
        }
    }

    pub fn press(&mut self, key: Key) {
        let i = key.index();
        if self.held[i] == 0 {
            self.pressed[i] = true;
        }
        self.held[i] = if self.reports_release {
            u32::MAX
        } else {
            self.hold_frames
        };
    }

    pub fn release(&mut self, key: Key) {
        self.held[key.index()] = 0;
    }

    /// Feed one terminal key event; returns the key it mapped to
    pub fn handle_event(&mut self, event: &KeyEvent) -> Option<Key> {
        let key = if event.modifiers.contains(KeyModifiers::CONTROL)
            && event.code == KeyCode::Char('c')
        {
            Key::Escape
        } else {
            Key::from_code(event.code)?
        };

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(key),
            KeyEventKind::Release => self.release(key),
        }
        Some(key)
    }

    /// Sample this frame's input and age the latched keys
    pub fn frame(&mut self) -> FrameInput {
        let input = FrameInput {
            held: InputSnapshot::from_flags(self.held.map(|frames| frames > 0)),
            pressed: InputSnapshot::from_flags(self.pressed),
        };

        self.pressed = [false; Key::COUNT];
        if !self.reports_release {
            for frames in &mut self.held {
                *frames = frames.saturating_sub(1);
            }
        }
        input
    }

    pub fn reports_release(&self) -> bool {
        self.reports_release
    }
}
