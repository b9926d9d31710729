//! Platform abstraction layer
//!
//! Handles the native terminal for:
//! - Raw mode / alternate screen lifetime
//! - Keyboard events and per-frame input snapshots
//! - Frame pacing

pub mod input;
pub mod terminal;
pub mod time;

pub use input::{FrameInput, InputSnapshot, Key, KeyboardState};
pub use terminal::TerminalSession;
pub use time::FrameClock;
