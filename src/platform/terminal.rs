//! Terminal session lifetime
//!
//! Raw mode, the alternate screen and the keyboard protocol are switched on
//! in [`TerminalSession::enter`] and restored on drop, including on error
//! paths out of `main`.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use super::input::KeyboardState;

/// Each flag records a terminal change that drop has to undo
#[derive(Debug, Default)]
pub struct TerminalSession {
    raw_mode: bool,
    alternate_screen: bool,
    enhanced_keyboard: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        // Dropped on any early return below, undoing what was set so far
        let mut session = Self::default();
        enable_raw_mode()?;
        session.raw_mode = true;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        session.alternate_screen = true;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            session.enhanced_keyboard = true;
        }
        log::info!(
            "Terminal ready ({} key releases)",
            if session.enhanced_keyboard { "with" } else { "without" }
        );
        Ok(session)
    }

    /// Whether the terminal reports key releases
    pub fn reports_release(&self) -> bool {
        self.enhanced_keyboard
    }

    /// Drain pending terminal events into the keyboard state
    pub fn poll_input(&self, keyboard: &mut KeyboardState) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                keyboard.handle_event(&key);
            }
        }
        Ok(())
    }

    /// Undo the recorded changes, writing escape sequences to `out`
    fn restore(&mut self, out: &mut impl Write) -> io::Result<()> {
        if std::mem::take(&mut self.enhanced_keyboard) {
            execute!(out, PopKeyboardEnhancementFlags)?;
        }
        if std::mem::take(&mut self.alternate_screen) {
            execute!(out, Show, LeaveAlternateScreen)?;
        }
        if std::mem::take(&mut self.raw_mode) {
            disable_raw_mode()?;
        }
        out.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.restore(&mut io::stdout()) {
            log::error!("Failed to restore terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_undoes_only_recorded_steps() {
        let mut session = TerminalSession {
            raw_mode: false,
            alternate_screen: true,
            enhanced_keyboard: false,
        };
        let mut out = Vec::new();
        session.restore(&mut out).expect("write to vec");
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains("\x1b[?1049l"), "left alternate screen: {written:?}");
        assert!(written.contains("\x1b[?25h"), "cursor shown: {written:?}");
        assert!(!written.contains("\x1b[<1u"), "no keyboard flags popped");
    }

    #[test]
    fn test_restore_runs_once() {
        let mut session = TerminalSession {
            raw_mode: false,
            alternate_screen: true,
            enhanced_keyboard: true,
        };
        let mut out = Vec::new();
        session.restore(&mut out).expect("write to vec");
        assert!(!out.is_empty());

        out.clear();
        session.restore(&mut out).expect("write to vec");
        assert!(out.is_empty());
    }

    #[test]
    fn test_nothing_entered_nothing_restored() {
        let mut out = Vec::new();
        TerminalSession::default()
            .restore(&mut out)
            .expect("write to vec");
        assert!(out.is_empty());
    }
}
