//! Audio cues
//!
//! The terminal has one instrument: the bell. Each effect is a short pattern
//! of bells written to the output stream.

use std::io::{self, Write};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Character fell off the screen
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// The cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::Restarted | GameEvent::AutoScrollStarted | GameEvent::BiomeChanged(_) => {
                None
            }
        }
    }

    fn bells(&self) -> usize {
        match self {
            SoundEffect::GameOver => 1,
            SoundEffect::HighScore => 2,
        }
    }
}

/// Audio manager for the game
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    muted: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        Self { muted: !enabled }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect, out: &mut impl Write) -> io::Result<()> {
        if self.muted {
            return Ok(());
        }
        log::debug!("Playing {effect:?}");
        for _ in 0..effect.bells() {
            out.write_all(b"\x07")?;
        }
        out.flush()
    }

    /// Play the cues for a batch of events
    pub fn play_events(&self, events: &[GameEvent], out: &mut impl Write) -> io::Result<()> {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect, out)?;
        }
        Ok(())
    }
}
