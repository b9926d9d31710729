//! Score, game over and the persisted best score

use serde::{Deserialize, Serialize};

use crate::config::{Config, ProgressionConfig};
use crate::highscores::HighScoreStore;

/// Visual theme of the platforms, chosen by the recycle counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Earth,
    Water,
    Lava,
    Air,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Earth, Biome::Water, Biome::Lava, Biome::Air];

    /// Biome for a platform counter value, `span` counts per tier
    pub fn for_counter(counter: u32, span: u32) -> Self {
        match counter / span.max(1) {
            0 => Biome::Earth,
            1 => Biome::Water,
            2 => Biome::Lava,
            3 => Biome::Air,
            _ => Biome::Earth,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Earth => "Earth",
            Biome::Water => "Water",
            Biome::Lava => "Lava",
            Biome::Air => "Air",
        }
    }
}

pub struct ProgressionTracker {
    config: ProgressionConfig,
    score: i64,
    high_score: i64,
    game_over: bool,
    store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for ProgressionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionTracker")
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("game_over", &self.game_over)
            .finish_non_exhaustive()
    }
}

impl ProgressionTracker {
    /// Reads the best score once; an unreadable store counts as 0
    pub fn new(config: &Config, mut store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Ignoring stored high score: {e}");
                0
            }
        };
        log::info!("High score: {high_score}");

        Self {
            config: config.progression,
            score: 0,
            high_score,
            game_over: false,
            store,
        }
    }

    /// Score for the current pass count; frozen once the run is over
    pub fn get_score(&mut self, counter: i64) -> i64 {
        if !self.game_over {
            self.score = counter * self.config.points_per_platform;
        }
        self.score
    }

    /// Flag game over when the character falls below the screen
    ///
    /// Returns `true` only on the frame the run ends.
    pub fn check_game_status(&mut self, character_y: f32) -> bool {
        if !self.game_over && character_y > self.config.game_over_y {
            self.game_over = true;
            log::info!("Game over with score {}", self.score);
            return true;
        }
        false
    }

    /// Persist the score if it beats the best; returns whether it did
    ///
    /// A failed save is logged and the in-memory best still updates.
    pub fn record_high_score(&mut self) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        if let Err(e) = self.store.save(self.score) {
            log::warn!("Could not save high score: {e}");
        }
        true
    }

    /// Start over from the menu; the loaded high score is kept
    pub fn new_run(&mut self) {
        self.game_over = false;
        self.score = 0;
    }

    /// Leave game over on a restart key press
    pub fn restart(&mut self, pressed: bool) -> bool {
        if !(self.game_over && pressed) {
            return false;
        }
        self.game_over = false;
        self.score = 0;
        log::info!("Restarting");
        true
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn high_score(&self) -> i64 {
        self.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn biome(&self, platform_counter: u32) -> Biome {
        Biome::for_counter(platform_counter, self.config.biome_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::highscores::{HighScoreError, InMemoryHighScores};

    fn tracker(best: i64) -> ProgressionTracker {
        ProgressionTracker::new(
            &Config::default(),
            Box::new(InMemoryHighScores::with_best(best)),
        )
    }

    /// Counts saves through a shared cell
    struct Spy {
        saved: Rc<Cell<Option<i64>>>,
        fail_load: bool,
    }

    impl HighScoreStore for Spy {
        fn load(&mut self) -> Result<i64, HighScoreError> {
            if self.fail_load {
                Err(HighScoreError::Corrupt {
                    path: "spy".into(),
                    contents: "??".into(),
                })
            } else {
                Ok(0)
            }
        }

        fn save(&mut self, score: i64) -> Result<(), HighScoreError> {
            self.saved.set(Some(score));
            Ok(())
        }
    }

    #[test]
    fn test_score_is_ten_per_platform() {
        let mut t = tracker(0);
        // Nothing landed on yet
        assert_eq!(t.get_score(-1), -10);
        assert_eq!(t.get_score(0), 0);
        assert_eq!(t.get_score(7), 70);
    }

    #[test]
    fn test_score_frozen_after_game_over() {
        let mut t = tracker(0);
        t.get_score(7);
        assert!(t.check_game_status(801.0));
        assert_eq!(t.get_score(12), 70);
    }

    #[test]
    fn test_game_over_boundary() {
        let mut t = tracker(0);
        assert!(!t.check_game_status(800.0));
        assert!(!t.is_game_over());
        assert!(t.check_game_status(800.5));
        assert!(!t.check_game_status(900.0), "only the transition reports");
        assert!(t.is_game_over());
    }

    #[test]
    fn test_high_score_saved_when_beaten() {
        let saved = Rc::new(Cell::new(None));
        let mut t = ProgressionTracker::new(
            &Config::default(),
            Box::new(Spy {
                saved: saved.clone(),
                fail_load: false,
            }),
        );
        t.get_score(25);
        assert!(t.record_high_score());
        assert_eq!(saved.get(), Some(250));
        assert_eq!(t.high_score(), 250);
    }

    #[test]
    fn test_equal_score_not_saved() {
        let mut t = tracker(70);
        t.get_score(7);
        assert!(!t.record_high_score());
        assert_eq!(t.high_score(), 70);
    }

    #[test]
    fn test_unreadable_store_counts_as_zero() {
        let t = ProgressionTracker::new(
            &Config::default(),
            Box::new(Spy {
                saved: Rc::new(Cell::new(None)),
                fail_load: true,
            }),
        );
        assert_eq!(t.high_score(), 0);
    }

    #[test]
    fn test_restart_needs_game_over_and_key() {
        let mut t = tracker(0);
        assert!(!t.restart(true));

        t.get_score(3);
        t.check_game_status(1000.0);
        assert!(!t.restart(false));
        assert!(t.restart(true));
        assert!(!t.is_game_over());
        assert_eq!(t.score(), 0);
    }

    #[test]
    fn test_biome_tiers() {
        assert_eq!(Biome::for_counter(0, 100), Biome::Earth);
        assert_eq!(Biome::for_counter(99, 100), Biome::Earth);
        assert_eq!(Biome::for_counter(100, 100), Biome::Water);
        assert_eq!(Biome::for_counter(250, 100), Biome::Lava);
        assert_eq!(Biome::for_counter(399, 100), Biome::Air);
        assert_eq!(Biome::for_counter(400, 100), Biome::Earth);
        assert_eq!(tracker(0).biome(150), Biome::Water);
    }
}
