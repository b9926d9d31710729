//! Best-score persistence
//!
//! The best score is a single decimal integer in a text file. The store is a
//! trait so the game can run against memory in tests.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score file {path} holds {contents:?}, not an integer")]
    Corrupt { path: PathBuf, contents: String },
}

/// Somewhere to keep the best score between sessions
pub trait HighScoreStore {
    fn load(&mut self) -> Result<i64, HighScoreError>;
    fn save(&mut self, score: i64) -> Result<(), HighScoreError>;
}

/// Text-file store; the file is created holding `0` if it doesn't exist
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HighScoreError> {
        let store = Self { path: path.into() };
        match fs::metadata(&store.path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Creating high score file {}", store.path.display());
                store.write(0)?;
            }
            Err(source) => return Err(store.io_error(source)),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HighScoreError {
        HighScoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write(&self, score: i64) -> Result<(), HighScoreError> {
        fs::write(&self.path, score.to_string()).map_err(|e| self.io_error(e))
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&mut self) -> Result<i64, HighScoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        contents
            .trim()
            .parse()
            .map_err(|_| HighScoreError::Corrupt {
                path: self.path.clone(),
                contents,
            })
    }

    fn save(&mut self, score: i64) -> Result<(), HighScoreError> {
        self.write(score)?;
        log::info!("High score {score} saved to {}", self.path.display());
        Ok(())
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct InMemoryHighScores {
    pub best: i64,
    pub saves: u32,
}

impl InMemoryHighScores {
    pub fn with_best(best: i64) -> Self {
        Self { best, saves: 0 }
    }
}

impl HighScoreStore for InMemoryHighScores {
    fn load(&mut self) -> Result<i64, HighScoreError> {
        Ok(self.best)
    }

    fn save(&mut self, score: i64) -> Result<(), HighScoreError> {
        self.best = score;
        self.saves += 1;
        Ok(())
    }
}
