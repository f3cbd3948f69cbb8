use std::path::{Path, PathBuf};

use brickfall_engine::GameSummary;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::util;

const HIGH_SCORE_FILE: &str = "high_score.json";
const LAST_GAME_FILE: &str = "last_game.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: usize,
}

/// Result of the most recently finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub last_score: usize,
    pub last_lines: usize,
    pub last_level: usize,
    pub high_score: usize,
    /// Timestamp when the game ended (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
}

/// JSON files holding the high score and the last game result.
///
/// Reads never fail: a missing file means "nothing stored yet", and an
/// unreadable or corrupt file is logged and treated the same way.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    dir: PathBuf,
}

impl ScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn load<T>(&self, file_kind: &str, path: &Path) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !path.exists() {
            return None;
        }
        match util::read_json_file(file_kind, path) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring stored {file_kind}: {e:#}");
                None
            }
        }
    }

    pub fn load_high_score(&self) -> usize {
        self.load::<HighScoreRecord>("high score", &self.path(HIGH_SCORE_FILE))
            .map_or(0, |record| record.high_score)
    }

    pub fn load_last_game(&self) -> Option<GameRecord> {
        self.load("last game", &self.path(LAST_GAME_FILE))
    }

    pub fn save_high_score(&self, high_score: usize) -> anyhow::Result<()> {
        util::write_json_file(&HighScoreRecord { high_score }, self.path(HIGH_SCORE_FILE))
    }

    /// Stores the result of a finished game, stamped with the current time.
    pub fn save_game(&self, summary: &GameSummary) -> anyhow::Result<GameRecord> {
        let record = GameRecord {
            last_score: summary.score,
            last_lines: summary.lines,
            last_level: summary.level,
            high_score: summary.high_score,
            recorded_at: Utc::now(),
        };
        util::write_json_file(&record, self.path(LAST_GAME_FILE))?;
        Ok(record)
    }
}
