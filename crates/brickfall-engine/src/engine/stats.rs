use serde::{Deserialize, Serialize};

use super::config::GameConfig;

/// Game statistics: score, level, lines, combo and high score.
///
/// # Scoring
///
/// Clearing `n` rows in one lock scores
/// `floor(base(n) * combo_base^(combo-1) * level)`, where `combo` counts the
/// consecutive clearing locks including this one and `level` is the level
/// *after* the cleared lines were counted. A lock that clears nothing resets
/// the combo to 0.
///
/// # Example
///
/// ```
/// use brickfall_engine::{GameConfig, GameStats};
///
/// let config = GameConfig::default();
/// let mut stats = GameStats::new();
/// stats.record_lock(4, &config); // four rows at once
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    lines: usize,
    combo: usize,
    high_score: usize,
    high_score_beaten: bool,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of recording a locked piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared_lines: usize,
    /// Combo count after this lock (0 if nothing was cleared).
    pub combo: usize,
    pub points: usize,
    /// New level if this lock raised it.
    pub level_up: Option<usize>,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_high_score(0)
    }

    /// Creates fresh statistics carrying a previously stored high score.
    #[must_use]
    pub const fn with_high_score(high_score: usize) -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            high_score,
            high_score_beaten: false,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Total number of cleared lines.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub const fn combo(&self) -> usize {
        self.combo
    }

    #[must_use]
    pub const fn high_score(&self) -> usize {
        self.high_score
    }

    /// Whether the score has exceeded the high score this game was started with.
    #[must_use]
    pub const fn high_score_beaten(&self) -> bool {
        self.high_score_beaten
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by cleared line count.
    ///
    /// Index `n` counts locks that cleared `n` lines; clears of more than 4
    /// lines are counted in the last slot.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece has been locked and `cleared_lines`
    /// rows were removed.
    pub fn record_lock(&mut self, cleared_lines: usize, config: &GameConfig) -> LockOutcome {
        self.completed_pieces += 1;
        let slot = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[slot] += 1;

        if cleared_lines == 0 {
            self.combo = 0;
            return LockOutcome {
                cleared_lines,
                combo: 0,
                points: 0,
                level_up: None,
            };
        }

        self.combo += 1;
        self.lines += cleared_lines;
        let new_level = config.level_for_lines(self.lines);
        let level_up = (new_level > self.level).then_some(new_level);
        self.level = self.level.max(new_level);

        let points = clear_points(
            config.base_score(cleared_lines),
            self.combo,
            config.combo_base,
            self.level,
        );
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.high_score_beaten = true;
        }

        LockOutcome {
            cleared_lines,
            combo: self.combo,
            points,
            level_up,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn clear_points(base: usize, combo: usize, combo_base: f64, level: usize) -> usize {
    let exponent = i32::try_from(combo.saturating_sub(1)).unwrap_or(i32::MAX);
    (base as f64 * combo_base.powi(exponent) * level as f64).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_single_line_at_level_one() {
        let mut stats = GameStats::new();
        let outcome = stats.record_lock(1, &config());
        assert_eq!(outcome.points, 100);
        assert_eq!(outcome.combo, 1);
        assert_eq!(stats.score(), 100);
    }

    #[test]
    fn test_four_lines_first_in_streak() {
        let mut stats = GameStats::new();
        stats.record_lock(4, &config());
        assert_eq!(stats.score(), 800);
    }

    #[test]
    fn test_score_saturates_on_huge_multiplier() {
        let config = GameConfig {
            combo_base: 1e6,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        let mut stats = GameStats::new();
        for _ in 0..6 {
            stats.record_lock(1, &config);
        }
        assert_eq!(stats.score(), usize::MAX);
        assert_eq!(stats.high_score(), usize::MAX);
        assert_eq!(stats.combo(), 6);
    }

    #[test]
    fn test_combo_multiplier() {
        let mut stats = GameStats::new();
        stats.record_lock(1, &config());
        let second = stats.record_lock(1, &config());
        assert_eq!(second.points, 150);
        let third = stats.record_lock(1, &config());
        assert_eq!(third.points, 225);
        assert_eq!(stats.combo(), 3);

        let miss = stats.record_lock(0, &config());
        assert_eq!(miss.points, 0);
        assert_eq!(stats.combo(), 0);
        assert_eq!(stats.record_lock(1, &config()).points, 100);
    }

    #[test]
    fn test_level_up_applies_to_clearing_lock() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.record_lock(1, &config());
            stats.record_lock(0, &config());
        }
        assert_eq!(stats.lines(), 9);
        assert_eq!(stats.level(), 1);
        let before = stats.score();
        let outcome = stats.record_lock(1, &config());
        assert_eq!(outcome.level_up, Some(2));
        assert_eq!(stats.level(), 2);
        assert_eq!(outcome.points, 200);
        assert_eq!(stats.score(), before + 200);
    }

    #[test]
    fn test_leveling_after_hundred_lines() {
        let mut stats = GameStats::new();
        for _ in 0..25 {
            stats.record_lock(4, &config());
            stats.record_lock(0, &config());
        }
        assert_eq!(stats.lines(), 100);
        assert_eq!(stats.level(), 11);
        assert_eq!(config().drop_interval_ms(stats.level()), 500);
    }

    #[test]
    fn test_high_score_tracking() {
        let mut stats = GameStats::with_high_score(250);
        stats.record_lock(1, &config());
        assert_eq!(stats.high_score(), 250);
        assert!(!stats.high_score_beaten());
        stats.record_lock(1, &config());
        assert_eq!(stats.score(), 250);
        assert!(!stats.high_score_beaten());
        stats.record_lock(1, &config());
        assert_eq!(stats.high_score(), stats.score());
        assert!(stats.high_score_beaten());
    }

    #[test]
    fn test_line_cleared_counter() {
        let mut stats = GameStats::new();
        for lines in [0, 1, 2, 3, 4, 5, 0] {
            stats.record_lock(lines, &config());
        }
        assert_eq!(stats.completed_pieces(), 7);
        assert_eq!(stats.line_cleared_counter(), &[2, 1, 1, 1, 2]);
    }
}
