use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width the catalog spawn offsets are laid out for.
const CANONICAL_WIDTH: usize = 10;

/// Tunable rules of a game: grid size, speed curve and scoring constants.
///
/// Missing fields take their default values when deserialized, so a config
/// file only needs to name what it changes.
///
/// # Example
///
/// ```
/// use brickfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "grid_height": 24 }"#).unwrap();
/// assert_eq!(config.grid_width, 10);
/// assert_eq!(config.grid_height, 24);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Drop interval at level 1, in milliseconds.
    pub initial_drop_ms: u64,
    /// Lower bound of the drop interval, in milliseconds.
    pub min_drop_ms: u64,
    /// Interval reduction per level, in milliseconds.
    pub speed_step_ms: u64,
    pub lines_per_level: usize,
    /// Points for clearing 1, 2, 3 and 4 lines at once, before multipliers.
    pub score_table: [usize; 4],
    /// Combo multiplier base: the `k`-th clear of a streak scores
    /// `combo_base^(k-1)` times the base points.
    pub combo_base: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 20,
            initial_drop_ms: 1000,
            min_drop_ms: 100,
            speed_step_ms: 50,
            lines_per_level: 10,
            score_table: [100, 300, 500, 800],
            combo_base: 1.5,
        }
    }
}

/// Invalid [`GameConfig`] value.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid {width}x{height} is too small (minimum 4x4)")]
    GridTooSmall { width: usize, height: usize },
    #[display("initial drop interval must be positive")]
    ZeroInitialDrop,
    #[display("minimum drop interval must be positive")]
    ZeroMinDrop,
    #[display("minimum drop interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    MinDropAboveInitial { min_ms: u64, initial_ms: u64 },
    #[display("lines per level must be positive")]
    ZeroLinesPerLevel,
    #[display("combo base must be a finite number >= 1, got {value}")]
    InvalidComboBase { value: f64 },
}

impl GameConfig {
    /// Smallest accepted grid side; an I piece must fit either way.
    pub const MIN_GRID_SIDE: usize = 4;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < Self::MIN_GRID_SIDE || self.grid_height < Self::MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.initial_drop_ms == 0 {
            return Err(ConfigError::ZeroInitialDrop);
        }
        if self.min_drop_ms == 0 {
            return Err(ConfigError::ZeroMinDrop);
        }
        if self.min_drop_ms > self.initial_drop_ms {
            return Err(ConfigError::MinDropAboveInitial {
                min_ms: self.min_drop_ms,
                initial_ms: self.initial_drop_ms,
            });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if !self.combo_base.is_finite() || self.combo_base < 1.0 {
            return Err(ConfigError::InvalidComboBase {
                value: self.combo_base,
            });
        }
        Ok(())
    }

    /// Drop interval in milliseconds at `level` (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::GameConfig;
    ///
    /// let config = GameConfig::default();
    /// assert_eq!(config.drop_interval_ms(1), 1000);
    /// assert_eq!(config.drop_interval_ms(2), 950);
    /// assert_eq!(config.drop_interval_ms(30), 100);
    /// ```
    #[must_use]
    pub fn drop_interval_ms(&self, level: usize) -> u64 {
        let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        self.initial_drop_ms
            .saturating_sub(steps.saturating_mul(self.speed_step_ms))
            .max(self.min_drop_ms)
    }

    #[must_use]
    pub fn drop_interval(&self, level: usize) -> Duration {
        Duration::from_millis(self.drop_interval_ms(level))
    }

    /// Level reached after clearing `lines` lines in total.
    #[must_use]
    pub fn level_for_lines(&self, lines: usize) -> usize {
        lines / self.lines_per_level.max(1) + 1
    }

    /// Points for clearing `lines` rows at once, before combo and level multipliers.
    ///
    /// Clears beyond the table scale linearly from the single-line value.
    #[must_use]
    pub fn base_score(&self, lines: usize) -> usize {
        match lines {
            0 => 0,
            1..=4 => self.score_table[lines - 1],
            n => n * self.score_table[0],
        }
    }

    /// Column shift applied to catalog spawn offsets so pieces spawn centered.
    #[must_use]
    pub fn spawn_shift(&self) -> i32 {
        let width = i32::try_from(self.grid_width).unwrap_or(i32::MAX);
        (width - i32::try_from(CANONICAL_WIDTH).unwrap_or(0)).div_euclid(2)
    }
}
