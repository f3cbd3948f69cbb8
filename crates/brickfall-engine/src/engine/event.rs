use serde::{Deserialize, Serialize};

/// Final numbers of a finished game, handed to persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: usize,
    pub lines: usize,
    pub level: usize,
    pub high_score: usize,
}

/// Notifications queued by a [`GameSession`](super::GameSession).
///
/// Only successful actions produce events; rejected moves are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    HardDropped { distance: usize },
    LinesCleared { count: usize, combo: usize, points: usize },
    LevelUp { level: usize },
    HoldUsed,
    Paused,
    Resumed,
    GameOver { summary: GameSummary },
}
