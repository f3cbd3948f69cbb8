pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// The piece would overlap the grid boundary or a locked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the grid")]
pub struct PieceCollisionError;

/// Reasons a player action on a [`GameSession`] was rejected.
///
/// A rejected action never changes the session state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SessionError {
    #[display("session is not running")]
    NotRunning,
    #[display("piece colliding when applying action")]
    #[from]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}
