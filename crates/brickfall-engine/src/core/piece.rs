use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::PieceCollisionError;

use super::catalog::{KickOffset, PieceKind, ShapeMatrix, WallKickTable};

/// A falling piece (tetromino): kind, rotation and position on the grid.
///
/// Unlike locked cells, a `Piece` knows nothing about the grid it moves on.
/// Translation is unconditional and rotation asks a [`CollisionChecker`] which
/// wall-kick candidate to accept, so callers decide what "valid" means.
///
/// # Coordinate System
///
/// - `position` is the top-left corner of the shape matrix in grid coordinates
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while the piece is partially above the grid
///
/// # Example
///
/// ```
/// use brickfall_engine::{Piece, PieceKind, RotationDirection};
///
/// let mut piece = Piece::new(PieceKind::T);
/// piece.move_by(1, 0);
/// let kick = piece.rotate(RotationDirection::Clockwise, &|_: &Piece| true).unwrap();
/// assert_eq!(kick, (0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: Position,
    spawn_position: Position,
}

impl Piece {
    /// Creates a piece at its catalog spawn offset (10-wide grid layout).
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self::with_spawn_shift(kind, 0)
    }

    /// Creates a piece whose spawn position is shifted `dx` columns from the
    /// catalog spawn offset. Used for grids wider or narrower than 10.
    #[must_use]
    pub fn with_spawn_shift(kind: PieceKind, dx: i32) -> Self {
        let spawn_position = kind.shape().spawn_offset().offset(dx, 0);
        Self {
            kind,
            rotation: PieceRotation::default(),
            position: spawn_position,
            spawn_position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn spawn_position(&self) -> Position {
        self.spawn_position
    }

    /// Occupancy matrix for the current rotation.
    #[must_use]
    pub fn matrix(&self) -> &'static ShapeMatrix {
        self.kind.shape().matrix(self.rotation)
    }

    /// Absolute grid cells occupied by this piece, in row-major order.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<Position, 4> {
        self.matrix()
            .occupied_cells()
            .map(|(x, y)| self.position.offset(to_i32(x), to_i32(y)))
            .collect()
    }

    /// Shifts the piece without any validity check.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    /// Returns a copy of this piece shifted by `(dx, dy)`.
    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        let mut piece = *self;
        piece.move_by(dx, dy);
        piece
    }

    /// Moves the piece back to its spawn position. Rotation is kept.
    pub fn reset_position(&mut self) {
        self.position = self.spawn_position;
    }

    /// Rotates the piece one step, resolving collisions with wall kicks.
    ///
    /// Candidates from the [`WallKickTable`] are tried in order and the first
    /// one accepted by `checker` is kept; its offset is returned. When every
    /// candidate is rejected the piece is left exactly as it was.
    pub fn rotate<C>(
        &mut self,
        direction: RotationDirection,
        checker: &C,
    ) -> Result<KickOffset, PieceCollisionError>
    where
        C: CollisionChecker + ?Sized,
    {
        let original = *self;
        let from = self.rotation;
        let to = from.rotated(direction);
        self.rotation = to;
        for &(dx, dy) in WallKickTable::candidates(self.kind.kick_family(), from, to) {
            self.position = original.position.offset(dx, dy);
            if checker.is_valid(self) {
                return Ok((dx, dy));
            }
        }
        *self = original;
        Err(PieceCollisionError)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn to_i32(n: usize) -> i32 {
    n as i32
}

/// Validity predicate consulted while placing a piece.
///
/// Any `Fn(&Piece) -> bool` closure is a checker, which makes it easy to test
/// rotation geometry against always-valid or always-invalid predicates.
pub trait CollisionChecker {
    /// Returns `true` if `piece` may occupy its current cells.
    fn is_valid(&self, piece: &Piece) -> bool;
}

impl<F> CollisionChecker for F
where
    F: Fn(&Piece) -> bool,
{
    fn is_valid(&self, piece: &Piece) -> bool {
        self(piece)
    }
}

/// Position on the grid. Coordinates may lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation direction requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4 for every kind, including those
/// with fewer visually distinct orientations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(n: u8) -> Self {
        Self(n % 4)
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => self.rotated_right(),
            RotationDirection::CounterClockwise => self.rotated_left(),
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}
