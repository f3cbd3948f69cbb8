use serde::{Deserialize, Serialize};

use super::piece::{PieceRotation, Position};

/// Enum representing the type of piece.
///
/// The discriminant order is also the grid cell code order: `I` is stored as
/// `1` and `Z` as `7` (see [`PieceKind::code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in catalog order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns the static catalog entry for this kind.
    #[must_use]
    pub const fn shape(self) -> &'static PieceShape {
        &PIECE_SHAPES[self as usize]
    }

    /// Returns the grid cell code (1..=7) written when a piece of this kind locks.
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.code(), 1);
    /// assert_eq!(PieceKind::Z.code(), 7);
    /// ```
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Self::code`]. Returns `None` for `0` and unknown codes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::L),
            5 => Some(PieceKind::J),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Kick family used to look up wall-kick candidates.
    #[must_use]
    pub const fn kick_family(self) -> KickFamily {
        match self {
            PieceKind::I => KickFamily::I,
            PieceKind::O => KickFamily::O,
            _ => KickFamily::Standard,
        }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color triple used by renderers: face, highlight and shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceColor {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub dark: Rgb,
}

/// Square occupancy matrix of a piece, stored in a 4×4 box.
///
/// Only the top-left `size`×`size` region is meaningful; cells outside it are
/// always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatrix {
    size: usize,
    cells: [[bool; 4]; 4],
}

impl ShapeMatrix {
    const fn new(size: usize, cells: [[bool; 4]; 4]) -> Self {
        assert!(size >= 1 && size <= 4);
        Self { size, cells }
    }

    /// Side length of the matrix (4 for I, 2 for O, 3 for the others).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[y][x]
    }

    /// Returns the rows of the matrix, each `size` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.size].iter().map(|row| &row[..self.size])
    }

    /// Returns the occupied `(x, y)` cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &cell)| cell.then_some((x, y)))
        })
    }

    /// Rotates the matrix 90° clockwise (transpose, then reverse each row).
    ///
    /// Applying it four times yields the original matrix.
    #[must_use]
    pub const fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                cells[y][x] = self.cells[n - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        Self { size: n, cells }
    }
}

/// Immutable catalog entry for a piece kind.
#[derive(Debug, Clone, Copy)]
pub struct PieceShape {
    kind: PieceKind,
    rotations: [ShapeMatrix; 4],
    rotation_states: u8,
    spawn_offset: Position,
    color: PieceColor,
}

impl PieceShape {
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Spawn orientation matrix.
    #[must_use]
    pub const fn base(&self) -> &ShapeMatrix {
        &self.rotations[0]
    }

    /// Matrix for the given rotation, precomputed at compile time.
    #[must_use]
    pub const fn matrix(&self, rotation: PieceRotation) -> &ShapeMatrix {
        &self.rotations[rotation.as_usize()]
    }

    /// Number of visually distinct orientations (O: 1, I/S/Z: 2, T/L/J: 4).
    #[must_use]
    pub const fn rotation_states(&self) -> u8 {
        self.rotation_states
    }

    /// Top-left position of the matrix when the piece spawns on a 10-wide grid.
    #[must_use]
    pub const fn spawn_offset(&self) -> Position {
        self.spawn_offset
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }
}

const fn rotations(base: ShapeMatrix) -> [ShapeMatrix; 4] {
    let mut rotates = [base; 4];
    let mut i = 1;
    while i < 4 {
        rotates[i] = rotates[i - 1].rotated_cw();
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    const fn entry(
        kind: PieceKind,
        base: ShapeMatrix,
        rotation_states: u8,
        spawn_x: i32,
        color: [[u8; 3]; 3],
    ) -> PieceShape {
        const fn rgb(c: [u8; 3]) -> Rgb {
            Rgb(c[0], c[1], c[2])
        }
        PieceShape {
            kind,
            rotations: rotations(base),
            rotation_states,
            spawn_offset: Position::new(spawn_x, 0),
            color: PieceColor {
                primary: rgb(color[0]),
                secondary: rgb(color[1]),
                dark: rgb(color[2]),
            },
        }
    }

    [
        entry(
            PieceKind::I,
            ShapeMatrix::new(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
            2,
            3,
            [[0, 245, 255], [0, 188, 212], [0, 151, 167]],
        ),
        entry(
            PieceKind::O,
            ShapeMatrix::new(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
            1,
            4,
            [[255, 255, 0], [255, 235, 59], [251, 192, 45]],
        ),
        entry(
            PieceKind::T,
            ShapeMatrix::new(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
            4,
            3,
            [[156, 39, 176], [186, 104, 200], [123, 31, 162]],
        ),
        entry(
            PieceKind::L,
            ShapeMatrix::new(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
            4,
            3,
            [[255, 152, 0], [255, 183, 77], [245, 124, 0]],
        ),
        entry(
            PieceKind::J,
            ShapeMatrix::new(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
            4,
            3,
            [[33, 150, 243], [100, 181, 246], [25, 118, 210]],
        ),
        entry(
            PieceKind::S,
            ShapeMatrix::new(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
            2,
            3,
            [[76, 175, 80], [129, 199, 132], [56, 142, 60]],
        ),
        entry(
            PieceKind::Z,
            ShapeMatrix::new(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
            2,
            3,
            [[244, 67, 54], [229, 115, 115], [211, 47, 47]],
        ),
    ]
};

/// Offset `(dx, dy)` applied to a piece position while testing a wall kick.
///
/// `dy` grows downward, like grid rows.
pub type KickOffset = (i32, i32);

/// Piece families that share a wall-kick table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickFamily {
    I,
    O,
    /// J, L, S, T and Z.
    Standard,
}

/// SRS wall-kick candidates.
///
/// Each family has four slots. Clockwise transitions `0→1`, `1→2`, `2→3`,
/// `3→0` use slots 0..=3; counter-clockwise transitions reuse them as
/// `3→2`: 0, `2→1`: 1, `1→0`: 2, `0→3`: 3. The first candidate of every slot
/// is `(0, 0)`.
#[derive(Debug, Clone, Copy)]
pub struct WallKickTable;

const STANDARD_KICKS: [[KickOffset; 5]; 4] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

const I_KICKS: [[KickOffset; 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

const O_KICKS: [[KickOffset; 1]; 4] = [[(0, 0)]; 4];

impl WallKickTable {
    /// Maps a single-step rotation transition to its table slot.
    ///
    /// Returns `None` for transitions that are not a single 90° step.
    #[must_use]
    pub const fn slot(from: PieceRotation, to: PieceRotation) -> Option<usize> {
        match (from.as_usize(), to.as_usize()) {
            (0, 1) | (3, 2) => Some(0),
            (1, 2) | (2, 1) => Some(1),
            (2, 3) | (1, 0) => Some(2),
            (3, 0) | (0, 3) => Some(3),
            _ => None,
        }
    }

    /// Ordered kick candidates for a transition of the given family.
    ///
    /// Transitions that are not a single step fall back to slot 0.
    #[must_use]
    pub fn candidates(
        family: KickFamily,
        from: PieceRotation,
        to: PieceRotation,
    ) -> &'static [KickOffset] {
        let slot = Self::slot(from, to).unwrap_or(0);
        match family {
            KickFamily::I => &I_KICKS[slot],
            KickFamily::O => &O_KICKS[slot],
            KickFamily::Standard => &STANDARD_KICKS[slot],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(n: u8) -> PieceRotation {
        PieceRotation::new(n)
    }

    #[test]
    fn test_four_rotations_restore_matrix() {
        for kind in PieceKind::ALL {
            let base = *kind.shape().base();
            let mut matrix = base;
            for _ in 0..4 {
                matrix = matrix.rotated_cw();
            }
            assert_eq!(matrix, base, "{kind:?} did not return to its base matrix");
        }
    }

    #[test]
    fn test_precomputed_rotations_match_repeated_rotation() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let mut matrix = *shape.base();
            for n in 0..4 {
                assert_eq!(*shape.matrix(rotation(n)), matrix, "{kind:?} rotation {n}");
                matrix = matrix.rotated_cw();
            }
        }
    }

    #[test]
    fn test_t_rotates_clockwise() {
        let east = PieceKind::T.shape().matrix(rotation(1));
        let rows: Vec<Vec<bool>> = east.rows().map(<[bool]>::to_vec).collect();
        assert_eq!(
            rows,
            vec![
                vec![false, true, false],
                vec![false, true, true],
                vec![false, true, false],
            ]
        );
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            for n in 0..4 {
                let count = kind.shape().matrix(rotation(n)).occupied_cells().count();
                assert_eq!(count, 4, "{kind:?} rotation {n}");
            }
        }
    }

    #[test]
    fn test_catalog_metadata() {
        assert_eq!(PieceKind::O.shape().rotation_states(), 1);
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(kind.shape().rotation_states(), 2);
        }
        for kind in [PieceKind::T, PieceKind::L, PieceKind::J] {
            assert_eq!(kind.shape().rotation_states(), 4);
        }
        assert_eq!(PieceKind::O.shape().spawn_offset(), Position::new(4, 0));
        assert_eq!(PieceKind::I.shape().spawn_offset(), Position::new(3, 0));
        assert_eq!(PieceKind::I.shape().base().size(), 4);
        assert_eq!(PieceKind::O.shape().base().size(), 2);
    }

    #[test]
    fn test_codes_roundtrip_in_catalog_order() {
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(kind.code()), i + 1);
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn test_kick_slots_for_all_single_steps() {
        let cases = [
            ((0, 1), 0),
            ((1, 2), 1),
            ((2, 3), 2),
            ((3, 0), 3),
            ((3, 2), 0),
            ((2, 1), 1),
            ((1, 0), 2),
            ((0, 3), 3),
        ];
        for ((from, to), slot) in cases {
            assert_eq!(
                WallKickTable::slot(rotation(from), rotation(to)),
                Some(slot),
                "{from}->{to}"
            );
        }
        assert_eq!(WallKickTable::slot(rotation(0), rotation(2)), None);
        assert_eq!(WallKickTable::slot(rotation(1), rotation(1)), None);
    }

    #[test]
    fn test_first_candidate_is_bare_rotation() {
        for family in [KickFamily::I, KickFamily::O, KickFamily::Standard] {
            for from in 0..4 {
                for to in [(from + 1) % 4, (from + 3) % 4] {
                    let candidates =
                        WallKickTable::candidates(family, rotation(from), rotation(to));
                    assert_eq!(candidates[0], (0, 0));
                }
            }
        }
        let o = WallKickTable::candidates(KickFamily::O, rotation(0), rotation(1));
        assert_eq!(o, &[(0, 0)]);
    }

    #[test]
    fn test_kick_families() {
        assert_eq!(PieceKind::I.kick_family(), KickFamily::I);
        assert_eq!(PieceKind::O.kick_family(), KickFamily::O);
        for kind in [PieceKind::T, PieceKind::L, PieceKind::J, PieceKind::S, PieceKind::Z] {
            assert_eq!(kind.kick_family(), KickFamily::Standard);
        }
        let i = WallKickTable::candidates(KickFamily::I, rotation(0), rotation(1));
        assert_eq!(i[1], (-2, 0));
    }
}
