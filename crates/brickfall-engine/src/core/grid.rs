use super::{
    catalog::PieceKind,
    piece::{CollisionChecker, Piece, Position},
};

/// A single cell of the [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked cell of a specific piece kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Occupancy code: `0` for empty, `1..=7` for locked kinds.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.code(),
        }
    }

    /// Inverse of [`Self::code`]. Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        if code == 0 {
            return Some(Block::Empty);
        }
        PieceKind::from_code(code).map(Block::Piece)
    }
}

/// Locked-cell playfield.
///
/// Cells are stored row-major, row 0 at the top. Only [`Grid::lock`] and
/// [`Grid::clear_full_rows`] mutate locked cells during play; collision
/// queries are read-only.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Grid, Piece, PieceKind};
///
/// let mut grid = Grid::new(10, 20);
/// let mut piece = Piece::new(PieceKind::O);
/// while !grid.collides(&piece, 0, 1) {
///     piece.move_by(0, 1);
/// }
/// grid.lock(&piece);
/// assert_eq!(grid.clear_full_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Block>,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must not be empty");
        Self {
            width,
            height,
            cells: vec![Block::Empty; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x()).ok()?;
        let y = usize::try_from(pos.y()).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Returns the cell at `pos`, or `None` when `pos` is outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Block> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrites a cell. Positions outside the grid are ignored.
    pub fn set_cell(&mut self, pos: Position, block: Block) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = block;
        }
    }

    /// Returns `true` if `piece` shifted by `(dx, dy)` would leave the grid
    /// sideways, fall through the bottom, or overlap a locked cell.
    ///
    /// Cells above the top row never collide, so pieces can spawn partially
    /// off-grid.
    #[must_use]
    pub fn collides(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells().iter().any(|cell| {
            let pos = cell.offset(dx, dy);
            let Ok(x) = usize::try_from(pos.x()) else {
                return true;
            };
            if x >= self.width {
                return true;
            }
            let Ok(y) = usize::try_from(pos.y()) else {
                return false;
            };
            y >= self.height || !self.cells[y * self.width + x].is_empty()
        })
    }

    /// Writes the piece's kind into every cell it occupies.
    ///
    /// Cells outside the grid are skipped.
    pub fn lock(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for pos in piece.cells() {
            self.set_cell(pos, block);
        }
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|b| !b.is_empty()))
    }

    /// Removes every full row and shifts the remaining rows down.
    ///
    /// Empty rows are inserted at the top, one per removed row, and the order
    /// of the kept rows is preserved.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for y in (0..self.height).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(y * width..(y + 1) * width, (y + count) * width);
            }
        }
        self.cells[..count * width].fill(Block::Empty);
        count
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Block::Empty);
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Block]> {
        (y < self.height).then(|| &self.cells[y * self.width..][..self.width])
    }

    /// Returns the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Snapshot of the occupancy codes, one `Vec` per row.
    #[must_use]
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|b| b.code()).collect())
            .collect()
    }
}

impl CollisionChecker for Grid {
    fn is_valid(&self, piece: &Piece) -> bool {
        !self.collides(piece, 0, 0)
    }
}
