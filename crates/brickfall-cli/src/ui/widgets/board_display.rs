use std::iter;

use brickfall_engine::{Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// The playfield: locked cells, the falling piece and its ghost.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn columns(&self) -> u16 {
        u16::try_from(self.grid.width()).unwrap_or(u16::MAX)
    }

    fn rows(&self) -> u16 {
        u16::try_from(self.grid.height()).unwrap_or(u16::MAX)
    }

    pub fn width(&self) -> u16 {
        self.columns() * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.rows() * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// Cell contents in row-major order, overlays applied.
    fn cells(&self) -> Vec<BlockDisplay> {
        let width = self.grid.width();
        let mut cells: Vec<_> = self
            .grid
            .rows()
            .flatten()
            .map(|block| BlockDisplay::from_block(*block, true))
            .collect();

        let mut paint = |piece: Piece, display: BlockDisplay| {
            for pos in piece.cells() {
                // rows above the grid are not drawn
                let (Ok(x), Ok(y)) = (usize::try_from(pos.x()), usize::try_from(pos.y())) else {
                    continue;
                };
                if x < width && y < self.grid.height() {
                    cells[y * width + x] = display;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            paint(ghost, BlockDisplay::ghost(ghost.kind()));
        }
        if let Some(piece) = self.falling_piece {
            paint(piece, BlockDisplay::piece(piece.kind()));
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.columns()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..self.rows()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .flat_map(|row| row.layout_vec(&horizontal));

        for (grid_cell, block_display) in iter::zip(grid_cells, self.cells()) {
            block_display.render(grid_cell, buf);
        }
    }
}
