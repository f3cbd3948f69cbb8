pub use self::{catalog::*, grid::*, piece::*};

pub(crate) mod catalog;
pub(crate) mod grid;
pub(crate) mod piece;
