use thiserror::Error;

use crate::{CellCount, Coord};

/// The constraint a rejected game configuration violates.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board side must be at least 1")]
    EmptyBoard,
    #[error("{mines} mines leave no free cell outside the start zone of a {cells}-cell board")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("start zone must not contain mines")]
    MineInStartZone,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("coordinates ({x}, {y}) are outside the board")]
    OutOfBounds { x: usize, y: usize },
}

impl GameError {
    pub fn out_of_bounds(x: impl Into<usize>, y: impl Into<usize>) -> Self {
        Self::OutOfBounds {
            x: x.into(),
            y: y.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

pub(crate) fn check_coords(side: Coord, coords: (Coord, Coord)) -> Result<(Coord, Coord)> {
    if coords.0 < side && coords.1 < side {
        Ok(coords)
    } else {
        Err(GameError::out_of_bounds(coords.0, coords.1))
    }
}
