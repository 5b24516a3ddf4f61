use serde::{Deserialize, Serialize};

use crate::Coord2;

/// Player-controlled state of a single cell. Flagged and revealed are
/// exclusive by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Full description of one cell, mine included.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub coords: Coord2,
    pub is_mine: bool,
    pub is_start: bool,
    pub adjacent_mine_count: u8,
    pub state: CellState,
}

impl Cell {
    pub const fn is_revealed(&self) -> bool {
        self.state.is_revealed()
    }

    pub const fn is_flagged(&self) -> bool {
        self.state.is_flagged()
    }
}

/// What a presentation layer may show for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
    /// The mine that ended the game.
    Exploded,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        match (cell.state, cell.is_mine) {
            (CellState::Hidden, _) => Self::Hidden,
            (CellState::Flagged, _) => Self::Flagged,
            (CellState::Revealed, true) => Self::Mine,
            (CellState::Revealed, false) => Self::Open(cell.adjacent_mine_count),
        }
    }
}
