use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Detached, read-only picture of a game for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord,
    pub mine_count: CellCount,
    pub status: GameStatus,
    pub remaining_flags: isize,
    pub elapsed_seconds: u32,
    pub start: Coord2,
    pub triggered_mine: Option<Coord2>,
    pub cells: Array2<CellView>,
}

impl Snapshot {
    pub fn from_game(game: &Game) -> Self {
        let size = game.size();
        let board = game.board();
        let triggered_mine = game.triggered_mine();

        let mut cells = Array2::from_elem((size, size).to_nd_index(), CellView::Hidden);
        for cell in board.cells() {
            cells[cell.coords.to_nd_index()] = match CellView::from(cell) {
                CellView::Mine if triggered_mine == Some(cell.coords) => CellView::Exploded,
                view => view,
            };
        }

        Self {
            size,
            mine_count: game.mine_count(),
            status: game.status(),
            remaining_flags: game.remaining_flags(),
            elapsed_seconds: game.elapsed_seconds(),
            start: game.start(),
            triggered_mine,
            cells,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Every cell with its coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        iter_coords(self.size).map(|coords| (coords, self.cells[coords.to_nd_index()]))
    }

    /// Row-major copy of the grid, `rows()[y][x]`.
    pub fn rows(&self) -> alloc::vec::Vec<alloc::vec::Vec<CellView>> {
        (0..self.size)
            .map(|y| (0..self.size).map(|x| self.cells[(x, y).to_nd_index()]).collect())
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.cells.iter().filter(|view| view.is_closed()).count()
    }
}
