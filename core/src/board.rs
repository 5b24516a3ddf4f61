use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells whose revealed state changed during one action, and the mine that
/// was uncovered if any.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub changed: BTreeSet<Coord2>,
    pub hit_mine: Option<Coord2>,
}

impl Reveal {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// The grid: a mine layout plus what the player did to each cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    states: Array2<CellState>,
    revealed_safe: CellCount,
    revealed_mines: CellCount,
    flagged: CellCount,
}

impl Board {
    /// A board with every cell hidden. Nothing is opened yet.
    pub fn new(layout: MineLayout) -> Self {
        let side = layout.size();
        Self {
            layout,
            states: Array2::default((side, side).to_nd_index()),
            revealed_safe: 0,
            revealed_mines: 0,
            flagged: 0,
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord {
        self.layout.size()
    }

    pub fn state_at(&self, coords: Coord2) -> CellState {
        self.states[coords.to_nd_index()]
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        Cell {
            coords,
            is_mine: self.layout[coords],
            is_start: self.layout.start() == coords,
            adjacent_mine_count: self.layout.adjacent_mine_count(coords),
            state: self.state_at(coords),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        iter_coords(self.size()).map(|coords| self.cell(coords))
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_safe + self.revealed_mines
    }

    /// Every safe cell is open and no mine is.
    pub fn is_cleared(&self) -> bool {
        self.revealed_mines == 0 && self.revealed_safe == self.layout.safe_cell_count()
    }

    /// Reveals a hidden cell, flood filling through zero-count cells.
    /// Flagged and already revealed cells are left alone.
    pub fn reveal(&mut self, coords: Coord2) -> Reveal {
        let mut reveal = Reveal::default();
        self.reveal_into(coords, &mut reveal);
        reveal
    }

    /// Reveals every hidden neighbor of a revealed cell once the flags around
    /// it account for its number. Stops at the first mine.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Reveal {
        let mut reveal = Reveal::default();
        if !self.is_chordable(coords) {
            return reveal;
        }

        for neighbor in self.layout.iter_neighbors(coords) {
            self.reveal_into(neighbor, &mut reveal);
            if reveal.hit_mine.is_some() {
                break;
            }
        }
        reveal
    }

    pub fn is_chordable(&self, coords: Coord2) -> bool {
        self.state_at(coords).is_revealed()
            && !self.layout[coords]
            && self.count_flagged_neighbors(coords) == self.layout.adjacent_mine_count(coords)
    }

    /// Flips the flag on an unrevealed cell, returns the new flag state or
    /// `None` when the cell is already revealed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Option<bool> {
        let state = &mut self.states[coords.to_nd_index()];
        match *state {
            CellState::Hidden => {
                *state = CellState::Flagged;
                self.flagged += 1;
                Some(true)
            }
            CellState::Flagged => {
                *state = CellState::Hidden;
                self.flagged -= 1;
                Some(false)
            }
            CellState::Revealed => None,
        }
    }

    /// Force reveals the whole grid, flags included.
    pub fn expose_all(&mut self) -> BTreeSet<Coord2> {
        let mut changed = BTreeSet::new();
        for coords in iter_coords(self.size()) {
            match self.state_at(coords) {
                CellState::Revealed => continue,
                CellState::Flagged => self.flagged -= 1,
                CellState::Hidden => {}
            }
            self.open(coords);
            changed.insert(coords);
        }
        changed
    }

    fn reveal_into(&mut self, coords: Coord2, reveal: &mut Reveal) {
        if !matches!(self.state_at(coords), CellState::Hidden) {
            return;
        }

        self.open(coords);
        reveal.changed.insert(coords);
        if self.layout[coords] {
            reveal.hit_mine = Some(coords);
            return;
        }
        if self.layout.adjacent_mine_count(coords) != 0 {
            return;
        }

        let mut visited = BTreeSet::from([coords]);
        let mut to_visit: VecDeque<_> = self.hidden_neighbors(coords).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            coords,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }
            // flags stop the cascade, duplicates in the queue may already be open
            if !matches!(self.state_at(visit_coords), CellState::Hidden) {
                continue;
            }

            self.open(visit_coords);
            reveal.changed.insert(visit_coords);

            if self.layout.adjacent_mine_count(visit_coords) == 0 {
                let next: alloc::vec::Vec<_> = self
                    .hidden_neighbors(visit_coords)
                    .filter(|pos| !visited.contains(pos))
                    .collect();
                to_visit.extend(next);
            }
        }
    }

    fn open(&mut self, coords: Coord2) {
        self.states[coords.to_nd_index()] = CellState::Revealed;
        if self.layout[coords] {
            self.revealed_mines += 1;
        } else {
            self.revealed_safe += 1;
        }
        log::trace!(
            "Opened cell at {:?}, adjacent mines: {}",
            coords,
            self.layout.adjacent_mine_count(coords)
        );
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.state_at(pos), CellState::Hidden))
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| self.state_at(pos).is_flagged())
            .count() as u8
    }
}
