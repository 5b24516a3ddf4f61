#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use types::*;

use error::check_coords;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod snapshot;
mod types;

/// Validated board parameters: a `size x size` grid holding `mines` mines.
///
/// Only [`GameConfig::new`], [`Level::config`] and deserialization (which goes
/// through `new`) produce one, so generation can rely on the bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    size: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.size, raw.mines)
    }
}

impl GameConfig {
    /// Skips validation, callers must already satisfy the bound checked by
    /// [`GameConfig::new`].
    pub(crate) const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Checks that the board is not empty and that at least one cell outside
    /// the 3x3 start zone stays free of mines.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let cells = square(size);
        if u32::from(mines) + 9 >= u32::from(cells) {
            return Err(ConfigError::TooManyMines { mines, cells }.into());
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Preset board sizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Expert,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked(8, 10),
            Self::Intermediate => GameConfig::new_unchecked(16, 40),
            Self::Expert => GameConfig::new_unchecked(24, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Intermediate
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown level, expected one of: beginner, intermediate, expert")]
pub struct ParseLevelError;

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or(ParseLevelError)
    }
}

/// Immutable result of generation: where the mines are, where the player
/// starts and how many mines touch each cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
    start: Coord2,
}

impl MineLayout {
    /// Builds a layout from explicit mine positions, duplicates collapse.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2], start: Coord2) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let start = check_coords(size, start)?;

        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());
        for &coords in mine_coords {
            let coords = check_coords(size, coords)?;
            if in_zone(start, coords) {
                log::warn!("Rejected layout, mine at {:?} touches start {:?}", coords, start);
                return Err(ConfigError::MineInStartZone.into());
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask, start))
    }

    /// `start` must be inside the mask and its zone free of mines.
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>, start: Coord2) -> Self {
        let side = mine_mask.nrows() as Coord;
        let mut adjacent: Array2<u8> = Array2::zeros(mine_mask.raw_dim());
        let mut mine_count = 0;
        for coords in iter_coords(side) {
            if mine_mask[coords.to_nd_index()] {
                mine_count += 1;
            }
            adjacent[coords.to_nd_index()] = NeighborIter::around(coords, side)
                .filter(|pos| mine_mask[pos.to_nd_index()])
                .count() as u8;
        }

        Self {
            mine_mask,
            adjacent,
            mine_count,
            start,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        check_coords(self.size(), coords)
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.nrows() as Coord
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&coords| self[coords])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::around(coords, self.size())
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}
