//! Line-delimited JSON messages for driving a game session.

use serde::{Deserialize, Serialize};
use sweeper_core::{CellView, Coord2, GameStatus, Level, Snapshot};

pub use session::*;

mod session;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl From<Coord2> for Pos {
    fn from((x, y): Coord2) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Starts a game from a level preset, or from an explicit `size` and
    /// `mines` pair which takes precedence.
    New {
        #[serde(default)]
        level: Option<Level>,
        #[serde(default)]
        size: Option<u8>,
        #[serde(default)]
        mines: Option<u16>,
        #[serde(default)]
        seed: Option<u64>,
    },
    Reveal {
        x: usize,
        y: usize,
    },
    Flag {
        x: usize,
        y: usize,
    },
    Chord {
        x: usize,
        y: usize,
    },
    Tick,
    Resign,
    Restart,
    Snapshot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WireCell {
    Hidden,
    Flagged,
    Open { adjacent: u8 },
    Mine,
    Exploded,
}

impl From<CellView> for WireCell {
    fn from(view: CellView) -> Self {
        match view {
            CellView::Hidden => Self::Hidden,
            CellView::Flagged => Self::Flagged,
            CellView::Open(adjacent) => Self::Open { adjacent },
            CellView::Mine => Self::Mine,
            CellView::Exploded => Self::Exploded,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub pos: Pos,
    pub value: WireCell,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: usize,
    pub mine_count: u16,
    pub status: GameStatus,
    pub remaining_flags: isize,
    pub elapsed_seconds: u32,
    pub start: Pos,
    pub triggered_mine: Option<Pos>,
    /// `field[y][x]`
    pub field: Vec<Vec<WireCell>>,
}

impl From<&Snapshot> for BoardView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            size: snapshot.size.into(),
            mine_count: snapshot.mine_count,
            status: snapshot.status,
            remaining_flags: snapshot.remaining_flags,
            elapsed_seconds: snapshot.elapsed_seconds,
            start: snapshot.start.into(),
            triggered_mine: snapshot.triggered_mine.map(Pos::from),
            field: snapshot
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(WireCell::from).collect())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Update {
        cells: Vec<CellUpdate>,
        status: GameStatus,
    },
    Flag {
        x: usize,
        y: usize,
        flagged: bool,
        remaining_flags: isize,
    },
    Clock {
        elapsed_seconds: u32,
    },
    Board(BoardView),
    Error {
        message: String,
    },
}

impl Reply {
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
