use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing, on the first reveal action
/// - Playing -> Failed, on a mine or a resign
/// - Playing -> Success, once every safe cell is open
/// - Failed | Success -> Ready, on restart
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Ready,
    Playing,
    Failed,
    Success,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Failed | Self::Success)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ready
    }
}

/// Result of a reveal action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReport {
    pub changed: BTreeSet<Coord2>,
    pub status: GameStatus,
}

impl RevealReport {
    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub flagged: bool,
    pub remaining_flags: isize,
}

/// Where boards come from when the game is (re)started.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum LayoutSource {
    Seeded(RandomLayoutGenerator),
    Fixed(MineLayout),
}

impl LayoutGenerator for LayoutSource {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        match self {
            Self::Seeded(generator) => generator.generate(config),
            Self::Fixed(layout) => layout.clone(),
        }
    }
}

/// One player session: a board plus status, flag counter and clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    source: LayoutSource,
    board: Board,
    opening: BTreeSet<Coord2>,
    status: GameStatus,
    remaining_flags: isize,
    elapsed_seconds: u32,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// Starts a game on a fresh random board. Without a seed one is drawn
    /// from the thread rng.
    #[cfg(feature = "std")]
    pub fn new_game(size: Coord, mines: CellCount, seed: Option<u64>) -> Result<Self> {
        let config = GameConfig::new(size, mines)?;
        Ok(Self::new(config, seed.unwrap_or_else(rand::random)))
    }

    #[cfg(feature = "std")]
    pub fn from_level(level: Level, seed: Option<u64>) -> Self {
        Self::new(level.config(), seed.unwrap_or_else(rand::random))
    }

    /// Deals a board from `seed`, restarts keep drawing from the same stream.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        log::debug!(
            "New {}x{} game, {} mines, seed {}",
            config.size,
            config.size,
            config.mines,
            seed
        );
        Self::with_source(config, LayoutSource::Seeded(RandomLayoutGenerator::new(seed)))
    }

    /// Plays a known layout, restarts replay the same layout.
    pub fn from_layout(layout: MineLayout) -> Self {
        Self::with_source(layout.game_config(), LayoutSource::Fixed(layout))
    }

    fn with_source(config: GameConfig, mut source: LayoutSource) -> Self {
        let layout = source.generate(config);
        let (board, opening) = Self::open_board(layout);
        Self {
            config,
            source,
            board,
            opening,
            status: GameStatus::Ready,
            remaining_flags: config.mines as isize,
            elapsed_seconds: 0,
            triggered_mine: None,
        }
    }

    /// Builds the board and opens the start cell for free.
    fn open_board(layout: MineLayout) -> (Board, BTreeSet<Coord2>) {
        let start = layout.start();
        let mut board = Board::new(layout);
        let opening = board.reveal(start).changed;
        log::debug!("Opened {} cells from start {:?}", opening.len(), start);
        (board, opening)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    /// Mines minus flags, negative when over-flagged.
    pub fn remaining_flags(&self) -> isize {
        self.remaining_flags
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn start(&self) -> Coord2 {
        self.board.layout().start()
    }

    /// Cells revealed for free when the board was generated.
    pub fn opening(&self) -> &BTreeSet<Coord2> {
        &self.opening
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.layout().validate_coords(coords)?;
        Ok(self.board.cell(coords))
    }

    /// Converts presentation-layer coordinates, anything off the board is
    /// [`GameError::OutOfBounds`].
    pub fn locate(&self, x: usize, y: usize) -> Result<Coord2> {
        match (Coord::try_from(x), Coord::try_from(y)) {
            (Ok(cx), Ok(cy)) => self.board.layout().validate_coords((cx, cy)),
            _ => Err(GameError::out_of_bounds(x, y)),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.layout().validate_coords(coords)?;
        Ok(self.reveal_action(|board| board.reveal(coords)))
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.layout().validate_coords(coords)?;
        Ok(self.reveal_action(|board| board.chord_reveal(coords)))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        let coords = self.board.layout().validate_coords(coords)?;

        let flagged = if self.is_finished() {
            self.board.state_at(coords).is_flagged()
        } else {
            match self.board.toggle_flag(coords) {
                Some(flagged) => {
                    self.remaining_flags += if flagged { -1 } else { 1 };
                    flagged
                }
                None => false,
            }
        };

        Ok(FlagReport {
            flagged,
            remaining_flags: self.remaining_flags,
        })
    }

    /// Advances the clock by one second while playing.
    pub fn tick(&mut self) -> u32 {
        if matches!(self.status, GameStatus::Playing) {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.elapsed_seconds
    }

    /// Gives up a running game, exposing the board.
    pub fn resign(&mut self) -> RevealReport {
        if !matches!(self.status, GameStatus::Playing) {
            return self.report(BTreeSet::new());
        }
        log::debug!("Resigned after {}s", self.elapsed_seconds);
        self.status = GameStatus::Failed;
        let changed = self.board.expose_all();
        self.report(changed)
    }

    /// Regenerates the board after a finished game. Returns whether a new
    /// board was dealt.
    pub fn restart(&mut self) -> bool {
        if !self.is_finished() {
            return false;
        }

        let layout = self.source.generate(self.config);
        let (board, opening) = Self::open_board(layout);
        self.board = board;
        self.opening = opening;
        self.status = GameStatus::Ready;
        self.remaining_flags = self.config.mines as isize;
        self.elapsed_seconds = 0;
        self.triggered_mine = None;
        log::debug!("Restarted game");
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_game(self)
    }

    fn reveal_action(&mut self, action: impl FnOnce(&mut Board) -> Reveal) -> RevealReport {
        if self.is_finished() {
            return self.report(BTreeSet::new());
        }
        self.mark_started();

        let Reveal {
            mut changed,
            hit_mine,
        } = action(&mut self.board);

        if let Some(mine) = hit_mine {
            log::debug!("Hit mine at {:?} after {}s", mine, self.elapsed_seconds);
            self.triggered_mine = Some(mine);
            self.status = GameStatus::Failed;
            changed.extend(self.board.expose_all());
        } else if self.board.is_cleared() {
            log::debug!("Cleared board after {}s", self.elapsed_seconds);
            self.status = GameStatus::Success;
        }

        self.report(changed)
    }

    fn mark_started(&mut self) {
        if matches!(self.status, GameStatus::Ready) {
            log::debug!("Game started");
            self.status = GameStatus::Playing;
        }
    }

    fn report(&self, changed: BTreeSet<Coord2>) -> RevealReport {
        RevealReport {
            changed,
            status: self.status,
        }
    }
}
