use std::collections::BTreeSet;

use sweeper_core::{Coord2, Game, GameError, RevealReport, Snapshot};
use thiserror::Error;

use crate::{BoardView, CellUpdate, Command, Pos, Reply};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no game in progress, send a `new` command first")]
    NoGame,
    #[error("`size` and `mines` must be given together")]
    IncompleteConfig,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("malformed command: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Owns at most one game and applies commands to it.
#[derive(Debug, Default)]
pub struct Session {
    game: Option<Game>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(game: Game) -> Self {
        Self { game: Some(game) }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Parses one JSON line and applies it, malformed input becomes an
    /// error reply.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(command),
            Err(err) => {
                log::warn!("Dropping malformed command: {}", err);
                Reply::error(SessionError::from(err))
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        log::debug!("Handling {:?}", command);
        self.apply(command).unwrap_or_else(|err| {
            log::debug!("Command failed: {}", err);
            Reply::error(err)
        })
    }

    fn apply(&mut self, command: Command) -> Result<Reply, SessionError> {
        let reply = match command {
            Command::New {
                level,
                size,
                mines,
                seed,
            } => {
                let game = match (size, mines) {
                    (Some(size), Some(mines)) => Game::new_game(size, mines, seed)?,
                    (None, None) => Game::from_level(level.unwrap_or_default(), seed),
                    _ => return Err(SessionError::IncompleteConfig),
                };
                board(self.game.insert(game))
            }
            Command::Reveal { x, y } => {
                let game = self.game_mut()?;
                let report = game.reveal(game.locate(x, y)?)?;
                update(game, report)
            }
            Command::Chord { x, y } => {
                let game = self.game_mut()?;
                let report = game.chord_reveal(game.locate(x, y)?)?;
                update(game, report)
            }
            Command::Flag { x, y } => {
                let game = self.game_mut()?;
                let report = game.toggle_flag(game.locate(x, y)?)?;
                Reply::Flag {
                    x,
                    y,
                    flagged: report.flagged,
                    remaining_flags: report.remaining_flags,
                }
            }
            Command::Tick => Reply::Clock {
                elapsed_seconds: self.game_mut()?.tick(),
            },
            Command::Resign => {
                let game = self.game_mut()?;
                let report = game.resign();
                update(game, report)
            }
            Command::Restart => {
                let game = self.game_mut()?;
                if !game.restart() {
                    log::debug!("Restart ignored, game is {:?}", game.status());
                }
                board(game)
            }
            Command::Snapshot => board(self.game_mut()?),
        };
        Ok(reply)
    }

    fn game_mut(&mut self) -> Result<&mut Game, SessionError> {
        self.game.as_mut().ok_or(SessionError::NoGame)
    }
}

fn board(game: &Game) -> Reply {
    Reply::Board(BoardView::from(&game.snapshot()))
}

fn update(game: &Game, report: RevealReport) -> Reply {
    Reply::Update {
        cells: cell_updates(&game.snapshot(), &report.changed),
        status: report.status,
    }
}

fn cell_updates(snapshot: &Snapshot, changed: &BTreeSet<Coord2>) -> Vec<CellUpdate> {
    changed
        .iter()
        .filter_map(|&coords| {
            snapshot.cell(coords).map(|view| CellUpdate {
                pos: Pos::from(coords),
                value: view.into(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WireCell;
    use sweeper_core::{GameStatus, MineLayout};

    fn walled() -> Session {
        let mines: Vec<_> = (0..6).map(|y| (3, y)).collect();
        let layout = MineLayout::from_mine_coords(6, &mines, (0, 0)).unwrap();
        Session::with_game(Game::from_layout(layout))
    }

    #[test]
    fn commands_need_a_game() {
        let mut session = Session::new();
        let reply = session.handle(Command::Tick);
        assert_eq!(
            reply,
            Reply::Error {
                message: SessionError::NoGame.to_string()
            }
        );
    }

    #[test]
    fn new_game_replies_with_board() {
        let mut session = Session::new();
        let reply = session.handle_line(r#"{"action":"new","level":"beginner","seed":4}"#);

        let Reply::Board(board) = reply else {
            panic!("expected board, got {reply:?}");
        };
        assert_eq!(board.size, 8);
        assert_eq!(board.mine_count, 10);
        assert_eq!(board.status, GameStatus::Ready);
        assert_eq!(board.field.len(), 8);
        assert_eq!(board.field[board.start.y][board.start.x], WireCell::Open { adjacent: 0 });
    }

    #[test]
    fn new_game_validates_config() {
        let mut session = Session::new();
        assert!(session.handle_line(r#"{"action":"new","size":3,"mines":1}"#).is_error());
        assert!(session.handle_line(r#"{"action":"new","size":8}"#).is_error());
        assert!(session.game().is_none());

        let reply = session.handle_line(r#"{"action":"new","size":10,"mines":12,"seed":1}"#);
        assert!(!reply.is_error());
        assert_eq!(session.game().map(|game| game.mine_count()), Some(12));
    }

    #[test]
    fn reveal_reports_changed_cells() {
        let mut session = walled();

        let reply = session.handle(Command::Reveal { x: 5, y: 0 });

        let Reply::Update { cells, status } = reply else {
            panic!("expected update, got {reply:?}");
        };
        assert_eq!(status, GameStatus::Success);
        assert_eq!(cells.len(), 12);
        assert!(cells.contains(&CellUpdate {
            pos: Pos { x: 4, y: 0 },
            value: WireCell::Open { adjacent: 2 },
        }));
    }

    #[test]
    fn out_of_bounds_is_an_error_reply() {
        let mut session = walled();
        for line in [
            r#"{"action":"reveal","x":6,"y":0}"#,
            r#"{"action":"flag","x":0,"y":4000}"#,
            r#"{"action":"chord","x":300,"y":0}"#,
        ] {
            assert!(session.handle_line(line).is_error(), "{line}");
        }
        assert!(session.handle_line("reveal 1 1").is_error());
    }

    #[test]
    fn scripted_loss_and_restart() {
        let mut session = walled();

        let reply = session.handle(Command::Flag { x: 4, y: 0 });
        assert_eq!(
            reply,
            Reply::Flag {
                x: 4,
                y: 0,
                flagged: true,
                remaining_flags: 5
            }
        );
        assert_eq!(session.handle(Command::Tick), Reply::Clock { elapsed_seconds: 0 });

        let Reply::Update { cells, status } = session.handle(Command::Reveal { x: 3, y: 2 }) else {
            panic!("expected update");
        };
        assert_eq!(status, GameStatus::Failed);
        assert_eq!(cells.len(), 6 + 12);
        assert!(cells.contains(&CellUpdate {
            pos: Pos { x: 3, y: 2 },
            value: WireCell::Exploded,
        }));

        let Reply::Board(board) = session.handle(Command::Restart) else {
            panic!("expected board");
        };
        assert_eq!(board.status, GameStatus::Ready);
        assert_eq!(board.remaining_flags, 6);
        assert_eq!(board.triggered_mine, None);
    }

    #[test]
    fn resign_exposes_board() {
        let mut session = walled();
        session.handle(Command::Chord { x: 0, y: 0 });
        assert_eq!(session.handle(Command::Tick), Reply::Clock { elapsed_seconds: 1 });

        let Reply::Update { status, .. } = session.handle(Command::Resign) else {
            panic!("expected update");
        };
        assert_eq!(status, GameStatus::Failed);

        let Reply::Board(board) = session.handle(Command::Snapshot) else {
            panic!("expected board");
        };
        assert!(board.field.iter().flatten().all(|cell| *cell != WireCell::Hidden));
        assert_eq!(board.elapsed_seconds, 1);
    }
}
