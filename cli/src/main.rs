use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweeper_core::Level;
use sweeper_protocol::{Command, Reply, Session};

/// Plays minesweeper over stdin/stdout, one JSON command per line in and one
/// JSON reply per line out.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Board preset: beginner, intermediate or expert
    #[arg(short, long, conflicts_with_all = ["size", "mines"])]
    level: Option<Level>,

    /// Board side, needs --mines
    #[arg(long, requires = "mines")]
    size: Option<u8>,

    /// Number of mines, needs --size
    #[arg(long, requires = "size")]
    mines: Option<u16>,

    /// Seed for reproducible boards
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    fn new_game_command(&self) -> Command {
        Command::New {
            level: self.level,
            size: self.size,
            mines: self.mines,
            seed: self.seed,
        }
    }
}

fn emit(out: &mut impl Write, reply: &Reply) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, reply).context("encoding reply")?;
    writeln!(out).context("writing reply")?;
    out.flush().context("flushing stdout")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new();
    let mut out = io::stdout().lock();

    let opening = session.handle(cli.new_game_command());
    emit(&mut out, &opening)?;
    if let Reply::Error { message } = opening {
        bail!("could not start game: {message}");
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = session.handle_line(line);
        emit(&mut out, &reply)?;
    }

    log::info!("Input closed, exiting");
    Ok(())
}
