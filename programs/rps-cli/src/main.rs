//! Rock Paper Scissors Arena in the terminal.
//!
//! ## Usage
//!
//! - `rps play` - Play against the computer, one line of key presses per round
//! - `rps play --mode pvp` - Two players sharing the keyboard
//! - `rps simulate --pattern rock,paper` - Watch the opponent adapt to a scripted player

mod session;

use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rps_core::{GameConfig, GameMode, Move};
use tracing::info;

/// Rock Paper Scissors Arena
#[derive(Parser, Debug)]
#[command(name = "rps")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file overriding round limits and opponent thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log round resolution and opponent decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a match reading key presses from stdin
    Play {
        /// pvc or pvp
        #[arg(long, default_value = "pvc")]
        mode: GameMode,
        /// Rounds to play (defaults to the configured default)
        #[arg(long)]
        rounds: Option<u32>,
        /// Opponent seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a scripted human pattern against the computer
    Simulate {
        /// Comma-separated moves, cycled for every round
        #[arg(long, value_delimiter = ',', required = true)]
        pattern: Vec<Move>,
        /// Rounds to play (defaults to the configured maximum)
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GameConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Play {
            mode,
            rounds,
            seed,
            json,
        } => {
            let seed = seed.unwrap_or_else(|| fastrand::u64(..));
            let rounds = rounds.unwrap_or(config.default_rounds);
            info!(%mode, rounds, seed, "starting match");
            let stdin = io::stdin();
            let options = session::Options {
                mode,
                rounds,
                seed,
                json,
            };
            session::play(&config, &options, stdin.lock(), &mut out)?;
        }
        Commands::Simulate {
            pattern,
            rounds,
            seed,
            json,
        } => {
            let seed = seed.unwrap_or_else(|| fastrand::u64(..));
            let rounds = rounds.unwrap_or(config.max_rounds);
            info!(rounds, seed, pattern_len = pattern.len(), "starting simulation");
            let options = session::Options {
                mode: GameMode::Pvc,
                rounds,
                seed,
                json,
            };
            session::simulate(&config, &options, &pattern, &mut out)?;
        }
    }
    Ok(())
}
