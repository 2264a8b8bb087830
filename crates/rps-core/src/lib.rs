//! Rock Paper Scissors Arena core
//!
//! Round/match state machine and adaptive computer opponent.
//! This crate is compiled to:
//! - Native (for the terminal driver)
//! - WASM (for a browser front end)
//!
//! Everything is owned, in-process state: a [`Match`] and its opponent are
//! plain values, and the caller decides when rounds open and close.

mod config;
mod engine;
mod error;
mod history;
mod input;
mod moves;
mod opponent;
pub mod random;
mod stats;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{GameConfig, OpponentConfig, DEFAULT_ROUNDS, LEARNING_WINDOW, MAX_ROUNDS};
pub use engine::{
    GameWinner, Match, Phase, Round, RoundKind, RoundOutcome, RoundRecord, RoundReport,
};
pub use error::GameError;
pub use history::{GameHistory, HistorySink, MatchSummary, ModeStats, PlayerRecord, PlayerRegistry};
pub use input::{KeyBindings, KeySet};
pub use moves::{compare, counter, random_move, GameMode, Move, MoveCounts, Outcome, Player};
pub use opponent::{OpponentAi, OpponentProfile, Tactic};
pub use random::{RandomSource, SeededRng};
pub use stats::MatchStatistics;

/// Create a match with the default limits, its opponent seeded from `seed`
pub fn create_match(mode: GameMode, total_rounds: u32, seed: u64) -> Result<Match, GameError> {
    Match::new(mode, total_rounds, SeededRng::new(seed))
}
