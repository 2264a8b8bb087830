use thiserror::Error;

/// Errors raised by the core.
///
/// Only match construction and parsing can fail; out-of-phase calls on a
/// running match are ignored rather than reported.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("round count {requested} out of range (must be 1..={max})")]
    InvalidRounds { requested: u32, max: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown move: {0:?}")]
    UnknownMove(String),
    #[error("unknown game mode: {0:?}")]
    UnknownMode(String),
}
