//! Match and round state machine
//!
//! A [`Match`] walks through `Idle -> RoundActive -> Resolving -> RoundComplete`
//! once per round and ends in `MatchComplete` after the last one. Calls made in
//! the wrong phase are ignored, never reported as errors: the driver owns all
//! timing and may race a late key press against the end of a round.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::history::MatchSummary;
use crate::moves::{compare, GameMode, Move, Outcome, Player};
use crate::opponent::{OpponentAi, OpponentProfile};
use crate::random::{RandomSource, SeededRng};
use crate::stats::MatchStatistics;

/// Where a match is in its round cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    RoundActive,
    Resolving,
    RoundComplete,
    MatchComplete,
}

/// Round result from player one's perspective
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    Win,
    Lose,
    #[default]
    Draw,
    /// Both players cheated; nobody scores
    Void,
}

impl RoundOutcome {
    pub fn name(self) -> &'static str {
        match self {
            RoundOutcome::Win => "Win",
            RoundOutcome::Lose => "Lose",
            RoundOutcome::Draw => "Draw",
            RoundOutcome::Void => "Void",
        }
    }

    /// Rounds that leave both scores untouched
    pub fn is_scoreless(self) -> bool {
        matches!(self, RoundOutcome::Draw | RoundOutcome::Void)
    }
}

impl From<Outcome> for RoundOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => RoundOutcome::Win,
            Outcome::Lose => RoundOutcome::Lose,
            Outcome::Draw => RoundOutcome::Draw,
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a round was adjudicated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    /// Both moves present and compared
    Contested,
    /// One side never moved; the other wins
    Walkover,
    /// Neither side moved
    #[default]
    NoMoves,
    /// One side cheated; the other wins
    CheatForfeit,
    /// Both sides cheated
    DoubleCheat,
}

impl RoundKind {
    /// Decided by a repeat submission rather than the moves
    pub fn is_cheat(self) -> bool {
        matches!(self, RoundKind::CheatForfeit | RoundKind::DoubleCheat)
    }
}

/// The round currently open for input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub player1_move: Option<Move>,
    pub player2_move: Option<Move>,
    pub player1_cheated: bool,
    pub player2_cheated: bool,
}

impl Round {
    fn slot(&mut self, player: Player) -> (&mut Option<Move>, &mut bool) {
        match player {
            Player::One => (&mut self.player1_move, &mut self.player1_cheated),
            Player::Two => (&mut self.player2_move, &mut self.player2_cheated),
        }
    }

    /// Decide the round. Cheating only counts in PVP.
    fn adjudicate(&self, mode: GameMode) -> (RoundOutcome, RoundKind) {
        if mode == GameMode::Pvp {
            match (self.player1_cheated, self.player2_cheated) {
                (true, true) => return (RoundOutcome::Void, RoundKind::DoubleCheat),
                (true, false) => return (RoundOutcome::Lose, RoundKind::CheatForfeit),
                (false, true) => return (RoundOutcome::Win, RoundKind::CheatForfeit),
                (false, false) => {}
            }
        }

        match (self.player1_move, self.player2_move) {
            (None, None) => (RoundOutcome::Draw, RoundKind::NoMoves),
            (Some(_), None) => (RoundOutcome::Win, RoundKind::Walkover),
            (None, Some(_)) => (RoundOutcome::Lose, RoundKind::Walkover),
            (Some(a), Some(b)) => (compare(a, b).into(), RoundKind::Contested),
        }
    }
}

/// A resolved round as kept in the match history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round: u32,
    pub player1_move: Option<Move>,
    pub player2_move: Option<Move>,
    pub player1_cheated: bool,
    pub player2_cheated: bool,
    pub outcome: RoundOutcome,
    pub kind: RoundKind,
}

/// What `finish_round` hands back to the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub kind: RoundKind,
    pub player1_move: Option<Move>,
    pub player2_move: Option<Move>,
    pub player1_cheated: bool,
    pub player2_cheated: bool,
    /// Scores after this round
    pub player1_score: u32,
    pub player2_score: u32,
}

/// Overall match winner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameWinner {
    Player1,
    Player2,
    Tie,
}

impl GameWinner {
    pub fn from_scores(player1: u32, player2: u32) -> Self {
        match player1.cmp(&player2) {
            std::cmp::Ordering::Greater => GameWinner::Player1,
            std::cmp::Ordering::Less => GameWinner::Player2,
            std::cmp::Ordering::Equal => GameWinner::Tie,
        }
    }

    pub fn label(self, mode: GameMode) -> &'static str {
        match (self, mode) {
            (GameWinner::Player1, GameMode::Pvc) => "You Win!",
            (GameWinner::Player2, GameMode::Pvc) => "Computer Wins!",
            (GameWinner::Player1, GameMode::Pvp) => "Player 1 Wins!",
            (GameWinner::Player2, GameMode::Pvp) => "Player 2 Wins!",
            (GameWinner::Tie, _) => "It's a Tie!",
        }
    }

    pub fn label_with_names(self, player1: &str, player2: &str) -> String {
        match self {
            GameWinner::Player1 => format!("{} Wins!", player1),
            GameWinner::Player2 => format!("{} Wins!", player2),
            GameWinner::Tie => "It's a Tie!".to_string(),
        }
    }
}

/// One match between two move sources
#[derive(Debug)]
pub struct Match<R = SeededRng> {
    mode: GameMode,
    total_rounds: u32,
    current_round: u32,
    player1_score: u32,
    player2_score: u32,
    phase: Phase,
    round: Round,
    history: Vec<RoundRecord>,
    opponent: Option<OpponentAi<R>>,
}

impl<R: RandomSource> Match<R> {
    /// Create a match with the default limits
    pub fn new(mode: GameMode, total_rounds: u32, rng: R) -> Result<Self, GameError> {
        Self::with_config(&GameConfig::default(), mode, total_rounds, rng)
    }

    /// Create a match; `rng` drives the computer opponent in PVC and is dropped in PVP
    pub fn with_config(
        config: &GameConfig,
        mode: GameMode,
        total_rounds: u32,
        rng: R,
    ) -> Result<Self, GameError> {
        let total_rounds = config.check_rounds(total_rounds)?;
        let opponent = match mode {
            GameMode::Pvc => Some(OpponentAi::new(config.opponent.clone(), rng)),
            GameMode::Pvp => None,
        };
        Ok(Self {
            mode,
            total_rounds,
            current_round: 0,
            player1_score: 0,
            player2_score: 0,
            phase: Phase::Idle,
            round: Round::default(),
            history: Vec::with_capacity(total_rounds as usize),
            opponent,
        })
    }

    /// Start the opponent from a previously learned profile. No effect in PVP.
    pub fn with_opponent_profile(mut self, profile: OpponentProfile) -> Self {
        if let Some(ai) = self.opponent.as_mut() {
            ai.replace_profile(profile);
        }
        self
    }

    /// Hand the learned profile back for pooling across matches
    pub fn into_opponent_profile(self) -> Option<OpponentProfile> {
        self.opponent.map(OpponentAi::into_profile)
    }

    /// Open the next round. Returns its 1-based index, or `None` when ignored.
    pub fn start_new_round(&mut self) -> Option<u32> {
        let ready = matches!(self.phase, Phase::Idle | Phase::RoundComplete);
        if !ready || !self.has_more_rounds() {
            debug!(phase = ?self.phase, round = self.current_round, "start_new_round ignored");
            return None;
        }

        self.current_round += 1;
        self.round = Round::default();
        self.phase = Phase::RoundActive;
        debug!(round = self.current_round, total = self.total_rounds, "round started");
        Some(self.current_round)
    }

    /// Take a move for `player`. A second move in the same round is kept out
    /// and flags the player as cheating instead.
    pub fn submit_move(&mut self, player: Player, m: Move) {
        if self.phase != Phase::RoundActive {
            debug!(phase = ?self.phase, ?player, "submit_move ignored");
            return;
        }

        let (slot, cheated) = self.round.slot(player);
        if slot.is_some() {
            *cheated = true;
            debug!(round = self.current_round, ?player, "repeat submission flagged");
        } else {
            *slot = Some(m);
        }
    }

    /// Resolve the open round. Returns `None` when no round is open.
    pub fn finish_round(&mut self) -> Option<RoundReport> {
        if self.phase != Phase::RoundActive {
            debug!(phase = ?self.phase, "finish_round ignored");
            return None;
        }
        self.phase = Phase::Resolving;

        if self.round.player2_move.is_none() {
            if let Some(ai) = self.opponent.as_mut() {
                self.round.player2_move = Some(ai.next_move(&self.history));
            }
        }

        let (outcome, kind) = self.round.adjudicate(self.mode);
        match outcome {
            RoundOutcome::Win => self.player1_score += 1,
            RoundOutcome::Lose => self.player2_score += 1,
            RoundOutcome::Draw | RoundOutcome::Void => {}
        }

        let record = RoundRecord {
            round: self.current_round,
            player1_move: self.round.player1_move,
            player2_move: self.round.player2_move,
            player1_cheated: self.round.player1_cheated,
            player2_cheated: self.round.player2_cheated,
            outcome,
            kind,
        };
        self.history.push(record);

        if let Some(ai) = self.opponent.as_mut() {
            ai.learn_from_round(record.player1_move, record.player2_move, outcome);
        }

        self.phase = if self.has_more_rounds() {
            Phase::RoundComplete
        } else {
            Phase::MatchComplete
        };
        debug!(
            round = record.round,
            ?outcome,
            ?kind,
            score = %self.score_text(),
            "round finished"
        );

        Some(RoundReport {
            round: record.round,
            outcome,
            kind,
            player1_move: record.player1_move,
            player2_move: record.player2_move,
            player1_cheated: record.player1_cheated,
            player2_cheated: record.player2_cheated,
            player1_score: self.player1_score,
            player2_score: self.player2_score,
        })
    }

    pub fn opponent(&self) -> Option<&OpponentAi<R>> {
        self.opponent.as_ref()
    }
}

impl<R> Match<R> {
    pub fn has_more_rounds(&self) -> bool {
        self.current_round < self.total_rounds
    }

    pub fn game_winner(&self) -> GameWinner {
        GameWinner::from_scores(self.player1_score, self.player2_score)
    }

    /// Score as "p1 - p2"
    pub fn score_text(&self) -> String {
        format!("{} - {}", self.player1_score, self.player2_score)
    }

    pub fn statistics(&self) -> MatchStatistics {
        MatchStatistics::new(self.mode, &self.history)
    }

    /// Summary for a history sink; `duration` is measured by the driver
    pub fn summary(&self, duration: Duration) -> MatchSummary {
        let winner = self.game_winner();
        MatchSummary {
            mode: self.mode,
            rounds: self.total_rounds,
            player1_score: self.player1_score,
            player2_score: self.player2_score,
            winner,
            winner_label: winner.label(self.mode).to_string(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Resolved rounds that moved neither score
    pub fn scoreless_rounds(&self) -> usize {
        self.history.iter().filter(|r| r.outcome.is_scoreless()).count()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn player1_score(&self) -> u32 {
        self.player1_score
    }

    pub fn player2_score(&self) -> u32 {
        self.player2_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The round open for input (or the last one, once resolved)
    pub fn active_round(&self) -> &Round {
        &self.round
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }
}
