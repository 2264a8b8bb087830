//! Adaptive computer opponent
//!
//! The opponent keeps two views of the human's play: lifetime counts per move
//! and a short FIFO window of the most recent moves. Move selection depends on
//! how many rounds have been played:
//!
//! - no history: uniform random
//! - early game: mostly random, sometimes countering the lifetime favourite
//! - afterwards: a cascade of stages, each tried only when the previous
//!   stage's draw failed, ending in a uniform random move
//!
//! The cascade probabilities are conditional, not a partition of 1: with the
//! default thresholds the effective shares are roughly 40/30/20/10.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::OpponentConfig;
use crate::engine::{RoundOutcome, RoundRecord};
use crate::moves::{compare, counter, random_move, Move, MoveCounts, Outcome};
use crate::random::RandomSource;

/// What the opponent learned about one human player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentProfile {
    frequency: MoveCounts,
    recent: VecDeque<Move>,
    window: usize,
}

impl OpponentProfile {
    pub fn new(window: usize) -> Self {
        Self {
            frequency: MoveCounts::default(),
            recent: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    /// Lifetime move counts
    pub fn frequency(&self) -> &MoveCounts {
        &self.frequency
    }

    /// Recent moves, oldest first
    pub fn recent_window(&self) -> &VecDeque<Move> {
        &self.recent
    }

    /// Record one human move, evicting the oldest recent move when full
    pub fn observe(&mut self, m: Move) {
        self.frequency.increment(m);
        self.recent.push_back(m);
        while self.recent.len() > self.window {
            self.recent.pop_front();
        }
    }

    /// Most frequent move in the recent window, `None` when the window is empty
    pub fn most_frequent_recent(&self) -> Option<Move> {
        if self.recent.is_empty() {
            return None;
        }
        let counts: MoveCounts = self.recent.iter().copied().collect();
        Some(counts.most_frequent())
    }

    /// Predict the next human move from the shape of the recent window.
    ///
    /// Checks A-B-A-B alternation over the last four moves first, then a
    /// ROCK -> PAPER -> SCISSORS progression over the last three.
    pub fn detect_pattern(&self) -> Option<Move> {
        let n = self.recent.len();
        if n < 3 {
            return None;
        }

        let last = self.recent[n - 1];
        let second_last = self.recent[n - 2];
        let third_last = self.recent[n - 3];

        if n >= 4 {
            let fourth_last = self.recent[n - 4];
            if last == third_last && second_last == fourth_last && last != second_last {
                return Some(second_last);
            }
        }

        if third_last.next_in_cycle() == second_last && second_last.next_in_cycle() == last {
            return Some(last.next_in_cycle());
        }

        None
    }

    /// The move that the lifetime counts would have beaten least often
    pub fn least_beaten(&self) -> Move {
        let mut best = Move::Rock;
        let mut min_beaten = u32::MAX;
        for candidate in Move::ALL {
            let beaten: u32 = Move::ALL
                .into_iter()
                .filter(|p| compare(*p, candidate) == Outcome::Win)
                .map(|p| self.frequency.get(p))
                .sum();
            if beaten < min_beaten {
                min_beaten = beaten;
                best = candidate;
            }
        }
        best
    }
}

/// Which branch produced the opponent's last move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tactic {
    /// No history yet
    Opening,
    /// Early game random pick
    EarlyRandom,
    /// Early game counter of the lifetime favourite
    CounterLifetime,
    /// Counter of the recent favourite (random when the window is empty)
    CounterRecent,
    /// Counter of a detected alternation or progression
    CounterPattern,
    /// Move beaten least often by lifetime counts
    LeastBeaten,
    /// Nothing fired
    Fallback,
}

type Stage<R> = fn(&OpponentProfile, &mut R) -> Option<Move>;

fn counter_recent<R: RandomSource>(profile: &OpponentProfile, rng: &mut R) -> Option<Move> {
    match profile.most_frequent_recent() {
        Some(m) => Some(counter(m)),
        None => Some(random_move(rng)),
    }
}

fn counter_pattern<R: RandomSource>(profile: &OpponentProfile, _rng: &mut R) -> Option<Move> {
    profile.detect_pattern().map(counter)
}

fn least_beaten<R: RandomSource>(profile: &OpponentProfile, _rng: &mut R) -> Option<Move> {
    Some(profile.least_beaten())
}

/// Stateful adaptive opponent for one match
#[derive(Clone, Debug)]
pub struct OpponentAi<R> {
    profile: OpponentProfile,
    config: OpponentConfig,
    rng: R,
    last_tactic: Option<Tactic>,
}

impl<R: RandomSource> OpponentAi<R> {
    pub fn new(config: OpponentConfig, rng: R) -> Self {
        let profile = OpponentProfile::new(config.learning_window);
        Self::with_profile(config, profile, rng)
    }

    /// Resume from a previously learned profile
    pub fn with_profile(config: OpponentConfig, profile: OpponentProfile, rng: R) -> Self {
        Self {
            profile,
            config,
            rng,
            last_tactic: None,
        }
    }

    pub fn profile(&self) -> &OpponentProfile {
        &self.profile
    }

    pub fn replace_profile(&mut self, profile: OpponentProfile) {
        self.profile = profile;
    }

    pub fn into_profile(self) -> OpponentProfile {
        self.profile
    }

    pub fn last_tactic(&self) -> Option<Tactic> {
        self.last_tactic
    }

    /// Update the profile after a finished round. A missing human move is ignored.
    pub fn learn_from_round(
        &mut self,
        player_move: Option<Move>,
        computer_move: Option<Move>,
        result: RoundOutcome,
    ) {
        let Some(m) = player_move else {
            return;
        };
        self.profile.observe(m);
        trace!(
            player = %m,
            computer = ?computer_move,
            ?result,
            window = self.profile.recent.len(),
            "opponent learned"
        );
    }

    /// Pick the computer's move for the coming round
    pub fn next_move(&mut self, history: &[RoundRecord]) -> Move {
        let (tactic, m) = self.choose(history.len());
        debug!(rounds_played = history.len(), ?tactic, chosen = %m, "opponent move");
        self.last_tactic = Some(tactic);
        m
    }

    fn choose(&mut self, rounds_played: usize) -> (Tactic, Move) {
        if rounds_played == 0 {
            return (Tactic::Opening, random_move(&mut self.rng));
        }

        if rounds_played < self.config.early_game_rounds {
            if self.rng.next_f64() < self.config.early_random_threshold {
                return (Tactic::EarlyRandom, random_move(&mut self.rng));
            }
            return (Tactic::CounterLifetime, counter(self.profile.frequency.most_frequent()));
        }

        let stages: [(f64, Tactic, Stage<R>); 3] = [
            (self.config.recent_frequency_threshold, Tactic::CounterRecent, counter_recent::<R>),
            (self.config.pattern_threshold, Tactic::CounterPattern, counter_pattern::<R>),
            (self.config.anti_frequency_threshold, Tactic::LeastBeaten, least_beaten::<R>),
        ];
        for (threshold, tactic, stage) in stages {
            if self.rng.next_f64() < threshold {
                if let Some(m) = stage(&self.profile, &mut self.rng) {
                    return (tactic, m);
                }
            }
        }

        (Tactic::Fallback, random_move(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Draw, ScriptedRng, SeededRng};

    fn profile_of(moves: &[Move]) -> OpponentProfile {
        let mut profile = OpponentProfile::new(5);
        for m in moves {
            profile.observe(*m);
        }
        profile
    }

    fn ai_with(moves: &[Move], script: Vec<Draw>) -> OpponentAi<ScriptedRng> {
        OpponentAi::with_profile(
            OpponentConfig::default(),
            profile_of(moves),
            ScriptedRng::new(script),
        )
    }

    fn history(n: usize) -> Vec<RoundRecord> {
        (0..n).map(|_| RoundRecord::default()).collect()
    }

    use Move::{Paper, Rock, Scissors};

    #[test]
    fn test_window_evicts_oldest() {
        let profile = profile_of(&[Rock, Paper, Scissors, Rock, Paper, Scissors, Scissors]);
        assert_eq!(profile.recent_window().len(), 5);
        assert_eq!(
            profile.recent_window().iter().copied().collect::<Vec<_>>(),
            vec![Scissors, Rock, Paper, Scissors, Scissors]
        );
        assert_eq!(profile.frequency().total(), 7);
        assert_eq!(profile.frequency().get(Scissors), 3);
    }

    #[test]
    fn test_learn_ignores_missing_move() {
        let mut ai = OpponentAi::new(OpponentConfig::default(), SeededRng::new(1));
        ai.learn_from_round(None, Some(Rock), RoundOutcome::Lose);
        assert_eq!(ai.profile().frequency().total(), 0);
        assert!(ai.profile().recent_window().is_empty());

        ai.learn_from_round(Some(Paper), Some(Rock), RoundOutcome::Win);
        assert_eq!(ai.profile().frequency().get(Paper), 1);
        assert_eq!(ai.profile().recent_window().len(), 1);
    }

    #[test]
    fn test_alternation_detected() {
        let profile = profile_of(&[Rock, Paper, Rock, Paper]);
        assert_eq!(profile.detect_pattern(), Some(Rock));

        let profile = profile_of(&[Scissors, Scissors, Rock, Scissors, Rock]);
        assert_eq!(profile.detect_pattern(), Some(Scissors));
    }

    #[test]
    fn test_repeated_move_is_not_alternation() {
        let profile = profile_of(&[Rock, Rock, Rock, Rock]);
        assert_eq!(profile.detect_pattern(), None);
    }

    #[test]
    fn test_progression_detected() {
        let profile = profile_of(&[Paper, Scissors, Rock]);
        assert_eq!(profile.detect_pattern(), Some(Paper));

        let profile = profile_of(&[Rock, Paper, Scissors]);
        assert_eq!(profile.detect_pattern(), Some(Rock));
    }

    #[test]
    fn test_short_window_has_no_pattern() {
        assert_eq!(profile_of(&[Rock, Paper]).detect_pattern(), None);
        assert_eq!(profile_of(&[Rock, Scissors, Paper]).detect_pattern(), None);
    }

    #[test]
    fn test_least_beaten() {
        // nothing learned: all tie at zero, first in order wins
        assert_eq!(profile_of(&[]).least_beaten(), Rock);

        // human loves rock: rock and paper are never beaten, scissors always is
        assert_eq!(profile_of(&[Rock, Rock, Rock]).least_beaten(), Rock);
        assert_eq!(profile_of(&[Paper, Paper]).least_beaten(), Paper);

        // rock 2, scissors 1: rock beaten by paper (0), paper by scissors (1),
        // scissors by rock (2)
        assert_eq!(profile_of(&[Rock, Rock, Scissors]).least_beaten(), Rock);
    }

    #[test]
    fn test_opening_is_random() {
        let mut ai = ai_with(&[], vec![Draw::Index(2)]);
        assert_eq!(ai.next_move(&[]), Scissors);
        assert_eq!(ai.last_tactic(), Some(Tactic::Opening));
    }

    #[test]
    fn test_early_game_random_branch() {
        let mut ai = ai_with(&[Rock], vec![Draw::Float(0.69), Draw::Index(1)]);
        assert_eq!(ai.next_move(&history(1)), Paper);
        assert_eq!(ai.last_tactic(), Some(Tactic::EarlyRandom));
    }

    #[test]
    fn test_early_game_counters_lifetime_favourite() {
        let mut ai = ai_with(&[Scissors, Scissors], vec![Draw::Float(0.7)]);
        assert_eq!(ai.next_move(&history(2)), Rock);
        assert_eq!(ai.last_tactic(), Some(Tactic::CounterLifetime));
    }

    #[test]
    fn test_stage_one_counters_recent_favourite() {
        let mut ai = ai_with(&[Paper, Paper, Rock], vec![Draw::Float(0.1)]);
        assert_eq!(ai.next_move(&history(3)), Scissors);
        assert_eq!(ai.last_tactic(), Some(Tactic::CounterRecent));
    }

    #[test]
    fn test_stage_one_empty_window_is_random() {
        let mut ai = ai_with(&[], vec![Draw::Float(0.1), Draw::Index(0)]);
        assert_eq!(ai.next_move(&history(4)), Rock);
        assert_eq!(ai.last_tactic(), Some(Tactic::CounterRecent));
    }

    #[test]
    fn test_stage_two_counters_pattern() {
        // alternation predicts paper next; counter is scissors
        let mut ai = ai_with(
            &[Rock, Paper, Rock, Paper, Rock],
            vec![Draw::Float(0.4), Draw::Float(0.49)],
        );
        assert_eq!(ai.next_move(&history(5)), Scissors);
        assert_eq!(ai.last_tactic(), Some(Tactic::CounterPattern));
    }

    #[test]
    fn test_stage_two_without_pattern_falls_through() {
        let mut ai = ai_with(
            &[Rock, Rock, Rock],
            vec![Draw::Float(0.9), Draw::Float(0.0), Draw::Float(0.1)],
        );
        assert_eq!(ai.next_move(&history(3)), Rock);
        assert_eq!(ai.last_tactic(), Some(Tactic::LeastBeaten));
    }

    #[test]
    fn test_stage_three_least_beaten() {
        let mut ai = ai_with(
            &[Scissors, Scissors, Scissors],
            vec![Draw::Float(0.5), Draw::Float(0.5), Draw::Float(0.66)],
        );
        // scissors beats paper, so paper is the most beaten; rock is never beaten
        assert_eq!(ai.next_move(&history(3)), Rock);
        assert_eq!(ai.last_tactic(), Some(Tactic::LeastBeaten));
    }

    #[test]
    fn test_fallback_random() {
        let mut ai = ai_with(
            &[Rock, Paper, Rock, Paper],
            vec![Draw::Float(0.4), Draw::Float(0.5), Draw::Float(0.67), Draw::Index(2)],
        );
        assert_eq!(ai.next_move(&history(4)), Scissors);
        assert_eq!(ai.last_tactic(), Some(Tactic::Fallback));
    }

    #[test]
    fn test_seeded_sequence_is_reproducible() {
        let run = || {
            let mut ai = OpponentAi::new(OpponentConfig::default(), SeededRng::new(99));
            let human = [Rock, Paper, Paper, Scissors, Rock, Rock, Paper, Scissors];
            let mut records = Vec::new();
            let mut picks = Vec::new();
            for m in human {
                let pick = ai.next_move(&records);
                ai.learn_from_round(Some(m), Some(pick), RoundOutcome::Draw);
                records.push(RoundRecord::default());
                picks.push((pick, ai.last_tactic()));
            }
            picks
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = profile_of(&[Rock, Scissors, Scissors]);
        let json = serde_json::to_string(&profile).unwrap();
        let back: OpponentProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
