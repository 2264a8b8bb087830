//! Derived statistics over a match history

use serde::{Deserialize, Serialize};

use crate::engine::{RoundOutcome, RoundRecord};
use crate::moves::{GameMode, Move, MoveCounts};

/// Snapshot of a match's resolved rounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub mode: GameMode,
    pub rounds: usize,
    pub player1_frequency: MoveCounts,
    pub player2_frequency: MoveCounts,
    pub player1_score: u32,
    pub player2_score: u32,
    pub draws: u32,
    pub voids: u32,
    /// Rounds decided or voided by cheating
    pub cheat_rounds: u32,
    /// Player one's round wins as a percentage of resolved rounds
    pub win_percentage: f64,
}

impl MatchStatistics {
    pub fn new(mode: GameMode, history: &[RoundRecord]) -> Self {
        let mut stats = Self {
            mode,
            rounds: history.len(),
            player1_frequency: MoveCounts::default(),
            player2_frequency: MoveCounts::default(),
            player1_score: 0,
            player2_score: 0,
            draws: 0,
            voids: 0,
            cheat_rounds: 0,
            win_percentage: 0.0,
        };

        for record in history {
            if let Some(m) = record.player1_move {
                stats.player1_frequency.increment(m);
            }
            if let Some(m) = record.player2_move {
                stats.player2_frequency.increment(m);
            }
            match record.outcome {
                RoundOutcome::Win => stats.player1_score += 1,
                RoundOutcome::Lose => stats.player2_score += 1,
                RoundOutcome::Draw => stats.draws += 1,
                RoundOutcome::Void => stats.voids += 1,
            }
            if record.kind.is_cheat() {
                stats.cheat_rounds += 1;
            }
        }

        if stats.rounds > 0 {
            stats.win_percentage = stats.player1_score as f64 / stats.rounds as f64 * 100.0;
        }
        stats
    }

    /// Multi-line text summary
    pub fn summary(&self) -> String {
        let (p1_label, p2_label, rate_label) = match self.mode {
            GameMode::Pvc => ("You", "Computer", "Your Win Rate"),
            GameMode::Pvp => ("Player 1", "Player 2", "Player 1 Win Rate"),
        };

        let mut out = String::new();
        out.push_str("Game Statistics:\n");
        out.push_str(&format!("Total Rounds: {}\n", self.rounds));
        out.push_str(&format!(
            "Final Score: {} - {}\n",
            self.player1_score, self.player2_score
        ));
        out.push_str(&format!("{}: {:.1}%\n", rate_label, self.win_percentage));
        if self.voids > 0 || self.cheat_rounds > 0 {
            out.push_str(&format!(
                "Cheat Rounds: {} ({} void)\n",
                self.cheat_rounds, self.voids
            ));
        }
        for (label, counts) in [
            (p1_label, &self.player1_frequency),
            (p2_label, &self.player2_frequency),
        ] {
            out.push_str(&format!("{} Moves: {}\n", label, format_counts(counts)));
        }
        out
    }
}

fn format_counts(counts: &MoveCounts) -> String {
    Move::ALL
        .iter()
        .map(|m| format!("{} {}", m.name(), counts.get(*m)))
        .collect::<Vec<_>>()
        .join(", ")
}
