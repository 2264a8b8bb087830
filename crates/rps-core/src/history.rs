//! Finished-match summaries and the in-memory aggregates built from them
//!
//! Persisting these records is left to the caller: everything here derives
//! serde traits and holds no file handles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::GameWinner;
use crate::moves::GameMode;

/// What a finished match reports to a history sink
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub mode: GameMode,
    pub rounds: u32,
    pub player1_score: u32,
    pub player2_score: u32,
    pub winner: GameWinner,
    pub winner_label: String,
    pub duration_ms: u64,
}

impl MatchSummary {
    /// Match length as `m:ss`, or `Ns` under a minute
    pub fn formatted_duration(&self) -> String {
        let seconds = self.duration_ms / 1000;
        let (minutes, seconds) = (seconds / 60, seconds % 60);
        if minutes > 0 {
            format!("{}:{:02}", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Destination for finished-match summaries
pub trait HistorySink {
    fn record(&mut self, summary: MatchSummary);
}

impl<S: HistorySink + ?Sized> HistorySink for &mut S {
    fn record(&mut self, summary: MatchSummary) {
        (**self).record(summary)
    }
}

/// Per-mode aggregate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeStats {
    pub mode: GameMode,
    pub games: usize,
    pub wins: usize,
    pub win_percentage: f64,
    /// Rounds played across every match in this mode
    pub total_rounds: u32,
    /// Mean match length, 0 with no matches
    pub average_duration_ms: u64,
}

/// Ordered log of finished matches, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    records: Vec<MatchSummary>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MatchSummary] {
        &self.records
    }

    pub fn total_games(&self) -> usize {
        self.records.len()
    }

    /// Matches won by player one (the human in PVC)
    pub fn total_wins(&self) -> usize {
        self.records.iter().filter(|r| r.winner == GameWinner::Player1).count()
    }

    pub fn win_percentage(&self) -> f64 {
        percentage(self.total_wins(), self.total_games())
    }

    pub fn stats_for_mode(&self, mode: GameMode) -> ModeStats {
        let matches: Vec<&MatchSummary> =
            self.records.iter().filter(|r| r.mode == mode).collect();
        let games = matches.len();
        let wins = matches.iter().filter(|r| r.winner == GameWinner::Player1).count();
        let total_duration: u64 = matches.iter().map(|r| r.duration_ms).sum();
        ModeStats {
            mode,
            games,
            wins,
            win_percentage: percentage(wins, games),
            total_rounds: matches.iter().map(|r| r.rounds).sum(),
            average_duration_ms: total_duration.checked_div(games as u64).unwrap_or(0),
        }
    }

    /// Up to `count` most recent matches, newest first
    pub fn recent(&self, count: usize) -> Vec<&MatchSummary> {
        self.records.iter().rev().take(count).collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn stats_summary(&self) -> String {
        if self.records.is_empty() {
            return "No games played yet.".to_string();
        }

        let mut summary = String::from("=== GAME STATISTICS ===\n");
        summary.push_str(&format!("Total Games: {}\n", self.total_games()));
        summary.push_str(&format!("Total Wins: {}\n", self.total_wins()));
        summary.push_str(&format!("Win Rate: {:.1}%\n", self.win_percentage()));

        for mode in [GameMode::Pvc, GameMode::Pvp] {
            let stats = self.stats_for_mode(mode);
            if stats.games > 0 {
                summary.push_str(&format!(
                    "{}:\n  Games: {}, Wins: {} ({:.1}%)\n",
                    mode, stats.games, stats.wins, stats.win_percentage
                ));
            }
        }
        summary
    }
}

impl HistorySink for GameHistory {
    fn record(&mut self, summary: MatchSummary) {
        self.records.push(summary);
    }
}

/// Lifetime stats for one named player
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub games_played: u32,
    pub games_won: u32,
    pub rounds_played: u32,
    pub pvc_games: u32,
    pub pvc_wins: u32,
    pub pvp_games: u32,
    pub pvp_wins: u32,
    /// Registry update sequence at this player's last match; higher is more recent
    pub last_played: u64,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn win_rate(&self) -> f64 {
        percentage(self.games_won as usize, self.games_played as usize)
    }

    pub fn pvc_win_rate(&self) -> f64 {
        percentage(self.pvc_wins as usize, self.pvc_games as usize)
    }

    pub fn pvp_win_rate(&self) -> f64 {
        percentage(self.pvp_wins as usize, self.pvp_games as usize)
    }
}

/// Named players and their lifetime stats
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: HashMap<String, PlayerRecord>,
    updates: u64,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn update(&mut self, name: &str, mode: GameMode, won: bool, rounds: u32) {
        self.updates += 1;
        let player = self
            .players
            .entry(name.to_string())
            .or_insert_with(|| PlayerRecord::new(name));

        player.games_played += 1;
        player.rounds_played += rounds;
        player.last_played = self.updates;
        if won {
            player.games_won += 1;
        }
        match mode {
            GameMode::Pvc => {
                player.pvc_games += 1;
                if won {
                    player.pvc_wins += 1;
                }
            }
            GameMode::Pvp => {
                player.pvp_games += 1;
                if won {
                    player.pvp_wins += 1;
                }
            }
        }
    }

    /// Credit a finished match. Player two is only tracked in PVP.
    pub fn record_match(&mut self, summary: &MatchSummary, player1: &str, player2: &str) {
        self.update(
            player1,
            summary.mode,
            summary.winner == GameWinner::Player1,
            summary.rounds,
        );
        if summary.mode == GameMode::Pvp {
            self.update(
                player2,
                summary.mode,
                summary.winner == GameWinner::Player2,
                summary.rounds,
            );
        }
    }

    /// Names of up to `count` players, most recently active first
    pub fn recent_players(&self, count: usize) -> Vec<&str> {
        let mut players: Vec<&PlayerRecord> = self.players.values().collect();
        players.sort_by(|a, b| b.last_played.cmp(&a.last_played));
        players.into_iter().take(count).map(|p| p.name.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Players by win rate in whole percentage points, then games won, then name
    pub fn leaderboard(&self) -> Vec<&PlayerRecord> {
        let mut board: Vec<&PlayerRecord> = self.players.values().collect();
        board.sort_by(|a, b| {
            rate_key(b)
                .cmp(&rate_key(a))
                .then_with(|| b.games_won.cmp(&a.games_won))
                .then_with(|| a.name.cmp(&b.name))
        });
        board
    }
}

fn rate_key(player: &PlayerRecord) -> u64 {
    player.win_rate().round() as u64
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
