//! Move values and the outcome relation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::random::RandomSource;

/// A move in Rock Paper Scissors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// All moves in enumeration order. Every tie-break in the crate follows it.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Move::Rock => "✊",
            Move::Paper => "✋",
            Move::Scissors => "✌️",
        }
    }

    /// Single-letter shortcut (R, P, S)
    pub fn shortcut(self) -> char {
        match self {
            Move::Rock => 'R',
            Move::Paper => 'P',
            Move::Scissors => 'S',
        }
    }

    pub fn from_char(c: char) -> Option<Move> {
        let c = c.to_ascii_uppercase();
        Move::ALL.into_iter().find(|m| m.shortcut() == c)
    }

    /// Successor in the ROCK -> PAPER -> SCISSORS -> ROCK cycle.
    ///
    /// Coincides with [`counter`]: each move in the cycle beats its predecessor.
    pub fn next_in_cycle(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Move::from_char(c).ok_or_else(|| GameError::UnknownMove(s.to_string()));
        }
        Move::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GameError::UnknownMove(s.to_string()))
    }
}

/// Result of a comparison, from a stated player's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Lose => "Lose",
            Outcome::Draw => "Draw",
        }
    }

    /// Same result seen from the other side
    pub fn flip(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the two seats in a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

/// Who supplies player two's moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Player vs Player
    Pvp,
    /// Player vs Computer
    Pvc,
}

impl GameMode {
    pub fn display_name(self) -> &'static str {
        match self {
            GameMode::Pvp => "Player vs Player",
            GameMode::Pvc => "Player vs Computer",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GameMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(GameMode::Pvp),
            "pvc" => Ok(GameMode::Pvc),
            _ => Err(GameError::UnknownMode(s.to_string())),
        }
    }
}

/// Compare two moves from `a`'s perspective
pub fn compare(a: Move, b: Move) -> Outcome {
    if a == b {
        return Outcome::Draw;
    }
    match (a, b) {
        (Move::Rock, Move::Scissors)
        | (Move::Paper, Move::Rock)
        | (Move::Scissors, Move::Paper) => Outcome::Win,
        _ => Outcome::Lose,
    }
}

/// The unique move that defeats `m`
pub fn counter(m: Move) -> Move {
    match m {
        Move::Rock => Move::Paper,
        Move::Paper => Move::Scissors,
        Move::Scissors => Move::Rock,
    }
}

/// Uniform draw over the three moves
pub fn random_move<R: RandomSource + ?Sized>(rng: &mut R) -> Move {
    Move::ALL[rng.next_index(Move::ALL.len())]
}

/// Per-move counters, always holding all three keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl MoveCounts {
    pub fn get(&self, m: Move) -> u32 {
        match m {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
        }
    }

    pub fn increment(&mut self, m: Move) {
        let slot = match m {
            Move::Rock => &mut self.rock,
            Move::Paper => &mut self.paper,
            Move::Scissors => &mut self.scissors,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// Move with the strictly highest count; ties and the all-zero table
    /// resolve to the earliest move in enumeration order.
    pub fn most_frequent(&self) -> Move {
        let mut best = Move::Rock;
        let mut best_count = 0;
        for m in Move::ALL {
            if self.get(m) > best_count {
                best_count = self.get(m);
                best = m;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (Move, u32)> + '_ {
        Move::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

impl FromIterator<Move> for MoveCounts {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut counts = MoveCounts::default();
        for m in iter {
            counts.increment(m);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Draw, ScriptedRng};

    #[test]
    fn test_compare_table() {
        assert_eq!(compare(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(compare(Move::Scissors, Move::Rock), Outcome::Lose);
        assert_eq!(compare(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(compare(Move::Rock, Move::Paper), Outcome::Lose);
        assert_eq!(compare(Move::Scissors, Move::Paper), Outcome::Win);
        assert_eq!(compare(Move::Paper, Move::Scissors), Outcome::Lose);
        for m in Move::ALL {
            assert_eq!(compare(m, m), Outcome::Draw);
        }
    }

    #[test]
    fn test_counter_beats_target() {
        assert_eq!(counter(Move::Rock), Move::Paper);
        assert_eq!(counter(Move::Paper), Move::Scissors);
        assert_eq!(counter(Move::Scissors), Move::Rock);
        for m in Move::ALL {
            assert_eq!(compare(counter(m), m), Outcome::Win);
            assert_eq!(m.next_in_cycle(), counter(m));
        }
    }

    #[test]
    fn test_random_move_uses_index() {
        let mut rng = ScriptedRng::new([Draw::Index(0), Draw::Index(1), Draw::Index(2)]);
        assert_eq!(random_move(&mut rng), Move::Rock);
        assert_eq!(random_move(&mut rng), Move::Paper);
        assert_eq!(random_move(&mut rng), Move::Scissors);
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!("rock".parse::<Move>(), Ok(Move::Rock));
        assert_eq!(" PAPER ".parse::<Move>(), Ok(Move::Paper));
        assert_eq!("s".parse::<Move>(), Ok(Move::Scissors));
        assert_eq!(
            "lizard".parse::<Move>(),
            Err(GameError::UnknownMove("lizard".to_string()))
        );
        assert!("x".parse::<Move>().is_err());
        assert_eq!(Move::from_char('p'), Some(Move::Paper));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("PVC".parse::<GameMode>(), Ok(GameMode::Pvc));
        assert_eq!("pvp".parse::<GameMode>(), Ok(GameMode::Pvp));
        assert!("coop".parse::<GameMode>().is_err());
        assert_eq!(GameMode::Pvc.to_string(), "Player vs Computer");
    }

    #[test]
    fn test_outcome_flip() {
        assert_eq!(Outcome::Win.flip(), Outcome::Lose);
        assert_eq!(Outcome::Lose.flip(), Outcome::Win);
        assert_eq!(Outcome::Draw.flip(), Outcome::Draw);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        assert_eq!(MoveCounts::default().most_frequent(), Move::Rock);

        let counts: MoveCounts = [Move::Scissors, Move::Paper].into_iter().collect();
        assert_eq!(counts.most_frequent(), Move::Paper);

        let counts: MoveCounts = [Move::Scissors, Move::Scissors, Move::Rock].into_iter().collect();
        assert_eq!(counts.most_frequent(), Move::Scissors);
        assert_eq!(counts.total(), 3);
    }
}
