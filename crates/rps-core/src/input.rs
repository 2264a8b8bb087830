//! Keyboard bindings for the two players

use serde::{Deserialize, Serialize};

use crate::moves::{GameMode, Move, Player};

/// Rock, paper and scissors keys for one player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub rock: char,
    pub paper: char,
    pub scissors: char,
}

impl KeySet {
    fn resolve(&self, key: char) -> Option<Move> {
        let key = key.to_ascii_uppercase();
        [(self.rock, Move::Rock), (self.paper, Move::Paper), (self.scissors, Move::Scissors)]
            .into_iter()
            .find(|(k, _)| k.to_ascii_uppercase() == key)
            .map(|(_, m)| m)
    }
}

/// Key layout for a shared keyboard. Matching is case-insensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub player1: KeySet,
    pub player2: KeySet,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            player1: KeySet {
                rock: 'A',
                paper: 'S',
                scissors: 'D',
            },
            player2: KeySet {
                rock: 'J',
                paper: 'K',
                scissors: 'L',
            },
        }
    }
}

impl KeyBindings {
    /// Map a key press to a player and move. Player two's keys are dead in PVC.
    pub fn resolve(&self, mode: GameMode, key: char) -> Option<(Player, Move)> {
        if let Some(m) = self.player1.resolve(key) {
            return Some((Player::One, m));
        }
        if mode == GameMode::Pvp {
            if let Some(m) = self.player2.resolve(key) {
                return Some((Player::Two, m));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let keys = KeyBindings::default();
        let pvp = |key| keys.resolve(GameMode::Pvp, key);
        assert_eq!(pvp('a'), Some((Player::One, Move::Rock)));
        assert_eq!(pvp('S'), Some((Player::One, Move::Paper)));
        assert_eq!(pvp('d'), Some((Player::One, Move::Scissors)));
        assert_eq!(pvp('j'), Some((Player::Two, Move::Rock)));
        assert_eq!(pvp('K'), Some((Player::Two, Move::Paper)));
        assert_eq!(pvp('l'), Some((Player::Two, Move::Scissors)));
        assert_eq!(pvp('x'), None);
    }

    #[test]
    fn test_player_two_keys_dead_in_pvc() {
        let keys = KeyBindings::default();
        assert_eq!(keys.resolve(GameMode::Pvc, 'j'), None);
        let resolved = keys.resolve(GameMode::Pvc, 'a');
        assert_eq!(resolved, Some((Player::One, Move::Rock)));
    }
}
