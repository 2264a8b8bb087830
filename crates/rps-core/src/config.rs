//! Tunable limits and opponent thresholds

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Upper bound on rounds per match
pub const MAX_ROUNDS: u32 = 10;

/// Rounds used when the caller does not pick a count
pub const DEFAULT_ROUNDS: u32 = 3;

/// Recent-move window kept by the opponent
pub const LEARNING_WINDOW: usize = 5;

/// Match-level configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_rounds: u32,
    pub default_rounds: u32,
    pub opponent: OpponentConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            default_rounds: DEFAULT_ROUNDS,
            opponent: OpponentConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON config and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_rounds == 0 {
            return Err(invalid("max_rounds must be at least 1"));
        }
        if self.check_rounds(self.default_rounds).is_err() {
            return Err(invalid(format!(
                "default_rounds {} not in 1..={}",
                self.default_rounds, self.max_rounds
            )));
        }
        self.opponent.validate()
    }

    /// Check a requested round count against `[1, max_rounds]`
    pub fn check_rounds(&self, requested: u32) -> Result<u32, GameError> {
        if requested == 0 || requested > self.max_rounds {
            return Err(GameError::InvalidRounds {
                requested,
                max: self.max_rounds,
            });
        }
        Ok(requested)
    }
}

/// Opponent learning and branch probabilities
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Capacity of the recent-move window
    pub learning_window: usize,
    /// History length at which the strategic cascade takes over
    pub early_game_rounds: usize,
    /// Early game: chance of a plain random move
    pub early_random_threshold: f64,
    /// Stage 1: counter the most frequent recent move
    pub recent_frequency_threshold: f64,
    /// Stage 2: pattern detection (conditional on stage 1 not firing)
    pub pattern_threshold: f64,
    /// Stage 3: least-beaten move (conditional on stages 1 and 2 not firing)
    pub anti_frequency_threshold: f64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            learning_window: LEARNING_WINDOW,
            early_game_rounds: 3,
            early_random_threshold: 0.7,
            recent_frequency_threshold: 0.4,
            pattern_threshold: 0.5,
            anti_frequency_threshold: 0.67,
        }
    }
}

impl OpponentConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.learning_window == 0 {
            return Err(invalid("learning_window must be at least 1"));
        }
        let thresholds = [
            ("early_random_threshold", self.early_random_threshold),
            ("recent_frequency_threshold", self.recent_frequency_threshold),
            ("pattern_threshold", self.pattern_threshold),
            ("anti_frequency_threshold", self.anti_frequency_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} = {} not in [0, 1]", name, value)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> GameError {
    GameError::InvalidConfig(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.default_rounds, 3);
        assert_eq!(config.opponent.learning_window, 5);
    }

    #[test]
    fn test_check_rounds_bounds() {
        let config = GameConfig::default();
        assert_eq!(config.check_rounds(1), Ok(1));
        assert_eq!(config.check_rounds(10), Ok(10));
        assert_eq!(
            config.check_rounds(0),
            Err(GameError::InvalidRounds {
                requested: 0,
                max: 10,
            })
        );
        assert_eq!(
            config.check_rounds(11),
            Err(GameError::InvalidRounds {
                requested: 11,
                max: 10,
            })
        );
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{"max_rounds": 20, "opponent": {"pattern_threshold": 0.9}}"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.max_rounds, 20);
        assert_eq!(config.default_rounds, 3);
        assert_eq!(config.opponent.pattern_threshold, 0.9);
        assert_eq!(config.opponent.recent_frequency_threshold, 0.4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{"max_rounds": 0}"#),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"max_rounds": 2, "default_rounds": 3}"#),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"opponent": {"early_random_threshold": 1.5}}"#),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"opponent": {"learning_window": 0}}"#),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
