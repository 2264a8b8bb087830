//! WASM bindings for a browser front end

#![cfg(feature = "wasm")]

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::{compare, GameMode, Match, Move, Player, SeededRng};

fn parse_move(s: &str) -> Result<Move, JsError> {
    s.parse::<Move>().map_err(|e| JsError::new(&e.to_string()))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// A match driven from JavaScript
#[wasm_bindgen]
pub struct WasmMatch {
    inner: Match<SeededRng>,
    started_at: f64,
}

#[wasm_bindgen]
impl WasmMatch {
    /// `mode` is "pvp" or "pvc"
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str, rounds: u32, seed: u64) -> Result<WasmMatch, JsError> {
        let mode: GameMode = mode
            .parse()
            .map_err(|e: crate::GameError| JsError::new(&e.to_string()))?;
        let inner = Match::new(mode, rounds, SeededRng::new(seed))
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(WasmMatch {
            inner,
            started_at: js_sys::Date::now(),
        })
    }

    /// Returns the new round number, or undefined when ignored
    #[wasm_bindgen(js_name = startRound)]
    pub fn start_round(&mut self) -> Option<u32> {
        self.inner.start_new_round()
    }

    /// `player` is 1 or 2
    #[wasm_bindgen(js_name = submitMove)]
    pub fn submit_move(&mut self, player: u8, m: &str) -> Result<(), JsError> {
        let player = match player {
            1 => Player::One,
            2 => Player::Two,
            _ => return Err(JsError::new(&format!("Unknown player: {}", player))),
        };
        self.inner.submit_move(player, parse_move(m)?);
        Ok(())
    }

    /// Round report as an object, or null when no round is open
    #[wasm_bindgen(js_name = finishRound)]
    pub fn finish_round(&mut self) -> Result<JsValue, JsError> {
        match self.inner.finish_round() {
            Some(report) => to_js(&report),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = hasMoreRounds)]
    pub fn has_more_rounds(&self) -> bool {
        self.inner.has_more_rounds()
    }

    #[wasm_bindgen(js_name = gameWinner)]
    pub fn game_winner(&self) -> String {
        self.inner.game_winner().label(self.inner.mode()).to_string()
    }

    #[wasm_bindgen(js_name = scoreText)]
    pub fn score_text(&self) -> String {
        self.inner.score_text()
    }

    pub fn statistics(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.statistics())
    }

    /// Finished-match summary, timed from construction
    pub fn summary(&self) -> Result<JsValue, JsError> {
        let elapsed_ms = (js_sys::Date::now() - self.started_at).max(0.0);
        let elapsed = Duration::from_millis(elapsed_ms as u64);
        to_js(&self.inner.summary(elapsed))
    }
}

/// Compare two moves from the first move's perspective: "Win", "Lose" or "Draw"
#[wasm_bindgen]
pub fn compare_moves(a: &str, b: &str) -> Result<String, JsError> {
    Ok(compare(parse_move(a)?, parse_move(b)?).name().to_string())
}
