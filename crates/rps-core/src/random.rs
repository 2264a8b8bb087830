//! Seeded pseudo-random number generation
//!
//! The opponent draws every decision through [`RandomSource`], so a match can be
//! replayed exactly by handing it the same source. [`SeededRng`] is the default
//! xorshift generator; [`ScriptedRng`] replays a fixed list of draws.

use std::collections::VecDeque;

/// Source of randomness consumed by the opponent.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves the all-zero state
        let state = (seed ^ 0x9e3779b97f4a7c15).max(1);

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        // 53 high bits -> [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }
}

/// A single scripted draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Draw {
    /// Answer for the next `next_f64` call
    Float(f64),
    /// Answer for the next `next_index` call (reduced modulo `len`)
    Index(usize),
}

/// Replays a fixed script of draws.
///
/// Floats and indices are queued separately, so the order of the two kinds in
/// the script does not matter. An exhausted queue answers `0.0` / `0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    floats: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRng {
    pub fn new(script: impl IntoIterator<Item = Draw>) -> Self {
        let mut rng = Self::default();
        for draw in script {
            match draw {
                Draw::Float(f) => rng.floats.push_back(f),
                Draw::Index(i) => rng.indices.push_back(i),
            }
        }
        rng
    }

    /// Number of draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.floats.len() + self.indices.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.indices.pop_front().unwrap_or(0) % len
    }
}
