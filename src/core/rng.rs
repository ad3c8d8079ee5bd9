//! Randomness
//!
//! The board never draws randomness directly; it asks a [`Dice`] for a
//! bounded integer. [`DeterministicRng`] is the production dice (Xorshift128+),
//! [`ScriptedDice`] replays a fixed list of draws.

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

/// Source of bounded random integers.
pub trait Dice {
    /// Return a value in `[0, n)`. Returns 0 when `n == 0`.
    fn next(&mut self, n: u32) -> u32;
}

/// Seeded Xorshift128+ dice.
///
/// The same seed yields the same draws on every platform, so two boards
/// seeded alike stay in lockstep.
///
/// # Example
///
/// ```
/// use snake_battle::core::rng::{Dice, DeterministicRng};
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next(50), b.next(50));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Seed the generator. The seed is spread over both state words with
    /// SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // all-zero state is a fixed point
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Raw 64-bit draw.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Draw in `[0, max)` by multiply-shift on the high 32 bits.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        let high = self.next_u64() >> 32;
        ((high * u64::from(max)) >> 32) as u32
    }

    /// Internal state, for checkpoints.
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Rewind to a checkpoint taken with [`state`](Self::state).
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

impl Dice for DeterministicRng {
    #[inline]
    fn next(&mut self, n: u32) -> u32 {
        self.next_int(n)
    }
}

/// SplitMix64 step.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Dice that replays a fixed sequence of draws.
///
/// Each draw is clamped into `[0, n)`. Once the script runs out every draw
/// returns `fallback` (clamped the same way).
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    draws: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedDice {
    /// Replay `draws`, then return 0 forever.
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Value returned once the script is exhausted.
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Queue more draws at the end of the script.
    pub fn push(&mut self, draws: impl IntoIterator<Item = u32>) {
        self.draws.extend(draws);
    }

    /// Number of scripted draws not consumed yet.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl Dice for ScriptedDice {
    fn next(&mut self, n: u32) -> u32 {
        let value = self.draws.pop_front().unwrap_or(self.fallback);
        value.min(n.saturating_sub(1))
    }
}

/// Derive a board seed from verifiable parameters.
///
/// `player_ids` MUST be sorted by the caller.
pub fn derive_board_seed(board_id: &[u8; 16], player_ids: &[[u8; 16]]) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"SNAKE_BATTLE_SEED_V1");
    hasher.update(board_id);
    for pid in player_ids {
        hasher.update(pid);
    }

    let hash = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(seed)
}
