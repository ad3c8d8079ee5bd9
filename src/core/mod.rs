//! Core deterministic primitives.
//!
//! Grid geometry, injected randomness and state hashing. Nothing in here
//! knows about snakes.

pub mod point;
pub mod rng;
pub mod hash;

// Re-export core types
pub use point::{pt, Direction, Point};
pub use rng::{Dice, DeterministicRng, ScriptedDice};
pub use hash::{compute_state_hash, StateHash, StateHasher};
