//! # Snake Battle
//!
//! Deterministic, tick-driven simulation core for multiplayer snake battles.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SNAKE BATTLE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── point.rs    - Grid points and directions                │
//! │  ├── rng.rs      - Dice trait, Xorshift128+ PRNG             │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Board logic (deterministic)               │
//! │  ├── hero.rs     - Snake movement, eating, shrinking         │
//! │  ├── collision.rs- Hero-vs-hero fights                       │
//! │  ├── spawn.rs    - Resource spawning                         │
//! │  ├── board.rs    - Board state and scoring policies          │
//! │  ├── tick.rs     - Authoritative simulation loop             │
//! │  └── snapshot.rs - Read-only view for renderers              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No HashMap (BTreeMap / BTreeSet / Vec for iteration order)
//! - No system time dependencies
//! - All randomness from the board's injected [`Dice`]
//!
//! Given identical levels, seeds and inputs, two boards produce
//! **identical events and state hashes**.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::point::{pt, Direction, Point};
pub use core::rng::{Dice, DeterministicRng, ScriptedDice};
pub use game::board::{Board, BoardError};
pub use game::config::BoardConfig;
pub use game::level::Level;
pub use game::player::{Player, PlayerId};
pub use game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
