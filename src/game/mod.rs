//! Game Logic Module
//!
//! All board simulation code. 100% deterministic given the dice.
//!
//! ## Module Structure
//!
//! - `timer`: Pre-round countdown and round length
//! - `objects`: Object kinds and the resources on a board
//! - `level`: Initial layout and static terrain
//! - `config`: Tunable board rules
//! - `hero`: One snake: movement, eating, shrinking
//! - `player`: A seat on the board and its hero
//! - `events`: Scoring events and messages
//! - `collision`: Hero-vs-hero fights
//! - `spawn`: Per-tick resource spawning
//! - `board`: Board state, roster and scoring policies
//! - `tick`: Authoritative simulation loop
//! - `snapshot`: Read-only view for renderers

pub mod timer;
pub mod objects;
pub mod level;
pub mod config;
pub mod hero;
pub mod player;
pub mod events;
pub mod collision;
pub mod spawn;
pub mod board;
pub mod tick;
pub mod snapshot;

// Re-export key types
pub use board::{Board, BoardError};
pub use config::{BoardConfig, ConfigError};
pub use events::{GameEvent, GameEventData};
pub use hero::Hero;
pub use level::{Level, Terrain};
pub use objects::{BoardObject, ObjectKind};
pub use player::{Player, PlayerId};
pub use snapshot::{BoardSnapshot, Element, ElementKind};
pub use tick::{tick, TickResult};
pub use timer::Timer;
