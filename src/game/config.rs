//! Board Configuration
//!
//! Settings the surrounding system may change between ticks. The board
//! re-reads them every tick.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Tunable rules of a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Rounds before the match ends and players leave the board
    pub rounds_per_match: u32,
    /// Ticks of flight granted by a flying pill
    pub flying_count: u32,
    /// Ticks of fury granted by a fury pill
    pub fury_count: u32,
    /// Segments lost when eating a stone
    pub stone_reduced: u32,
    /// A round must last longer than this for anyone to win it
    pub min_ticks_for_win: u32,
    /// Pre-round countdown length (0 = no countdown, rounds never start)
    pub time_before_start: u32,
    /// Round length (0 = unlimited)
    pub time_per_round: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rounds_per_match: 1,
            flying_count: 10,
            fury_count: 10,
            stone_reduced: 3,
            min_ticks_for_win: 2,
            time_before_start: 5,
            time_per_round: 300,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types.
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that make no sense together.
    #[error("invalid config value: {0}")]
    Invalid(&'static str),
}

impl BoardConfig {
    /// Parse from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the board cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds_per_match == 0 {
            return Err(ConfigError::Invalid("rounds_per_match must be at least 1"));
        }
        Ok(())
    }
}
