//! Game Events
//!
//! Everything the board tells players goes through these events: scoring
//! events and plain text messages.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::game::player::PlayerId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Won the round
    Win,

    /// Ate an apple
    Apple,

    /// Ate a stone
    Stone,

    /// Picked up gold
    Gold,

    /// Took segments from another hero
    Eat {
        /// Segments taken
        amount: u32,
    },

    /// Informational text (countdown, "Time is over")
    Message {
        /// Text shown to the player
        text: String,
    },
}

impl GameEventData {
    /// True for everything except text messages.
    pub fn is_scoring(&self) -> bool {
        !matches!(self, GameEventData::Message { .. })
    }
}

impl fmt::Display for GameEventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEventData::Win => f.write_str("WIN"),
            GameEventData::Apple => f.write_str("APPLE"),
            GameEventData::Stone => f.write_str("STONE"),
            GameEventData::Gold => f.write_str("GOLD"),
            GameEventData::Eat { amount } => write!(f, "EAT({amount})"),
            GameEventData::Message { text } => write!(f, "\"{text}\""),
        }
    }
}

/// An event addressed to one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Recipient
    pub player_id: PlayerId,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, player_id: PlayerId, data: GameEventData) -> Self {
        Self { tick, player_id, data }
    }

    /// Round won.
    pub fn win(tick: u32, player_id: PlayerId) -> Self {
        Self::new(tick, player_id, GameEventData::Win)
    }

    /// Apple eaten.
    pub fn apple(tick: u32, player_id: PlayerId) -> Self {
        Self::new(tick, player_id, GameEventData::Apple)
    }

    /// Stone eaten.
    pub fn stone(tick: u32, player_id: PlayerId) -> Self {
        Self::new(tick, player_id, GameEventData::Stone)
    }

    /// Gold picked up.
    pub fn gold(tick: u32, player_id: PlayerId) -> Self {
        Self::new(tick, player_id, GameEventData::Gold)
    }

    /// Segments taken from an enemy.
    pub fn eat(tick: u32, player_id: PlayerId, amount: usize) -> Self {
        Self::new(
            tick,
            player_id,
            GameEventData::Eat {
                amount: u32::try_from(amount).unwrap_or(u32::MAX),
            },
        )
    }

    /// Text message.
    pub fn message(tick: u32, player_id: PlayerId, text: impl Into<String>) -> Self {
        Self::new(tick, player_id, GameEventData::Message { text: text.into() })
    }
}

/// Countdown text: the number padded on both sides with one dot per
/// remaining tick, e.g. `...3...`.
pub fn countdown_message(countdown: u32) -> String {
    let pad = ".".repeat(countdown as usize);
    format!("{pad}{countdown}{pad}")
}

/// Sent to players who did not win when the round timer expires.
pub const TIME_IS_OVER: &str = "Time is over";
