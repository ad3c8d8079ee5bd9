//! Players
//!
//! A player is a seat on the board. It owns exactly one hero at a time and
//! keeps it across the player's whole stay, swapping in a fresh one for
//! every new round.

use serde::{Serialize, Deserialize};

use crate::core::point::Point;
use crate::game::hero::Hero;

/// Unique player identifier (UUID as bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// A random v4 identifier.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// A participant and its current hero.
///
/// A player given a new hero while rounds are running waits as a spectator
/// until the next round starts; a player that left the board stays out until
/// it is given a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    hero: Hero,
    /// Taking part in the current round
    active: bool,
    /// Left the board at the end of its match
    left: bool,
    /// The board has already counted this hero's death
    death_recorded: bool,
}

impl Player {
    /// A player with no hero on any board yet.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            hero: Hero::detached(id),
            active: false,
            left: false,
            death_recorded: true,
        }
    }

    /// Player id.
    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Current hero.
    #[inline]
    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    /// Current hero, mutably.
    #[inline]
    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    /// Taking part in the game?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Is the hero alive?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hero.is_alive()
    }

    /// Active and alive.
    #[inline]
    pub fn is_alive_active(&self) -> bool {
        self.active && self.hero.is_alive()
    }

    /// Left the board?
    #[inline]
    pub fn has_left(&self) -> bool {
        self.left
    }

    /// Replace the hero with a fresh one on `start`.
    ///
    /// With `active == false` the player spectates until the next round.
    pub fn new_hero(&mut self, start: Point, active: bool) {
        self.hero = Hero::new(self.id, start);
        self.active = active;
        self.left = false;
        self.death_recorded = false;
    }

    /// Join the round that just started.
    pub fn start(&mut self, round: u32) {
        if self.left {
            return;
        }
        self.hero.start(round);
        self.active = true;
    }

    /// Stop taking part. The hero stays where it is.
    pub fn leave_board(&mut self) {
        self.active = false;
        self.left = true;
    }

    /// The match is over for this player: its hero is retired without
    /// counting as a death and the player leaves the board.
    pub fn retire(&mut self) {
        self.hero.die();
        self.death_recorded = true;
        self.leave_board();
    }

    /// True exactly once after the hero died.
    pub(crate) fn take_death(&mut self) -> bool {
        if self.hero.is_alive() || self.death_recorded {
            return false;
        }
        self.death_recorded = true;
        true
    }
}
