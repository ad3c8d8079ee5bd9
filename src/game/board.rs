//! Board State
//!
//! The board owns the terrain, the resources on it, every player and the two
//! timers. `tick` drives it; everything here is what the tick and the
//! surrounding system call between ticks.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::point::{pt, Direction, Point};
use crate::core::rng::Dice;
use crate::game::config::BoardConfig;
use crate::game::events::{GameEvent, TIME_IS_OVER};
use crate::game::hero::Hero;
use crate::game::level::{Level, Terrain};
use crate::game::objects::{BoardObject, ObjectKind, Resources};
use crate::game::player::{Player, PlayerId};
use crate::game::snapshot::ElementKind;
use crate::game::timer::Timer;

/// Random start picks tried before falling back to a scan.
const FREE_START_ATTEMPTS: usize = 10;

/// Board mutation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Walls and start floors are part of the level, not runtime objects.
    #[error("objects of kind {0} cannot be placed on a running board")]
    InvalidObjectKind(ObjectKind),
}

/// A running board.
pub struct Board {
    pub(crate) terrain: Terrain,
    pub(crate) resources: Resources,
    /// Roster, in join order
    pub(crate) players: Vec<Player>,
    /// Deaths not yet considered for a win
    pub(crate) recently_died: Vec<PlayerId>,
    pub(crate) start_timer: Timer,
    pub(crate) round_timer: Timer,
    pub(crate) round: u32,
    /// Ticks run so far
    pub(crate) tick: u32,
    pub(crate) config: BoardConfig,
    pub(crate) dice: Box<dyn Dice + Send>,
    pub(crate) pending_events: Vec<GameEvent>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.terrain.size)
            .field("round", &self.round)
            .field("tick", &self.tick)
            .field("players", &self.players.len())
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Build a board from a level. The pre-round countdown starts at once.
    pub fn new(level: &Level, dice: impl Dice + Send + 'static, config: BoardConfig) -> Self {
        let mut start_timer = Timer::new(config.time_before_start);
        start_timer.start();
        let mut round_timer = Timer::new(config.time_per_round);
        round_timer.stop();

        Self {
            terrain: level.terrain(),
            resources: level.resources(),
            players: Vec::new(),
            recently_died: Vec::new(),
            start_timer,
            round_timer,
            round: 0,
            tick: 0,
            config,
            dice: Box::new(dice),
            pending_events: Vec::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Side length of the square grid.
    #[inline]
    pub fn size(&self) -> i32 {
        self.terrain.size
    }

    /// Rounds started since the last `clear_score`.
    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Ticks run so far.
    #[inline]
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Current rules.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Rules, mutably. Changes take effect from the next tick.
    pub fn config_mut(&mut self) -> &mut BoardConfig {
        &mut self.config
    }

    /// Replace the rules.
    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
    }

    /// Walls and start floors.
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Resources currently on the board.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Pre-round countdown.
    pub fn start_timer(&self) -> &Timer {
        &self.start_timer
    }

    /// Round length timer.
    pub fn round_timer(&self) -> &Timer {
        &self.round_timer
    }

    /// Every player, in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Look up a player, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    /// Every player's hero, in join order.
    pub fn heroes(&self) -> impl Iterator<Item = &Hero> + '_ {
        self.players.iter().map(Player::hero)
    }

    /// Players still in the round.
    pub fn alive_active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive_active()).count()
    }

    /// Wall or start floor.
    pub fn is_barrier(&self, point: Point) -> bool {
        self.terrain.is_barrier(point)
    }

    /// No wall, start floor or resource on the cell.
    pub fn is_free_of_objects(&self, point: Point) -> bool {
        !self.terrain.is_barrier(point) && self.resources.is_empty_at(point)
    }

    /// No hero segment on the cell. A tail counts as free since it moves
    /// away on the next step.
    pub fn free_of_hero(&self, point: Point) -> bool {
        !self.heroes().any(|hero| hero.occupies(point))
    }

    /// Inside the grid and free of objects and heroes.
    pub fn is_free(&self, point: Point) -> bool {
        !point.is_out_of(self.size()) && self.is_free_of_objects(point) && self.free_of_hero(point)
    }

    /// Free, and the cell to the left is not a start floor.
    pub fn is_free_for_stone(&self, point: Point) -> bool {
        self.is_free(point) && !self.terrain.is_start(point.moved(Direction::Left))
    }

    /// What occupies a cell: resources first, then terrain, then heroes.
    pub fn object_at(&self, point: Point) -> Option<ElementKind> {
        if let Some(kind) = self.resources.kind_at(point) {
            return Some(ElementKind::Object(kind));
        }
        if self.terrain.is_start(point) {
            return Some(ElementKind::Object(ObjectKind::StartFloor));
        }
        if self.terrain.is_wall(point) {
            return Some(ElementKind::Object(ObjectKind::Wall));
        }
        self.heroes().find_map(|hero| {
            if hero.head() == Some(point) {
                Some(ElementKind::HeroHead { owner: hero.owner() })
            } else if hero.contains(point) {
                Some(ElementKind::HeroBody { owner: hero.owner() })
            } else {
                None
            }
        })
    }

    /// A random free cell for a new object of `kind`.
    ///
    /// Free cells are enumerated row by row and one is picked with the dice.
    pub fn free_random(&mut self, kind: ObjectKind) -> Option<Point> {
        let size = self.size();
        let candidates: Vec<Point> = (0..size)
            .flat_map(|y| (0..size).map(move |x| pt(x, y)))
            .filter(|&p| {
                if kind == ObjectKind::Stone {
                    self.is_free_for_stone(p)
                } else {
                    self.is_free(p)
                }
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }
        let count = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        let idx = self.dice.next(count) as usize;
        candidates.get(idx).copied()
    }

    /// A start floor no hero stands on.
    ///
    /// Tries a few random picks, then scans in level order; `(0, 0)` when
    /// every start is taken.
    pub fn free_start(&mut self) -> Point {
        let starts = &self.terrain.starts;
        if starts.is_empty() {
            return pt(0, 0);
        }
        let count = u32::try_from(starts.len()).unwrap_or(u32::MAX);

        for _ in 0..FREE_START_ATTEMPTS {
            let idx = self.dice.next(count) as usize;
            if let Some(&start) = self.terrain.starts.get(idx) {
                if self.free_of_hero(start) {
                    return start;
                }
            }
        }

        self.terrain
            .starts
            .iter()
            .copied()
            .find(|&start| self.free_of_hero(start))
            .unwrap_or(pt(0, 0))
    }

    // =========================================================================
    // Roster
    // =========================================================================

    /// Seat a player (if new) and give it a fresh hero on a free start.
    ///
    /// Between rounds the player waits for the next round start; with an
    /// unlimited countdown it plays at once.
    pub fn new_game(&mut self, id: PlayerId) {
        let idx = match self.players.iter().position(|p| p.id() == id) {
            Some(idx) => idx,
            None => {
                self.players.push(Player::new(id));
                self.players.len() - 1
            }
        };

        let start = self.free_start();
        let active = self.start_timer.unlimited();
        self.players[idx].new_hero(start, active);

        debug!(
            "Player {} joined at ({}, {}), round {}",
            hex::encode(&id.as_bytes()[..4]),
            start.x,
            start.y,
            self.round
        );
    }

    /// Take a player off the board. Its death counts towards a win for
    /// whoever is left.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        let Some(idx) = self.players.iter().position(|p| p.id() == id) else {
            return false;
        };

        let mut player = self.players.remove(idx);
        player.hero_mut().die();
        self.recently_died.push(id);
        debug!("Player {} removed", hex::encode(&id.as_bytes()[..4]));

        self.reward_the_winner();
        true
    }

    /// Start the match over: round counter back to zero, fresh heroes for all.
    pub fn clear_score(&mut self) {
        self.round = 0;
        let ids: Vec<PlayerId> = self.players.iter().map(Player::id).collect();
        for id in ids {
            self.new_game(id);
        }
    }

    /// End the round for a player: a new hero, or off the board once the
    /// match is over.
    pub(crate) fn reset(&mut self, idx: usize) {
        let Some(player) = self.players.get_mut(idx) else {
            return;
        };

        if self.round >= self.config.rounds_per_match {
            player.retire();
            debug!(
                "Player {} finished the match after round {}",
                hex::encode(&player.id().as_bytes()[..4]),
                self.round
            );
        } else {
            let id = player.id();
            self.new_game(id);
        }
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Place a resource object.
    ///
    /// `Ok(false)` when the cell is taken; walls and start floors are an
    /// error.
    pub fn add_object(&mut self, object: BoardObject) -> Result<bool, BoardError> {
        if !object.kind.is_resource() {
            return Err(BoardError::InvalidObjectKind(object.kind));
        }
        Ok(self.place(object.kind, object.point))
    }

    /// Place an apple.
    pub fn set_apple(&mut self, point: Point) -> bool {
        self.place(ObjectKind::Apple, point)
    }

    /// Place a stone.
    pub fn set_stone(&mut self, point: Point) -> bool {
        self.place(ObjectKind::Stone, point)
    }

    /// Place a flying pill.
    pub fn set_flying_pill(&mut self, point: Point) -> bool {
        self.place(ObjectKind::FlyingPill, point)
    }

    /// Place a fury pill.
    pub fn set_fury_pill(&mut self, point: Point) -> bool {
        self.place(ObjectKind::FuryPill, point)
    }

    /// Place gold.
    pub fn set_gold(&mut self, point: Point) -> bool {
        self.place(ObjectKind::Gold, point)
    }

    fn place(&mut self, kind: ObjectKind, point: Point) -> bool {
        let free = if kind == ObjectKind::Stone {
            self.is_free_for_stone(point)
        } else {
            self.is_free(point)
        };
        free && self.resources.insert(kind, point)
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// Collect heroes that died since the last call.
    pub(crate) fn record_deaths(&mut self) {
        for player in &mut self.players {
            if player.take_death() {
                self.recently_died.push(player.id());
            }
        }
    }

    /// After deaths: the last one standing wins, if the round ran long enough.
    pub(crate) fn reward_the_winner(&mut self) {
        if self.recently_died.is_empty() {
            return;
        }
        self.recently_died.clear();

        let alive: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.is_alive_active())
            .map(Player::id)
            .collect();

        if let [winner] = alive.as_slice() {
            if self.round_timer.time() > self.config.min_ticks_for_win {
                debug!("Player {} won round {}", hex::encode(&winner.as_bytes()[..4]), self.round);
                self.push_event(GameEvent::win(self.tick, *winner));
            }
        }
    }

    /// Round time is up: the longest heroes win, everyone is reset.
    pub(crate) fn reward_winners_by_timeout(&mut self) {
        let alive: Vec<usize> = (0..self.players.len())
            .filter(|&i| self.players[i].is_alive_active())
            .collect();

        let longest = alive
            .iter()
            .map(|&i| self.players[i].hero().size())
            .max()
            .unwrap_or(0);
        let long_enough = self.round_timer.time() > self.config.min_ticks_for_win;

        for &i in &alive {
            let id = self.players[i].id();
            if long_enough && self.players[i].hero().size() == longest {
                debug!("Player {} won round {} on time", hex::encode(&id.as_bytes()[..4]), self.round);
                self.push_event(GameEvent::win(self.tick, id));
            } else {
                self.push_event(GameEvent::message(self.tick, id, TIME_IS_OVER));
            }
        }

        for i in alive {
            self.reset(i);
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Queue an event for the current tick's result.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Send a text message to every player.
    pub(crate) fn broadcast(&mut self, text: &str) {
        let tick = self.tick;
        let events: Vec<GameEvent> = self
            .players
            .iter()
            .map(|p| GameEvent::message(tick, p.id(), text))
            .collect();
        self.pending_events.extend(events);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Digest of the whole board state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.round, |hasher| {
            hasher.update_u32(self.tick);
            hasher.update_u32(self.start_timer.time());
            hasher.update_u32(self.start_timer.countdown());
            hasher.update_u32(self.round_timer.time());
            hasher.update_u32(self.round_timer.countdown());

            for player in &self.players {
                hasher.update_bool(player.is_active());
                player.hero().hash_into(hasher);
            }

            for object in self.resources.objects() {
                hasher.update_u8(object.kind as u8);
                hasher.update_point(object.point);
            }
        })
    }
}
