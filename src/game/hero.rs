//! Hero
//!
//! One snake: its body, facing and temporary statuses. The hero moves and
//! eats on its own; collisions with other heroes are decided by
//! `collision`, which calls back into `reduce`, `reduce_from` and `die`.

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::point::{Direction, Point};
use crate::game::config::BoardConfig;
use crate::game::level::Terrain;
use crate::game::objects::ObjectKind;
use crate::game::player::PlayerId;

/// A hero shorter than this dies.
pub const MIN_HERO_LENGTH: usize = 2;

/// When a size reduction is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimTime {
    /// Remove the segments immediately.
    Now,
    /// Remove them at the start of the hero's next move.
    NextTick,
}

/// State of a single snake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Owning player (lookup only)
    owner: PlayerId,

    /// Segments, head first
    body: VecDeque<Point>,

    /// Current facing
    direction: Direction,

    /// Is the hero still in play?
    alive: bool,

    /// Remaining ticks of flight
    flying_ticks: u32,

    /// Remaining ticks of fury
    fury_ticks: u32,

    /// Segments to drop at the next move
    pending_reduction: usize,

    /// Already reduced by a fight this tick
    reduced: bool,

    /// Segments still to grow
    growth: usize,

    /// Cell the tail left on the last move
    vacated_tail: Option<Point>,

    /// Stones eaten this round
    stones: u32,

    /// Round this hero was started in
    round: Option<u32>,
}

impl Hero {
    /// A fresh two-segment hero with its head on `start`, facing right.
    pub fn new(owner: PlayerId, start: Point) -> Self {
        let mut body = VecDeque::with_capacity(8);
        body.push_back(start);
        body.push_back(start.moved(Direction::Left));
        Self {
            alive: true,
            body,
            ..Self::detached(owner)
        }
    }

    /// A dead hero with no body, held by players not on a board.
    pub fn detached(owner: PlayerId) -> Self {
        Self {
            owner,
            body: VecDeque::new(),
            direction: Direction::Right,
            alive: false,
            flying_ticks: 0,
            fury_ticks: 0,
            pending_reduction: 0,
            reduced: false,
            growth: 0,
            vacated_tail: None,
            stones: 0,
            round: None,
        }
    }

    /// Build a hero from explicit segments (head first).
    pub fn from_body(owner: PlayerId, body: impl IntoIterator<Item = Point>, direction: Direction) -> Self {
        let body: VecDeque<Point> = body.into_iter().collect();
        Self {
            alive: !body.is_empty(),
            body,
            direction,
            ..Self::detached(owner)
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Owning player.
    #[inline]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Head cell.
    #[inline]
    pub fn head(&self) -> Option<Point> {
        self.body.front().copied()
    }

    /// Segment right behind the head.
    #[inline]
    pub fn neck(&self) -> Option<Point> {
        self.body.get(1).copied()
    }

    /// Last segment.
    #[inline]
    pub fn tail(&self) -> Option<Point> {
        self.body.back().copied()
    }

    /// Segments, head first.
    pub fn body(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    /// Number of segments.
    #[inline]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// True if any segment sits on `point`.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.body.contains(&point)
    }

    /// True if a segment other than the tail sits on `point`.
    pub fn occupies(&self, point: Point) -> bool {
        self.contains(point) && self.tail() != Some(point)
    }

    /// Current facing.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Is the hero alive?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Flying heroes pass over walls, stones and other heroes.
    #[inline]
    pub fn is_flying(&self) -> bool {
        self.flying_ticks > 0
    }

    /// Furious heroes win head-on fights and bite through bodies.
    #[inline]
    pub fn is_fury(&self) -> bool {
        self.fury_ticks > 0
    }

    /// Remaining flight ticks.
    #[inline]
    pub fn flying_ticks(&self) -> u32 {
        self.flying_ticks
    }

    /// Remaining fury ticks.
    #[inline]
    pub fn fury_ticks(&self) -> u32 {
        self.fury_ticks
    }

    /// Was the hero already reduced by a fight this tick?
    #[inline]
    pub fn reduced(&self) -> bool {
        self.reduced
    }

    /// Segments that will be dropped at the next move.
    #[inline]
    pub fn pending_reduction(&self) -> usize {
        self.pending_reduction
    }

    /// Stones eaten.
    #[inline]
    pub fn stones(&self) -> u32 {
        self.stones
    }

    /// Round the hero was started in.
    #[inline]
    pub fn round(&self) -> Option<u32> {
        self.round
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Change facing. Turning back into the neck is ignored.
    pub fn turn(&mut self, direction: Direction) {
        if !self.alive {
            return;
        }
        if let (Some(head), Some(neck)) = (self.head(), self.neck()) {
            if head.moved(direction) == neck {
                return;
            }
        }
        self.direction = direction;
    }

    /// Mark the start of a round.
    pub fn start(&mut self, round: u32) {
        self.round = Some(round);
    }

    /// Give the hero flight for `ticks` more ticks.
    pub fn add_flying(&mut self, ticks: u32) {
        self.flying_ticks = self.flying_ticks.saturating_add(ticks);
    }

    /// Give the hero fury for `ticks` more ticks.
    pub fn add_fury(&mut self, ticks: u32) {
        self.fury_ticks = self.fury_ticks.saturating_add(ticks);
    }

    /// Kill the hero. The body stays until `clear`.
    pub fn die(&mut self) {
        self.alive = false;
    }

    /// Drop the body of a dead hero.
    pub fn clear(&mut self) {
        self.body.clear();
        self.vacated_tail = None;
        self.growth = 0;
        self.pending_reduction = 0;
    }

    /// Advance one cell.
    ///
    /// Applies the pending reduction and counts statuses down first. Leaving
    /// the grid is fatal; walls and start floors are fatal unless flying.
    /// Running into its own body cuts the hero at that segment.
    pub fn step(&mut self, terrain: &Terrain) {
        if !self.alive {
            return;
        }

        self.reduced = false;
        if self.pending_reduction > 0 {
            let len = std::mem::take(&mut self.pending_reduction);
            self.trim_tail(len);
            if !self.alive {
                return;
            }
        }
        self.flying_ticks = self.flying_ticks.saturating_sub(1);
        self.fury_ticks = self.fury_ticks.saturating_sub(1);

        let Some(head) = self.head() else {
            self.die();
            return;
        };
        let next = head.moved(self.direction);

        if next.is_out_of(terrain.size) {
            self.die();
            return;
        }
        if !self.is_flying() && (terrain.is_wall(next) || terrain.is_start(next)) {
            self.die();
            return;
        }

        self.body.push_front(next);
        if self.growth > 0 {
            self.growth -= 1;
            self.vacated_tail = None;
        } else {
            self.vacated_tail = self.body.pop_back();
        }

        if !self.is_flying() {
            if let Some(idx) = self.body.iter().skip(1).position(|p| *p == next) {
                self.cut_at(idx + 1);
            }
        }
    }

    /// Consume whatever lies under the head.
    ///
    /// Runs once per tick whether or not anything is there; growth from an
    /// apple is realised at once by re-attaching the cell the tail just left.
    pub fn eat(&mut self, here: &[ObjectKind], config: &BoardConfig) {
        if !self.alive {
            return;
        }

        for kind in here {
            match kind {
                ObjectKind::Apple => self.growth += 1,
                ObjectKind::Stone => {
                    if !self.is_flying() {
                        self.stones += 1;
                        if !self.is_fury() {
                            self.reduce(config.stone_reduced as usize, TrimTime::Now);
                        }
                    }
                }
                ObjectKind::FlyingPill => self.add_flying(config.flying_count),
                ObjectKind::FuryPill => self.add_fury(config.fury_count),
                ObjectKind::Gold | ObjectKind::Wall | ObjectKind::StartFloor => {}
            }
        }

        self.grow();
    }

    fn grow(&mut self) {
        while self.growth > 0 && self.alive {
            match self.vacated_tail.take() {
                Some(cell) => {
                    self.body.push_back(cell);
                    self.growth -= 1;
                }
                None => break,
            }
        }
    }

    /// Shrink by `len` segments from the tail.
    ///
    /// A hero left shorter than [`MIN_HERO_LENGTH`] dies instead. Returns the
    /// number of segments taken: `len`, or the whole size on death.
    /// Fight reductions (`NextTick`) set the `reduced` guard.
    pub fn reduce(&mut self, len: usize, when: TrimTime) -> usize {
        let was = self.size();
        if was.saturating_sub(len) < MIN_HERO_LENGTH {
            self.die();
            return was;
        }

        match when {
            TrimTime::Now => self.trim_tail(len),
            TrimTime::NextTick => {
                self.pending_reduction += len;
                self.reduced = true;
            }
        }
        len
    }

    /// Cut the body at `point`, dropping it and every segment behind it.
    ///
    /// Returns the number of segments taken (the whole size if the rest is
    /// too short to live). Returns 0 if `point` is not part of the body.
    pub fn reduce_from(&mut self, point: Point) -> usize {
        let Some(idx) = self.body.iter().position(|p| *p == point) else {
            return 0;
        };
        self.reduced = true;
        self.cut_at(idx)
    }

    fn cut_at(&mut self, idx: usize) -> usize {
        let was = self.size();
        self.body.truncate(idx);
        if self.size() < MIN_HERO_LENGTH {
            self.die();
            return was;
        }
        was - idx
    }

    fn trim_tail(&mut self, len: usize) {
        let keep = self.size().saturating_sub(len);
        self.body.truncate(keep);
        if self.size() < MIN_HERO_LENGTH {
            self.die();
        }
    }

    /// Hash this hero's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_uuid(self.owner.as_bytes());
        hasher.update_bool(self.alive);
        hasher.update_u8(self.direction.index());
        hasher.update_u32(self.flying_ticks);
        hasher.update_u32(self.fury_ticks);
        hasher.update_u32(self.pending_reduction as u32);
        hasher.update_u32(self.body.len() as u32);
        for segment in &self.body {
            hasher.update_point(*segment);
        }
    }
}
