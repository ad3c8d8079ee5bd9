//! Board Objects
//!
//! Static obstacles and spawnable resources. Every object is a point tagged
//! with its kind.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::point::Point;

/// Kind of a board object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObjectKind {
    /// Impassable wall
    Wall = 0,
    /// Hero spawn cell, also a barrier
    StartFloor = 1,
    /// Grows the hero by one
    Apple = 2,
    /// Damages the hero
    Stone = 3,
    /// Grants flying ticks
    FlyingPill = 4,
    /// Grants fury ticks
    FuryPill = 5,
    /// Scoring pickup
    Gold = 6,
}

impl ObjectKind {
    /// Kinds that live in [`Resources`] and can be placed at run time.
    pub const RESOURCES: [ObjectKind; 5] = [
        ObjectKind::Apple,
        ObjectKind::Stone,
        ObjectKind::FlyingPill,
        ObjectKind::FuryPill,
        ObjectKind::Gold,
    ];

    /// True for the spawnable kinds.
    #[inline]
    pub fn is_resource(self) -> bool {
        !matches!(self, ObjectKind::Wall | ObjectKind::StartFloor)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Wall => "wall",
            ObjectKind::StartFloor => "start floor",
            ObjectKind::Apple => "apple",
            ObjectKind::Stone => "stone",
            ObjectKind::FlyingPill => "flying pill",
            ObjectKind::FuryPill => "fury pill",
            ObjectKind::Gold => "gold",
        };
        f.write_str(name)
    }
}

/// A point tagged with an object kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardObject {
    /// What the object is
    pub kind: ObjectKind,
    /// Where it is
    pub point: Point,
}

impl BoardObject {
    /// Create a new object.
    pub const fn new(kind: ObjectKind, point: Point) -> Self {
        Self { kind, point }
    }

    /// Shorthand for an apple.
    pub const fn apple(point: Point) -> Self {
        Self::new(ObjectKind::Apple, point)
    }

    /// Shorthand for a stone.
    pub const fn stone(point: Point) -> Self {
        Self::new(ObjectKind::Stone, point)
    }

    /// Shorthand for a flying pill.
    pub const fn flying_pill(point: Point) -> Self {
        Self::new(ObjectKind::FlyingPill, point)
    }

    /// Shorthand for a fury pill.
    pub const fn fury_pill(point: Point) -> Self {
        Self::new(ObjectKind::FuryPill, point)
    }

    /// Shorthand for gold.
    pub const fn gold(point: Point) -> Self {
        Self::new(ObjectKind::Gold, point)
    }
}

/// Spawnable resources on the board, one point set per kind.
///
/// BTreeSet keeps iteration (and therefore hashing and snapshots) ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Apples
    pub apples: BTreeSet<Point>,
    /// Stones
    pub stones: BTreeSet<Point>,
    /// Flying pills
    pub flying_pills: BTreeSet<Point>,
    /// Fury pills
    pub fury_pills: BTreeSet<Point>,
    /// Gold
    pub gold: BTreeSet<Point>,
}

impl Resources {
    /// Set holding `kind`, or `None` for static kinds.
    pub fn set(&self, kind: ObjectKind) -> Option<&BTreeSet<Point>> {
        match kind {
            ObjectKind::Apple => Some(&self.apples),
            ObjectKind::Stone => Some(&self.stones),
            ObjectKind::FlyingPill => Some(&self.flying_pills),
            ObjectKind::FuryPill => Some(&self.fury_pills),
            ObjectKind::Gold => Some(&self.gold),
            ObjectKind::Wall | ObjectKind::StartFloor => None,
        }
    }

    fn set_mut(&mut self, kind: ObjectKind) -> Option<&mut BTreeSet<Point>> {
        match kind {
            ObjectKind::Apple => Some(&mut self.apples),
            ObjectKind::Stone => Some(&mut self.stones),
            ObjectKind::FlyingPill => Some(&mut self.flying_pills),
            ObjectKind::FuryPill => Some(&mut self.fury_pills),
            ObjectKind::Gold => Some(&mut self.gold),
            ObjectKind::Wall | ObjectKind::StartFloor => None,
        }
    }

    /// Number of resources of `kind`.
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.set(kind).map_or(0, BTreeSet::len)
    }

    /// True if a resource of `kind` sits on `point`.
    pub fn contains(&self, kind: ObjectKind, point: Point) -> bool {
        self.set(kind).is_some_and(|set| set.contains(&point))
    }

    /// Insert without any free-cell check. Returns false for static kinds.
    pub fn insert(&mut self, kind: ObjectKind, point: Point) -> bool {
        match self.set_mut(kind) {
            Some(set) => set.insert(point),
            None => false,
        }
    }

    /// Remove the resource of `kind` at `point`. Returns true if it was there.
    pub fn remove(&mut self, kind: ObjectKind, point: Point) -> bool {
        self.set_mut(kind).is_some_and(|set| set.remove(&point))
    }

    /// First resource kind occupying `point`, in apple, stone, flying pill,
    /// fury pill, gold order.
    pub fn kind_at(&self, point: Point) -> Option<ObjectKind> {
        ObjectKind::RESOURCES
            .into_iter()
            .find(|kind| self.contains(*kind, point))
    }

    /// Every resource kind occupying `point`.
    pub fn kinds_at(&self, point: Point) -> Vec<ObjectKind> {
        ObjectKind::RESOURCES
            .into_iter()
            .filter(|kind| self.contains(*kind, point))
            .collect()
    }

    /// True if no resource occupies `point`.
    pub fn is_empty_at(&self, point: Point) -> bool {
        self.kind_at(point).is_none()
    }

    /// All resources as tagged objects.
    pub fn objects(&self) -> impl Iterator<Item = BoardObject> + '_ {
        ObjectKind::RESOURCES.into_iter().flat_map(move |kind| {
            self.set(kind)
                .into_iter()
                .flatten()
                .map(move |point| BoardObject::new(kind, *point))
        })
    }
}
