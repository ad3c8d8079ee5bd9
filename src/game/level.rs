//! Level Layout
//!
//! The static board a game starts from. Levels are plain data; loading them
//! from files is left to the driver.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::core::point::{pt, Point};
use crate::game::objects::{ObjectKind, Resources};

/// Immutable description of a board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Grid is `size` x `size`
    pub size: i32,
    /// Walls
    pub walls: Vec<Point>,
    /// Start floors, in the order heroes are offered them
    pub starts: Vec<Point>,
    /// Initial apples
    pub apples: Vec<Point>,
    /// Initial stones
    pub stones: Vec<Point>,
    /// Initial flying pills
    pub flying_pills: Vec<Point>,
    /// Initial fury pills
    pub fury_pills: Vec<Point>,
    /// Initial gold
    pub gold: Vec<Point>,
}

impl Level {
    /// An empty level of the given size.
    pub fn new(size: i32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// A level whose outer ring is wall.
    pub fn bordered(size: i32) -> Self {
        let mut walls = Vec::new();
        for i in 0..size {
            walls.push(pt(i, 0));
            walls.push(pt(i, size - 1));
        }
        for i in 1..size - 1 {
            walls.push(pt(0, i));
            walls.push(pt(size - 1, i));
        }
        Self {
            size,
            walls,
            ..Self::default()
        }
    }

    /// Add walls.
    pub fn with_walls(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.walls.extend(points);
        self
    }

    /// Add start floors.
    pub fn with_starts(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.starts.extend(points);
        self
    }

    /// Add initial resources of one kind. Static kinds go to walls/starts.
    pub fn with_objects(mut self, kind: ObjectKind, points: impl IntoIterator<Item = Point>) -> Self {
        let target = match kind {
            ObjectKind::Wall => &mut self.walls,
            ObjectKind::StartFloor => &mut self.starts,
            ObjectKind::Apple => &mut self.apples,
            ObjectKind::Stone => &mut self.stones,
            ObjectKind::FlyingPill => &mut self.flying_pills,
            ObjectKind::FuryPill => &mut self.fury_pills,
            ObjectKind::Gold => &mut self.gold,
        };
        target.extend(points);
        self
    }

    /// Initial resource sets.
    pub fn resources(&self) -> Resources {
        Resources {
            apples: self.apples.iter().copied().collect(),
            stones: self.stones.iter().copied().collect(),
            flying_pills: self.flying_pills.iter().copied().collect(),
            fury_pills: self.fury_pills.iter().copied().collect(),
            gold: self.gold.iter().copied().collect(),
        }
    }

    /// Static part of the board.
    pub fn terrain(&self) -> Terrain {
        let mut starts = Vec::with_capacity(self.starts.len());
        for start in &self.starts {
            if !starts.contains(start) {
                starts.push(*start);
            }
        }
        Terrain {
            size: self.size,
            walls: self.walls.iter().copied().collect(),
            starts,
        }
    }
}

/// Walls, start floors and the grid size. Never changes during a game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    /// Grid is `size` x `size`
    pub size: i32,
    /// Walls
    pub walls: BTreeSet<Point>,
    /// Start floors in level order, without duplicates
    pub starts: Vec<Point>,
}

impl Terrain {
    /// Out of the grid, a wall or a start floor.
    #[inline]
    pub fn is_barrier(&self, point: Point) -> bool {
        point.is_out_of(self.size) || self.is_wall(point) || self.is_start(point)
    }

    /// True for walls.
    #[inline]
    pub fn is_wall(&self, point: Point) -> bool {
        self.walls.contains(&point)
    }

    /// True for start floors.
    #[inline]
    pub fn is_start(&self, point: Point) -> bool {
        self.starts.contains(&point)
    }
}
