//! Grid Coordinates
//!
//! Integer points and the four movement directions.
//! The grid origin is the bottom-left corner; `Up` increases `y`.

use serde::{Serialize, Deserialize};

/// Integer grid coordinate.
///
/// Ordered by `(x, y)` so point sets iterate deterministically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

/// Shorthand constructor.
#[inline]
pub const fn pt(x: i32, y: i32) -> Point {
    Point { x, y }
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if this point lies outside a `size` x `size` grid.
    #[inline]
    pub fn is_out_of(self, size: i32) -> bool {
        self.x < 0 || self.y < 0 || self.x >= size || self.y >= size
    }

    /// The neighbouring point one step in `direction`.
    #[inline]
    pub fn moved(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Facing of a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// +y
    Up,
    /// -y
    Down,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    /// All directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for this direction.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn inverted(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Index 0-3, used for hashing.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}
