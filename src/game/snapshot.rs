//! Board Snapshot
//!
//! Read-only view of a board between ticks, for renderers and clients.

use serde::{Serialize, Deserialize};

use crate::core::point::Point;
use crate::game::board::Board;
use crate::game::objects::ObjectKind;
use crate::game::player::PlayerId;

/// What a snapshot element is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Head of a hero
    HeroHead {
        /// Owning player
        owner: PlayerId,
    },
    /// Any other segment of a hero
    HeroBody {
        /// Owning player
        owner: PlayerId,
    },
    /// Terrain or a resource
    Object(ObjectKind),
}

/// One thing at one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Cell
    pub point: Point,
    /// What is there
    pub kind: ElementKind,
}

/// Everything on a board, in drawing order: heroes, walls, apples, stones,
/// flying pills, fury pills, gold, start floors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    size: i32,
    elements: Vec<Element>,
}

impl BoardSnapshot {
    /// Capture the current state. Points outside the grid are left out.
    pub fn capture(board: &Board) -> Self {
        let size = board.size();
        let mut elements = Vec::new();

        for hero in board.heroes() {
            let owner = hero.owner();
            for (i, point) in hero.body().enumerate() {
                let kind = if i == 0 {
                    ElementKind::HeroHead { owner }
                } else {
                    ElementKind::HeroBody { owner }
                };
                elements.push(Element { point, kind });
            }
        }

        let terrain = board.terrain();
        elements.extend(terrain.walls.iter().map(|&point| Element {
            point,
            kind: ElementKind::Object(ObjectKind::Wall),
        }));

        for kind in ObjectKind::RESOURCES {
            if let Some(points) = board.resources().set(kind) {
                elements.extend(points.iter().map(|&point| Element {
                    point,
                    kind: ElementKind::Object(kind),
                }));
            }
        }

        elements.extend(terrain.starts.iter().map(|&point| Element {
            point,
            kind: ElementKind::Object(ObjectKind::StartFloor),
        }));

        elements.retain(|e| !e.point.is_out_of(size));
        Self { size, elements }
    }

    /// Side length of the grid.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// All elements in drawing order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements on one cell.
    pub fn at(&self, point: Point) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter().filter(move |e| e.point == point)
    }
}
