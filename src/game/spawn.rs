//! Resource Spawning
//!
//! One draw per tick decides what appears. Rules are independent: a single
//! draw can place several objects. Caps scale with the number of players.

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::game::board::Board;
use crate::game::objects::ObjectKind;

/// Range of the per-tick draw.
pub const SPAWN_DRAW_RANGE: u32 = 50;

/// Draw that offers a fury pill.
pub const FURY_PILL_DRAW: u32 = 42;

/// Draw that offers a flying pill.
pub const FLYING_PILL_DRAW: u32 = 32;

/// Draw that offers gold.
pub const GOLD_DRAW: u32 = 21;

/// Draw that offers a stone.
pub const STONE_DRAW: u32 = 11;

/// Draws below this offer an apple.
pub const APPLE_DRAW_LIMIT: u32 = 10;

/// Per-kind cap base: half the roster plus one.
pub fn spawn_cap(players: usize) -> usize {
    players / 2 + 1
}

/// Spawn this tick's objects.
pub fn spawn_objects(board: &mut Board) {
    let cap = spawn_cap(board.players.len());
    let draw = board.dice.next(SPAWN_DRAW_RANGE);

    #[cfg(feature = "debug-tracing")]
    trace!("Spawn draw {} (cap {})", draw, cap);

    if draw == FURY_PILL_DRAW && board.resources.count(ObjectKind::FuryPill) < cap {
        spawn(board, ObjectKind::FuryPill);
    }
    if draw == FLYING_PILL_DRAW && board.resources.count(ObjectKind::FlyingPill) < cap {
        spawn(board, ObjectKind::FlyingPill);
    }
    if draw == GOLD_DRAW && board.resources.count(ObjectKind::Gold) < 2 * cap {
        spawn(board, ObjectKind::Gold);
    }

    let stones = board.resources.count(ObjectKind::Stone);
    let stone_cap = usize::try_from(board.size() / 2).unwrap_or(0);
    if (draw == STONE_DRAW && stones < stone_cap) || stones == 0 {
        spawn(board, ObjectKind::Stone);
    }

    let apples = board.resources.count(ObjectKind::Apple);
    if (draw < APPLE_DRAW_LIMIT && apples < 10 * cap) || apples < 2 * cap {
        spawn(board, ObjectKind::Apple);
    }
}

/// Place one object of `kind` on a random free cell. Dropped silently when
/// the board is full.
fn spawn(board: &mut Board, kind: ObjectKind) {
    let Some(point) = board.free_random(kind) else {
        return;
    };
    board.resources.insert(kind, point);

    #[cfg(feature = "debug-tracing")]
    trace!("Spawned {} at ({}, {})", kind, point.x, point.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point::pt;
    use crate::core::rng::ScriptedDice;
    use crate::game::config::BoardConfig;
    use crate::game::level::Level;
    use proptest::prelude::*;

    fn board(level: Level, draws: Vec<u32>) -> Board {
        Board::new(&level, ScriptedDice::new(draws), BoardConfig::default())
    }

    /// Enough apples that none are forced (cap 1 with no players).
    fn stocked(size: i32) -> Level {
        Level::bordered(size).with_objects(ObjectKind::Apple, [pt(1, 1), pt(2, 1)])
    }

    #[test]
    fn test_cap() {
        assert_eq!(spawn_cap(0), 1);
        assert_eq!(spawn_cap(1), 1);
        assert_eq!(spawn_cap(2), 2);
        assert_eq!(spawn_cap(5), 3);
    }

    #[test]
    fn test_stone_forced_on_empty_board() {
        let mut board = board(stocked(10), vec![STONE_DRAW]);

        spawn_objects(&mut board);

        assert_eq!(board.resources().count(ObjectKind::Stone), 1);
        assert_eq!(board.resources().count(ObjectKind::Apple), 2);
    }

    #[test]
    fn test_stone_forced_by_emptiness_on_any_draw() {
        let mut board = board(stocked(10), vec![49]);
        spawn_objects(&mut board);
        assert_eq!(board.resources().count(ObjectKind::Stone), 1);
    }

    #[test]
    fn test_stone_cap() {
        let level = stocked(6).with_objects(ObjectKind::Stone, [pt(2, 4), pt(3, 4), pt(4, 4)]);
        let mut board = board(level, vec![STONE_DRAW]);

        spawn_objects(&mut board);

        assert_eq!(board.resources().count(ObjectKind::Stone), 3, "size / 2 reached");
    }

    #[test]
    fn test_pills_and_gold_on_their_draws() {
        let level = stocked(10).with_objects(ObjectKind::Stone, [pt(5, 5)]);
        let mut board = board(level, vec![FURY_PILL_DRAW, 0, FLYING_PILL_DRAW, 0, GOLD_DRAW, 0]);

        for _ in 0..3 {
            spawn_objects(&mut board);
        }

        let resources = board.resources();
        assert_eq!(resources.count(ObjectKind::FuryPill), 1);
        assert_eq!(resources.count(ObjectKind::FlyingPill), 1);
        assert_eq!(resources.count(ObjectKind::Gold), 1);
        assert_eq!(resources.count(ObjectKind::Apple), 2);
    }

    #[test]
    fn test_pill_cap() {
        let level = stocked(10)
            .with_objects(ObjectKind::Stone, [pt(5, 5)])
            .with_objects(ObjectKind::FuryPill, [pt(6, 6)]);
        let mut board = board(level, vec![FURY_PILL_DRAW]);

        spawn_objects(&mut board);

        assert_eq!(board.resources().count(ObjectKind::FuryPill), 1);
    }

    #[test]
    fn test_apples_topped_up_to_minimum() {
        let level = Level::bordered(10).with_objects(ObjectKind::Stone, [pt(5, 5)]);
        let mut board = board(level, vec![49, 0]);

        spawn_objects(&mut board);

        assert_eq!(board.resources().count(ObjectKind::Apple), 1);
        assert!(board.resources().contains(ObjectKind::Apple, pt(1, 1)));
    }

    #[test]
    fn test_full_board_drops_spawn() {
        let mut board = board(Level::bordered(2), vec![STONE_DRAW]);
        spawn_objects(&mut board);
        assert!(board.resources().objects().next().is_none());
    }

    proptest! {
        #[test]
        fn prop_spawn_respects_caps(draws in proptest::collection::vec(0u32..50, 1..400)) {
            let ticks = draws.len() / 2;
            let mut board = board(Level::bordered(12), draws);
            let cap = spawn_cap(0);

            for _ in 0..ticks {
                spawn_objects(&mut board);
            }

            let resources = board.resources();
            prop_assert!(resources.count(ObjectKind::Apple) <= 10 * cap);
            prop_assert!(resources.count(ObjectKind::Stone) <= 6);
            prop_assert!(resources.count(ObjectKind::FuryPill) <= cap);
            prop_assert!(resources.count(ObjectKind::FlyingPill) <= cap);
            prop_assert!(resources.count(ObjectKind::Gold) <= 2 * cap);
        }
    }
}
