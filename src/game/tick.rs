//! Authoritative Simulation Tick
//!
//! The per-tick pipeline. Given the same board, dice and inputs it always
//! produces the same board and events.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::point::Direction;
use crate::game::board::Board;
use crate::game::collision::resolve_fights;
use crate::game::events::{countdown_message, GameEvent};
use crate::game::objects::ObjectKind;
use crate::game::player::{Player, PlayerId};
use crate::game::spawn::spawn_objects;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Tick number
    pub tick: u32,
    /// Round in progress after the tick
    pub round: u32,
    /// Events generated this tick, plus any queued by mutators since the
    /// previous tick
    pub events: Vec<GameEvent>,
    /// Nothing moved: countdown, round timeout or restart
    pub frozen: bool,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `board` - The board (will be mutated)
/// * `inputs` - New facings for this tick (BTreeMap for deterministic order)
///
/// # Order
///
/// Turns, clearing dead bodies, timers, round timeout, round start, the
/// countdown gate and the last-player check come first; any of the last
/// four may end the tick early. Then heroes move, fight, eat and fight
/// again, the last one standing may win, and new objects spawn.
pub fn tick(board: &mut Board, inputs: &BTreeMap<PlayerId, Direction>) -> TickResult {
    // 0. Advance tick counter
    board.tick += 1;

    // 1. Apply player inputs, re-read timer lengths
    apply_inputs(board, inputs);
    board.start_timer.set_limit(board.config.time_before_start);
    board.round_timer.set_limit(board.config.time_per_round);

    let frozen = !run_phases(board);

    TickResult {
        tick: board.tick,
        round: board.round,
        events: board.take_events(),
        frozen,
    }
}

/// Returns false when the tick ended before anything moved.
fn run_phases(board: &mut Board) -> bool {
    // 2. Dead heroes leave no body behind
    clear_dead(board);

    // 3. Timers
    let mut countdown = None;
    board.start_timer.tick(|left| countdown = Some(left));
    if let Some(left) = countdown {
        board.broadcast(&countdown_message(left));
    }
    board.round_timer.tick(|_| {});

    // 4. Round over on time
    if board.round_timer.just_finished() {
        debug!("Round {} timed out at tick {}", board.round, board.tick);
        board.reward_winners_by_timeout();
        board.start_timer.start();
        return false;
    }

    // 5. Round start
    if board.start_timer.just_finished() {
        board.round += 1;
        let round = board.round;
        for player in &mut board.players {
            player.start(round);
        }
        board.round_timer.start();
        debug!("Round {} started at tick {}", round, board.tick);
    }

    // 6. Countdown gate
    if !board.start_timer.done() {
        return false;
    }

    // 7. Nobody left to play against
    if restart_if_last(board) {
        board.start_timer.start();
        return false;
    }

    // 8. Move, fight, eat, fight
    move_heroes(board);
    fight(board);
    eat_objects(board);
    fight(board);

    // 9. Last one standing
    board.record_deaths();
    board.reward_the_winner();

    // 10. New objects
    spawn_objects(board);

    true
}

/// Turn heroes as requested.
fn apply_inputs(board: &mut Board, inputs: &BTreeMap<PlayerId, Direction>) {
    // BTreeMap iterates in sorted key order - DETERMINISTIC
    for (player_id, direction) in inputs {
        if let Some(player) = board.player_mut(*player_id) {
            player.hero_mut().turn(*direction);
        }
    }
}

fn clear_dead(board: &mut Board) {
    for player in &mut board.players {
        if !player.is_alive() {
            player.hero_mut().clear();
        }
    }
}

/// With rounds in play, a lone survivor is sent back to the start.
///
/// Returns true when the board should restart its countdown.
fn restart_if_last(board: &mut Board) -> bool {
    if board.start_timer.unlimited() {
        return false;
    }

    let alive: Vec<usize> = (0..board.players.len())
        .filter(|&i| board.players[i].is_alive_active())
        .collect();

    match alive.as_slice() {
        [] => true,
        [last] => {
            board.reset(*last);
            true
        }
        _ => false,
    }
}

fn move_heroes(board: &mut Board) {
    let terrain = &board.terrain;
    for player in board.players.iter_mut().filter(|p| p.is_alive_active()) {
        player.hero_mut().step(terrain);
    }
}

/// One fight pass. Credits go to heroes that are still alive.
fn fight(board: &mut Board) {
    let credits = resolve_fights(&mut board.players);
    for credit in credits {
        let alive = board
            .player(credit.player_id)
            .is_some_and(Player::is_alive_active);
        if alive {
            board.push_event(GameEvent::eat(board.tick, credit.player_id, credit.amount));
        }
    }
}

/// Every hero eats whatever is under its head; the board takes the
/// objects away and scores them.
fn eat_objects(board: &mut Board) {
    for idx in 0..board.players.len() {
        let player = &board.players[idx];
        if !player.is_alive_active() {
            continue;
        }
        let Some(head) = player.hero().head() else {
            continue;
        };
        let id = player.id();
        let flying = player.hero().is_flying();

        let here = board.resources.kinds_at(head);
        board.players[idx].hero_mut().eat(&here, &board.config);
        let alive = board.players[idx].is_alive();

        for kind in here {
            let event = match kind {
                ObjectKind::Apple => Some(GameEvent::apple(board.tick, id)),
                ObjectKind::Stone if flying => continue,
                ObjectKind::Stone => alive.then(|| GameEvent::stone(board.tick, id)),
                ObjectKind::Gold => Some(GameEvent::gold(board.tick, id)),
                ObjectKind::FlyingPill | ObjectKind::FuryPill => None,
                ObjectKind::Wall | ObjectKind::StartFloor => continue,
            };
            board.resources.remove(kind, head);
            if let Some(event) = event {
                board.push_event(event);
            }
        }
    }
}

/// Replay a match from recorded inputs.
///
/// Returns the final board and every event produced.
pub fn replay_match(
    initial: Board,
    inputs: &[BTreeMap<PlayerId, Direction>],
) -> (Board, Vec<GameEvent>) {
    let mut board = initial;
    let mut all_events = Vec::new();

    for tick_inputs in inputs {
        let result = tick(&mut board, tick_inputs);
        all_events.extend(result.events);
    }

    (board, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point::{pt, Point};
    use crate::core::rng::{DeterministicRng, ScriptedDice};
    use crate::game::config::BoardConfig;
    use crate::game::events::{GameEventData, TIME_IS_OVER};
    use crate::game::hero::Hero;
    use crate::game::level::Level;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn id(n: u8) -> PlayerId {
        PlayerId::new([n; 16])
    }

    /// Bordered 12x12 with three starts and enough apples and stones that
    /// nothing spawns for up to three players on the fallback draw.
    fn arena() -> Level {
        Level::bordered(12)
            .with_starts([pt(3, 3), pt(3, 8), pt(8, 5)])
            .with_objects(ObjectKind::Apple, [pt(10, 10), pt(9, 10), pt(8, 10), pt(7, 10)])
            .with_objects(ObjectKind::Stone, [pt(10, 1)])
    }

    fn config(before: u32, round: u32) -> BoardConfig {
        BoardConfig {
            time_before_start: before,
            time_per_round: round,
            ..BoardConfig::default()
        }
    }

    /// Players 1..=n seated on starts 0..n in order.
    fn board_with(players: u8, config: BoardConfig) -> Board {
        let seats = (0..u32::from(players)).collect::<Vec<_>>();
        let mut board = Board::new(&arena(), ScriptedDice::new(seats).with_fallback(49), config);
        for n in 1..=players {
            board.new_game(id(n));
        }
        board
    }

    fn set_body(board: &mut Board, n: u8, body: Vec<Point>, direction: Direction) {
        let player = board.player_mut(id(n)).expect("seated");
        *player.hero_mut() = Hero::from_body(id(n), body, direction);
    }

    fn run(board: &mut Board) -> TickResult {
        tick(board, &BTreeMap::new())
    }

    fn head(board: &Board, n: u8) -> Option<Point> {
        board.player(id(n)).and_then(|p| p.hero().head())
    }

    fn scoring(result: &TickResult) -> Vec<(PlayerId, GameEventData)> {
        result
            .events
            .iter()
            .filter(|e| e.data.is_scoring())
            .map(|e| (e.player_id, e.data.clone()))
            .collect()
    }

    #[test]
    fn test_board_frozen_during_countdown() {
        let mut board = board_with(2, config(3, 0));

        let first = run(&mut board);
        assert!(first.frozen);
        assert_eq!(head(&board, 1), Some(pt(3, 3)));
        assert_eq!(
            first.events,
            vec![
                GameEvent::message(1, id(1), "..2.."),
                GameEvent::message(1, id(2), "..2.."),
            ]
        );

        assert!(run(&mut board).frozen);
        assert_eq!(head(&board, 1), Some(pt(3, 3)));
        assert_eq!(board.round(), 0);

        let third = run(&mut board);
        assert!(!third.frozen);
        assert_eq!(third.round, 1);
        assert_eq!(head(&board, 1), Some(pt(4, 3)));
        assert_eq!(head(&board, 2), Some(pt(4, 8)));
    }

    #[test]
    fn test_countdown_survives_start_delay_switched_off() {
        let mut board = board_with(2, config(5, 0));
        assert!(run(&mut board).frozen);

        board.config_mut().time_before_start = 0;
        for _ in 0..3 {
            assert!(run(&mut board).frozen);
        }

        let start = run(&mut board);
        assert!(!start.frozen);
        assert_eq!(start.round, 1);
        assert!(board.players().iter().all(Player::is_alive_active));
        assert_eq!(head(&board, 1), Some(pt(4, 3)));

        assert!(!run(&mut board).frozen);
        assert_eq!(head(&board, 1), Some(pt(5, 3)));
        assert!(board.start_timer().unlimited());
    }

    #[test]
    fn test_turns_apply_before_moving() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);

        let mut inputs = BTreeMap::new();
        inputs.insert(id(1), Direction::Up);
        inputs.insert(id(2), Direction::Left); // into the neck, ignored
        tick(&mut board, &inputs);

        assert_eq!(head(&board, 1), Some(pt(4, 4)));
        assert_eq!(head(&board, 2), Some(pt(5, 8)));
    }

    fn timed_out_pair(min_ticks_for_win: u32) -> (Board, TickResult) {
        let config = BoardConfig { min_ticks_for_win, ..config(1, 3) };
        let mut board = board_with(2, config);
        run(&mut board);
        set_body(&mut board, 1, vec![pt(4, 2), pt(3, 2), pt(2, 2), pt(1, 2)], Direction::Right);
        set_body(&mut board, 2, vec![pt(4, 9), pt(3, 9), pt(2, 9), pt(1, 9)], Direction::Right);

        assert!(!run(&mut board).frozen);
        assert!(!run(&mut board).frozen);
        let result = run(&mut board);
        (board, result)
    }

    #[test]
    fn test_timeout_equal_lengths_both_win() {
        let (board, result) = timed_out_pair(2);

        assert!(result.frozen);
        assert_eq!(
            scoring(&result),
            vec![(id(1), GameEventData::Win), (id(2), GameEventData::Win)]
        );
        assert!(board.players().iter().all(Player::has_left), "single-round match is over");
    }

    #[test]
    fn test_timeout_in_short_round_is_no_win() {
        let (_, result) = timed_out_pair(3);

        assert!(scoring(&result).is_empty());
        assert_eq!(
            result.events,
            vec![
                GameEvent::message(4, id(1), TIME_IS_OVER),
                GameEvent::message(4, id(2), TIME_IS_OVER),
            ]
        );
    }

    #[test]
    fn test_timeout_longest_hero_wins() {
        let mut board = board_with(2, config(1, 3));
        run(&mut board);
        set_body(&mut board, 1, vec![pt(4, 2), pt(3, 2), pt(2, 2)], Direction::Right);

        run(&mut board);
        run(&mut board);
        let result = run(&mut board);

        assert_eq!(scoring(&result), vec![(id(1), GameEventData::Win)]);
        assert!(result.events.contains(&GameEvent::message(4, id(2), TIME_IS_OVER)));
    }

    #[test]
    fn test_rounds_continue_until_match_is_over() {
        let config = BoardConfig { rounds_per_match: 2, ..config(1, 2) };
        let mut board = board_with(2, config);

        run(&mut board);
        assert_eq!(board.round(), 1);
        run(&mut board);
        let timeout = run(&mut board);
        assert!(timeout.frozen);
        assert!(board.players().iter().all(|p| !p.has_left() && !p.is_active()));
        for n in 1..=2 {
            let start = head(&board, n).expect("fresh hero");
            assert!(board.terrain().is_start(start));
        }

        run(&mut board);
        assert_eq!(board.round(), 2);
        assert!(board.players().iter().all(Player::is_alive_active));

        run(&mut board);
        run(&mut board);
        assert!(board.players().iter().all(Player::has_left));
        assert_eq!(board.round(), 2);
    }

    #[test]
    fn test_last_player_is_sent_back() {
        let config = BoardConfig { rounds_per_match: 5, ..config(1, 0) };
        let mut board = board_with(1, config);

        let result = run(&mut board);

        assert!(result.frozen);
        assert_eq!(result.round, 1);
        let player = &board.players()[0];
        assert!(!player.is_active(), "waits for the next round");
        assert_eq!(player.hero().size(), 2);
        assert!(player.hero().head().is_some_and(|p| board.terrain().is_start(p)));
        assert!(board.start_timer().is_running());
    }

    #[test]
    fn test_no_rounds_without_countdown() {
        let mut board = board_with(1, config(0, 0));

        for _ in 0..3 {
            assert!(!run(&mut board).frozen);
        }

        assert_eq!(board.round(), 0);
        assert_eq!(head(&board, 1), Some(pt(6, 3)));
    }

    #[test]
    fn test_win_by_elimination() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        set_body(&mut board, 2, vec![pt(7, 8), pt(6, 8)], Direction::Right);

        for _ in 0..3 {
            assert!(scoring(&run(&mut board)).is_empty());
        }
        let result = run(&mut board);

        assert!(!board.players()[1].is_alive(), "ran into the wall");
        assert_eq!(scoring(&result), vec![(id(1), GameEventData::Win)]);

        let next = run(&mut board);
        assert!(next.frozen);
        assert_eq!(board.players()[1].hero().size(), 0, "dead body cleared");
        assert!(board.players()[0].has_left());
    }

    #[test]
    fn test_no_win_when_round_too_short() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        set_body(&mut board, 2, vec![pt(10, 8), pt(9, 8)], Direction::Right);

        let result = run(&mut board);

        assert!(!board.players()[1].is_alive());
        assert!(scoring(&result).is_empty());
    }

    #[test]
    fn test_head_on_three_vs_five() {
        let mut board = board_with(3, config(1, 0));
        run(&mut board);
        set_body(&mut board, 1, vec![pt(4, 5), pt(3, 5), pt(2, 5)], Direction::Right);
        set_body(
            &mut board,
            2,
            vec![pt(6, 5), pt(7, 5), pt(8, 5), pt(9, 5), pt(10, 5)],
            Direction::Left,
        );
        set_body(&mut board, 3, vec![pt(1, 2), pt(1, 1)], Direction::Up);

        let result = run(&mut board);

        assert!(!board.players()[0].is_alive());
        assert_eq!(scoring(&result), vec![(id(2), GameEventData::Eat { amount: 3 })]);
        assert_eq!(board.players()[1].hero().pending_reduction(), 3);

        run(&mut board);
        assert_eq!(board.players()[1].hero().size(), 2);
        assert!(board.players()[1].is_alive());
    }

    #[test]
    fn test_eating_apple_and_gold() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        board.set_apple(pt(5, 3));
        board.set_gold(pt(5, 8));

        let result = run(&mut board);

        assert_eq!(
            scoring(&result),
            vec![(id(1), GameEventData::Apple), (id(2), GameEventData::Gold)]
        );
        assert_eq!(board.players()[0].hero().size(), 3);
        assert_eq!(board.players()[1].hero().size(), 2);
        assert!(!board.resources().contains(ObjectKind::Apple, pt(5, 3)));
        assert!(!board.resources().contains(ObjectKind::Gold, pt(5, 8)));
    }

    #[test]
    fn test_enemy_head_in_growing_tail_is_eaten() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        set_body(&mut board, 1, vec![pt(5, 6), pt(4, 6), pt(3, 6)], Direction::Right);
        set_body(&mut board, 2, vec![pt(3, 5), pt(2, 5), pt(1, 5)], Direction::Up);
        board.set_apple(pt(6, 6));

        let result = run(&mut board);

        assert_eq!(
            scoring(&result),
            vec![
                (id(1), GameEventData::Apple),
                (id(1), GameEventData::Eat { amount: 3 }),
            ]
        );
        assert_eq!(board.players()[0].hero().size(), 4);
        assert!(board.players()[0].is_alive());
        assert!(!board.players()[1].is_alive());
    }

    #[test]
    fn test_stone_shrinks_walker_not_flyer() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        board.set_stone(pt(6, 2));
        board.set_stone(pt(7, 9));
        set_body(&mut board, 1, vec![pt(5, 2), pt(4, 2)], Direction::Right);
        board.players[0].hero_mut().add_flying(5);
        set_body(
            &mut board,
            2,
            vec![pt(6, 9), pt(5, 9), pt(4, 9), pt(3, 9), pt(2, 9)],
            Direction::Right,
        );

        let result = run(&mut board);

        assert_eq!(scoring(&result), vec![(id(2), GameEventData::Stone)]);
        assert!(board.resources().contains(ObjectKind::Stone, pt(6, 2)), "flown over");
        assert!(!board.resources().contains(ObjectKind::Stone, pt(7, 9)));
        assert_eq!(board.players()[0].hero().size(), 2);
        assert_eq!(board.players()[1].hero().size(), 2);
        assert_eq!(board.players()[1].hero().stones(), 1);
    }

    #[test]
    fn test_pills_are_taken_silently() {
        let mut board = board_with(2, config(1, 0));
        run(&mut board);
        board.set_fury_pill(pt(5, 3));
        board.set_flying_pill(pt(5, 8));

        let result = run(&mut board);

        assert!(scoring(&result).is_empty());
        assert!(board.players()[0].hero().is_fury());
        assert!(board.players()[1].hero().is_flying());
        assert_eq!(board.resources().count(ObjectKind::FuryPill), 0);
        assert_eq!(board.resources().count(ObjectKind::FlyingPill), 0);
    }

    #[test]
    fn test_mutator_events_delivered_with_next_tick() {
        let mut board = board_with(2, config(0, 0));
        board.players[1].hero_mut().die();
        board.push_event(GameEvent::message(0, id(1), "hello"));

        let result = run(&mut board);

        assert_eq!(result.events[0], GameEvent::message(0, id(1), "hello"));
    }

    fn seeded_board(seed: u64) -> Board {
        let level = Level::bordered(16).with_starts([pt(3, 3), pt(3, 12), pt(12, 3), pt(12, 12)]);
        let mut board = Board::new(&level, DeterministicRng::new(seed), config(2, 40));
        for n in 1..=4 {
            board.new_game(id(n));
        }
        board
    }

    fn random_inputs(seed: u64, ticks: usize) -> Vec<BTreeMap<PlayerId, Direction>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..ticks)
            .map(|_| {
                let mut inputs = BTreeMap::new();
                for n in 1..=4 {
                    if rng.gen_bool(0.3) {
                        inputs.insert(id(n), Direction::ALL[rng.gen_range(0..4)]);
                    }
                }
                inputs
            })
            .collect()
    }

    #[test]
    fn test_tick_determinism() {
        let inputs = random_inputs(7, 200);
        let mut board1 = seeded_board(12345);
        let mut board2 = seeded_board(12345);

        for tick_inputs in &inputs {
            let r1 = tick(&mut board1, tick_inputs);
            let r2 = tick(&mut board2, tick_inputs);
            assert_eq!(r1.events, r2.events);
            assert_eq!(board1.compute_hash(), board2.compute_hash());
        }
    }

    #[test]
    fn test_replay_determinism() {
        let inputs = random_inputs(99, 150);

        let (final1, events1) = replay_match(seeded_board(99999), &inputs);
        let (final2, events2) = replay_match(seeded_board(99999), &inputs);

        assert_eq!(final1.compute_hash(), final2.compute_hash());
        assert_eq!(events1, events2);
        assert_eq!(final1.tick_count(), 150);
    }
}
