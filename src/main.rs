//! Snake Battle demo
//!
//! Runs a short scripted match on a bordered board, logs what happens and
//! replays it to check the state hash.
//!
//! Usage: `snake-battle [config.json]`

use std::collections::BTreeMap;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake_battle::{
    core::rng::derive_board_seed,
    game::{
        events::{GameEvent, GameEventData},
        snapshot::BoardSnapshot,
    },
    pt, tick, Board, BoardConfig, DeterministicRng, Direction, Level, PlayerId, VERSION,
};

/// Ticks the demo runs.
const DEMO_TICKS: u32 = 600;

/// Side of the demo board.
const DEMO_SIZE: i32 = 20;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Snake Battle v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            BoardConfig::from_json(&json).with_context(|| format!("loading config {path}"))?
        }
        None => BoardConfig {
            rounds_per_match: 3,
            time_per_round: 120,
            ..BoardConfig::default()
        },
    };
    info!("Config: {:?}", config);

    demo_match(config)
}

fn demo_level() -> Level {
    Level::bordered(DEMO_SIZE).with_starts([pt(3, 3), pt(3, 16), pt(16, 3), pt(16, 16)])
}

fn demo_board(board_id: [u8; 16], players: &[PlayerId], config: &BoardConfig) -> Board {
    let ids: Vec<[u8; 16]> = players.iter().map(|p| *p.as_bytes()).collect();
    let seed = derive_board_seed(&board_id, &ids);

    let mut board = Board::new(&demo_level(), DeterministicRng::new(seed), config.clone());
    for id in players {
        board.new_game(*id);
    }
    board
}

/// Scripted steering: each player turns clockwise on its own period.
fn demo_inputs(players: &[PlayerId]) -> Vec<BTreeMap<PlayerId, Direction>> {
    const CLOCKWISE: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    (0..DEMO_TICKS)
        .map(|t| {
            let mut inputs = BTreeMap::new();
            for (i, id) in (0u32..).zip(players) {
                let period = 3 + i * 2;
                if t % period == 0 {
                    inputs.insert(*id, CLOCKWISE[((t / period + i) % 4) as usize]);
                }
            }
            inputs
        })
        .collect()
}

/// Run the scripted match. Between ticks, players whose hero died get a new
/// one for the next round, the way a hosting server would.
fn play(mut board: Board, inputs: &[BTreeMap<PlayerId, Direction>], log: bool) -> (Board, Vec<GameEvent>) {
    let mut events = Vec::new();

    for tick_inputs in inputs {
        let result = tick(&mut board, tick_inputs);

        if log {
            for event in &result.events {
                let who = hex::encode(&event.player_id.as_bytes()[..4]);
                match &event.data {
                    GameEventData::Message { text } => info!("Tick {}: {} <- {}", result.tick, who, text),
                    data => info!("Tick {}: {} scored {}", result.tick, who, data),
                }
            }
        }
        events.extend(result.events);

        let fallen: Vec<PlayerId> = board
            .players()
            .iter()
            .filter(|p| !p.is_alive() && !p.has_left())
            .map(|p| p.id())
            .collect();
        for id in fallen {
            board.new_game(id);
        }
    }

    (board, events)
}

/// Demo function to exercise the simulation.
fn demo_match(config: BoardConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let board_id = [1u8; 16];
    let mut players: Vec<PlayerId> = (1..=4).map(|i| PlayerId::new([i; 16])).collect();
    players.sort();

    info!("Board ID: {}", hex::encode(board_id));

    let inputs = demo_inputs(&players);
    let (board, events) = play(demo_board(board_id, &players, &config), &inputs, true);

    info!("=== Match Results ===");
    info!("Rounds played: {}", board.round());
    for player in board.players() {
        let wins = events
            .iter()
            .filter(|e| e.player_id == player.id() && e.data == GameEventData::Win)
            .count();
        info!(
            "Player {}: {} wins, hero length {}",
            hex::encode(&player.id().as_bytes()[..4]),
            wins,
            player.hero().size()
        );
    }

    let snapshot = BoardSnapshot::capture(&board);
    info!("Final snapshot: {} elements", snapshot.elements().len());

    let hash = board.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, replay_events) = play(demo_board(board_id, &players, &config), &inputs, false);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    anyhow::ensure!(
        hash == replay_hash && events == replay_events,
        "determinism failure: replay diverged"
    );
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
