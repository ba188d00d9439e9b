//! Lane Rush headless demo
//!
//! Drives the simulation core with a trivial auto-dodge pilot and prints
//! the final score snapshot as JSON. Useful for balance checks and for
//! eyeballing a run without any renderer attached.
//!
//! Usage: `lane-rush [seed] [config.json]`, log level via `RUST_LOG`.

use lane_rush::SimConfig;
use lane_rush::consts::SIM_DT;
use lane_rush::sim::{RunPhase, SpawnKind, TickInput, World, tick};

/// Demo run length: ten minutes of simulated time at 60 Hz
const MAX_TICKS: u64 = 10 * 60 * 60;

/// Pick a lane with no obstacle close ahead, preferring the current one
fn choose_lane(world: &World) -> Option<i32> {
    let player = &world.player;
    let lookahead = 260.0;

    let lane_blocked = |lane: i32| {
        world.props().iter().any(|p| {
            p.alive
                && p.kind.is_obstacle()
                && p.lane == lane
                && p.pos.y > player.distance
                && p.pos.y < player.distance + lookahead
        })
    };

    if !lane_blocked(player.lane) {
        return None;
    }
    // Nearest open lane wins; stay put if everything is blocked
    let mut lanes: Vec<i32> = (0..world.config.lanes.count).collect();
    lanes.sort_by_key(|lane| (lane - player.lane).abs());
    lanes.into_iter().find(|&lane| !lane_blocked(lane))
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let config = match args.next() {
        Some(path) => SimConfig::load_or_default(&path),
        None => SimConfig::default(),
    };

    let mut world = World::new(config, seed);
    let mut pickups = 0usize;
    let mut enemies = 0usize;

    for _ in 0..MAX_TICKS {
        let input = TickInput {
            target_lane: choose_lane(&world),
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);

        for descriptor in world.drain_spawns() {
            match descriptor.kind {
                SpawnKind::Coin | SpawnKind::Gem => pickups += 1,
                k if k.is_enemy() => enemies += 1,
                _ => {}
            }
        }
        if world.phase == RunPhase::GameOver {
            break;
        }
    }

    log::info!(
        "Run finished after {} ticks ({} pickups, {} enemies spawned)",
        world.time_ticks,
        pickups,
        enemies
    );

    let snapshot = world.score.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("snapshot serialization failed: {err}"),
    }
    println!("final score: {:.0}", world.score.calculate_final_score());
}
