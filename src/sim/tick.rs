//! Fixed timestep simulation tick
//!
//! Core loop that advances the simulation deterministically. The intra-tick
//! ordering is a contract the rest of the core relies on:
//!
//! 1. clock and player distance advance
//! 2. difficulty and biome update
//! 3. conditional pattern generation and spawn materialization
//! 4. AI physics integration (every agent, every tick)
//! 5. AI decision recompute (per agent, on its own deadline)
//! 6. spatial grid rebuild
//! 7. narrow-phase collision resolution
//! 8. event dispatch into the score manager
//!
//! Nothing here blocks or suspends; every timeout is a deadline compare
//! against the session clock, so tests drive the whole core with synthetic
//! time.

use glam::Vec2;

use super::collision::{Collider, colliders_overlap};
use super::pattern::SpawnKind;
use super::state::{AGENT_ID_BASE, GameEvent, RunPhase, World};

/// How far behind the player a prop must be to count as passed
const PASS_MARGIN: f32 = 40.0;

/// Lateral lane-change speed, in lane widths per second
const LANE_CHANGE_SPEED: f32 = 8.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested lane (from input handling); clamped to the lane range
    pub target_lane: Option<i32>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match world.phase {
            RunPhase::Running => {
                world.phase = RunPhase::Paused;
                return;
            }
            RunPhase::Paused => world.phase = RunPhase::Running,
            RunPhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match world.phase {
        RunPhase::Paused | RunPhase::GameOver => return,
        RunPhase::Running => {}
    }

    world.time_ticks += 1;
    let dt_ms = dt as f64 * 1000.0;
    world.session_ms += dt_ms;

    // --- CLOCK & PLAYER ADVANCE ---
    if let Some(lane) = input.target_lane {
        world.player.lane = world.config.lanes.clamp_lane(lane);
    }
    let target_x = world.config.lanes.lane_x(world.player.lane);
    let max_step = world.config.lanes.width * LANE_CHANGE_SPEED * dt;
    let dx = target_x - world.player.x;
    world.player.x += dx.clamp(-max_step, max_step);

    let scroll = world.config.run.base_speed
        * world.generator.difficulty().scroll_speed_multiplier()
        * world.generator.current_biome().modifiers.speed;
    let meters = scroll * dt;
    world.player.distance += meters;

    world.score.update(dt_ms);
    world.score.update_distance(meters as f64);

    // --- DIFFICULTY & BIOME ---
    world.generator.update(world.session_ms, world.player.distance);
    if let Some(biome) = world.generator.take_biome_transition() {
        let id = biome.id.clone();
        log::info!("Entering biome {id}");
        world.events.push(GameEvent::BiomeEntered { id });
    }

    // --- SPAWNING ---
    if world.session_ms >= world.next_spawn_ms {
        let interval = world.config.run.spawn_interval_ms
            / world.generator.difficulty().spawn_rate_multiplier() as f64;
        world.next_spawn_ms = world.session_ms + interval;

        let ahead = world.player.distance + world.config.run.spawn_lead_distance;
        let batch = world.generator.generate_obstacles(world.player.lane, ahead);
        world.materialize(&batch);
        world.outbox.extend(batch.iter().copied());
    }

    // --- AI: INTEGRATE EVERY TICK, DECIDE ON DEADLINES ---
    let player_pos = world.player.pos();
    let player_vel = Vec2::new(0.0, scroll);
    world.ai.integrate(dt);
    world.ai.decide(world.session_ms, player_pos, player_vel);

    // --- BROAD PHASE REBUILD ---
    world.grid.clear();
    for prop in world.props.iter().filter(|p| p.alive) {
        world.grid.insert(prop.id, &prop.collider.bounds(prop.pos));
    }
    let enemy_collider = Collider::circle(world.config.colliders.enemy_radius);
    for agent in world.ai.agents().iter().filter(|a| a.active) {
        world
            .grid
            .insert(AGENT_ID_BASE + agent.id, &enemy_collider.bounds(agent.pos));
    }

    // --- NARROW PHASE & EVENT DISPATCH ---
    let player_bounds = world.player.collider.bounds(player_pos);
    let mut fatal_hit = None;
    for id in world.grid.query(&player_bounds) {
        if id >= AGENT_ID_BASE {
            let agent_id = id - AGENT_ID_BASE;
            let hit = world.ai.agent(agent_id).is_some_and(|agent| {
                agent.active
                    && colliders_overlap(
                        player_pos,
                        &world.player.collider,
                        agent.pos,
                        &enemy_collider,
                    )
            });
            if hit {
                fatal_hit = Some(GameEvent::EnemyHit { id: agent_id });
                break;
            }
        } else if let Some(prop) = world.props.iter_mut().find(|p| p.id == id && p.alive) {
            if !colliders_overlap(player_pos, &world.player.collider, prop.pos, &prop.collider) {
                continue;
            }
            match prop.kind {
                SpawnKind::Coin => {
                    prop.alive = false;
                    world.score.collect_coin();
                    world.events.push(GameEvent::CoinCollected { id });
                }
                SpawnKind::Gem => {
                    prop.alive = false;
                    world.score.collect_gem();
                    world.events.push(GameEvent::GemCollected { id });
                }
                _ => {
                    fatal_hit = Some(GameEvent::ObstacleHit { id });
                    break;
                }
            }
        }
    }

    // --- AVOIDED & CLOSE-CALL BOOKKEEPING ---
    let pass_line = world.player.distance - PASS_MARGIN;
    for prop in world.props.iter_mut() {
        if prop.alive && !prop.passed && prop.kind.is_obstacle() && prop.pos.y < pass_line {
            prop.passed = true;
            world.score.avoid_obstacle();
            world.events.push(GameEvent::ObstacleAvoided { id: prop.id });
            if (prop.pos.x - world.player.x).abs() <= world.config.run.close_call_margin {
                world.score.record_close_call();
                world.events.push(GameEvent::CloseCall { id: prop.id });
            }
        }
    }

    // --- DESPAWN SWEEPS ---
    let cleanup = world.player.distance - world.config.run.despawn_behind;
    world.props.retain(|p| p.alive && p.pos.y >= cleanup);
    world.ai.despawn_behind(cleanup);
    world.ai.sweep_dead();

    // --- GAME OVER ---
    if let Some(hit) = fatal_hit {
        world.events.push(hit);
        world.phase = RunPhase::GameOver;
        let final_score = world.score.calculate_final_score();
        log::info!(
            "Game over at {:.0}m, final score {:.0}",
            world.player.distance,
            final_score
        );
        world.events.push(GameEvent::GameOver { final_score });
    }
}
