//! World state and core simulation types
//!
//! [`World`] owns every component of the per-tick pipeline: the procedural
//! generator, the AI controller, the broad-phase grid, the score manager,
//! and the materialized props the player can collide with. External
//! collaborators see spawn descriptors through the outbox and collisions
//! through drained [`GameEvent`]s; they never reach into the pipeline.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

use super::ai::{Archetype, EnemyAiController};
use super::collision::Collider;
use super::generator::ProceduralGenerator;
use super::grid::SpatialGrid;
use super::pattern::{PatternLibrary, SpawnDescriptor, SpawnKind};
use super::score::ScoreComboManager;

/// Grid ids at or above this value are agents; below are props
pub const AGENT_ID_BASE: u32 = 1 << 24;

/// Salt so the AI controller's RNG stream never mirrors the generator's
const AI_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    Paused,
    /// Run ended; the score snapshot is ready for persistence
    GameOver,
}

/// Collision/collect events dispatched to external health, lives and
/// achievement systems
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CoinCollected { id: u32 },
    GemCollected { id: u32 },
    ObstacleHit { id: u32 },
    EnemyHit { id: u32 },
    ObstacleAvoided { id: u32 },
    CloseCall { id: u32 },
    BiomeEntered { id: String },
    GameOver { final_score: f64 },
}

/// A materialized spawn the player can collide with (blocks, barriers,
/// pickups). Enemy descriptors become agents instead.
#[derive(Debug, Clone)]
pub struct Prop {
    pub id: u32,
    pub kind: SpawnKind,
    pub lane: i32,
    pub pos: Vec2,
    pub collider: Collider,
    /// Cleared when a pickup is consumed
    pub alive: bool,
    /// Set once the player has passed this prop (avoidance bookkeeping)
    pub passed: bool,
}

/// The player's kinematic state. Forward motion is automatic; input only
/// switches lanes.
#[derive(Debug, Clone)]
pub struct Player {
    pub lane: i32,
    /// Lateral position, smoothed toward the lane center
    pub x: f32,
    /// Cumulative forward distance
    pub distance: f32,
    pub collider: Collider,
}

impl Player {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.distance)
    }
}

/// Complete simulation state for one run
pub struct World {
    pub config: SimConfig,
    pub phase: RunPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Monotonic session clock in milliseconds; every deadline in the
    /// core compares against this
    pub session_ms: f64,
    pub player: Player,
    pub generator: ProceduralGenerator,
    pub ai: EnemyAiController,
    pub score: ScoreComboManager,
    pub(crate) grid: SpatialGrid,
    pub(crate) props: Vec<Prop>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) outbox: Vec<SpawnDescriptor>,
    pub(crate) next_prop_id: u32,
    pub(crate) next_spawn_ms: f64,
}

impl World {
    /// Build a world with the default pattern library
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self::with_library(config, PatternLibrary::with_defaults(), seed)
    }

    pub fn with_library(config: SimConfig, library: PatternLibrary, seed: u64) -> Self {
        config.validate();
        log::info!("New run, seed {seed}");

        let lane = config.lanes.count / 2;
        let player = Player {
            lane,
            x: config.lanes.lane_x(lane),
            distance: 0.0,
            collider: Collider::circle(config.colliders.player_radius),
        };
        Self {
            phase: RunPhase::Running,
            time_ticks: 0,
            session_ms: 0.0,
            player,
            generator: ProceduralGenerator::new(&config, library, seed),
            ai: EnemyAiController::new(config.archetypes.clone(), seed ^ AI_SEED_SALT),
            score: ScoreComboManager::new(config.score.clone()),
            grid: SpatialGrid::new(config.grid_cell_size),
            props: Vec::new(),
            events: Vec::new(),
            outbox: Vec::new(),
            next_prop_id: 1,
            next_spawn_ms: 0.0,
            config,
        }
    }

    /// Start a fresh run, optionally reseeding. Config and pattern library
    /// are kept.
    pub fn reset(&mut self, seed: Option<u64>) {
        let seed = seed.unwrap_or(self.generator.seed());
        self.generator.reset(Some(seed));
        self.ai.reset(seed ^ AI_SEED_SALT);
        self.score.reset();
        self.grid.clear();
        self.props.clear();
        self.events.clear();
        self.outbox.clear();
        self.phase = RunPhase::Running;
        self.time_ticks = 0;
        self.session_ms = 0.0;
        self.next_prop_id = 1;
        self.next_spawn_ms = 0.0;
        self.player.lane = self.config.lanes.count / 2;
        self.player.x = self.config.lanes.lane_x(self.player.lane);
        self.player.distance = 0.0;
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take all spawn descriptors queued for external spawners/renderers
    pub fn drain_spawns(&mut self) -> Vec<SpawnDescriptor> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn alloc_prop_id(&mut self) -> u32 {
        let id = self.next_prop_id;
        self.next_prop_id += 1;
        debug_assert!(id < AGENT_ID_BASE);
        id
    }

    /// Turn a descriptor batch into props and agents. The active biome's
    /// size modifier scales obstacle colliders.
    pub(crate) fn materialize(&mut self, batch: &[SpawnDescriptor]) {
        let size = self.generator.current_biome().modifiers.size;
        for descriptor in batch {
            let pos = Vec2::new(
                self.config.lanes.lane_x(descriptor.lane),
                descriptor.distance,
            );
            match descriptor.kind {
                SpawnKind::Chaser => {
                    self.ai.spawn(Archetype::Chaser, pos);
                }
                SpawnKind::Patrol => {
                    self.ai.spawn(Archetype::Patrol, pos);
                }
                SpawnKind::Zigzag => {
                    self.ai.spawn(Archetype::Zigzag, pos);
                }
                SpawnKind::Ambush => {
                    self.ai.spawn(Archetype::Ambush, pos);
                }
                kind => {
                    let collider = self.prop_collider(kind, size);
                    let id = self.alloc_prop_id();
                    self.props.push(Prop {
                        id,
                        kind,
                        lane: descriptor.lane,
                        pos,
                        collider,
                        alive: true,
                        passed: false,
                    });
                }
            }
        }
    }

    fn prop_collider(&self, kind: SpawnKind, size: f32) -> Collider {
        let c = &self.config.colliders;
        match kind {
            SpawnKind::Block => Collider::rect(c.block_half * size),
            SpawnKind::Barrier => Collider::rect(c.barrier_half * size),
            SpawnKind::Coin => Collider::circle(c.coin_radius),
            SpawnKind::Gem => Collider::circle(c.gem_radius),
            // Enemies never reach here
            _ => unreachable!("enemy kinds are spawned as agents"),
        }
    }
}
