//! Data-driven simulation tuning
//!
//! Every tunable the core uses is injected through [`SimConfig`] at
//! construction time: lane layout, difficulty curves, biome table, scoring
//! values, per-archetype AI parameters, and collider sizes. The whole record
//! is serde-serializable so a balance pass can ship as a JSON file instead
//! of a rebuild.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::ai::Archetype;

/// Lane layout: lanes are evenly spaced and centered on x = 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Number of lanes (runner convention: 3)
    pub count: i32,
    /// Distance between adjacent lane centers (world units)
    pub width: f32,
}

impl LaneConfig {
    /// World-space x coordinate of a lane center
    #[inline]
    pub fn lane_x(&self, lane: i32) -> f32 {
        (lane as f32 - (self.count as f32 - 1.0) / 2.0) * self.width
    }

    /// Clamp a requested lane index into the valid range
    #[inline]
    pub fn clamp_lane(&self, lane: i32) -> i32 {
        lane.clamp(0, self.count - 1)
    }
}

/// Run pacing: scroll speed, spawn cadence, cleanup distances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base forward speed in units/second before difficulty scaling
    pub base_speed: f32,
    /// Milliseconds between spawn batches at 1x spawn rate
    pub spawn_interval_ms: f64,
    /// How far ahead of the player new layouts are placed
    pub spawn_lead_distance: f32,
    /// Entities this far behind the player are despawned
    pub despawn_behind: f32,
    /// Lateral distance under which a passed obstacle counts as a close call
    pub close_call_margin: f32,
}

/// Difficulty thresholds and multiplier curves
///
/// `thresholds` are the distances at which the level steps to Normal, Hard
/// and Expert. The multipliers ramp linearly with distance and saturate at
/// their caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Distance thresholds for Normal / Hard / Expert
    pub thresholds: [f32; 3],
    /// Scroll speed multiplier gain per unit of distance
    pub speed_gain: f32,
    /// Scroll speed multiplier ceiling
    pub speed_cap: f32,
    /// Spawn rate multiplier gain per unit of distance
    pub spawn_gain: f32,
    /// Spawn rate multiplier ceiling
    pub spawn_cap: f32,
}

/// Multiplicative tweaks a biome applies to spawned obstacles
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BiomeModifiers {
    /// Obstacle density (> 1 synthesizes extra spawns)
    pub density: f32,
    /// Obstacle size scale
    pub size: f32,
    /// Scroll speed scale while the biome is active
    pub speed: f32,
}

/// One entry of the distance-banded biome table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeDef {
    pub id: String,
    /// Distance at which the biome begins (table is ordered by this)
    pub min_distance: f32,
    pub modifiers: BiomeModifiers,
}

/// Pattern engine pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Milliseconds between pattern re-selections
    pub change_interval_ms: f64,
}

/// Scoring values and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub distance_points_per_meter: f64,
    pub coin_value: f64,
    pub gem_value: f64,
    /// Combo streak decays after this many ms without a pickup
    pub combo_timeout_ms: f64,
    /// Bonus per combo level on each pickup
    pub combo_bonus_multiplier: f64,
    /// Flat bonus for a near miss
    pub close_call_bonus: f64,
    /// Obstacles avoided beyond this count earn an end-of-run bonus
    pub avoid_bonus_threshold: u32,
    /// End-of-run bonus per avoided obstacle over the threshold
    pub avoid_bonus_per_obstacle: f64,
}

/// Factory parameters for one enemy archetype
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArchetypeParams {
    /// Speed ceiling (units/second); Ambush uses this only once activated
    pub max_speed: f32,
    /// Steering force ceiling (units/second^2)
    pub max_force: f32,
    pub health: f32,
    /// Ambush wakes when the player gets this close; unused by other kinds
    pub activation_radius: f32,
    /// Milliseconds between steering-decision recomputes
    pub ai_update_interval_ms: f64,
    /// Half-width of the patrol leg; unused by other kinds
    pub patrol_span: f32,
}

/// Per-archetype factory table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeTable {
    pub chaser: ArchetypeParams,
    pub patrol: ArchetypeParams,
    pub zigzag: ArchetypeParams,
    pub ambush: ArchetypeParams,
}

impl ArchetypeTable {
    /// Look up the factory parameters for an archetype
    pub fn params(&self, archetype: Archetype) -> &ArchetypeParams {
        match archetype {
            Archetype::Chaser => &self.chaser,
            Archetype::Patrol => &self.patrol,
            Archetype::Zigzag => &self.zigzag,
            Archetype::Ambush => &self.ambush,
        }
    }
}

/// Collider dimensions for every spawnable entity class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderConfig {
    pub player_radius: f32,
    /// Half-extents of a block obstacle
    pub block_half: Vec2,
    /// Half-extents of a full-lane barrier
    pub barrier_half: Vec2,
    pub coin_radius: f32,
    pub gem_radius: f32,
    pub enemy_radius: f32,
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub lanes: LaneConfig,
    pub run: RunConfig,
    pub difficulty: DifficultyConfig,
    /// Ordered by `min_distance`; the first entry must start at 0
    pub biomes: Vec<BiomeDef>,
    pub patterns: PatternConfig,
    pub score: ScoreConfig,
    pub archetypes: ArchetypeTable,
    /// Broad-phase cell size, chosen from expected entity density
    pub grid_cell_size: f32,
    pub colliders: ColliderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lanes: LaneConfig {
                count: 3,
                width: 60.0,
            },
            run: RunConfig {
                base_speed: 240.0,
                spawn_interval_ms: 1400.0,
                spawn_lead_distance: 900.0,
                despawn_behind: 200.0,
                close_call_margin: 45.0,
            },
            difficulty: DifficultyConfig {
                thresholds: [2000.0, 6000.0, 14000.0],
                speed_gain: 1.0 / 12000.0,
                speed_cap: 2.2,
                spawn_gain: 1.0 / 9000.0,
                spawn_cap: 2.5,
            },
            biomes: vec![
                BiomeDef {
                    id: "meadow".into(),
                    min_distance: 0.0,
                    modifiers: BiomeModifiers {
                        density: 1.0,
                        size: 1.0,
                        speed: 1.0,
                    },
                },
                BiomeDef {
                    id: "canyon".into(),
                    min_distance: 4000.0,
                    modifiers: BiomeModifiers {
                        density: 1.3,
                        size: 1.1,
                        speed: 1.05,
                    },
                },
                BiomeDef {
                    id: "ruins".into(),
                    min_distance: 10000.0,
                    modifiers: BiomeModifiers {
                        density: 1.6,
                        size: 1.2,
                        speed: 1.1,
                    },
                },
            ],
            patterns: PatternConfig {
                change_interval_ms: 8000.0,
            },
            score: ScoreConfig {
                distance_points_per_meter: 1.0,
                coin_value: 10.0,
                gem_value: 50.0,
                combo_timeout_ms: 3000.0,
                combo_bonus_multiplier: 5.0,
                close_call_bonus: 25.0,
                avoid_bonus_threshold: 20,
                avoid_bonus_per_obstacle: 15.0,
            },
            archetypes: ArchetypeTable {
                chaser: ArchetypeParams {
                    max_speed: 180.0,
                    max_force: 320.0,
                    health: 1.0,
                    activation_radius: 0.0,
                    ai_update_interval_ms: 200.0,
                    patrol_span: 0.0,
                },
                patrol: ArchetypeParams {
                    max_speed: 140.0,
                    max_force: 280.0,
                    health: 2.0,
                    activation_radius: 0.0,
                    ai_update_interval_ms: 350.0,
                    patrol_span: 60.0,
                },
                zigzag: ArchetypeParams {
                    max_speed: 160.0,
                    max_force: 360.0,
                    health: 1.0,
                    activation_radius: 0.0,
                    ai_update_interval_ms: 150.0,
                    patrol_span: 0.0,
                },
                ambush: ArchetypeParams {
                    max_speed: 340.0,
                    max_force: 520.0,
                    health: 1.0,
                    activation_radius: 220.0,
                    ai_update_interval_ms: 120.0,
                    patrol_span: 0.0,
                },
            },
            grid_cell_size: 80.0,
            colliders: ColliderConfig {
                player_radius: 18.0,
                block_half: Vec2::new(22.0, 22.0),
                barrier_half: Vec2::new(28.0, 12.0),
                coin_radius: 10.0,
                gem_radius: 12.0,
                enemy_radius: 16.0,
            },
        }
    }
}

impl SimConfig {
    /// Assert the fail-fast construction invariants.
    ///
    /// Violations here are setup bugs (bad config file, bad hand-edit), not
    /// recoverable runtime conditions.
    pub fn validate(&self) {
        assert!(self.lanes.count > 0, "lane count must be positive");
        assert!(self.lanes.width > 0.0, "lane width must be positive");
        assert!(self.grid_cell_size > 0.0, "grid cell size must be positive");
        assert!(!self.biomes.is_empty(), "biome table must not be empty");
        assert!(
            self.biomes[0].min_distance == 0.0,
            "first biome must start at distance 0"
        );
        assert!(
            self.biomes
                .windows(2)
                .all(|w| w[0].min_distance <= w[1].min_distance),
            "biome table must be ordered by min_distance"
        );
        for params in [
            &self.archetypes.chaser,
            &self.archetypes.patrol,
            &self.archetypes.zigzag,
            &self.archetypes.ambush,
        ] {
            assert!(params.max_speed >= 0.0, "max_speed must not be negative");
            assert!(params.max_force >= 0.0, "max_force must not be negative");
            assert!(
                params.ai_update_interval_ms > 0.0,
                "ai_update_interval_ms must be positive"
            );
        }
        assert!(self.colliders.player_radius > 0.0);
        assert!(self.colliders.coin_radius > 0.0);
        assert!(self.colliders.gem_radius > 0.0);
        assert!(self.colliders.enemy_radius > 0.0);
    }

    /// Load a config from a JSON file, falling back to defaults on any
    /// error. Parse failures are logged, not propagated: a broken tuning
    /// file should not brick the game.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {path}");
                    config
                }
                Err(err) => {
                    log::warn!("Failed to parse {path}: {err}; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read {path}: {err}; using defaults");
                Self::default()
            }
        }
    }
}
