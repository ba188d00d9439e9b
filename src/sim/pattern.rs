//! Obstacle layout patterns
//!
//! A pattern is a parameterized layout template tagged with a difficulty
//! rating. Patterns are registered once at startup in an append-only
//! library and are pure functions of their inputs (lane context, base
//! distance, RNG), which is what makes generation replayable from a seed.

use serde::{Deserialize, Serialize};

use super::rng::SeqRng;

/// What a spawn descriptor asks the external spawner to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    /// Single-lane obstacle
    Block,
    /// Low barrier, still lethal to run into
    Barrier,
    Coin,
    Gem,
    Chaser,
    Patrol,
    Zigzag,
    Ambush,
}

impl SpawnKind {
    /// Kinds that kill the player on contact
    pub fn is_obstacle(self) -> bool {
        matches!(self, SpawnKind::Block | SpawnKind::Barrier)
    }

    pub fn is_pickup(self) -> bool {
        matches!(self, SpawnKind::Coin | SpawnKind::Gem)
    }

    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            SpawnKind::Chaser | SpawnKind::Patrol | SpawnKind::Zigzag | SpawnKind::Ambush
        )
    }
}

/// One spawn request: immutable, produced by the generator, consumed once
/// by the external spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    pub lane: i32,
    /// Forward distance at which the entity appears
    pub distance: f32,
    pub kind: SpawnKind,
}

/// Lane information a pattern needs to place things
#[derive(Debug, Clone, Copy)]
pub struct LaneContext {
    pub lane_count: i32,
    pub player_lane: i32,
}

/// A layout template with a difficulty rating
///
/// `generate` must be a pure function of its inputs: no hidden state, all
/// randomness through the passed RNG.
pub trait Pattern {
    fn id(&self) -> &'static str;
    /// Eligible once the numeric difficulty level reaches this rating
    fn difficulty_rating(&self) -> f32;
    fn generate(&self, ctx: &LaneContext, distance: f32, rng: &mut SeqRng)
    -> Vec<SpawnDescriptor>;
}

/// Append-only pattern registry
pub struct PatternLibrary {
    patterns: Vec<Box<dyn Pattern>>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// The built-in layout set; always contains a zero-difficulty fallback
    pub fn with_defaults() -> Self {
        let mut lib = Self::new();
        lib.register(Box::new(SingleBlock));
        lib.register(Box::new(CoinTrail));
        lib.register(Box::new(LaneWall));
        lib.register(Box::new(Slalom));
        lib.register(Box::new(ChaserPair));
        lib.register(Box::new(PatrolLine));
        lib.register(Box::new(GemCache));
        lib.register(Box::new(ZigzagSwarm));
        lib.register(Box::new(AmbushNest));
        lib.register(Box::new(Gauntlet));
        lib
    }

    pub fn register(&mut self, pattern: Box<dyn Pattern>) {
        self.patterns.push(pattern);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> &dyn Pattern {
        self.patterns[index].as_ref()
    }

    /// Indices of all patterns whose rating does not exceed `max_rating`
    pub fn eligible(&self, max_rating: f32) -> Vec<usize> {
        (0..self.patterns.len())
            .filter(|&i| self.patterns[i].difficulty_rating() <= max_rating)
            .collect()
    }

    /// Index of the lowest-rated pattern (the reset fallback)
    pub fn easiest(&self) -> usize {
        let mut best = 0;
        for i in 1..self.patterns.len() {
            if self.patterns[i].difficulty_rating() < self.patterns[best].difficulty_rating() {
                best = i;
            }
        }
        best
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// --- BUILT-IN PATTERNS ---
//
// Distances below are relative offsets from the batch's base distance.

fn random_lane(ctx: &LaneContext, rng: &mut SeqRng) -> i32 {
    rng.next_i32(0, ctx.lane_count - 1)
}

/// One block in a random lane. Rating 0: the library's mandatory fallback.
struct SingleBlock;

impl Pattern for SingleBlock {
    fn id(&self) -> &'static str {
        "single_block"
    }

    fn difficulty_rating(&self) -> f32 {
        0.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        vec![SpawnDescriptor {
            lane: random_lane(ctx, rng),
            distance,
            kind: SpawnKind::Block,
        }]
    }
}

/// A run of coins down one lane
struct CoinTrail;

impl Pattern for CoinTrail {
    fn id(&self) -> &'static str {
        "coin_trail"
    }

    fn difficulty_rating(&self) -> f32 {
        0.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let lane = random_lane(ctx, rng);
        let count = rng.next_i32(4, 6);
        (0..count)
            .map(|i| SpawnDescriptor {
                lane,
                distance: distance + i as f32 * 45.0,
                kind: SpawnKind::Coin,
            })
            .collect()
    }
}

/// Blocks across every lane except one gap, with a coin marking the gap
struct LaneWall;

impl Pattern for LaneWall {
    fn id(&self) -> &'static str {
        "lane_wall"
    }

    fn difficulty_rating(&self) -> f32 {
        1.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let gap = random_lane(ctx, rng);
        let mut out = Vec::with_capacity(ctx.lane_count as usize);
        for lane in 0..ctx.lane_count {
            out.push(SpawnDescriptor {
                lane,
                distance,
                kind: if lane == gap {
                    SpawnKind::Coin
                } else {
                    SpawnKind::Block
                },
            });
        }
        out
    }
}

/// Alternating blocks that force a weave between outer lanes
struct Slalom;

impl Pattern for Slalom {
    fn id(&self) -> &'static str {
        "slalom"
    }

    fn difficulty_rating(&self) -> f32 {
        1.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let legs = rng.next_i32(3, 5);
        let start_left = rng.next_f32() < 0.5;
        (0..legs)
            .map(|i| {
                let left = (i % 2 == 0) == start_left;
                SpawnDescriptor {
                    lane: if left { 0 } else { ctx.lane_count - 1 },
                    distance: distance + i as f32 * 160.0,
                    kind: SpawnKind::Block,
                }
            })
            .collect()
    }
}

/// Two chasers flanking the player's lane
struct ChaserPair;

impl Pattern for ChaserPair {
    fn id(&self) -> &'static str {
        "chaser_pair"
    }

    fn difficulty_rating(&self) -> f32 {
        1.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        _rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let left = (ctx.player_lane - 1).max(0);
        let right = (ctx.player_lane + 1).min(ctx.lane_count - 1);
        vec![
            SpawnDescriptor {
                lane: left,
                distance,
                kind: SpawnKind::Chaser,
            },
            SpawnDescriptor {
                lane: right,
                distance: distance + 80.0,
                kind: SpawnKind::Chaser,
            },
        ]
    }
}

/// A patrol sweeping across the lanes in front of a short wall
struct PatrolLine;

impl Pattern for PatrolLine {
    fn id(&self) -> &'static str {
        "patrol_line"
    }

    fn difficulty_rating(&self) -> f32 {
        2.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let mut out = vec![SpawnDescriptor {
            lane: ctx.lane_count / 2,
            distance,
            kind: SpawnKind::Patrol,
        }];
        let blocked = random_lane(ctx, rng);
        out.push(SpawnDescriptor {
            lane: blocked,
            distance: distance + 220.0,
            kind: SpawnKind::Block,
        });
        out
    }
}

/// A gem guarded behind a barrier in the same lane
struct GemCache;

impl Pattern for GemCache {
    fn id(&self) -> &'static str {
        "gem_cache"
    }

    fn difficulty_rating(&self) -> f32 {
        2.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let lane = random_lane(ctx, rng);
        vec![
            SpawnDescriptor {
                lane,
                distance,
                kind: SpawnKind::Barrier,
            },
            SpawnDescriptor {
                lane,
                distance: distance + 140.0,
                kind: SpawnKind::Gem,
            },
        ]
    }
}

/// Three zigzag enemies spread across lanes
struct ZigzagSwarm;

impl Pattern for ZigzagSwarm {
    fn id(&self) -> &'static str {
        "zigzag_swarm"
    }

    fn difficulty_rating(&self) -> f32 {
        2.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        (0..3)
            .map(|i| SpawnDescriptor {
                lane: random_lane(ctx, rng),
                distance: distance + i as f32 * 120.0,
                kind: SpawnKind::Zigzag,
            })
            .collect()
    }
}

/// A dormant ambusher in the player's lane with blocks crowding the sides
struct AmbushNest;

impl Pattern for AmbushNest {
    fn id(&self) -> &'static str {
        "ambush_nest"
    }

    fn difficulty_rating(&self) -> f32 {
        3.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        _rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        let mut out = vec![SpawnDescriptor {
            lane: ctx.player_lane,
            distance: distance + 120.0,
            kind: SpawnKind::Ambush,
        }];
        for lane in 0..ctx.lane_count {
            if lane != ctx.player_lane {
                out.push(SpawnDescriptor {
                    lane,
                    distance,
                    kind: SpawnKind::Block,
                });
            }
        }
        out
    }
}

/// Blocks in every lane at one distance. Deliberately punishing: there is
/// no carved-out escape lane, so survival depends on collider-to-lane-width
/// slack. Expert-only by rating.
struct Gauntlet;

impl Pattern for Gauntlet {
    fn id(&self) -> &'static str {
        "gauntlet"
    }

    fn difficulty_rating(&self) -> f32 {
        3.0
    }

    fn generate(
        &self,
        ctx: &LaneContext,
        distance: f32,
        _rng: &mut SeqRng,
    ) -> Vec<SpawnDescriptor> {
        (0..ctx.lane_count)
            .map(|lane| SpawnDescriptor {
                lane,
                distance,
                kind: SpawnKind::Barrier,
            })
            .collect()
    }
}
