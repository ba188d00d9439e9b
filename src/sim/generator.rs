//! Procedural layout generation
//!
//! The generator owns the run's RNG stream plus the difficulty and biome
//! trackers, and turns them into spawn descriptors. Pattern selection is a
//! deadline-driven state machine: the current pattern keeps generating until
//! the change deadline passes, then a new one is drawn uniformly from the
//! patterns unlocked by the current difficulty level.

use crate::config::{BiomeDef, SimConfig};

use super::biome::BiomeTracker;
use super::difficulty::DifficultyScaler;
use super::pattern::{LaneContext, PatternLibrary, SpawnDescriptor};
use super::rng::SeqRng;

/// Pattern-driven spawn descriptor source
pub struct ProceduralGenerator {
    rng: SeqRng,
    difficulty: DifficultyScaler,
    biomes: BiomeTracker,
    library: PatternLibrary,
    lane_count: i32,
    current: usize,
    change_interval_ms: f64,
    pattern_deadline_ms: f64,
}

impl ProceduralGenerator {
    /// The library must contain a zero-difficulty pattern; anything else is
    /// a construction bug, not a runtime condition.
    pub fn new(config: &SimConfig, library: PatternLibrary, seed: u64) -> Self {
        assert!(
            !library.is_empty() && library.get(library.easiest()).difficulty_rating() == 0.0,
            "pattern library must contain a zero-difficulty fallback"
        );
        let current = library.easiest();
        Self {
            rng: SeqRng::new(seed),
            difficulty: DifficultyScaler::new(config.difficulty.clone()),
            biomes: BiomeTracker::new(config.biomes.clone()),
            library,
            lane_count: config.lanes.count,
            current,
            change_interval_ms: config.patterns.change_interval_ms,
            pattern_deadline_ms: config.patterns.change_interval_ms,
        }
    }

    /// Advance difficulty/biome tracking and re-select the pattern once the
    /// change deadline has passed
    pub fn update(&mut self, now_ms: f64, distance: f32) {
        self.difficulty.update(distance);
        self.biomes.update(distance);

        if now_ms >= self.pattern_deadline_ms {
            let eligible = self.library.eligible(self.difficulty.level().numeric());
            // Never empty: the zero-rated fallback is always eligible
            if let Some(&next) = self.rng.choice(&eligible) {
                if next != self.current {
                    log::debug!(
                        "Pattern change: {} -> {}",
                        self.library.get(self.current).id(),
                        self.library.get(next).id()
                    );
                }
                self.current = next;
            }
            self.pattern_deadline_ms = now_ms + self.change_interval_ms;
        }
    }

    /// Generate one batch of spawn descriptors at `distance`
    ///
    /// Runs the current pattern, then applies the active biome's density
    /// modifier: density above 1 resamples existing descriptors at jittered
    /// distances (+[50, 150) units) instead of requiring denser authored
    /// patterns.
    pub fn generate_obstacles(&mut self, current_lane: i32, distance: f32) -> Vec<SpawnDescriptor> {
        let ctx = LaneContext {
            lane_count: self.lane_count,
            player_lane: current_lane,
        };
        let mut batch = self
            .library
            .get(self.current)
            .generate(&ctx, distance, &mut self.rng);

        let density = self.biomes.current_biome().modifiers.density;
        if density > 1.0 && !batch.is_empty() {
            let extra = (batch.len() as f32 * (density - 1.0)).round() as usize;
            for _ in 0..extra {
                let source = *self.rng.choice(&batch).unwrap_or(&batch[0]);
                let jitter = 50.0 + self.rng.next_f32() * 100.0;
                batch.push(SpawnDescriptor {
                    distance: source.distance + jitter,
                    ..source
                });
            }
        }
        batch
    }

    /// Reseed and clear all distance/biome/pattern state. `None` replays
    /// the current seed.
    pub fn reset(&mut self, seed: Option<u64>) {
        let seed = seed.unwrap_or(self.rng.seed());
        self.rng.set_seed(seed);
        self.difficulty.reset();
        self.biomes.reset();
        self.current = self.library.easiest();
        self.pattern_deadline_ms = self.change_interval_ms;
        log::info!("Generator reset, seed {seed}");
    }

    // --- READ-ONLY PROJECTIONS ---

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn difficulty(&self) -> &DifficultyScaler {
        &self.difficulty
    }

    pub fn current_biome(&self) -> &BiomeDef {
        self.biomes.current_biome()
    }

    pub fn biome_progress(&self) -> f32 {
        self.biomes.biome_progress()
    }

    /// Biome entered since the last call, if any
    pub fn take_biome_transition(&mut self) -> Option<&BiomeDef> {
        self.biomes.take_transition()
    }

    pub fn current_pattern_id(&self) -> &'static str {
        self.library.get(self.current).id()
    }
}
