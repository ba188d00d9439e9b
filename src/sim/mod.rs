//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one stream per owner, never shared)
//! - Stable iteration order (by entity ID)
//! - All timeouts are deadline comparisons against caller-supplied time
//! - No rendering or platform dependencies

pub mod ai;
pub mod biome;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod grid;
pub mod pattern;
pub mod rng;
pub mod score;
pub mod state;
pub mod steering;
pub mod tick;

pub use ai::{Archetype, EnemyAiController, SteeringAgent};
pub use biome::BiomeTracker;
pub use collision::{Aabb, Collider, Shape, colliders_overlap};
pub use difficulty::{DifficultyLevel, DifficultyScaler};
pub use generator::ProceduralGenerator;
pub use grid::SpatialGrid;
pub use pattern::{LaneContext, Pattern, PatternLibrary, SpawnDescriptor, SpawnKind};
pub use rng::SeqRng;
pub use score::{ScoreComboManager, ScoreState};
pub use state::{GameEvent, Prop, RunPhase, World};
pub use tick::{TickInput, tick};
