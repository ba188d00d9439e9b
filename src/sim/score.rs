//! Score, combo and multiplier state machine
//!
//! All timing is deadline-based against the manager's own session clock,
//! which only advances when the caller feeds `update(dt_ms)`. Combo and
//! multiplier decay are checked lazily on the next update, never via
//! timer callbacks, so the whole thing is drivable by synthetic time.

use serde::{Deserialize, Serialize};

use crate::config::ScoreConfig;

/// Snapshot of one run's scoring state
///
/// Mutated only through [`ScoreComboManager`]; cloned out at run end for
/// external persistence. Cross-run totals live with an external progress
/// collaborator, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub distance: f64,
    pub score: f64,
    pub coins: u32,
    pub gems: u32,
    pub combo: u32,
    pub combo_deadline_ms: f64,
    pub multiplier: f64,
    pub multiplier_deadline_ms: f64,
    pub obstacles_avoided: u32,
    pub close_calls: u32,
    pub session_ms: f64,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            distance: 0.0,
            score: 0.0,
            coins: 0,
            gems: 0,
            combo: 0,
            combo_deadline_ms: 0.0,
            multiplier: 1.0,
            multiplier_deadline_ms: 0.0,
            obstacles_avoided: 0,
            close_calls: 0,
            session_ms: 0.0,
        }
    }
}

/// Scoring state machine reacting to collision/collect events
#[derive(Debug, Clone)]
pub struct ScoreComboManager {
    config: ScoreConfig,
    state: ScoreState,
}

impl ScoreComboManager {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            state: ScoreState::default(),
        }
    }

    /// Advance the session clock and lazily decay expired combo/multiplier
    pub fn update(&mut self, dt_ms: f64) {
        self.state.session_ms += dt_ms;
        if self.state.combo > 0 && self.state.session_ms >= self.state.combo_deadline_ms {
            self.state.combo = 0;
        }
        if self.state.multiplier != 1.0
            && self.state.session_ms >= self.state.multiplier_deadline_ms
        {
            self.state.multiplier = 1.0;
        }
    }

    /// Add base points through the active multiplier
    pub fn add_score(&mut self, base: f64) {
        self.state.score += base * self.state.multiplier;
    }

    /// Distance progress: points per meter, through the multiplier
    pub fn update_distance(&mut self, meters: f64) {
        self.state.distance += meters;
        self.add_score(meters * self.config.distance_points_per_meter);
    }

    fn bump_combo(&mut self) {
        self.state.combo += 1;
        self.state.combo_deadline_ms = self.state.session_ms + self.config.combo_timeout_ms;
        self.add_score(self.state.combo as f64 * self.config.combo_bonus_multiplier);
    }

    pub fn collect_coin(&mut self) {
        self.add_score(self.config.coin_value);
        self.state.coins += 1;
        self.bump_combo();
    }

    pub fn collect_gem(&mut self) {
        self.add_score(self.config.gem_value);
        self.state.gems += 1;
        self.bump_combo();
    }

    /// Set the score multiplier for a duration; overwrites, does not stack
    pub fn set_multiplier(&mut self, value: f64, duration_ms: f64) {
        self.state.multiplier = value;
        self.state.multiplier_deadline_ms = self.state.session_ms + duration_ms;
    }

    pub fn avoid_obstacle(&mut self) {
        self.state.obstacles_avoided += 1;
    }

    /// Near misses pay a flat bonus immediately
    pub fn record_close_call(&mut self) {
        self.state.close_calls += 1;
        self.add_score(self.config.close_call_bonus);
    }

    /// Final score including the avoidance bonus. Idempotent: derives a
    /// value without mutating `score`.
    pub fn calculate_final_score(&self) -> f64 {
        let over = self
            .state
            .obstacles_avoided
            .saturating_sub(self.config.avoid_bonus_threshold);
        self.state.score + over as f64 * self.config.avoid_bonus_per_obstacle
    }

    /// Zero every field; cross-run totals are not this manager's to keep
    pub fn reset(&mut self) {
        self.state = ScoreState::default();
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    /// Clone the state out for persistence/leaderboard collaborators
    pub fn snapshot(&self) -> ScoreState {
        self.state.clone()
    }
}
