//! Distance-driven difficulty scaling
//!
//! Maps cumulative distance to a coarse difficulty level (pattern
//! eligibility) and to continuous scroll/spawn multipliers. The level is
//! monotonic within a run: the scaler tracks the peak distance seen, so a
//! caller feeding a momentarily smaller value can never regress it.

use serde::{Deserialize, Serialize};

use crate::config::DifficultyConfig;

/// Coarse difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl DifficultyLevel {
    /// Numeric rating used for pattern eligibility (Easy = 0 .. Expert = 3)
    pub fn numeric(self) -> f32 {
        match self {
            DifficultyLevel::Easy => 0.0,
            DifficultyLevel::Normal => 1.0,
            DifficultyLevel::Hard => 2.0,
            DifficultyLevel::Expert => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Normal => "Normal",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::Expert => "Expert",
        }
    }
}

/// Maps elapsed distance to difficulty level and speed/spawn multipliers
#[derive(Debug, Clone)]
pub struct DifficultyScaler {
    config: DifficultyConfig,
    /// Peak distance seen since the last reset
    peak_distance: f32,
}

impl DifficultyScaler {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            peak_distance: 0.0,
        }
    }

    /// Feed the current cumulative distance
    pub fn update(&mut self, distance: f32) {
        self.peak_distance = self.peak_distance.max(distance);
    }

    /// Current difficulty band
    pub fn level(&self) -> DifficultyLevel {
        let [normal, hard, expert] = self.config.thresholds;
        if self.peak_distance >= expert {
            DifficultyLevel::Expert
        } else if self.peak_distance >= hard {
            DifficultyLevel::Hard
        } else if self.peak_distance >= normal {
            DifficultyLevel::Normal
        } else {
            DifficultyLevel::Easy
        }
    }

    /// Continuous scroll speed multiplier, 1.0 at the start of a run
    pub fn scroll_speed_multiplier(&self) -> f32 {
        (1.0 + self.peak_distance * self.config.speed_gain).min(self.config.speed_cap)
    }

    /// Continuous spawn rate multiplier, 1.0 at the start of a run
    pub fn spawn_rate_multiplier(&self) -> f32 {
        (1.0 + self.peak_distance * self.config.spawn_gain).min(self.config.spawn_cap)
    }

    /// Back to the Easy baseline
    pub fn reset(&mut self) {
        self.peak_distance = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;

    fn scaler() -> DifficultyScaler {
        DifficultyScaler::new(SimConfig::default().difficulty)
    }

    #[test]
    fn test_level_progression() {
        let mut s = scaler();
        assert_eq!(s.level(), DifficultyLevel::Easy);
        s.update(2000.0);
        assert_eq!(s.level(), DifficultyLevel::Normal);
        s.update(6000.0);
        assert_eq!(s.level(), DifficultyLevel::Hard);
        s.update(14000.0);
        assert_eq!(s.level(), DifficultyLevel::Expert);
    }

    #[test]
    fn test_level_never_regresses() {
        let mut s = scaler();
        s.update(7000.0);
        assert_eq!(s.level(), DifficultyLevel::Hard);
        // Smaller input must not pull the level back down
        s.update(100.0);
        assert_eq!(s.level(), DifficultyLevel::Hard);
        assert!(s.scroll_speed_multiplier() > 1.0);
    }

    #[test]
    fn test_multipliers_start_at_one_and_saturate() {
        let mut s = scaler();
        assert!((s.scroll_speed_multiplier() - 1.0).abs() < 0.001);
        assert!((s.spawn_rate_multiplier() - 1.0).abs() < 0.001);
        s.update(1.0e9);
        let config = SimConfig::default().difficulty;
        assert!((s.scroll_speed_multiplier() - config.speed_cap).abs() < 0.001);
        assert!((s.spawn_rate_multiplier() - config.spawn_cap).abs() < 0.001);
    }

    #[test]
    fn test_reset_returns_to_easy() {
        let mut s = scaler();
        s.update(20000.0);
        s.reset();
        assert_eq!(s.level(), DifficultyLevel::Easy);
        assert!((s.scroll_speed_multiplier() - 1.0).abs() < 0.001);
    }
}
