//! Seeded random sequence generator
//!
//! Thin deterministic layer over PCG-32. All distribution mapping (floats,
//! integer ranges, choices) is done here from raw `u32` draws, so the Nth
//! call for a fixed seed is bit-identical across runs and across any other
//! implementation of the same mapping. Replays depend on this.
//!
//! Ownership rule: one `SeqRng` per consumer. The procedural generator and
//! the AI controller each hold their own instance; sharing a stream would
//! make either side's draw count perturb the other.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic sequence generator
#[derive(Debug, Clone)]
pub struct SeqRng {
    seed: u64,
    rng: Pcg32,
}

impl SeqRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reseed, restarting the sequence
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// The seed this sequence started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    ///
    /// Top 24 bits of one raw draw scaled by 2^-24: every representable
    /// output is exact in f32, and exactly one draw is consumed.
    pub fn next_f32(&mut self) -> f32 {
        (self.rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform integer in [min, max], inclusive on both ends
    pub fn next_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (max as i64 - min as i64 + 1) as u32;
        min + (self.rng.next_u32() % span) as i32
    }

    /// Uniform choice from a slice; `None` on empty input
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.rng.next_u32() as usize) % items.len();
        Some(&items[idx])
    }

    /// Weighted choice from parallel item/weight slices
    ///
    /// Non-positive total weight falls back to uniform choice rather than
    /// failing. Weights shorter than `items` treat the tail as zero.
    pub fn weighted_choice<'a, T>(&mut self, items: &'a [T], weights: &[f32]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let total: f32 = items
            .iter()
            .zip(weights.iter())
            .map(|(_, w)| w.max(0.0))
            .sum();
        if total <= 0.0 {
            return self.choice(items);
        }

        let r = self.next_f32() * total;
        let mut acc = 0.0;
        for (item, w) in items.iter().zip(weights.iter()) {
            acc += w.max(0.0);
            if r < acc {
                return Some(item);
            }
        }
        // Float accumulation can leave r just past the last bucket
        items.last()
    }
}
