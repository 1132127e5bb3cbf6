//! Injectable random source
//!
//! Every random decision in the simulation goes through [`RandomSource`], so
//! a seeded generator reproduces a run exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random numbers for the simulation
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform index into a collection of `len` items (`len > 0`)
    fn index(&mut self, len: usize) -> usize {
        let i = (self.next_f32() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Default seeded generator
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Useful for forcing a specific branch in offer generation or spawning.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}
