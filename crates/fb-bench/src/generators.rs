//! Workload generators for benchmarks

use fb_core::SampleArity;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Seed every backend and effort row starts from
pub const DEFAULT_SEED: u64 = 0;

/// Reproducible source of input samples in [-0.5, 0.5)
///
/// The stream restarts from the seed on [`reseed`](Self::reseed), so two
/// runs that reseed before filling see identical input.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    seed: u64,
    rng: ChaCha8Rng,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from the fixed seed
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    #[inline]
    pub fn next_real(&mut self) -> f32 {
        self.rng.random::<f32>() - 0.5
    }

    /// Real component is drawn before the imaginary one
    #[inline]
    pub fn next_complex(&mut self) -> (f32, f32) {
        let re = self.next_real();
        let im = self.next_real();
        (re, im)
    }

    pub fn real_samples(&mut self, n: usize) -> Vec<f32> {
        (0..n).map(|_| self.next_real()).collect()
    }

    pub fn complex_samples(&mut self, n: usize) -> Vec<(f32, f32)> {
        (0..n).map(|_| self.next_complex()).collect()
    }

    /// `n` samples of `arity` components each, flattened in draw order
    pub fn samples(&mut self, n: usize, arity: SampleArity) -> Vec<f32> {
        self.real_samples(n.saturating_mul(arity.components()))
    }
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
