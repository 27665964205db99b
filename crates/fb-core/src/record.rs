//! Benchmark configuration and result records

use crate::{PlanEffort, TransformShape};

/// One measured run: which backend, which transform, how many iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub backend: &'static str,
    pub shape: TransformShape,
    pub iterations: u64,
    pub effort: PlanEffort,
}

impl BenchmarkConfig {
    pub fn new(
        backend: &'static str,
        shape: TransformShape,
        iterations: u64,
        effort: PlanEffort,
    ) -> Self {
        Self {
            backend,
            shape,
            iterations,
            effort,
        }
    }
}

/// Raw outcome of a measured run
///
/// Throughput and latency are derived on demand so they can never disagree
/// with the stored measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkResult {
    /// Wall-clock seconds spent in the timed loop
    pub elapsed_secs: f64,
    /// Iterations executed in the timed loop
    pub iterations: u64,
    /// Estimated floating-point operations across all iterations
    pub estimated_flops: f64,
}

impl BenchmarkResult {
    pub fn new(elapsed_secs: f64, iterations: u64, estimated_flops: f64) -> Self {
        Self {
            elapsed_secs,
            iterations,
            estimated_flops,
        }
    }

    /// Millions of estimated floating-point operations per second
    ///
    /// NaN when nothing was executed (`0 / 0`).
    pub fn mflops(&self) -> f64 {
        self.estimated_flops / (1_000_000.0 * self.elapsed_secs)
    }

    /// Microseconds per iteration
    ///
    /// Not finite when `iterations == 0`.
    pub fn us_per_iteration(&self) -> f64 {
        1_000_000.0 * self.elapsed_secs / self.iterations as f64
    }

    /// Whether both derived figures are usable numbers
    pub fn is_finite(&self) -> bool {
        self.mflops().is_finite() && self.us_per_iteration().is_finite()
    }
}
