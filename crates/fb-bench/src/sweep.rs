//! Full size sweep and single explicit configurations

use std::io::Write;

use fb_backend::{PhastFtBackend, RustFftBackend};
use fb_core::{BenchResult, BenchmarkConfig, FftBackend, TransformShape};

use crate::{BenchmarkRunner, DEFAULT_SEED, ReportRow, WorkloadGenerator, iterations_for};

/// Samples processed per configuration in the full sweep
pub const WORK_BUDGET: u64 = 400_000_000;

/// Sweep configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Samples per configuration; iterations = budget / sample count
    pub work_budget: u64,

    /// Smallest 1-D length (doubled up to `max_size_1d`)
    pub min_size_1d: usize,
    pub max_size_1d: usize,

    /// Smallest 2-D dimension, applied to both Nx and Ny
    pub min_size_2d: usize,
    pub max_size_2d: usize,

    /// Workload seed shared by every backend and effort row
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            work_budget: WORK_BUDGET,
            min_size_1d: 4,
            max_size_1d: 128 * 1024,
            min_size_2d: 4,
            max_size_2d: 1024,
            seed: DEFAULT_SEED,
        }
    }
}

impl SweepConfig {
    /// Small budget and ranges, finishes in well under a second
    pub fn quick() -> Self {
        Self {
            work_budget: 4096,
            max_size_1d: 64,
            max_size_2d: 16,
            ..Default::default()
        }
    }

    pub fn with_work_budget(mut self, budget: u64) -> Self {
        self.work_budget = budget;
        self
    }

    pub fn with_1d_range(mut self, min: usize, max: usize) -> Self {
        self.min_size_1d = min;
        self.max_size_1d = max;
        self
    }

    pub fn with_2d_range(mut self, min: usize, max: usize) -> Self {
        self.min_size_2d = min;
        self.max_size_2d = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Powers-of-two progression of 1-D lengths
    pub fn sizes_1d(&self) -> impl Iterator<Item = usize> + use<> {
        doublings(self.min_size_1d, self.max_size_1d)
    }

    /// Powers-of-two progression of 2-D dimensions
    pub fn sizes_2d(&self) -> impl Iterator<Item = usize> + use<> {
        doublings(self.min_size_2d, self.max_size_2d)
    }
}

fn doublings(min: usize, max: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(min.max(1)), |&n| n.checked_mul(2)).take_while(move |&n| n <= max)
}

/// What a sweep run measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Every 1-D length, then every 2-D size pair
    Full,
    /// Complex and real round trip at one length
    Single1d { iterations: u64, n: usize },
    /// 2-D complex at one size pair
    Single2d { iterations: u64, nx: usize, ny: usize },
}

/// Drives both backends through a sweep and writes report rows to `out`
pub struct SweepDriver<W: Write> {
    config: SweepConfig,
    runner: BenchmarkRunner,
    reference: RustFftBackend,
    under_test: PhastFtBackend,
    out: W,
}

impl<W: Write> SweepDriver<W> {
    pub fn new(config: SweepConfig, out: W) -> Self {
        let runner = BenchmarkRunner::new(WorkloadGenerator::new(config.seed));
        Self {
            config,
            runner,
            reference: RustFftBackend::new(),
            under_test: PhastFtBackend::new(),
            out,
        }
    }

    /// Replace the reference backend, e.g. to change its measure trials
    pub fn with_reference(mut self, reference: RustFftBackend) -> Self {
        self.reference = reference;
        self
    }

    pub fn run(&mut self, mode: SweepMode) -> BenchResult<()> {
        match mode {
            SweepMode::Full => self.run_full(),
            SweepMode::Single1d { iterations, n } => self.run_1d(n, iterations),
            SweepMode::Single2d { iterations, nx, ny } => {
                self.run_shape(TransformShape::Complex2d { nx, ny }, iterations)
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn run_full(&mut self) -> BenchResult<()> {
        log::info!(
            "Full sweep: 1-D {}..={}, 2-D {}..={}, budget {}",
            self.config.min_size_1d,
            self.config.max_size_1d,
            self.config.min_size_2d,
            self.config.max_size_2d,
            self.config.work_budget
        );

        writeln!(self.out)?;
        writeln!(self.out, "1D benchmarks ...")?;
        for n in self.config.sizes_1d() {
            let iterations = iterations_for(self.config.work_budget, TransformShape::Complex1d { n });
            self.run_1d(n, iterations)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "2D benchmarks ...")?;
        for ny in self.config.sizes_2d() {
            for nx in self.config.sizes_2d() {
                let shape = TransformShape::Complex2d { nx, ny };
                self.run_shape(shape, iterations_for(self.config.work_budget, shape))?;
            }
        }
        Ok(())
    }

    fn run_1d(&mut self, n: usize, iterations: u64) -> BenchResult<()> {
        self.run_shape(TransformShape::Complex1d { n }, iterations)?;
        self.run_shape(TransformShape::RealRoundTrip { n }, iterations)
    }

    /// Measure every backend and effort row of one shape, then print them
    fn run_shape(&mut self, shape: TransformShape, iterations: u64) -> BenchResult<()> {
        let mut rows = Vec::new();
        measure(&mut self.runner, &mut self.reference, shape, iterations, &mut rows)?;
        measure(&mut self.runner, &mut self.under_test, shape, iterations, &mut rows)?;

        for row in &rows {
            writeln!(self.out, "{row}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn measure<B: FftBackend>(
    runner: &mut BenchmarkRunner,
    backend: &mut B,
    shape: TransformShape,
    iterations: u64,
    rows: &mut Vec<ReportRow>,
) -> BenchResult<()> {
    let efforts = backend.efforts();
    for &effort in efforts {
        let config = BenchmarkConfig::new(backend.name(), shape, iterations, effort);
        let result = runner.run(backend, &config)?;
        let effort = (efforts.len() > 1).then_some(effort);
        rows.push(ReportRow::new(backend.name(), effort, shape, result));
    }
    Ok(())
}
