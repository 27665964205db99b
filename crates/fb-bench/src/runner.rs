//! Measured execution of one benchmark configuration

use std::hint::black_box;

use fb_core::{
    BenchResult, BenchmarkConfig, BenchmarkResult, ComplexBuffer, Direction, FftBackend,
    TransformShape,
};

use crate::{Clock, WorkloadGenerator, flop_estimate};

/// Runs benchmark configurations against any [`FftBackend`]
///
/// Owns the workload generator, which is reseeded before every run so all
/// backends and effort rows of a configuration see the same input.
#[derive(Debug)]
pub struct BenchmarkRunner {
    generator: WorkloadGenerator,
    clock: Clock,
}

impl BenchmarkRunner {
    pub fn new(generator: WorkloadGenerator) -> Self {
        Self {
            generator,
            clock: Clock::new(),
        }
    }

    pub fn generator(&self) -> &WorkloadGenerator {
        &self.generator
    }

    /// Allocate, fill, plan, time `config.iterations` executions, destroy
    ///
    /// Only the execution loop is timed. Any failure aborts the run; buffers
    /// and plans are released on every path.
    pub fn run<B: FftBackend>(
        &mut self,
        backend: &mut B,
        config: &BenchmarkConfig,
    ) -> BenchResult<BenchmarkResult> {
        config.shape.validate()?;
        log::debug!(
            "{}: {} x{} ({})",
            backend.name(),
            config.shape,
            config.iterations,
            config.effort
        );

        let elapsed_secs = match config.shape {
            TransformShape::Complex1d { n } => self.time_c2c(backend, n, config)?,
            TransformShape::RealRoundTrip { n } => self.time_round_trip(backend, n, config)?,
            TransformShape::Complex2d { nx, ny } => self.time_2d(backend, nx, ny, config)?,
        };

        Ok(BenchmarkResult::new(
            elapsed_secs,
            config.iterations,
            config.iterations as f64 * flop_estimate(config.shape),
        ))
    }

    /// Reseed and draw the input of `shape`, flattened
    fn workload(&mut self, shape: TransformShape) -> Vec<f32> {
        self.generator.reseed();
        self.generator.samples(shape.sample_count(), shape.arity())
    }

    fn filled_complex<B: FftBackend>(
        &mut self,
        backend: &B,
        shape: TransformShape,
    ) -> BenchResult<B::Complex> {
        let values = self.workload(shape);
        let mut buf = backend.allocate_complex(shape.sample_count())?;
        let mut pairs = values.chunks_exact(2);
        buf.fill_with(|| pairs.next().map_or((0.0, 0.0), |p| (p[0], p[1])));
        Ok(buf)
    }

    fn time_c2c<B: FftBackend>(
        &mut self,
        backend: &mut B,
        n: usize,
        config: &BenchmarkConfig,
    ) -> BenchResult<f64> {
        let src = self.filled_complex(backend, config.shape)?;
        let mut dst = backend.allocate_complex(n)?;
        let mut plan = backend.plan_1d_c2c(n, Direction::Forward, config.effort)?;

        let start = self.clock.now();
        for _ in 0..config.iterations {
            backend.execute_c2c(&mut plan, &mut dst, &src)?;
        }
        let elapsed = self.clock.now() - start;
        black_box(&dst);

        backend.destroy(plan);
        Ok(elapsed)
    }

    fn time_round_trip<B: FftBackend>(
        &mut self,
        backend: &mut B,
        n: usize,
        config: &BenchmarkConfig,
    ) -> BenchResult<f64> {
        let values = self.workload(config.shape);
        let mut src = backend.allocate_real(n)?;
        src.copy_from_slice(&values);
        let mut spectrum = backend.allocate_complex(backend.spectrum_len(n))?;
        let mut out = backend.allocate_real(n)?;

        let mut forward = backend.plan_1d_r2c(n, config.effort)?;
        let mut inverse = backend.plan_1d_c2r(n, config.effort)?;

        let start = self.clock.now();
        for _ in 0..config.iterations {
            backend.execute_r2c(&mut forward, &mut spectrum, &src)?;
            backend.execute_c2r(&mut inverse, &mut out, &spectrum)?;
        }
        let elapsed = self.clock.now() - start;
        black_box(&out);

        backend.destroy(forward);
        backend.destroy(inverse);
        Ok(elapsed)
    }

    fn time_2d<B: FftBackend>(
        &mut self,
        backend: &mut B,
        nx: usize,
        ny: usize,
        config: &BenchmarkConfig,
    ) -> BenchResult<f64> {
        let len = config.shape.sample_count();
        let src = self.filled_complex(backend, config.shape)?;
        let mut dst = backend.allocate_complex(len)?;
        let mut plan = backend.plan_2d_c2c(nx, ny, Direction::Forward, config.effort)?;

        let start = self.clock.now();
        for _ in 0..config.iterations {
            backend.execute_2d(&mut plan, &mut dst, &src)?;
        }
        let elapsed = self.clock.now() - start;
        black_box(&dst);

        backend.destroy(plan);
        Ok(elapsed)
    }
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new(WorkloadGenerator::default())
    }
}
