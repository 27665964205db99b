//! Reference backend: RustFFT for complex transforms, RealFFT for real ones
//!
//! Every plan gets a fresh planner, so no twiddle tables or cached
//! algorithms leak from one configuration into the next.
//!
//! `Measure` planning times each candidate over a few trial executions and
//! keeps the fastest. Complex candidates are the SIMD-dispatching
//! `FftPlanner` and the portable `FftPlannerScalar`; real candidates are
//! RealFFT's half-length algorithm and a full-length complex FFT on the real
//! input. `Estimate` takes the dispatching planner and RealFFT.
//!
//! Real executions copy their source into a plan-owned work buffer first
//! (RealFFT uses its input as scratch, the complex candidate needs complex
//! input). That O(N) copy runs inside the timed loop and is part of the
//! measured cost.

use std::sync::Arc;
use std::time::Instant;

use fb_core::{
    AlignedBuf, BenchError, BenchResult, Complex32, Direction, FftBackend, PlanEffort,
    TransformShape,
};
use realfft::{ComplexToReal, FftError, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftDirection, FftPlanner, FftPlannerScalar};

const NAME: &str = "RustFFT";

/// Trial executions per candidate during `Measure` planning
pub const DEFAULT_MEASURE_TRIALS: usize = 8;

/// Candidate planning strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Planner with runtime SIMD dispatch
    Dispatch,
    /// Portable scalar planner
    Scalar,
}

/// Candidate real-transform strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RealStrategy {
    /// RealFFT: complex FFT of half length plus post-processing
    HalfLength,
    /// Complex FFT of full length with a zero imaginary part
    FullComplex,
}

impl RealStrategy {
    const ALL: [RealStrategy; 2] = [RealStrategy::HalfLength, RealStrategy::FullComplex];
}

impl Strategy {
    const ALL: [Strategy; 2] = [Strategy::Dispatch, Strategy::Scalar];

    fn plan(self, n: usize, direction: FftDirection) -> Arc<dyn Fft<f32>> {
        match self {
            Strategy::Dispatch => FftPlanner::new().plan_fft(n, direction),
            Strategy::Scalar => FftPlannerScalar::new().plan_fft(n, direction),
        }
    }
}

/// RustFFT / RealFFT adapter
#[derive(Debug, Clone)]
pub struct RustFftBackend {
    measure_trials: usize,
}

impl Default for RustFftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RustFftBackend {
    pub fn new() -> Self {
        Self {
            measure_trials: DEFAULT_MEASURE_TRIALS,
        }
    }

    /// Set the number of trial executions per candidate for `Measure`
    pub fn with_measure_trials(mut self, trials: usize) -> Self {
        self.measure_trials = trials.max(1);
        self
    }

    pub fn measure_trials(&self) -> usize {
        self.measure_trials
    }

    /// Pick the complex FFT for one axis according to `effort`
    fn complex_fft(
        &self,
        n: usize,
        direction: FftDirection,
        effort: PlanEffort,
    ) -> BenchResult<(Arc<dyn Fft<f32>>, Strategy)> {
        if effort == PlanEffort::Estimate {
            return Ok((Strategy::Dispatch.plan(n, direction), Strategy::Dispatch));
        }

        let mut best: Option<(Arc<dyn Fft<f32>>, Strategy, f64)> = None;
        for strategy in Strategy::ALL {
            let fft = strategy.plan(n, direction);
            let mut buffer = trial_input(n)?;
            let mut scratch = AlignedBuf::<Complex32>::zeroed(fft.get_inplace_scratch_len())?;
            let secs = self.fastest_of(|| {
                fft.process_with_scratch(&mut buffer, &mut scratch);
                Ok(())
            })?;
            log::debug!("{NAME}: N={n} {strategy:?} trial {:.3} us", secs * 1e6);

            if best.as_ref().is_none_or(|(_, _, best_secs)| secs < *best_secs) {
                best = Some((fft, strategy, secs));
            }
        }

        let (fft, strategy, _) = best.ok_or_else(|| planning_error(
            TransformShape::Complex1d { n },
            "no candidate strategy",
        ))?;
        Ok((fft, strategy))
    }

    /// Fastest of `measure_trials` runs, in seconds
    fn fastest_of<F>(&self, mut run: F) -> BenchResult<f64>
    where
        F: FnMut() -> BenchResult<()>,
    {
        let mut fastest = f64::INFINITY;
        for _ in 0..self.measure_trials {
            let start = Instant::now();
            run()?;
            fastest = fastest.min(start.elapsed().as_secs_f64());
        }
        Ok(fastest)
    }

    /// Real candidates for `effort`; `Estimate` takes RealFFT untimed
    fn real_candidates(effort: PlanEffort) -> &'static [RealStrategy] {
        match effort {
            PlanEffort::Estimate => &[RealStrategy::HalfLength],
            PlanEffort::Measure => &RealStrategy::ALL,
        }
    }
}

/// Deterministic non-trivial input for planning trials
fn trial_input(n: usize) -> BenchResult<AlignedBuf<Complex32>> {
    let mut buffer = AlignedBuf::<Complex32>::zeroed(n)?;
    for (i, x) in buffer.iter_mut().enumerate() {
        *x = Complex32::new((i % 7) as f32 - 3.0, (i % 5) as f32 - 2.0);
    }
    Ok(buffer)
}

fn planning_error(shape: TransformShape, reason: impl Into<String>) -> BenchError {
    BenchError::Planning {
        backend: NAME,
        shape: shape.to_string(),
        reason: reason.into(),
    }
}

fn execution_error(reason: impl std::fmt::Display) -> BenchError {
    BenchError::Execution {
        backend: NAME,
        reason: reason.to_string(),
    }
}

fn check_len(what: &str, actual: usize, expected: usize) -> BenchResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(execution_error(format!(
            "{what} holds {actual} samples, plan expects {expected}"
        )))
    }
}

fn fft_direction(direction: Direction) -> FftDirection {
    match direction {
        Direction::Forward => FftDirection::Forward,
        Direction::Inverse => FftDirection::Inverse,
    }
}

/// 1-D complex plan
pub struct RustFftC2cPlan {
    fft: Arc<dyn Fft<f32>>,
    n: usize,
    scratch: AlignedBuf<Complex32>,
}

enum R2cEngine {
    HalfLength {
        fft: Arc<dyn RealToComplex<f32>>,
        work: AlignedBuf<f32>,
    },
    FullComplex {
        fft: Arc<dyn Fft<f32>>,
        work: AlignedBuf<Complex32>,
    },
}

/// 1-D real-to-complex plan
pub struct RustFftR2cPlan {
    engine: R2cEngine,
    n: usize,
    scratch: AlignedBuf<Complex32>,
}

impl RustFftR2cPlan {
    fn new(n: usize, strategy: RealStrategy) -> BenchResult<Self> {
        let (engine, scratch_len) = match strategy {
            RealStrategy::HalfLength => {
                let fft = RealFftPlanner::<f32>::new().plan_fft_forward(n);
                let scratch_len = fft.get_scratch_len();
                let work = AlignedBuf::zeroed(n)?;
                (R2cEngine::HalfLength { fft, work }, scratch_len)
            }
            RealStrategy::FullComplex => {
                let fft = Strategy::Dispatch.plan(n, FftDirection::Forward);
                let scratch_len = fft.get_inplace_scratch_len();
                let work = AlignedBuf::zeroed(n)?;
                (R2cEngine::FullComplex { fft, work }, scratch_len)
            }
        };
        Ok(Self {
            engine,
            n,
            scratch: AlignedBuf::zeroed(scratch_len)?,
        })
    }
}

enum C2rEngine {
    HalfLength {
        fft: Arc<dyn ComplexToReal<f32>>,
        work: AlignedBuf<Complex32>,
    },
    FullComplex {
        fft: Arc<dyn Fft<f32>>,
        work: AlignedBuf<Complex32>,
    },
}

/// 1-D complex-to-real plan
pub struct RustFftC2rPlan {
    engine: C2rEngine,
    n: usize,
    scratch: AlignedBuf<Complex32>,
}

impl RustFftC2rPlan {
    fn new(n: usize, strategy: RealStrategy) -> BenchResult<Self> {
        let (engine, scratch_len) = match strategy {
            RealStrategy::HalfLength => {
                let fft = RealFftPlanner::<f32>::new().plan_fft_inverse(n);
                let scratch_len = fft.get_scratch_len();
                let work = AlignedBuf::zeroed(n / 2 + 1)?;
                (C2rEngine::HalfLength { fft, work }, scratch_len)
            }
            RealStrategy::FullComplex => {
                let fft = Strategy::Dispatch.plan(n, FftDirection::Inverse);
                let scratch_len = fft.get_inplace_scratch_len();
                let work = AlignedBuf::zeroed(n)?;
                (C2rEngine::FullComplex { fft, work }, scratch_len)
            }
        };
        Ok(Self {
            engine,
            n,
            scratch: AlignedBuf::zeroed(scratch_len)?,
        })
    }
}

/// 2-D plan: row transforms, transpose, column transforms, transpose back
pub struct RustFft2dPlan {
    rows: Arc<dyn Fft<f32>>,
    cols: Arc<dyn Fft<f32>>,
    nx: usize,
    ny: usize,
    transposed: AlignedBuf<Complex32>,
    scratch: AlignedBuf<Complex32>,
}

impl FftBackend for RustFftBackend {
    type Complex = AlignedBuf<Complex32>;
    type C2cPlan = RustFftC2cPlan;
    type R2cPlan = RustFftR2cPlan;
    type C2rPlan = RustFftC2rPlan;
    type Plan2d = RustFft2dPlan;

    fn name(&self) -> &'static str {
        NAME
    }

    fn efforts(&self) -> &'static [PlanEffort] {
        &[PlanEffort::Estimate, PlanEffort::Measure]
    }

    fn spectrum_len(&self, n: usize) -> usize {
        n / 2 + 1
    }

    fn allocate_complex(&self, len: usize) -> BenchResult<Self::Complex> {
        AlignedBuf::zeroed(len)
    }

    fn plan_1d_c2c(
        &mut self,
        n: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::C2cPlan> {
        if n == 0 {
            return Err(planning_error(TransformShape::Complex1d { n }, "empty transform"));
        }

        let (fft, strategy) = self.complex_fft(n, fft_direction(direction), effort)?;
        let scratch = AlignedBuf::zeroed(fft.get_immutable_scratch_len())?;
        log::debug!("{NAME}: planned 1-D C2C N={n} ({effort}, {strategy:?})");

        Ok(RustFftC2cPlan { fft, n, scratch })
    }

    fn plan_1d_r2c(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::R2cPlan> {
        let shape = TransformShape::RealRoundTrip { n };
        if n == 0 {
            return Err(planning_error(shape, "empty transform"));
        }

        let mut spectrum = AlignedBuf::<Complex32>::zeroed(self.spectrum_len(n))?;
        let input: Vec<f32> = trial_input(n)?.iter().map(|x| x.re).collect();

        let mut best: Option<(RustFftR2cPlan, RealStrategy, f64)> = None;
        for &strategy in Self::real_candidates(effort) {
            let mut plan = RustFftR2cPlan::new(n, strategy)?;
            let secs = match effort {
                PlanEffort::Estimate => 0.0,
                PlanEffort::Measure => {
                    self.fastest_of(|| self.execute_r2c(&mut plan, &mut spectrum, &input))?
                }
            };
            log::debug!("{NAME}: R2C N={n} {strategy:?} trial {:.3} us", secs * 1e6);

            if best.as_ref().is_none_or(|(_, _, best_secs)| secs < *best_secs) {
                best = Some((plan, strategy, secs));
            }
        }

        let (plan, strategy, _) =
            best.ok_or_else(|| planning_error(shape, "no candidate strategy"))?;
        log::debug!("{NAME}: planned 1-D R2C N={n} ({effort}, {strategy:?})");
        Ok(plan)
    }

    fn plan_1d_c2r(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::C2rPlan> {
        let shape = TransformShape::RealRoundTrip { n };
        if n == 0 {
            return Err(planning_error(shape, "empty transform"));
        }

        let spectrum = trial_input(self.spectrum_len(n))?;
        let mut output = AlignedBuf::<f32>::zeroed(n)?;

        let mut best: Option<(RustFftC2rPlan, RealStrategy, f64)> = None;
        for &strategy in Self::real_candidates(effort) {
            let mut plan = RustFftC2rPlan::new(n, strategy)?;
            let secs = match effort {
                PlanEffort::Estimate => 0.0,
                PlanEffort::Measure => {
                    self.fastest_of(|| self.execute_c2r(&mut plan, &mut output, &spectrum))?
                }
            };
            log::debug!("{NAME}: C2R N={n} {strategy:?} trial {:.3} us", secs * 1e6);

            if best.as_ref().is_none_or(|(_, _, best_secs)| secs < *best_secs) {
                best = Some((plan, strategy, secs));
            }
        }

        let (plan, strategy, _) =
            best.ok_or_else(|| planning_error(shape, "no candidate strategy"))?;
        log::debug!("{NAME}: planned 1-D C2R N={n} ({effort}, {strategy:?})");
        Ok(plan)
    }

    fn plan_2d_c2c(
        &mut self,
        nx: usize,
        ny: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::Plan2d> {
        if nx == 0 || ny == 0 {
            return Err(planning_error(TransformShape::Complex2d { nx, ny }, "empty transform"));
        }

        let direction = fft_direction(direction);
        let (rows, row_strategy) = self.complex_fft(nx, direction, effort)?;
        let (cols, col_strategy) = self.complex_fft(ny, direction, effort)?;
        let scratch_len = rows
            .get_immutable_scratch_len()
            .max(cols.get_inplace_scratch_len());
        log::debug!(
            "{NAME}: planned 2-D C2C {nx}x{ny} ({effort}, rows {row_strategy:?}, cols {col_strategy:?})"
        );

        Ok(RustFft2dPlan {
            rows,
            cols,
            nx,
            ny,
            transposed: AlignedBuf::zeroed(nx * ny)?,
            scratch: AlignedBuf::zeroed(scratch_len)?,
        })
    }

    fn execute_c2c(
        &self,
        plan: &mut Self::C2cPlan,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()> {
        check_len("source", src.len(), plan.n)?;
        check_len("destination", dst.len(), plan.n)?;
        plan.fft
            .process_immutable_with_scratch(src, dst, &mut plan.scratch);
        Ok(())
    }

    fn execute_r2c(
        &self,
        plan: &mut Self::R2cPlan,
        dst: &mut Self::Complex,
        src: &[f32],
    ) -> BenchResult<()> {
        check_len("source", src.len(), plan.n)?;
        check_len("destination", dst.len(), self.spectrum_len(plan.n))?;

        match &mut plan.engine {
            R2cEngine::HalfLength { fft, work } => {
                work.copy_from_slice(src);
                fft.process_with_scratch(work, dst, &mut plan.scratch)
                    .map_err(execution_error)
            }
            R2cEngine::FullComplex { fft, work } => {
                for (w, &x) in work.iter_mut().zip(src) {
                    *w = Complex32::new(x, 0.0);
                }
                fft.process_with_scratch(work, &mut plan.scratch);
                let bins = dst.len();
                dst.copy_from_slice(&work[..bins]);
                Ok(())
            }
        }
    }

    fn execute_c2r(
        &self,
        plan: &mut Self::C2rPlan,
        dst: &mut [f32],
        src: &Self::Complex,
    ) -> BenchResult<()> {
        let n = plan.n;
        check_len("source", src.len(), self.spectrum_len(n))?;
        check_len("destination", dst.len(), n)?;

        match &mut plan.engine {
            C2rEngine::HalfLength { fft, work } => {
                work.copy_from_slice(src);
                match fft.process_with_scratch(work, dst, &mut plan.scratch) {
                    // Non-zero imaginary DC/Nyquist parts are ignored; the transform still ran.
                    Ok(()) | Err(FftError::InputValues(..)) => Ok(()),
                    Err(err) => Err(execution_error(err)),
                }
            }
            C2rEngine::FullComplex { fft, work } => {
                // Rebuild the Hermitian spectrum; imaginary DC/Nyquist parts only
                // reach the discarded imaginary output.
                let bins = src.len();
                work[..bins].copy_from_slice(src);
                for k in bins..n {
                    work[k] = src[n - k].conj();
                }
                fft.process_with_scratch(work, &mut plan.scratch);
                for (out, w) in dst.iter_mut().zip(work.iter()) {
                    *out = w.re;
                }
                Ok(())
            }
        }
    }

    fn execute_2d(
        &self,
        plan: &mut Self::Plan2d,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()> {
        let RustFft2dPlan {
            rows,
            cols,
            nx,
            ny,
            transposed,
            scratch,
        } = plan;
        check_len("source", src.len(), *nx * *ny)?;
        check_len("destination", dst.len(), *nx * *ny)?;

        rows.process_immutable_with_scratch(src, dst, scratch);
        transpose::transpose(dst.as_slice(), transposed.as_mut_slice(), *nx, *ny);
        cols.process_with_scratch(transposed, scratch);
        transpose::transpose(transposed.as_slice(), dst.as_mut_slice(), *ny, *nx);
        Ok(())
    }
}
