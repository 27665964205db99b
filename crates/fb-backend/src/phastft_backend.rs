//! Library under test: PhastFT
//!
//! PhastFT transforms split-complex data (separate real and imaginary arrays)
//! in place, for power-of-two lengths only. The adapter copies the source into
//! the destination and transforms the destination, so sources stay intact.
//!
//! Real transforms use the packed `N/2` convention: the `N` real samples are
//! viewed as `N/2` complex samples, transformed at half length, and split
//! into `N/2` bins. Bin 0 holds the DC term in its real part and the Nyquist
//! term in its imaginary part.

use std::f64::consts::PI;

use fb_core::{
    AlignedBuf, BenchError, BenchResult, Direction, FftBackend, PlanEffort, SplitComplex,
    TransformShape,
};
use phastft::fft_32_with_opts_and_plan;
use phastft::options::Options;
use phastft::planner::{Direction as PhastDirection, Planner32};

const NAME: &str = "PhastFT";

/// PhastFT adapter
#[derive(Debug, Clone, Default)]
pub struct PhastFtBackend;

impl PhastFtBackend {
    pub fn new() -> Self {
        Self
    }
}

fn planning_error(shape: TransformShape, reason: impl Into<String>) -> BenchError {
    BenchError::Planning {
        backend: NAME,
        shape: shape.to_string(),
        reason: reason.into(),
    }
}

fn check_len(what: &str, actual: usize, expected: usize) -> BenchResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(BenchError::Execution {
            backend: NAME,
            reason: format!("{what} holds {actual} samples, plan expects {expected}"),
        })
    }
}

/// Kernel behind a [`Transform1d`]
///
/// PhastFT's planner only builds twiddles above 4 points, so shorter lengths
/// run on fixed butterflies.
enum Kernel {
    Identity,
    Radix2,
    Radix4,
    Planned { planner: Planner32, opts: Options },
}

/// One in-place transform of fixed length and direction
///
/// Inverse transforms are scaled by `1/n` on every kernel, matching PhastFT.
struct Transform1d {
    kernel: Kernel,
    inverse: bool,
    n: usize,
}

impl Transform1d {
    fn new(n: usize, direction: Direction, shape: TransformShape) -> BenchResult<Self> {
        if !n.is_power_of_two() {
            return Err(planning_error(
                shape,
                format!("length {n} is not a power of two"),
            ));
        }

        let inverse = direction == Direction::Inverse;
        let kernel = match n {
            1 => Kernel::Identity,
            2 => Kernel::Radix2,
            4 => Kernel::Radix4,
            _ => {
                let direction = if inverse {
                    PhastDirection::Reverse
                } else {
                    PhastDirection::Forward
                };
                Kernel::Planned {
                    planner: Planner32::new(n, direction),
                    opts: Options::guess_options(n),
                }
            }
        };
        Ok(Self { kernel, inverse, n })
    }

    #[inline]
    fn run(&self, re: &mut [f32], im: &mut [f32]) {
        match &self.kernel {
            Kernel::Identity => {}
            Kernel::Radix2 => {
                radix2(re, im);
                self.normalize(re, im);
            }
            Kernel::Radix4 => {
                radix4(re, im, self.inverse);
                self.normalize(re, im);
            }
            Kernel::Planned { planner, opts } => fft_32_with_opts_and_plan(re, im, opts, planner),
        }
    }

    fn normalize(&self, re: &mut [f32], im: &mut [f32]) {
        if self.inverse {
            let scale = 1.0 / self.n as f32;
            re.iter_mut().chain(im.iter_mut()).for_each(|x| *x *= scale);
        }
    }

    /// Transform every consecutive block of `n` samples
    fn run_batched(&self, re: &mut [f32], im: &mut [f32]) {
        for (re, im) in re.chunks_exact_mut(self.n).zip(im.chunks_exact_mut(self.n)) {
            self.run(re, im);
        }
    }
}

fn radix2(re: &mut [f32], im: &mut [f32]) {
    let (a_re, a_im) = (re[0], im[0]);
    let (b_re, b_im) = (re[1], im[1]);
    re[0] = a_re + b_re;
    im[0] = a_im + b_im;
    re[1] = a_re - b_re;
    im[1] = a_im - b_im;
}

fn radix4(re: &mut [f32], im: &mut [f32], inverse: bool) {
    let (t0_re, t0_im) = (re[0] + re[2], im[0] + im[2]);
    let (t1_re, t1_im) = (re[0] - re[2], im[0] - im[2]);
    let (t2_re, t2_im) = (re[1] + re[3], im[1] + im[3]);
    let (t3_re, t3_im) = (re[1] - re[3], im[1] - im[3]);

    // t3 rotated by -i (forward) or +i (inverse)
    let (r_re, r_im) = if inverse {
        (-t3_im, t3_re)
    } else {
        (t3_im, -t3_re)
    };

    re[0] = t0_re + t2_re;
    im[0] = t0_im + t2_im;
    re[1] = t1_re + r_re;
    im[1] = t1_im + r_im;
    re[2] = t0_re - t2_re;
    im[2] = t0_im - t2_im;
    re[3] = t1_re - r_re;
    im[3] = t1_im - r_im;
}

/// Twiddles `e^(-2 pi i k / n)` for `k` in `0..n/2`
struct HalfTwiddles {
    re: AlignedBuf<f32>,
    im: AlignedBuf<f32>,
}

impl HalfTwiddles {
    fn new(n: usize) -> BenchResult<Self> {
        let half = n / 2;
        let mut re = AlignedBuf::zeroed(half)?;
        let mut im = AlignedBuf::zeroed(half)?;
        for k in 0..half {
            let angle = 2.0 * PI * k as f64 / n as f64;
            re[k] = angle.cos() as f32;
            im[k] = -angle.sin() as f32;
        }
        Ok(Self { re, im })
    }
}

/// Half-length transform behind a packed real plan
fn real_half_transform(n: usize, direction: Direction) -> BenchResult<Transform1d> {
    let shape = TransformShape::RealRoundTrip { n };
    if n < 2 || !n.is_power_of_two() {
        return Err(planning_error(
            shape,
            format!("real length {n} is not a power of two of at least 2"),
        ));
    }
    Transform1d::new(n / 2, direction, shape)
}

/// 1-D complex plan
pub struct PhastFtC2cPlan {
    transform: Transform1d,
}

/// 1-D real-to-complex plan (packed output)
pub struct PhastFtR2cPlan {
    half: Transform1d,
    twiddles: HalfTwiddles,
    work: SplitComplex,
}

/// 1-D complex-to-real plan (packed input)
pub struct PhastFtC2rPlan {
    half: Transform1d,
    twiddles: HalfTwiddles,
    work: SplitComplex,
}

/// 2-D plan: rows, transpose, columns, transpose back
pub struct PhastFt2dPlan {
    rows: Transform1d,
    cols: Transform1d,
    transposed: SplitComplex,
}

impl FftBackend for PhastFtBackend {
    type Complex = SplitComplex;
    type C2cPlan = PhastFtC2cPlan;
    type R2cPlan = PhastFtR2cPlan;
    type C2rPlan = PhastFtC2rPlan;
    type Plan2d = PhastFt2dPlan;

    fn name(&self) -> &'static str {
        NAME
    }

    fn efforts(&self) -> &'static [PlanEffort] {
        &[PlanEffort::Estimate]
    }

    fn spectrum_len(&self, n: usize) -> usize {
        n / 2
    }

    fn allocate_complex(&self, len: usize) -> BenchResult<Self::Complex> {
        SplitComplex::zeroed(len)
    }

    fn plan_1d_c2c(
        &mut self,
        n: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::C2cPlan> {
        let transform = Transform1d::new(n, direction, TransformShape::Complex1d { n })?;
        log::debug!("{NAME}: planned 1-D C2C N={n} ({effort})");
        Ok(PhastFtC2cPlan { transform })
    }

    fn plan_1d_r2c(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::R2cPlan> {
        let half = real_half_transform(n, Direction::Forward)?;
        log::debug!("{NAME}: planned 1-D R2C N={n} ({effort})");
        Ok(PhastFtR2cPlan {
            half,
            twiddles: HalfTwiddles::new(n)?,
            work: SplitComplex::zeroed(n / 2)?,
        })
    }

    fn plan_1d_c2r(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::C2rPlan> {
        let half = real_half_transform(n, Direction::Inverse)?;
        log::debug!("{NAME}: planned 1-D C2R N={n} ({effort})");
        Ok(PhastFtC2rPlan {
            half,
            twiddles: HalfTwiddles::new(n)?,
            work: SplitComplex::zeroed(n / 2)?,
        })
    }

    fn plan_2d_c2c(
        &mut self,
        nx: usize,
        ny: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::Plan2d> {
        let shape = TransformShape::Complex2d { nx, ny };
        let rows = Transform1d::new(nx, direction, shape)?;
        let cols = Transform1d::new(ny, direction, shape)?;
        log::debug!("{NAME}: planned 2-D C2C {nx}x{ny} ({effort})");
        Ok(PhastFt2dPlan {
            rows,
            cols,
            transposed: SplitComplex::zeroed(nx * ny)?,
        })
    }

    fn execute_c2c(
        &self,
        plan: &mut Self::C2cPlan,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()> {
        let n = plan.transform.n;
        check_len("source", src.re.len(), n)?;
        check_len("destination", dst.re.len(), n)?;

        dst.copy_from(src);
        plan.transform.run(&mut dst.re, &mut dst.im);
        Ok(())
    }

    fn execute_r2c(
        &self,
        plan: &mut Self::R2cPlan,
        dst: &mut Self::Complex,
        src: &[f32],
    ) -> BenchResult<()> {
        let PhastFtR2cPlan {
            half,
            twiddles,
            work,
        } = plan;
        let m = half.n;
        check_len("source", src.len(), 2 * m)?;
        check_len("destination", dst.re.len(), m)?;

        for (j, pair) in src.chunks_exact(2).enumerate() {
            work.re[j] = pair[0];
            work.im[j] = pair[1];
        }
        half.run(&mut work.re, &mut work.im);

        let (z0_re, z0_im) = (work.re[0], work.im[0]);
        dst.re[0] = z0_re + z0_im;
        dst.im[0] = z0_re - z0_im;

        for k in 1..m {
            let (z_re, z_im) = (work.re[k], work.im[k]);
            // conj(Z[m - k])
            let (c_re, c_im) = (work.re[m - k], -work.im[m - k]);

            let even_re = 0.5 * (z_re + c_re);
            let even_im = 0.5 * (z_im + c_im);
            let odd_re = 0.5 * (z_im - c_im);
            let odd_im = -0.5 * (z_re - c_re);

            let (w_re, w_im) = (twiddles.re[k], twiddles.im[k]);
            dst.re[k] = even_re + w_re * odd_re - w_im * odd_im;
            dst.im[k] = even_im + w_re * odd_im + w_im * odd_re;
        }
        Ok(())
    }

    fn execute_c2r(
        &self,
        plan: &mut Self::C2rPlan,
        dst: &mut [f32],
        src: &Self::Complex,
    ) -> BenchResult<()> {
        let PhastFtC2rPlan {
            half,
            twiddles,
            work,
        } = plan;
        let m = half.n;
        check_len("source", src.re.len(), m)?;
        check_len("destination", dst.len(), 2 * m)?;

        // Unpacked bin k of the half spectrum, k in 0..=m
        let bin = |k: usize| -> (f32, f32) {
            match k {
                0 => (src.re[0], 0.0),
                k if k == m => (src.im[0], 0.0),
                k => (src.re[k], src.im[k]),
            }
        };

        for k in 0..m {
            let (x_re, x_im) = bin(k);
            let (y_re, y_im) = bin(m - k);

            // X[k] + conj(X[m - k]) and X[k] - conj(X[m - k])
            let (s_re, s_im) = (x_re + y_re, x_im - y_im);
            let (d_re, d_im) = (x_re - y_re, x_im + y_im);

            // conj(w) * d
            let (w_re, w_im) = (twiddles.re[k], twiddles.im[k]);
            let p_re = w_re * d_re + w_im * d_im;
            let p_im = w_re * d_im - w_im * d_re;

            work.re[k] = s_re - p_im;
            work.im[k] = s_im + p_re;
        }
        half.run(&mut work.re, &mut work.im);

        for (j, pair) in dst.chunks_exact_mut(2).enumerate() {
            pair[0] = work.re[j];
            pair[1] = work.im[j];
        }
        Ok(())
    }

    fn execute_2d(
        &self,
        plan: &mut Self::Plan2d,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()> {
        let PhastFt2dPlan {
            rows,
            cols,
            transposed,
        } = plan;
        let (nx, ny) = (rows.n, cols.n);
        check_len("source", src.re.len(), nx * ny)?;
        check_len("destination", dst.re.len(), nx * ny)?;

        dst.copy_from(src);
        rows.run_batched(&mut dst.re, &mut dst.im);

        transpose::transpose(dst.re.as_slice(), transposed.re.as_mut_slice(), nx, ny);
        transpose::transpose(dst.im.as_slice(), transposed.im.as_mut_slice(), nx, ny);
        cols.run_batched(&mut transposed.re, &mut transposed.im);
        transpose::transpose(transposed.re.as_slice(), dst.re.as_mut_slice(), ny, nx);
        transpose::transpose(transposed.im.as_slice(), dst.im.as_mut_slice(), ny, nx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RustFftBackend;
    use approx::assert_relative_eq;
    use fb_core::ComplexBuffer;

    fn signal(len: usize) -> Vec<(f32, f32)> {
        (0..len)
            .map(|i| {
                let t = i as f32 + 1.0;
                ((0.73 * t).sin() * 0.5, (0.29 * t).cos() * 0.5)
            })
            .collect()
    }

    fn fill<B: ComplexBuffer>(buf: &mut B, values: &[(f32, f32)]) {
        let mut it = values.iter().copied();
        buf.fill_with(|| it.next().unwrap_or((0.0, 0.0)));
    }

    fn assert_bins_match<A: ComplexBuffer, B: ComplexBuffer>(a: &A, b: &B, len: usize) {
        for k in 0..len {
            let (x, y) = (a.sample(k).unwrap(), b.sample(k).unwrap());
            assert_relative_eq!(x.re, y.re, epsilon = 1e-4);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_identity_and_sizing() {
        let backend = PhastFtBackend::new();
        assert_eq!(backend.name(), "PhastFT");
        assert_eq!(backend.efforts(), &[PlanEffort::Estimate]);
        assert_eq!(backend.spectrum_len(64), 32);
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        let mut backend = PhastFtBackend::new();
        let err = backend
            .plan_1d_c2c(12, Direction::Forward, PlanEffort::Estimate)
            .err()
            .unwrap();
        assert!(matches!(err, BenchError::Planning { backend: "PhastFT", .. }));
        assert!(backend.plan_1d_c2c(0, Direction::Forward, PlanEffort::Estimate).is_err());
        assert!(backend.plan_1d_r2c(5, PlanEffort::Estimate).is_err());
        assert!(backend.plan_1d_c2r(6, PlanEffort::Estimate).is_err());
        assert!(backend
            .plan_2d_c2c(8, 6, Direction::Forward, PlanEffort::Estimate)
            .is_err());
    }

    #[test]
    fn test_c2c_impulse_is_flat() {
        let mut backend = PhastFtBackend::new();
        let mut plan = backend
            .plan_1d_c2c(16, Direction::Forward, PlanEffort::Estimate)
            .unwrap();
        let mut src = backend.allocate_complex(16).unwrap();
        src.re[0] = 1.0;
        let mut dst = backend.allocate_complex(16).unwrap();

        backend.execute_c2c(&mut plan, &mut dst, &src).unwrap();
        for k in 0..16 {
            let bin = dst.sample(k).unwrap();
            assert_relative_eq!(bin.re, 1.0, epsilon = 1e-5);
            assert_relative_eq!(bin.im, 0.0, epsilon = 1e-5);
        }
        assert_eq!(src.re[0], 1.0);
        assert!(src.re[1..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_small_c2c_matches_rustfft() {
        let mut reference = RustFftBackend::new();
        let mut backend = PhastFtBackend::new();

        for n in [2, 4, 8] {
            let values = signal(n);

            let mut src_a = reference.allocate_complex(n).unwrap();
            fill(&mut src_a, &values);
            let mut dst_a = reference.allocate_complex(n).unwrap();
            let mut plan_a = reference
                .plan_1d_c2c(n, Direction::Forward, PlanEffort::Estimate)
                .unwrap();
            reference.execute_c2c(&mut plan_a, &mut dst_a, &src_a).unwrap();

            let mut src_b = backend.allocate_complex(n).unwrap();
            fill(&mut src_b, &values);
            let mut dst_b = backend.allocate_complex(n).unwrap();
            let mut plan_b = backend
                .plan_1d_c2c(n, Direction::Forward, PlanEffort::Estimate)
                .unwrap();
            backend.execute_c2c(&mut plan_b, &mut dst_b, &src_b).unwrap();

            assert_bins_match(&dst_a, &dst_b, n);
        }
    }

    #[test]
    fn test_c2c_inverse_is_normalized() {
        let mut backend = PhastFtBackend::new();

        for n in [2, 4, 8, 16] {
            let mut src = backend.allocate_complex(n).unwrap();
            fill(&mut src, &signal(n));
            let mut spectrum = backend.allocate_complex(n).unwrap();
            let mut back = backend.allocate_complex(n).unwrap();

            let mut forward = backend
                .plan_1d_c2c(n, Direction::Forward, PlanEffort::Estimate)
                .unwrap();
            let mut inverse = backend
                .plan_1d_c2c(n, Direction::Inverse, PlanEffort::Estimate)
                .unwrap();
            backend.execute_c2c(&mut forward, &mut spectrum, &src).unwrap();
            backend.execute_c2c(&mut inverse, &mut back, &spectrum).unwrap();

            assert_bins_match(&src, &back, n);
        }
    }

    #[test]
    fn test_packed_r2c_matches_direct_dft() {
        let n = 16;
        let mut backend = PhastFtBackend::new();
        let mut plan = backend.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();

        let input: Vec<f32> = (0..n).map(|i| ((i * 7 % 5) as f32 - 2.0) * 0.25).collect();
        let mut spectrum = backend.allocate_complex(n / 2).unwrap();
        backend.execute_r2c(&mut plan, &mut spectrum, &input).unwrap();

        let dft = |k: usize| -> (f64, f64) {
            input.iter().enumerate().fold((0.0, 0.0), |(re, im), (j, &x)| {
                let angle = -2.0 * PI * (j * k) as f64 / n as f64;
                (re + x as f64 * angle.cos(), im + x as f64 * angle.sin())
            })
        };

        let (dc, _) = dft(0);
        let (nyquist, _) = dft(n / 2);
        assert_relative_eq!(spectrum.re[0] as f64, dc, epsilon = 1e-4);
        assert_relative_eq!(spectrum.im[0] as f64, nyquist, epsilon = 1e-4);
        for k in 1..n / 2 {
            let (re, im) = dft(k);
            assert_relative_eq!(spectrum.re[k] as f64, re, epsilon = 1e-4);
            assert_relative_eq!(spectrum.im[k] as f64, im, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_small_r2c_matches_rustfft() {
        let mut reference = RustFftBackend::new();
        let mut backend = PhastFtBackend::new();

        for n in [2, 4, 8] {
            let input: Vec<f32> = signal(n).into_iter().map(|(re, _)| re).collect();

            let mut full = reference
                .allocate_complex(reference.spectrum_len(n))
                .unwrap();
            let mut plan = reference.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();
            reference.execute_r2c(&mut plan, &mut full, &input).unwrap();

            let mut packed = backend.allocate_complex(backend.spectrum_len(n)).unwrap();
            let mut plan = backend.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();
            backend.execute_r2c(&mut plan, &mut packed, &input).unwrap();

            assert_relative_eq!(packed.re[0], full[0].re, epsilon = 1e-4);
            assert_relative_eq!(packed.im[0], full[n / 2].re, epsilon = 1e-4);
            for k in 1..n / 2 {
                assert_relative_eq!(packed.re[k], full[k].re, epsilon = 1e-4);
                assert_relative_eq!(packed.im[k], full[k].im, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_round_trip_doubles_input() {
        let mut backend = PhastFtBackend::new();

        // Half-length inverse is scaled by 2/N, so the round trip yields 2x
        for n in [2, 4, 8, 16, 64] {
            let mut r2c = backend.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();
            let mut c2r = backend.plan_1d_c2r(n, PlanEffort::Estimate).unwrap();

            let input: Vec<f32> = (0..n).map(|i| (i as f32 * 0.41).sin() - 0.1).collect();
            let mut spectrum = backend.allocate_complex(n / 2).unwrap();
            let mut output = vec![0.0f32; n];
            backend.execute_r2c(&mut r2c, &mut spectrum, &input).unwrap();
            backend.execute_c2r(&mut c2r, &mut output, &spectrum).unwrap();

            for (x, y) in input.iter().zip(&output) {
                assert_relative_eq!(*y, 2.0 * *x, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_small_2d_matches_rustfft() {
        let mut reference = RustFftBackend::new();
        let mut backend = PhastFtBackend::new();

        for (nx, ny) in [(4, 2), (2, 4), (4, 4), (8, 4), (4, 16)] {
            let values = signal(nx * ny);

            let mut src_a = reference.allocate_complex(nx * ny).unwrap();
            fill(&mut src_a, &values);
            let mut dst_a = reference.allocate_complex(nx * ny).unwrap();
            let mut plan_a = reference
                .plan_2d_c2c(nx, ny, Direction::Forward, PlanEffort::Estimate)
                .unwrap();
            reference.execute_2d(&mut plan_a, &mut dst_a, &src_a).unwrap();

            let mut src_b = backend.allocate_complex(nx * ny).unwrap();
            fill(&mut src_b, &values);
            let mut dst_b = backend.allocate_complex(nx * ny).unwrap();
            let mut plan_b = backend
                .plan_2d_c2c(nx, ny, Direction::Forward, PlanEffort::Estimate)
                .unwrap();
            backend.execute_2d(&mut plan_b, &mut dst_b, &src_b).unwrap();

            assert_bins_match(&dst_a, &dst_b, nx * ny);
        }
    }

    #[test]
    fn test_2d_impulse_magnitude() {
        let (nx, ny) = (8, 16);
        let mut backend = PhastFtBackend::new();
        let mut plan = backend
            .plan_2d_c2c(nx, ny, Direction::Forward, PlanEffort::Estimate)
            .unwrap();
        let mut src = backend.allocate_complex(nx * ny).unwrap();
        src.re[nx + 2] = 1.0;
        let mut dst = backend.allocate_complex(nx * ny).unwrap();

        backend.execute_2d(&mut plan, &mut dst, &src).unwrap();
        for k in 0..nx * ny {
            assert_relative_eq!(dst.sample(k).unwrap().norm(), 1.0, epsilon = 1e-4);
        }
    }
}
