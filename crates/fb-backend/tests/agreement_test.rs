//! Backend Agreement Tests
//!
//! Both adapters transform the same input; their spectra must agree.
//! Verifies:
//! - 1-D complex forward transforms
//! - Real forward spectra, allowing for the packed Nyquist bin
//! - 2-D complex forward transforms

use approx::assert_relative_eq;
use fb_backend::{PhastFtBackend, RustFftBackend};
use fb_core::{ComplexBuffer, Direction, FftBackend, PlanEffort};

/// Deterministic test signal with components in [-0.5, 0.5]
fn signal(len: usize) -> Vec<(f32, f32)> {
    (0..len)
        .map(|i| {
            let t = i as f32;
            (0.5 * (0.37 * t).sin(), 0.5 * (0.91 * t + 0.3).cos())
        })
        .collect()
}

fn filled<B: FftBackend>(backend: &B, values: &[(f32, f32)]) -> B::Complex {
    let mut buf = backend.allocate_complex(values.len()).unwrap();
    let mut it = values.iter().copied();
    buf.fill_with(|| it.next().unwrap_or((0.0, 0.0)));
    buf
}

fn assert_same_bins<A: ComplexBuffer, B: ComplexBuffer>(a: &A, b: &B, len: usize) {
    for k in 0..len {
        let x = a.sample(k).unwrap();
        let y = b.sample(k).unwrap();
        assert_relative_eq!(x.re, y.re, epsilon = 1e-3);
        assert_relative_eq!(x.im, y.im, epsilon = 1e-3);
    }
}

#[test]
fn test_c2c_agreement() {
    let n = 256;
    let values = signal(n);
    let mut reference = RustFftBackend::new();
    let mut under_test = PhastFtBackend::new();

    let src_a = filled(&reference, &values);
    let mut dst_a = reference.allocate_complex(n).unwrap();
    let mut plan_a = reference
        .plan_1d_c2c(n, Direction::Forward, PlanEffort::Estimate)
        .unwrap();
    reference.execute_c2c(&mut plan_a, &mut dst_a, &src_a).unwrap();

    let src_b = filled(&under_test, &values);
    let mut dst_b = under_test.allocate_complex(n).unwrap();
    let mut plan_b = under_test
        .plan_1d_c2c(n, Direction::Forward, PlanEffort::Estimate)
        .unwrap();
    under_test.execute_c2c(&mut plan_b, &mut dst_b, &src_b).unwrap();

    assert_same_bins(&dst_a, &dst_b, n);
}

#[test]
fn test_real_spectrum_agreement() {
    let n = 128;
    let input: Vec<f32> = signal(n).into_iter().map(|(re, _)| re).collect();
    let mut reference = RustFftBackend::new();
    let mut under_test = PhastFtBackend::new();

    let mut full = reference
        .allocate_complex(reference.spectrum_len(n))
        .unwrap();
    let mut plan = reference.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();
    reference.execute_r2c(&mut plan, &mut full, &input).unwrap();

    let mut packed = under_test
        .allocate_complex(under_test.spectrum_len(n))
        .unwrap();
    let mut plan = under_test.plan_1d_r2c(n, PlanEffort::Estimate).unwrap();
    under_test.execute_r2c(&mut plan, &mut packed, &input).unwrap();

    let dc = full.sample(0).unwrap();
    let nyquist = full.sample(n / 2).unwrap();
    let bin0 = packed.sample(0).unwrap();
    assert_relative_eq!(bin0.re, dc.re, epsilon = 1e-3);
    assert_relative_eq!(bin0.im, nyquist.re, epsilon = 1e-3);

    for k in 1..n / 2 {
        let x = full.sample(k).unwrap();
        let y = packed.sample(k).unwrap();
        assert_relative_eq!(x.re, y.re, epsilon = 1e-3);
        assert_relative_eq!(x.im, y.im, epsilon = 1e-3);
    }
}

#[test]
fn test_2d_agreement() {
    let (nx, ny) = (32, 8);
    let values = signal(nx * ny);
    let mut reference = RustFftBackend::new();
    let mut under_test = PhastFtBackend::new();

    let src_a = filled(&reference, &values);
    let mut dst_a = reference.allocate_complex(nx * ny).unwrap();
    let mut plan_a = reference
        .plan_2d_c2c(nx, ny, Direction::Forward, PlanEffort::Estimate)
        .unwrap();
    reference.execute_2d(&mut plan_a, &mut dst_a, &src_a).unwrap();

    let src_b = filled(&under_test, &values);
    let mut dst_b = under_test.allocate_complex(nx * ny).unwrap();
    let mut plan_b = under_test
        .plan_2d_c2c(nx, ny, Direction::Forward, PlanEffort::Estimate)
        .unwrap();
    under_test.execute_2d(&mut plan_b, &mut dst_b, &src_b).unwrap();

    assert_same_bins(&dst_a, &dst_b, nx * ny);
}
