//! Flop estimates and report rows

use std::fmt;

use fb_core::{BenchmarkResult, PlanEffort, TransformShape};

/// Analytic operation count of one transform application
///
/// `5 N log2 N` for 1-D shapes (the real round trip included), and the sum
/// of the row and column passes for 2-D.
pub fn flop_estimate(shape: TransformShape) -> f64 {
    let pass = |count: usize, len: usize| 5.0 * count as f64 * len as f64 * (len as f64).log2();
    match shape {
        TransformShape::Complex1d { n } | TransformShape::RealRoundTrip { n } => pass(1, n),
        TransformShape::Complex2d { nx, ny } => pass(ny, nx) + pass(nx, ny),
    }
}

/// Iterations that spend `work_budget` samples on `shape`
pub fn iterations_for(work_budget: u64, shape: TransformShape) -> u64 {
    let samples = shape.sample_count().max(1) as u64;
    work_budget / samples
}

/// One printed line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub shape: TransformShape,
    pub result: BenchmarkResult,
}

impl ReportRow {
    /// `effort` is `None` for backends with a single effort level
    pub fn new(
        backend: &str,
        effort: Option<PlanEffort>,
        shape: TransformShape,
        result: BenchmarkResult,
    ) -> Self {
        let label = match effort {
            Some(effort) => format!("{backend} {} {effort}:", shape.tag()),
            None => format!("{backend} {}:", shape.tag()),
        };

        if !result.is_finite() {
            log::warn!(
                "{label} {shape}: non-finite throughput ({} iterations in {:.6} s)",
                result.iterations,
                result.elapsed_secs
            );
        }

        Self {
            label,
            shape,
            result,
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mflops = self.result.mflops();
        let us = self.result.us_per_iteration();
        match self.shape {
            TransformShape::Complex1d { n } | TransformShape::RealRoundTrip { n } => write!(
                f,
                "{:<26}{n:06} {mflops:12.3} Mflops {us:12.3} us iteration",
                self.label
            ),
            TransformShape::Complex2d { nx, ny } => write!(
                f,
                "{:<26}{nx:04} by {ny:04}, {mflops:12.3} Mflops {us:12.3} us iteration",
                self.label
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flop_estimate() {
        assert_relative_eq!(flop_estimate(TransformShape::Complex1d { n: 1024 }), 51200.0);
        assert_relative_eq!(
            flop_estimate(TransformShape::RealRoundTrip { n: 1024 }),
            51200.0
        );
        assert_relative_eq!(
            flop_estimate(TransformShape::Complex2d { nx: 8, ny: 8 }),
            1920.0
        );
        // Asymmetric: 5*4*16*4 + 5*16*4*2
        assert_relative_eq!(
            flop_estimate(TransformShape::Complex2d { nx: 16, ny: 4 }),
            1920.0
        );
    }

    #[test]
    fn test_iterations_for() {
        let budget = 400_000_000;
        assert_eq!(iterations_for(budget, TransformShape::Complex1d { n: 1024 }), 390_625);
        assert_eq!(
            iterations_for(budget, TransformShape::Complex2d { nx: 1024, ny: 1024 }),
            381
        );
        assert_eq!(iterations_for(budget, TransformShape::Complex1d { n: 0 }), budget);
    }

    #[test]
    fn test_1d_row_format() {
        let shape = TransformShape::Complex1d { n: 64 };
        let flops = 10.0 * flop_estimate(shape);
        let row = ReportRow::new(
            "PhastFT",
            None,
            shape,
            BenchmarkResult::new(0.001, 10, flops),
        );
        let expected = format!(
            "{:<26}000064 {:>12} Mflops {:>12} us iteration",
            "PhastFT C2C:", "19.200", "100.000"
        );
        assert_eq!(row.to_string(), expected);
    }

    #[test]
    fn test_2d_row_format() {
        let shape = TransformShape::Complex2d { nx: 8, ny: 16 };
        let row = ReportRow::new(
            "RustFFT",
            Some(PlanEffort::Measure),
            shape,
            BenchmarkResult::new(0.5, 1000, 1.0e6),
        );
        let text = row.to_string();
        assert!(text.starts_with("RustFFT 2D measure:       0008 by 0016, "));
        assert!(text.ends_with(" us iteration"));
        assert!(text.contains("       2.000 Mflops"));
        assert!(text.contains("     500.000 us"));
    }

    #[test]
    fn test_zero_iterations_does_not_panic() {
        let row = ReportRow::new(
            "RustFFT",
            Some(PlanEffort::Estimate),
            TransformShape::RealRoundTrip { n: 16 },
            BenchmarkResult::new(0.0, 0, 0.0),
        );
        let text = row.to_string();
        assert!(text.starts_with("RustFFT R2C-C2R estimate:"));
        assert!(text.contains("NaN"));
    }
}
