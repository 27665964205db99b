//! Transform shapes, directions and planning effort

use std::fmt;

use crate::{BenchError, BenchResult};

/// Structural kind of a benchmarked transform, with its size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformShape {
    /// 1-D complex-to-complex of length `n`
    Complex1d { n: usize },
    /// 1-D real-to-complex followed by complex-to-real, length `n`
    RealRoundTrip { n: usize },
    /// 2-D complex-to-complex, `ny` rows of `nx` contiguous samples
    Complex2d { nx: usize, ny: usize },
}

/// Number of real components per input sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleArity {
    Real = 1,
    Complex = 2,
}

impl SampleArity {
    #[inline]
    pub fn components(self) -> usize {
        self as usize
    }
}

impl TransformShape {
    /// Total number of input samples
    pub fn sample_count(&self) -> usize {
        match *self {
            Self::Complex1d { n } | Self::RealRoundTrip { n } => n,
            Self::Complex2d { nx, ny } => nx.saturating_mul(ny),
        }
    }

    pub fn arity(&self) -> SampleArity {
        match self {
            Self::RealRoundTrip { .. } => SampleArity::Real,
            Self::Complex1d { .. } | Self::Complex2d { .. } => SampleArity::Complex,
        }
    }

    /// Short tag used in report labels
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Complex1d { .. } => "C2C",
            Self::RealRoundTrip { .. } => "R2C-C2R",
            Self::Complex2d { .. } => "2D",
        }
    }

    /// Reject degenerate sizes before any backend sees them
    pub fn validate(&self) -> BenchResult<()> {
        let check = |name: &str, value: usize| {
            if value < 2 {
                Err(BenchError::InvalidSize(format!(
                    "{name}={value} in {self}, every dimension must be at least 2"
                )))
            } else {
                Ok(())
            }
        };

        match *self {
            Self::Complex1d { n } | Self::RealRoundTrip { n } => check("N", n),
            Self::Complex2d { nx, ny } => {
                check("Nx", nx)?;
                check("Ny", ny)
            }
        }
    }
}

impl fmt::Display for TransformShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Complex1d { n } => write!(f, "1-D C2C N={n}"),
            Self::RealRoundTrip { n } => write!(f, "1-D R2C-C2R N={n}"),
            Self::Complex2d { nx, ny } => write!(f, "2-D C2C {nx}x{ny}"),
        }
    }
}

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Planning effort hint
///
/// `Estimate` plans immediately. `Measure` lets the backend time candidate
/// strategies during planning and keep the fastest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanEffort {
    Estimate,
    Measure,
}

impl PlanEffort {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Estimate => "estimate",
            Self::Measure => "measure",
        }
    }
}

impl Default for PlanEffort {
    fn default() -> Self {
        Self::Estimate
    }
}

impl fmt::Display for PlanEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count() {
        assert_eq!(TransformShape::Complex1d { n: 64 }.sample_count(), 64);
        assert_eq!(TransformShape::RealRoundTrip { n: 128 }.sample_count(), 128);
        assert_eq!(TransformShape::Complex2d { nx: 8, ny: 16 }.sample_count(), 128);
    }

    #[test]
    fn test_arity() {
        assert_eq!(TransformShape::RealRoundTrip { n: 4 }.arity(), SampleArity::Real);
        assert_eq!(TransformShape::Complex1d { n: 4 }.arity(), SampleArity::Complex);
        assert_eq!(SampleArity::Complex.components(), 2);
        assert_eq!(SampleArity::Real.components(), 1);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(TransformShape::Complex1d { n: 0 }.validate().is_err());
        assert!(TransformShape::RealRoundTrip { n: 1 }.validate().is_err());
        assert!(TransformShape::Complex2d { nx: 8, ny: 1 }.validate().is_err());
        assert!(TransformShape::Complex2d { nx: 2, ny: 2 }.validate().is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransformShape::Complex2d { nx: 4, ny: 8 }.to_string(), "2-D C2C 4x8");
        assert_eq!(PlanEffort::Measure.to_string(), "measure");
    }
}
