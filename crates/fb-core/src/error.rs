//! Error types for fftbench

use thiserror::Error;

/// Benchmark harness error type
///
/// Every variant is fatal to the harness: the CLI reports it and exits with
/// a non-zero status. Nothing is retried.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("{backend} cannot plan {shape}: {reason}")]
    Planning {
        backend: &'static str,
        shape: String,
        reason: String,
    },

    #[error("{backend} execution failed: {reason}")]
    Execution {
        backend: &'static str,
        reason: String,
    },

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type BenchResult<T> = Result<T, BenchError>;
