//! fb-core: Shared types, traits, and utilities for fftbench
//!
//! Everything the transform adapters and the benchmark runner agree on:
//! transform shapes, planning effort, run records, aligned buffers, the
//! [`FftBackend`] capability and the error type.

mod backend;
mod buffer;
mod error;
mod record;
mod transform;

pub use backend::*;
pub use buffer::*;
pub use error::*;
pub use record::*;
pub use transform::*;

pub use num_complex::Complex32;
