//! fb-backend: Transform library adapters
//!
//! Two libraries are compared by the harness:
//!
//! - [`RustFftBackend`]: the reference, RustFFT with realfft for real input
//! - [`PhastFtBackend`]: the library under test, PhastFT on split-complex data
//!
//! Both implement [`fb_core::FftBackend`], so the runner drives them the
//! same way.

mod phastft_backend;
mod rustfft_backend;

pub use phastft_backend::*;
pub use rustfft_backend::*;
