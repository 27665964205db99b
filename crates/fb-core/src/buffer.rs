//! Cache-aligned sample buffers
//!
//! Buffers are backed by a vector of 64-byte cache lines and viewed as `T`
//! through `bytemuck`, so the first sample always starts on a cache-line
//! boundary without any unsafe pointer work. Allocation is fallible: running
//! out of memory surfaces as [`BenchError::Allocation`] instead of an abort
//! inside the allocator.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};
use num_complex::Complex32;

use crate::{BenchError, BenchResult};

/// Alignment of every buffer handed to a backend, in bytes
pub const BUFFER_ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C, align(64))]
struct CacheLine([u8; BUFFER_ALIGN]);

/// Aligned buffer of `len` samples, zero-initialized
///
/// Released when dropped.
pub struct AlignedBuf<T> {
    lines: Vec<CacheLine>,
    len: usize,
    _sample: PhantomData<T>,
}

impl<T: Pod> AlignedBuf<T> {
    /// Allocate a zeroed buffer of `len` samples
    pub fn zeroed(len: usize) -> BenchResult<Self> {
        debug_assert!(BUFFER_ALIGN % size_of::<T>() == 0);

        let bytes = len
            .checked_mul(size_of::<T>())
            .ok_or(BenchError::Allocation { bytes: usize::MAX })?;
        let line_count = bytes.div_ceil(BUFFER_ALIGN);

        let mut lines = Vec::new();
        lines
            .try_reserve_exact(line_count)
            .map_err(|_| BenchError::Allocation { bytes })?;
        lines.resize(line_count, CacheLine::zeroed());

        Ok(Self {
            lines,
            len,
            _sample: PhantomData,
        })
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &bytemuck::cast_slice(&self.lines)[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut bytemuck::cast_slice_mut(&mut self.lines)[..self.len]
    }
}

impl<T: Pod> Deref for AlignedBuf<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod> DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> std::fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("len", &self.len)
            .field("lines", &self.lines.len())
            .finish()
    }
}

/// Complex sample storage as seen by the runner
///
/// Backends choose their own layout; the runner only needs to fill the input
/// with workload samples, real component first.
pub trait ComplexBuffer {
    /// Number of complex samples
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite every sample, in index order, with values from `next`
    fn fill_with<F: FnMut() -> (f32, f32)>(&mut self, next: F);

    /// Sample at `index` as an interleaved complex value
    fn sample(&self, index: usize) -> Option<Complex32>;
}

impl ComplexBuffer for AlignedBuf<Complex32> {
    fn len(&self) -> usize {
        self.len
    }

    fn fill_with<F: FnMut() -> (f32, f32)>(&mut self, mut next: F) {
        for slot in self.as_mut_slice() {
            let (re, im) = next();
            *slot = Complex32::new(re, im);
        }
    }

    fn sample(&self, index: usize) -> Option<Complex32> {
        self.as_slice().get(index).copied()
    }
}

/// Split-complex storage: real and imaginary parts in separate aligned arrays
#[derive(Debug)]
pub struct SplitComplex {
    pub re: AlignedBuf<f32>,
    pub im: AlignedBuf<f32>,
}

impl SplitComplex {
    pub fn zeroed(len: usize) -> BenchResult<Self> {
        Ok(Self {
            re: AlignedBuf::zeroed(len)?,
            im: AlignedBuf::zeroed(len)?,
        })
    }

    /// Copy both components from `other`
    pub fn copy_from(&mut self, other: &SplitComplex) {
        self.re.copy_from_slice(&other.re);
        self.im.copy_from_slice(&other.im);
    }
}

impl ComplexBuffer for SplitComplex {
    fn len(&self) -> usize {
        self.re.len()
    }

    fn fill_with<F: FnMut() -> (f32, f32)>(&mut self, mut next: F) {
        for (re, im) in self.re.iter_mut().zip(self.im.iter_mut()) {
            let (r, i) = next();
            *re = r;
            *im = i;
        }
    }

    fn sample(&self, index: usize) -> Option<Complex32> {
        Some(Complex32::new(*self.re.get(index)?, *self.im.get(index)?))
    }
}
