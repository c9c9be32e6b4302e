//! Progressive accumulation with compensated summation.
//!
//! Each channel keeps a running sum and a Kahan compensation term, so the
//! estimate of a constant input stays exact over long runs where a plain
//! `f32` sum would drift once it grows large relative to each sample.

use lux_core::{Error, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::AccumResult;

/// Running per-pixel mean of HDR frame samples.
///
/// # Example
///
/// ```rust
/// use lux_accum::AccumulationBuffer;
/// use lux_core::RgbaImage;
///
/// let mut acc = AccumulationBuffer::new(4, 4).unwrap();
/// let frame = RgbaImage::filled(4, 4, [0.5, 0.5, 0.5, 1.0]);
/// for _ in 0..10 {
///     acc.accumulate(&frame).unwrap();
/// }
/// assert_eq!(acc.sample_count(), 10);
/// assert_eq!(acc.current_estimate().pixel(2, 2), [0.5, 0.5, 0.5, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    sum: RgbaImage,
    compensation: RgbaImage,
    frame_index: u64,
    start_index: u64,
}

impl AccumulationBuffer {
    /// Allocates zeroed buffers.
    ///
    /// # Errors
    ///
    /// Zero width or height, or an allocation failure.
    pub fn new(width: u32, height: u32) -> AccumResult<Self> {
        let (sum, compensation) = Self::allocate(width, height)?;
        debug!(width, height, "accumulation buffers allocated");
        Ok(Self {
            sum,
            compensation,
            frame_index: 0,
            start_index: 0,
        })
    }

    fn allocate(width: u32, height: u32) -> AccumResult<(RgbaImage, RgbaImage)> {
        Ok((RgbaImage::try_new(width, height)?, RgbaImage::try_new(width, height)?))
    }

    /// Adds one frame sample.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `sample` has another resolution; the
    /// buffer is left untouched.
    pub fn accumulate(&mut self, sample: &RgbaImage) -> AccumResult<()> {
        if sample.dimensions() != self.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), sample.dimensions()).into());
        }
        trace!(frame = self.frame_index, "AccumulationBuffer::accumulate");

        let row_len = self.sum.row_len();
        self.sum
            .data_mut()
            .par_chunks_mut(row_len)
            .zip(self.compensation.data_mut().par_chunks_mut(row_len))
            .zip(sample.data().par_chunks(row_len))
            .for_each(|((sum, comp), src)| {
                for ((s, c), &x) in sum.iter_mut().zip(comp.iter_mut()).zip(src) {
                    let y = x - *c;
                    let t = *s + y;
                    *c = (t - *s) - y;
                    *s = t;
                }
            });

        self.frame_index += 1;
        Ok(())
    }

    /// Mean of the samples since the last reset.
    ///
    /// A zero image when no sample has been added yet.
    pub fn current_estimate(&self) -> RgbaImage {
        let (width, height) = self.dimensions();
        let mut out = RgbaImage::new(width, height);
        let n = self.sample_count();
        if n == 0 {
            return out;
        }
        let inv = 1.0 / n as f64;
        let row_len = out.row_len();
        out.data_mut()
            .par_chunks_mut(row_len)
            .zip(self.sum.data().par_chunks(row_len))
            .zip(self.compensation.data().par_chunks(row_len))
            .for_each(|((dst, sum), comp)| {
                for ((d, &s), &c) in dst.iter_mut().zip(sum).zip(comp) {
                    *d = ((f64::from(s) - f64::from(c)) * inv) as f32;
                }
            });
        out
    }

    /// Discards all samples, keeping the allocation.
    pub fn reset(&mut self) {
        self.sum.clear();
        self.compensation.clear();
        self.start_index = self.frame_index;
        debug!(frame = self.frame_index, "accumulation reset");
    }

    /// Reallocates for a new resolution and resets.
    ///
    /// # Errors
    ///
    /// Zero width or height, or an allocation failure. The previous buffers
    /// and counters are kept in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> AccumResult<()> {
        let (sum, compensation) = Self::allocate(width, height)?;
        debug!(
            from_width = self.sum.width(),
            from_height = self.sum.height(),
            width,
            height,
            "accumulation buffers resized"
        );
        self.sum = sum;
        self.compensation = compensation;
        self.start_index = self.frame_index;
        Ok(())
    }

    /// Samples accumulated since the last reset.
    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.frame_index - self.start_index
    }

    /// Frames accumulated since creation.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Frame index at the last reset.
    #[inline]
    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    /// Buffer resolution.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.sum.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccumError;

    #[test]
    fn test_new_rejects_zero() {
        assert!(AccumulationBuffer::new(0, 10).is_err());
        assert!(AccumulationBuffer::new(10, 0).is_err());
    }

    #[test]
    fn test_empty_estimate_is_zero() {
        let acc = AccumulationBuffer::new(3, 2).unwrap();
        let est = acc.current_estimate();
        assert_eq!(est.dimensions(), (3, 2));
        assert!(est.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mean_of_two() {
        let mut acc = AccumulationBuffer::new(1, 1).unwrap();
        acc.accumulate(&RgbaImage::filled(1, 1, [1.0, 0.0, 2.0, 1.0])).unwrap();
        acc.accumulate(&RgbaImage::filled(1, 1, [0.0, 1.0, 4.0, 1.0])).unwrap();
        assert_eq!(acc.current_estimate().pixel(0, 0), [0.5, 0.5, 3.0, 1.0]);
    }

    #[test]
    fn test_reset_counters() {
        let mut acc = AccumulationBuffer::new(2, 2).unwrap();
        let frame = RgbaImage::filled(2, 2, [1.0; 4]);
        for _ in 0..3 {
            acc.accumulate(&frame).unwrap();
        }
        acc.reset();
        assert_eq!(acc.frame_index(), 3);
        assert_eq!(acc.start_index(), 3);
        assert_eq!(acc.sample_count(), 0);
        acc.accumulate(&frame).unwrap();
        assert_eq!(acc.sample_count(), 1);
        assert_eq!(acc.current_estimate().pixel(1, 1), [1.0; 4]);
    }

    #[test]
    fn test_mismatched_sample_rejected() {
        let mut acc = AccumulationBuffer::new(4, 4).unwrap();
        let err = acc.accumulate(&RgbaImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, AccumError::Core(Error::DimensionMismatch { .. })));
        assert_eq!(acc.frame_index(), 0);
    }

    #[test]
    fn test_long_run_stays_exact() {
        let mut acc = AccumulationBuffer::new(1, 1).unwrap();
        let frame = RgbaImage::filled(1, 1, [0.1, 0.7, 1.3, 1.0]);
        for _ in 0..100_000 {
            acc.accumulate(&frame).unwrap();
        }
        let px = acc.current_estimate().pixel(0, 0);
        assert!((px[0] - 0.1).abs() < 1e-6);
        assert!((px[1] - 0.7).abs() < 1e-6);
        assert!((px[2] - 1.3).abs() < 1e-6);
    }
}
