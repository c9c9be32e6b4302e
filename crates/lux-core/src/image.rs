//! Image buffer type for the accumulation pipeline.
//!
//! [`Image<N>`] stores `N` `f32` channels per pixel in **row-major** order,
//! top-to-bottom:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! Two shapes are used throughout lux:
//! - [`RgbaImage`] (`N = 4`) - HDR radiance frames, accumulation buffers and
//!   the display image
//! - [`LumaImage`] (`N = 1`) - luminance and its mip levels
//!
//! # Memory Management
//!
//! Pixel data lives in an [`Arc<Vec<f32>>`]. Cloning an image shares the
//! buffer; the first mutation of a shared image copies it (copy-on-write).
//! Pass-through stages (antialiasing disabled) therefore return their input
//! without copying a single pixel.
//!
//! # Usage
//!
//! ```rust
//! use lux_core::RgbaImage;
//!
//! let mut img = RgbaImage::new(1920, 1080);
//! img.set_pixel(100, 100, [1.0, 0.5, 0.25, 1.0]);
//! assert_eq!(img.pixel(100, 100)[1], 0.5);
//! ```

use crate::{Error, Result};
use std::sync::Arc;

/// RGBA HDR image (4 channels).
pub type RgbaImage = Image<4>;

/// Single channel image, used for luminance.
pub type LumaImage = Image<1>;

/// Owned `f32` image buffer with `N` interleaved channels.
#[derive(Clone, PartialEq)]
pub struct Image<const N: usize> {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<f32>>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl<const N: usize> Image<N> {
    /// Creates a new zero-filled image.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails. Use [`try_new`](Self::try_new) for
    /// persistent buffers whose allocation failure must be reported.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * N;
        Self {
            data: Arc::new(vec![0.0; len]),
            width,
            height,
        }
    }

    /// Creates a new zero-filled image, reporting failures instead of panicking.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if either side is zero or the element
    ///   count overflows
    /// - [`Error::AllocationFailed`] if the memory cannot be reserved
    ///
    /// # Example
    ///
    /// ```rust
    /// use lux_core::RgbaImage;
    ///
    /// assert!(RgbaImage::try_new(0, 720).is_err());
    /// let img = RgbaImage::try_new(1280, 720).unwrap();
    /// assert_eq!(img.dimensions(), (1280, 720));
    /// ```
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(N))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "element count overflows"))?;

        let mut data: Vec<f32> = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            Error::allocation_failed(len.saturating_mul(std::mem::size_of::<f32>()), e.to_string())
        })?;
        data.resize(len, 0.0);

        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Wraps existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * N`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * N;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates an image filled with a single pixel value.
    ///
    /// ```rust
    /// use lux_core::RgbaImage;
    ///
    /// let grey = RgbaImage::filled(8, 8, [0.5, 0.5, 0.5, 1.0]);
    /// assert_eq!(grey.pixel(7, 7), [0.5, 0.5, 0.5, 1.0]);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: [f32; N]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * N);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of `f32` values in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * N
    }

    /// Returns the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the pixel data mutably, copying it first if it is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Returns `true` if both images share one pixel buffer.
    #[inline]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; N] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        let mut out = [0.0; N];
        out.copy_from_slice(&self.data[offset..offset + N]);
        out
    }

    /// Returns the pixel at signed coordinates, clamped to the image edge.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [f32; N] {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(cx, cy)
    }

    /// Bilinear fetch at a continuous position in pixel units.
    ///
    /// Pixel centers sit at `x + 0.5`; lookups outside the image clamp to
    /// the edge texels.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> [f32; N] {
        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let p00 = self.pixel_clamped(x0, y0);
        let p10 = self.pixel_clamped(x0 + 1, y0);
        let p01 = self.pixel_clamped(x0, y0 + 1);
        let p11 = self.pixel_clamped(x0 + 1, y0 + 1);

        let mut out = [0.0; N];
        for c in 0..N {
            let top = p00[c] + (p10[c] - p00[c]) * tx;
            let bottom = p01[c] + (p11[c] - p01[c]) * tx;
            out[c] = top + (bottom - top) * ty;
        }
        out
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; N]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        let data = Arc::make_mut(&mut self.data);
        data[offset..offset + N].copy_from_slice(&pixel);
    }

    /// Zeroes every channel in place, keeping the allocation.
    pub fn clear(&mut self) {
        self.data_mut().fill(0.0);
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [f32; N])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Returns the largest absolute per-channel difference to `other`.
    ///
    /// Returns `None` when the dimensions differ.
    pub fn max_abs_diff(&self, other: &Self) -> Option<f32> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .fold(0.0f32, |acc, (a, b)| acc.max((a - b).abs())),
        )
    }
}

impl<const N: usize> std::fmt::Debug for Image<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &N)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_image_new() {
        let img = RgbaImage::new(100, 50);
        assert_eq!(img.dimensions(), (100, 50));
        assert_eq!(img.row_len(), 400);
        assert_eq!(img.pixel_count(), 5000);
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_try_new_rejects_zero() {
        let err = RgbaImage::try_new(0, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 10, .. }));
        assert!(LumaImage::try_new(10, 0).is_err());
    }

    #[test]
    fn test_from_data_wrong_size() {
        assert!(RgbaImage::from_data(10, 10, vec![0.0; 10]).is_err());
        assert!(LumaImage::from_data(10, 10, vec![0.0; 100]).is_ok());
    }

    #[test]
    fn test_set_pixel() {
        let mut img = RgbaImage::new(10, 10);
        img.set_pixel(5, 5, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(img.pixel(5, 5), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(img.pixel(0, 0), [0.0; 4]);
    }

    #[test]
    fn test_clear_keeps_size() {
        let mut img = RgbaImage::filled(4, 3, [1.0, 2.0, 3.0, 4.0]);
        img.clear();
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_clone_cow() {
        let a = RgbaImage::filled(4, 4, [1.0, 0.0, 0.0, 1.0]);
        let mut b = a.clone();
        assert!(a.shares_storage(&b));
        b.set_pixel(0, 0, [0.0, 1.0, 0.0, 1.0]);
        assert!(!a.shares_storage(&b));
        assert_eq!(a.pixel(0, 0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_pixel_clamped() {
        let mut img = LumaImage::new(3, 3);
        img.set_pixel(0, 0, [7.0]);
        img.set_pixel(2, 2, [9.0]);
        assert_eq!(img.pixel_clamped(-5, -1), [7.0]);
        assert_eq!(img.pixel_clamped(40, 3), [9.0]);
    }

    #[test]
    fn test_sample_bilinear_midpoint() {
        let img = LumaImage::from_data(2, 1, vec![0.0, 1.0]).unwrap();
        // Texel centers at 0.5 and 1.5
        assert_abs_diff_eq!(img.sample_bilinear(0.5, 0.5)[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(img.sample_bilinear(1.0, 0.5)[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img.sample_bilinear(1.5, 0.5)[0], 1.0, epsilon = 1e-6);
        // Clamped outside
        assert_abs_diff_eq!(img.sample_bilinear(5.0, 0.5)[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = RgbaImage::filled(2, 2, [0.5; 4]);
        let b = RgbaImage::filled(2, 2, [0.25; 4]);
        assert_eq!(a.max_abs_diff(&b), Some(0.25));
        assert_eq!(a.max_abs_diff(&RgbaImage::new(1, 1)), None);
    }
}
