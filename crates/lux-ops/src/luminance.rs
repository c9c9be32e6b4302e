//! Luminance extraction and mip pyramid.
//!
//! The pyramid feeds luminance adaptation in the tone mapper: its 1x1 top
//! level is the frame's average luminance, intermediate levels give a
//! blurred local average.
//!
//! Every texel holds the mean of the base pixels it covers. Texels on an odd
//! edge cover fewer pixels and are weighted by their area when reduced, so
//! the top level is the exact frame mean for any resolution.

use lux_core::{LumaImage, RgbaImage, luminance_rec709};
use rayon::prelude::*;
use tracing::trace;

/// Rec.709 luminance of every pixel, negative results clamped to 0.
pub fn luminance(image: &RgbaImage) -> LumaImage {
    let (width, height) = image.dimensions();
    let mut out = LumaImage::new(width, height);
    if out.is_empty() {
        return out;
    }
    let w = width as usize;
    out.data_mut()
        .par_chunks_mut(w)
        .zip(image.data().par_chunks(w * 4))
        .for_each(|(dst, src)| {
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                let y = luminance_rec709([px[0], px[1], px[2]]);
                *d = if y > 0.0 { y } else { 0.0 };
            }
        });
    out
}

/// Base pixels covered by each texel of the next level along one axis.
fn merge_footprint(sizes: &[u32]) -> Vec<u32> {
    sizes.chunks(2).map(|pair| pair.iter().sum()).collect()
}

/// 2x box downsample of a non-empty level.
///
/// `cols` and `rows` give the base pixel footprint of each source column and
/// row; source texels are weighted by the area they cover.
fn downsample(src: &LumaImage, cols: &[u32], rows: &[u32]) -> LumaImage {
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let mut dst = LumaImage::new(sw.div_ceil(2) as u32, sh.div_ceil(2) as u32);
    let dw = dst.width() as usize;

    dst.data_mut()
        .par_chunks_mut(dw)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                let mut area = 0.0;
                for sy in 2 * y..(2 * y + 2).min(sh) {
                    for sx in 2 * x..(2 * x + 2).min(sw) {
                        let a = cols[sx] as f32 * rows[sy] as f32;
                        sum += src.pixel(sx as u32, sy as u32)[0] * a;
                        area += a;
                    }
                }
                *out = sum / area;
            }
        });
    dst
}

/// Luminance image and its successive 2x reductions down to 1x1.
#[derive(Debug, Clone)]
pub struct LuminancePyramid {
    levels: Vec<LumaImage>,
}

impl LuminancePyramid {
    /// Builds the pyramid of `image`.
    ///
    /// Level 0 is [`luminance`] of `image`; level `i + 1` has
    /// `max(1, ceil(d / 2))` texels along each axis of level `i`.
    ///
    /// ```rust
    /// use lux_core::RgbaImage;
    /// use lux_ops::LuminancePyramid;
    ///
    /// let img = RgbaImage::filled(5, 3, [1.0, 1.0, 1.0, 1.0]);
    /// let pyramid = LuminancePyramid::build(&img);
    /// assert_eq!(pyramid.level_count(), 4); // 5x3, 3x2, 2x1, 1x1
    /// assert!((pyramid.average() - 1.0).abs() < 1e-6);
    /// ```
    pub fn build(image: &RgbaImage) -> Self {
        trace!(width = image.width(), height = image.height(), "LuminancePyramid::build");
        let mut levels = vec![luminance(image)];
        let mut cols = vec![1u32; image.width() as usize];
        let mut rows = vec![1u32; image.height() as usize];
        loop {
            let last = &levels[levels.len() - 1];
            if last.is_empty() || (last.width() <= 1 && last.height() <= 1) {
                break;
            }
            let next = downsample(last, &cols, &rows);
            cols = merge_footprint(&cols);
            rows = merge_footprint(&rows);
            levels.push(next);
        }
        Self { levels }
    }

    /// Number of levels including the base.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level `i`, or `None` past the top.
    #[inline]
    pub fn level(&self, i: usize) -> Option<&LumaImage> {
        self.levels.get(i)
    }

    /// Base luminance image.
    #[inline]
    pub fn base(&self) -> &LumaImage {
        &self.levels[0]
    }

    /// Average luminance of the whole frame (the 1x1 top level).
    pub fn average(&self) -> f32 {
        let top = &self.levels[self.levels.len() - 1];
        if top.is_empty() { 0.0 } else { top.data()[0] }
    }

    /// Trilinear lookup at normalized `(u, v)` and fractional `level`.
    ///
    /// Coordinates clamp to the image edge and `level` clamps to the
    /// available range.
    pub fn sample(&self, u: f32, v: f32, level: f32) -> f32 {
        let max_level = (self.levels.len() - 1) as f32;
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, max_level) };
        let l0 = level.floor() as usize;
        let l1 = (l0 + 1).min(self.levels.len() - 1);
        let t = level - l0 as f32;

        let a = self.sample_level(l0, u, v);
        if t == 0.0 || l1 == l0 {
            return a;
        }
        let b = self.sample_level(l1, u, v);
        a + (b - a) * t
    }

    fn sample_level(&self, i: usize, u: f32, v: f32) -> f32 {
        let img = &self.levels[i];
        if img.is_empty() {
            return 0.0;
        }
        let x = u.clamp(0.0, 1.0) * img.width() as f32;
        let y = v.clamp(0.0, 1.0) * img.height() as f32;
        img.sample_bilinear(x, y)[0]
    }
}
