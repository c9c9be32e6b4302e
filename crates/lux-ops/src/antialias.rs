//! FXAA-style antialiasing.
//!
//! A single-pass post filter in the spirit of FXAA 3.11 (quality preset 12):
//! local contrast detection on a luma image, sub-pixel blending, edge
//! orientation from second derivatives and a bilateral search along the
//! edge to find the blend offset. Works on the HDR estimate, so luma is
//! taken from tone-compressed RGB to keep bright highlights from dominating
//! the contrast test.

use lux_core::{LumaImage, RgbaImage, luminance_rec709};
use lux_math::smoothstep;
use rayon::prelude::*;
use tracing::trace;

use crate::config::AntialiasConfig;

/// Edge search step schedule in pixels.
const SEARCH_STEPS: [f32; 5] = [1.0, 1.5, 2.0, 4.0, 12.0];

/// Perceptual luma of an HDR pixel.
#[inline]
fn perceptual_luma(px: [f32; 4]) -> f32 {
    let compress = |c: f32| {
        let c = c.max(0.0);
        c / (1.0 + c)
    };
    luminance_rec709([compress(px[0]), compress(px[1]), compress(px[2])]).sqrt()
}

fn luma_image(input: &RgbaImage) -> LumaImage {
    let (width, height) = input.dimensions();
    let mut luma = LumaImage::new(width, height);
    let w = width as usize;
    luma.data_mut()
        .par_chunks_mut(w)
        .zip(input.data().par_chunks(w * 4))
        .for_each(|(dst, src)| {
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                *d = perceptual_luma([px[0], px[1], px[2], px[3]]);
            }
        });
    luma
}

/// Edge-smoothing filter applied to the resolved estimate.
///
/// # Example
///
/// ```rust
/// use lux_core::RgbaImage;
/// use lux_ops::AntialiasFilter;
/// use lux_ops::config::AntialiasConfig;
///
/// let img = RgbaImage::filled(16, 16, [0.2, 0.4, 0.6, 1.0]);
/// let off = AntialiasFilter::new(AntialiasConfig { enabled: false, ..Default::default() });
/// let out = off.apply(&img);
/// assert!(out.shares_storage(&img));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AntialiasFilter {
    config: AntialiasConfig,
}

impl AntialiasFilter {
    /// Creates a filter with the given tuning.
    pub fn new(config: AntialiasConfig) -> Self {
        Self { config }
    }

    /// Filters `input` into a new image of the same size.
    ///
    /// When disabled the input is returned as is, sharing its storage.
    pub fn apply(&self, input: &RgbaImage) -> RgbaImage {
        if !self.config.enabled || input.is_empty() {
            return input.clone();
        }
        trace!(width = input.width(), height = input.height(), "AntialiasFilter::apply");

        let luma = luma_image(input);
        let mut out = RgbaImage::new(input.width(), input.height());
        let row_len = out.row_len();
        out.data_mut()
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, dst) in row.chunks_exact_mut(4).enumerate() {
                    dst.copy_from_slice(&self.filter_pixel(input, &luma, x as i64, y as i64));
                }
            });
        out
    }

    fn filter_pixel(&self, input: &RgbaImage, luma: &LumaImage, x: i64, y: i64) -> [f32; 4] {
        let cfg = &self.config;
        let center = input.pixel_clamped(x, y);
        let l = |dx: i64, dy: i64| luma.pixel_clamped(x + dx, y + dy)[0];
        let luma_at = |px: f32, py: f32| luma.sample_bilinear(px, py)[0];

        // Local contrast
        let luma_m = l(0, 0);
        let mut luma_n = l(0, -1);
        let mut luma_s = l(0, 1);
        let luma_e = l(1, 0);
        let luma_w = l(-1, 0);

        let range_max = luma_m.max(luma_n).max(luma_s).max(luma_e).max(luma_w);
        let range_min = luma_m.min(luma_n).min(luma_s).min(luma_e).min(luma_w);
        let range = range_max - range_min;
        if range < cfg.edge_threshold_min.max(range_max * cfg.edge_threshold) && cfg.early_out {
            return center;
        }
        if range <= 0.0 {
            return center;
        }

        let luma_nw = l(-1, -1);
        let luma_ne = l(1, -1);
        let luma_sw = l(-1, 1);
        let luma_se = l(1, 1);

        // Edge orientation from second derivatives
        let edge_horz = (-2.0 * luma_w + luma_nw + luma_sw).abs()
            + (-2.0 * luma_m + luma_n + luma_s).abs() * 2.0
            + (-2.0 * luma_e + luma_ne + luma_se).abs();
        let edge_vert = (-2.0 * luma_s + luma_sw + luma_se).abs()
            + (-2.0 * luma_m + luma_w + luma_e).abs() * 2.0
            + (-2.0 * luma_n + luma_nw + luma_ne).abs();
        let horz_span = edge_horz >= edge_vert;

        // Sub-pixel blend from the 3x3 low pass
        let low_pass = (2.0 * (luma_n + luma_s + luma_e + luma_w)
            + (luma_nw + luma_ne + luma_sw + luma_se))
            / 12.0;
        let subpix_f = smoothstep(0.0, 1.0, (low_pass - luma_m).abs() / range);
        let subpix_offset = subpix_f * subpix_f * cfg.sub_pixel_quality;

        if !horz_span {
            luma_n = luma_w;
            luma_s = luma_e;
        }
        let gradient_n = luma_n - luma_m;
        let gradient_s = luma_s - luma_m;
        let pair_n = gradient_n.abs() >= gradient_s.abs();
        let gradient = gradient_n.abs().max(gradient_s.abs());
        let length_sign = if pair_n { -1.0 } else { 1.0 };
        let luma_pair_avg = if pair_n {
            (luma_n + luma_m) * 0.5
        } else {
            (luma_s + luma_m) * 0.5
        };

        // Start halfway between the centre and the paired neighbour
        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
        let (bx, by) = if horz_span {
            (cx, cy + length_sign * 0.5)
        } else {
            (cx + length_sign * 0.5, cy)
        };
        let (step_x, step_y) = if horz_span { (1.0, 0.0) } else { (0.0, 1.0) };

        // Bilateral search along the edge
        let gradient_scaled = gradient * 0.25;
        let mut pos_n = (bx - step_x * SEARCH_STEPS[0], by - step_y * SEARCH_STEPS[0]);
        let mut pos_p = (bx + step_x * SEARCH_STEPS[0], by + step_y * SEARCH_STEPS[0]);
        let mut end_n = luma_at(pos_n.0, pos_n.1) - luma_pair_avg;
        let mut end_p = luma_at(pos_p.0, pos_p.1) - luma_pair_avg;
        let mut done_n = end_n.abs() >= gradient_scaled;
        let mut done_p = end_p.abs() >= gradient_scaled;

        for &step in &SEARCH_STEPS[1..] {
            if done_n && done_p {
                break;
            }
            if !done_n {
                pos_n = (pos_n.0 - step_x * step, pos_n.1 - step_y * step);
                end_n = luma_at(pos_n.0, pos_n.1) - luma_pair_avg;
                done_n = end_n.abs() >= gradient_scaled;
            }
            if !done_p {
                pos_p = (pos_p.0 + step_x * step, pos_p.1 + step_y * step);
                end_p = luma_at(pos_p.0, pos_p.1) - luma_pair_avg;
                done_p = end_p.abs() >= gradient_scaled;
            }
        }

        // Edge-end offset
        let (dst_n, dst_p) = if horz_span {
            (cx - pos_n.0, pos_p.0 - cx)
        } else {
            (cy - pos_n.1, pos_p.1 - cy)
        };
        let span = dst_n + dst_p;
        let centre_below = luma_m - luma_pair_avg < 0.0;
        let good_span = if dst_n < dst_p {
            (end_n < 0.0) != centre_below
        } else {
            (end_p < 0.0) != centre_below
        };
        let edge_offset = if good_span && span > 0.0 {
            0.5 - dst_n.min(dst_p) / span
        } else {
            0.0
        };

        let offset = edge_offset.max(subpix_offset) * length_sign;
        let (sx, sy) = if horz_span { (cx, cy + offset) } else { (cx + offset, cy) };
        let rgb = input.sample_bilinear(sx, sy);
        [rgb[0], rgb[1], rgb[2], center[3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_image() -> RgbaImage {
        // Diagonal step edge
        let mut img = RgbaImage::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                let v = if x > y { 1.0 } else { 0.0 };
                img.set_pixel(x, y, [v, v, v, 0.5]);
            }
        }
        img
    }

    #[test]
    fn test_disabled_is_bit_identical() {
        let img = edge_image();
        let filter = AntialiasFilter::new(AntialiasConfig {
            enabled: false,
            ..Default::default()
        });
        let out = filter.apply(&img);
        assert!(out.shares_storage(&img));
        assert_eq!(out, img);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let img = RgbaImage::filled(8, 8, [0.3, 0.6, 0.9, 1.0]);
        let out = AntialiasFilter::new(AntialiasConfig::default()).apply(&img);
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(out.max_abs_diff(&img), Some(0.0));
    }

    #[test]
    fn test_flat_image_without_early_out() {
        let img = RgbaImage::filled(8, 8, [0.3, 0.6, 0.9, 1.0]);
        let cfg = AntialiasConfig {
            early_out: false,
            ..Default::default()
        };
        let out = AntialiasFilter::new(cfg).apply(&img);
        assert!(out.max_abs_diff(&img).unwrap() < 1e-6);
    }

    #[test]
    fn test_smooths_edge_and_keeps_alpha() {
        let img = edge_image();
        let out = AntialiasFilter::new(AntialiasConfig::default()).apply(&img);

        let mut changed = 0;
        for (x, y, px) in out.pixels() {
            assert_eq!(px[3], 0.5);
            for c in &px[..3] {
                assert!((0.0..=1.0).contains(c));
            }
            if px != img.pixel(x, y) {
                changed += 1;
            }
        }
        assert!(changed > 0);

        // Far from the edge nothing moves
        assert_eq!(out.pixel(15, 0), img.pixel(15, 0));
        assert_eq!(out.pixel(0, 15), img.pixel(0, 15));
    }

    #[test]
    fn test_perceptual_luma_bounded() {
        assert_eq!(perceptual_luma([0.0, 0.0, 0.0, 1.0]), 0.0);
        assert!(perceptual_luma([1e6, 1e6, 1e6, 1.0]) <= 1.0);
        assert_eq!(perceptual_luma([-5.0, -5.0, -5.0, 1.0]), 0.0);
    }
}
