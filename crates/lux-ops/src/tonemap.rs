//! Display transform: grading, optional LUT and tone curve.
//!
//! Per pixel, in this order:
//!
//! 1. white balance (or identity) scaled by `2^exposure`
//! 2. LUT lookup when enabled and bound
//! 3. luminance adaptation, `rgb * key / La`, where `La` blends the frame
//!    average with the local pyramid value
//! 4. tone operator per channel, clamp to `[0, 1]`, output encoding
//!
//! The pyramid is built from the estimate before grading, so exposure
//! compensation still shifts the result after adaptation.

use lux_core::RgbaImage;
use lux_lut::Lut3D;
use lux_math::{Mat3, lerp, saturate};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::{ColorGradingConfig, DisplayEncoding, ToneCurveConfig, ToneOperator};
use crate::{LuminancePyramid, OpsError, OpsResult};

/// Smallest adapted luminance, keeps black frames finite.
const MIN_ADAPTED_LUMINANCE: f32 = 1e-4;

/// Grading matrix: white balance (if enabled) times exposure gain.
///
/// ```rust
/// use lux_math::Mat3;
/// use lux_ops::color_transform;
/// use lux_ops::config::ColorGradingConfig;
///
/// assert_eq!(color_transform(&ColorGradingConfig::default()), Mat3::IDENTITY);
/// ```
pub fn color_transform(grading: &ColorGradingConfig) -> Mat3 {
    lux_math::color_transform(
        grading.use_white_balance,
        grading.white_point_kelvin,
        grading.exposure_compensation,
    )
}

#[inline]
fn apply_operator(op: ToneOperator, white: f32, v: f32) -> f32 {
    let v = v.max(0.0);
    match op {
        ToneOperator::Reinhard => v / (1.0 + v),
        ToneOperator::ReinhardExtended => v * (1.0 + v / (white * white)) / (1.0 + v),
        ToneOperator::AcesFilmic => {
            (v * (2.51 * v + 0.03)) / (v * (2.43 * v + 0.59) + 0.14)
        }
        ToneOperator::Clamp => v,
    }
}

#[inline]
fn encode(encoding: DisplayEncoding, v: f32) -> f32 {
    match encoding {
        DisplayEncoding::Linear => v,
        DisplayEncoding::Srgb => {
            if v <= 0.0031308 {
                v * 12.92
            } else {
                1.055 * v.powf(1.0 / 2.4) - 0.055
            }
        }
    }
}

/// Maps the HDR estimate to display values.
#[derive(Debug, Clone)]
pub struct ToneMapper {
    grading: ColorGradingConfig,
    curve: ToneCurveConfig,
    transform: Mat3,
}

impl ToneMapper {
    /// Creates a mapper and precomputes the grading matrix.
    pub fn new(grading: &ColorGradingConfig, curve: &ToneCurveConfig) -> Self {
        Self {
            grading: *grading,
            curve: *curve,
            transform: color_transform(grading),
        }
    }

    /// Tone maps `input` into `target`.
    ///
    /// `pyramid` must be built from an image of the same size as `input`.
    /// `lut` is used only when grading enables it; without a bound LUT the
    /// step passes colors through.
    ///
    /// # Errors
    ///
    /// [`OpsError::SizeMismatch`] if `input`, the pyramid base and `target`
    /// differ in size. `target` is not written in that case.
    pub fn apply(
        &self,
        input: &RgbaImage,
        pyramid: &LuminancePyramid,
        lut: Option<&Lut3D>,
        target: &mut RgbaImage,
    ) -> OpsResult<()> {
        let dims = input.dimensions();
        if target.dimensions() != dims {
            return Err(OpsError::SizeMismatch(format!(
                "input {}x{} vs target {}x{}",
                dims.0,
                dims.1,
                target.width(),
                target.height()
            )));
        }
        if pyramid.base().dimensions() != dims {
            return Err(OpsError::SizeMismatch(format!(
                "input {}x{} vs luminance {}x{}",
                dims.0,
                dims.1,
                pyramid.base().width(),
                pyramid.base().height()
            )));
        }
        if input.is_empty() {
            return Ok(());
        }
        trace!(width = dims.0, height = dims.1, "ToneMapper::apply");

        let lut = if self.grading.use_lut {
            if lut.is_none() {
                debug!("LUT enabled but none bound, passing colors through");
            }
            lut
        } else {
            None
        };

        let curve = self.curve;
        let average = pyramid.average();
        let level = curve.adaptation_level as f32;
        let (w, h) = (dims.0 as f32, dims.1 as f32);
        let row_len = input.row_len();

        target
            .data_mut()
            .par_chunks_mut(row_len)
            .zip(input.data().par_chunks(row_len))
            .enumerate()
            .for_each(|(y, (dst, src))| {
                let v = (y as f32 + 0.5) / h;
                for (x, (out, px)) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)).enumerate() {
                    let mut rgb = self.transform.transform_rgb([px[0], px[1], px[2]]);
                    if let Some(lut) = lut {
                        rgb = lut.apply(rgb);
                    }

                    let adapted = if curve.local_adaptation > 0.0 {
                        let local = pyramid.sample((x as f32 + 0.5) / w, v, level);
                        lerp(average, local, curve.local_adaptation)
                    } else {
                        average
                    };
                    let scale = curve.key / adapted.max(MIN_ADAPTED_LUMINANCE);

                    for c in 0..3 {
                        let mapped = apply_operator(curve.operator, curve.white, rgb[c] * scale);
                        out[c] = encode(curve.encoding, saturate(mapped));
                    }
                    out[3] = saturate(px[3]);
                }
            });
        Ok(())
    }
}
