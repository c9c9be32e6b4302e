//! Settings for the display passes.
//!
//! All structs deserialize with `#[serde(default)]`, so a settings file only
//! needs the fields it changes. Values outside their documented range are
//! pulled back by `sanitized()`, which logs a warning for each clamp.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Exposure compensation range in stops.
pub const EXPOSURE_RANGE: (f32, f32) = (-12.0, 12.0);

/// White point range in kelvin.
pub const WHITE_POINT_RANGE: (f32, f32) = (1905.0, 25000.0);

fn clamp_logged(name: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        warn!(setting = name, fallback, "NaN setting replaced");
        return fallback;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(setting = name, value, clamped, "setting clamped into range");
    }
    clamped
}

/// Exposure, white balance and LUT switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGradingConfig {
    /// Exposure compensation in stops.
    pub exposure_compensation: f32,
    /// Apply white balance.
    pub use_white_balance: bool,
    /// White point in kelvin, used when white balance is on.
    pub white_point_kelvin: f32,
    /// Map colors through the bound LUT.
    pub use_lut: bool,
}

impl Default for ColorGradingConfig {
    fn default() -> Self {
        Self {
            exposure_compensation: 0.0,
            use_white_balance: false,
            white_point_kelvin: 6500.0,
            use_lut: false,
        }
    }
}

impl ColorGradingConfig {
    /// Returns a copy with every value inside its range.
    pub fn sanitized(self) -> Self {
        Self {
            exposure_compensation: clamp_logged(
                "exposure_compensation",
                self.exposure_compensation,
                EXPOSURE_RANGE.0,
                EXPOSURE_RANGE.1,
                0.0,
            ),
            white_point_kelvin: clamp_logged(
                "white_point_kelvin",
                self.white_point_kelvin,
                WHITE_POINT_RANGE.0,
                WHITE_POINT_RANGE.1,
                6500.0,
            ),
            ..self
        }
    }
}

/// FXAA tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntialiasConfig {
    /// Run the filter at all.
    pub enabled: bool,
    /// Sub-pixel aliasing removal, 0 is off and 1 is softest.
    pub sub_pixel_quality: f32,
    /// Minimum local contrast, relative to the local maximum, to process.
    pub edge_threshold: f32,
    /// Absolute contrast below which dark areas are skipped.
    pub edge_threshold_min: f32,
    /// Keep pixels below the thresholds unchanged.
    pub early_out: bool,
}

impl Default for AntialiasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sub_pixel_quality: 0.75,
            edge_threshold: 0.166,
            edge_threshold_min: 0.0833,
            early_out: true,
        }
    }
}

impl AntialiasConfig {
    /// Returns a copy with thresholds in `[0, 1]`.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            sub_pixel_quality: clamp_logged(
                "sub_pixel_quality",
                self.sub_pixel_quality,
                0.0,
                1.0,
                d.sub_pixel_quality,
            ),
            edge_threshold: clamp_logged("edge_threshold", self.edge_threshold, 0.0, 1.0, d.edge_threshold),
            edge_threshold_min: clamp_logged(
                "edge_threshold_min",
                self.edge_threshold_min,
                0.0,
                1.0,
                d.edge_threshold_min,
            ),
            ..self
        }
    }
}

/// Display curve applied per channel after scaling by adapted luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneOperator {
    /// `x / (1 + x)`.
    Reinhard,
    /// Reinhard with a white level mapped to 1.
    ReinhardExtended,
    /// Narkowicz fit of the ACES filmic curve.
    #[default]
    AcesFilmic,
    /// No curve, values are only clamped.
    Clamp,
}

/// Output transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEncoding {
    /// Linear values in `[0, 1]`.
    Linear,
    /// sRGB OETF.
    #[default]
    Srgb,
}

/// Display curve settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneCurveConfig {
    /// Curve shape.
    pub operator: ToneOperator,
    /// Middle grey the adapted luminance is mapped to.
    pub key: f32,
    /// Luminance mapped to 1 by [`ToneOperator::ReinhardExtended`].
    pub white: f32,
    /// Blend between global (0) and local (1) adaptation.
    pub local_adaptation: f32,
    /// Pyramid level sampled for local adaptation.
    pub adaptation_level: u32,
    /// Output encoding.
    pub encoding: DisplayEncoding,
}

impl Default for ToneCurveConfig {
    fn default() -> Self {
        Self {
            operator: ToneOperator::default(),
            key: 0.18,
            white: 4.0,
            local_adaptation: 0.5,
            adaptation_level: 4,
            encoding: DisplayEncoding::default(),
        }
    }
}

impl ToneCurveConfig {
    /// Returns a copy with a positive key and white and adaptation in `[0, 1]`.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            key: clamp_logged("key", self.key, 1e-3, 100.0, d.key),
            white: clamp_logged("white", self.white, 1e-3, 1e4, d.white),
            local_adaptation: clamp_logged(
                "local_adaptation",
                self.local_adaptation,
                0.0,
                1.0,
                d.local_adaptation,
            ),
            ..self
        }
    }
}
