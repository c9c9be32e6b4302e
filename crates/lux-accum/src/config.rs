//! Pipeline settings.
//!
//! [`PipelineSettings`] is the single configuration struct a session reads
//! once per frame. It loads from YAML; missing fields take their defaults.
//!
//! ```yaml
//! grading:
//!   exposure_compensation: 1.5
//!   use_white_balance: true
//!   white_point_kelvin: 5200
//! antialias:
//!   enabled: false
//! tone:
//!   operator: reinhard
//!   encoding: srgb
//! camera:
//!   depth_of_field: true
//! ```

use std::path::Path;

use lux_ops::config::{AntialiasConfig, ColorGradingConfig, ToneCurveConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AccumResult;

/// Camera settings owned by the renderer.
///
/// Every field changes what a sample means, so any edit invalidates the
/// accumulated estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Thin-lens depth of field.
    pub depth_of_field: bool,
    /// Near clip distance.
    pub z_near: f32,
    /// Far clip distance.
    pub z_far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            depth_of_field: false,
            z_near: 0.01,
            z_far: 100.0,
        }
    }
}

impl CameraSettings {
    /// Returns a copy with `0 < z_near < z_far`.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let z_near = if self.z_near.is_finite() && self.z_near > 0.0 {
            self.z_near
        } else {
            warn!(z_near = self.z_near, fallback = d.z_near, "invalid near plane replaced");
            d.z_near
        };
        let z_far = if self.z_far.is_finite() && self.z_far > z_near {
            self.z_far
        } else {
            let fallback = (z_near * 1e4).max(d.z_far);
            warn!(z_far = self.z_far, fallback, "invalid far plane replaced");
            fallback
        };
        Self {
            z_near,
            z_far,
            ..self
        }
    }
}

/// Everything that controls accumulation and display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Exposure, white balance and LUT switches.
    pub grading: ColorGradingConfig,
    /// Antialiasing.
    pub antialias: AntialiasConfig,
    /// Display curve.
    pub tone: ToneCurveConfig,
    /// Camera settings.
    pub camera: CameraSettings,
}

impl PipelineSettings {
    /// Parses settings from YAML and sanitizes them.
    pub fn from_yaml_str(yaml: &str) -> AccumResult<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings.sanitized())
    }

    /// Loads settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> AccumResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading pipeline settings");
        Self::from_yaml_str(&text)
    }

    /// Returns a copy with every value inside its range.
    pub fn sanitized(self) -> Self {
        Self {
            grading: self.grading.sanitized(),
            antialias: self.antialias.sanitized(),
            tone: self.tone.sanitized(),
            camera: self.camera.sanitized(),
        }
    }

    /// Returns true when switching from `self` to `next` discards samples.
    ///
    /// Only camera settings do; grading, antialiasing and the tone curve
    /// run after accumulation.
    pub fn invalidates_accumulation(&self, next: &Self) -> bool {
        self.camera != next.camera
    }
}
