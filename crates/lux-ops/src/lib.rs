//! # lux-ops
//!
//! Per-frame display passes applied to the accumulated HDR estimate.
//!
//! # Modules
//!
//! - [`antialias`] - FXAA-style edge smoothing
//! - [`luminance`] - luminance image and mip pyramid for adaptation
//! - [`tonemap`] - white balance, exposure, LUT and display curve
//! - [`config`] - serializable settings for the passes above
//!
//! Passes run strictly in that order. Each borrows its input and writes a
//! new image, so the accumulation buffers are never modified here.
//!
//! # Example
//!
//! ```rust
//! use lux_core::RgbaImage;
//! use lux_ops::{AntialiasFilter, LuminancePyramid, ToneMapper};
//! use lux_ops::config::{AntialiasConfig, ColorGradingConfig, ToneCurveConfig};
//!
//! let hdr = RgbaImage::filled(64, 64, [0.5, 0.5, 0.5, 1.0]);
//! let smoothed = AntialiasFilter::new(AntialiasConfig::default()).apply(&hdr);
//! let pyramid = LuminancePyramid::build(&hdr);
//!
//! let mut display = RgbaImage::new(64, 64);
//! let mapper = ToneMapper::new(&ColorGradingConfig::default(), &ToneCurveConfig::default());
//! mapper.apply(&smoothed, &pyramid, None, &mut display).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod antialias;
pub mod config;
pub mod luminance;
pub mod tonemap;

pub use antialias::AntialiasFilter;
pub use error::{OpsError, OpsResult};
pub use luminance::{LuminancePyramid, luminance};
pub use tonemap::{ToneMapper, color_transform};
