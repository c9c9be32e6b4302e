//! # lux-core
//!
//! Core types for the lux temporal accumulation and display pipeline.
//!
//! This crate provides the foundational types shared by every other lux crate:
//!
//! - [`Image`] - Row-major `f32` image buffer with a compile-time channel count
//! - [`RgbaImage`] / [`LumaImage`] - The two image shapes the pipeline moves around
//! - [`luminance_rec709`] and the Rec.709 luma weights
//! - [`Error`] / [`Result`] - Buffer and allocation errors
//!
//! ## Crate Structure
//!
//! ```text
//! lux-core (this crate)
//!    ^
//!    |
//!    +-- lux-math  (color matrices, chromatic adaptation)
//!    +-- lux-lut   (3D lookup tables)
//!    +-- lux-ops   (antialias, luminance pyramid, tone mapping)
//!    +-- lux-accum (change detection, accumulation, render session)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use lux_core::{RgbaImage, luminance_rec709};
//!
//! let frame = RgbaImage::filled(4, 4, [0.5, 0.5, 0.5, 1.0]);
//! let px = frame.pixel(1, 2);
//! assert!((luminance_rec709([px[0], px[1], px[2]]) - 0.5).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{Image, LumaImage, RgbaImage};
pub use pixel::{luminance_rec709, REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R};
