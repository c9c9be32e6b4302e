//! # lux-math
//!
//! Color math for the lux display pipeline.
//!
//! - [`Mat3`] - 3x3 color matrix with a row-major API over [`glam`]
//! - CAT02 chromatic adaptation ([`adapt_matrix`])
//! - Correlated color temperature to chromaticity ([`cct_to_xy`])
//! - Rec.709 white balance ([`white_balance_rec709`])
//! - Interpolation helpers ([`lerp`], [`saturate`], [`smoothstep`])
//!
//! # Convention
//!
//! Matrices are written **row-major** and act on **column vectors**:
//!
//! ```text
//! result = matrix * rgb
//! ```
//!
//! # Usage
//!
//! ```rust
//! use lux_math::{white_balance_rec709, Mat3};
//!
//! // Neutral at the display reference temperature
//! let wb = white_balance_rec709(6500.0);
//! assert!(wb.abs_diff_eq(Mat3::IDENTITY, 1e-4));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod cct;
mod interp;
mod mat3;
mod white;

pub use adapt::*;
pub use cct::*;
pub use interp::*;
pub use mat3::*;
pub use white::*;

pub use glam::Vec3;
