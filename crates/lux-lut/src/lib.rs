//! # lux-lut
//!
//! 3D color lookup tables for the lux display pipeline.
//!
//! - [`Lut3D`] - RGB cube with nearest, trilinear and tetrahedral lookup
//! - [`PackedLayout`] - how a cube is unrolled into a 2D strip image
//! - [`load_packed_png`] - reads a strip PNG into a [`Lut3D`]
//!
//! # Usage
//!
//! ```rust
//! use lux_lut::{Interpolation, Lut3D};
//!
//! let lut = Lut3D::identity(17).with_interpolation(Interpolation::Tetrahedral);
//! let out = lut.apply([0.25, 0.5, 0.75]);
//! assert!((out[1] - 0.5).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod interp;
mod lut3d;
mod packed;

pub use error::{LutError, LutResult};
pub use interp::Interpolation;
pub use lut3d::Lut3D;
pub use packed::{PackedLayout, load_packed_png};
