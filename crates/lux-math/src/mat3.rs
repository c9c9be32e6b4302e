//! 3x3 color matrix.
//!
//! [`Mat3`] wraps [`glam::Mat3`] (column-major internally) behind a
//! row-major constructor so color matrices can be written the way they are
//! published:
//!
//! ```text
//! | m00 m01 m02 |   | r |
//! | m10 m11 m12 | * | g |
//! | m20 m21 m22 |   | b |
//! ```

use glam::Vec3;
use std::ops::Mul;

/// A 3x3 matrix for color transformations.
///
/// # Example
///
/// ```rust
/// use lux_math::Mat3;
///
/// let m = Mat3::scale(2.0);
/// assert_eq!(m.transform_rgb([1.0, 2.0, 3.0]), [2.0, 4.0, 6.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(glam::Mat3);

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(glam::Mat3::IDENTITY);

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(r: [[f32; 3]; 3]) -> Self {
        Self(glam::Mat3::from_cols(
            Vec3::new(r[0][0], r[1][0], r[2][0]),
            Vec3::new(r[0][1], r[1][1], r[2][1]),
            Vec3::new(r[0][2], r[1][2], r[2][2]),
        ))
    }

    /// Creates a diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f32, d1: f32, d2: f32) -> Self {
        Self(glam::Mat3::from_diagonal(Vec3::new(d0, d1, d2)))
    }

    /// Creates a uniform scale matrix.
    #[inline]
    pub const fn scale(s: f32) -> Self {
        Self::diagonal(s, s, s)
    }

    /// Computes the inverse, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.0.determinant();
        if !det.is_finite() || det.abs() < 1e-10 {
            return None;
        }
        Some(Self(self.0.inverse()))
    }

    /// Transforms an RGB triplet.
    #[inline]
    pub fn transform_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        (self.0 * Vec3::from_array(rgb)).to_array()
    }

    /// Element-wise comparison with a tolerance.
    #[inline]
    pub fn abs_diff_eq(&self, other: Self, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.0 * rhs
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self(self.0 * rhs)
    }
}
