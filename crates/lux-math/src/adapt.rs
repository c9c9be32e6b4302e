//! Chromatic adaptation transforms (CAT).
//!
//! A CAT maps XYZ into a cone-like response space, scales each response by
//! the ratio of destination to source white, and maps back:
//!
//! ```text
//! M_adapt = M^-1 * diag(dst_cone / src_cone) * M
//! ```
//!
//! White balance uses the [`CAT02`] cone model.

use crate::{Mat3, Vec3};

/// CAT02 matrix from the CIECAM02 appearance model.
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Computes the matrix adapting XYZ from `src_white` to `dst_white`.
///
/// Returns identity when `method` is singular or a white point has a zero
/// cone response.
///
/// ```rust
/// use lux_math::{adapt_matrix, CAT02, Vec3};
///
/// let warm = Vec3::new(1.0985, 1.0, 0.35585);
/// let d65 = Vec3::new(0.95047, 1.0, 1.08883);
/// let m = adapt_matrix(CAT02, warm, d65);
/// let out = m * warm;
/// assert!((out - d65).abs().max_element() < 1e-3);
/// ```
pub fn adapt_matrix(method: Mat3, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let Some(method_inv) = method.inverse() else {
        return Mat3::IDENTITY;
    };

    let src_cone = method * src_white;
    let dst_cone = method * dst_white;
    if src_cone.cmpeq(Vec3::ZERO).any() {
        return Mat3::IDENTITY;
    }

    let scale = Mat3::diagonal(
        dst_cone.x / src_cone.x,
        dst_cone.y / src_cone.y,
        dst_cone.z / src_cone.z,
    );

    method_inv * scale * method
}
