//! White balance and exposure for linear Rec.709 radiance.

use crate::{adapt_matrix, cct_to_xyz, Mat3, CAT02};

/// Temperature that white balance treats as neutral.
pub const REFERENCE_KELVIN: f32 = 6500.0;

/// Linear Rec.709 (D65) to CIE XYZ.
pub const REC709_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.4123908, 0.3575843, 0.1804808],
    [0.2126390, 0.7151687, 0.0721923],
    [0.0193308, 0.1191948, 0.9505322],
]);

/// Returns the CIE XYZ to linear Rec.709 matrix.
///
/// Computed as the exact inverse of [`REC709_TO_XYZ`] so that a round trip
/// is identity up to float rounding.
pub fn xyz_to_rec709() -> Mat3 {
    REC709_TO_XYZ.inverse().unwrap_or(Mat3::IDENTITY)
}

/// White balance matrix for linear Rec.709 input.
///
/// Adapts the white of a blackbody at `kelvin` to the white at
/// [`REFERENCE_KELVIN`] with CAT02. Both whites come from the same Planckian
/// fit, so `white_balance_rec709(REFERENCE_KELVIN)` is exactly identity.
/// Lower temperatures cool the image, higher temperatures warm it.
pub fn white_balance_rec709(kelvin: f32) -> Mat3 {
    if kelvin == REFERENCE_KELVIN {
        return Mat3::IDENTITY;
    }
    let src = cct_to_xyz(kelvin);
    let dst = cct_to_xyz(REFERENCE_KELVIN);
    xyz_to_rec709() * adapt_matrix(CAT02, src, dst) * REC709_TO_XYZ
}

/// Linear gain for an exposure compensation in stops.
///
/// `exposure_scale(0.0)` is exactly `1.0`.
#[inline]
pub fn exposure_scale(stops: f32) -> f32 {
    stops.exp2()
}

/// Combined color transform: white balance (or identity) scaled by exposure.
///
/// ```rust
/// use lux_math::{color_transform, Mat3};
///
/// assert_eq!(color_transform(false, 6500.0, 0.0), Mat3::IDENTITY);
/// assert_eq!(color_transform(false, 3000.0, 1.0), Mat3::scale(2.0));
/// ```
pub fn color_transform(white_balance: bool, kelvin: f32, exposure_stops: f32) -> Mat3 {
    let wb = if white_balance {
        white_balance_rec709(kelvin)
    } else {
        Mat3::IDENTITY
    };
    wb * exposure_scale(exposure_stops)
}
