//! Correlated color temperature (CCT) to chromaticity.
//!
//! Uses the cubic spline fit of the Planckian locus by Kim et al.
//! (US patent 7024034), valid from 1667 K to 25000 K.

use crate::Vec3;

/// Lowest temperature covered by the Planckian fit.
pub const CCT_MIN_KELVIN: f32 = 1667.0;

/// Highest temperature covered by the Planckian fit.
pub const CCT_MAX_KELVIN: f32 = 25000.0;

/// Returns CIE 1931 `xy` chromaticity of a blackbody at `kelvin`.
///
/// Temperatures outside the fitted range are clamped to it.
pub fn cct_to_xy(kelvin: f32) -> [f32; 2] {
    let t = f64::from(kelvin.clamp(CCT_MIN_KELVIN, CCT_MAX_KELVIN));
    let t2 = t * t;
    let t3 = t2 * t;

    let x = if t <= 4000.0 {
        -0.2661239e9 / t3 - 0.2343589e6 / t2 + 0.8776956e3 / t + 0.179910
    } else {
        -3.0258469e9 / t3 + 2.1070379e6 / t2 + 0.2226347e3 / t + 0.240390
    };

    let x2 = x * x;
    let x3 = x2 * x;
    let y = if t <= 2222.0 {
        -1.1063814 * x3 - 1.34811020 * x2 + 2.18555832 * x - 0.20219683
    } else if t <= 4000.0 {
        -0.9549476 * x3 - 1.37418593 * x2 + 2.09137015 * x - 0.16748867
    } else {
        3.0817580 * x3 - 5.87338670 * x2 + 3.75112997 * x - 0.37001483
    };

    [x as f32, y as f32]
}

/// Converts `xy` chromaticity to XYZ with `Y = 1`.
#[inline]
pub fn xy_to_xyz(xy: [f32; 2]) -> Vec3 {
    let [x, y] = xy;
    Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
}

/// XYZ white (Y = 1) of a blackbody at `kelvin`.
#[inline]
pub fn cct_to_xyz(kelvin: f32) -> Vec3 {
    xy_to_xyz(cct_to_xy(kelvin))
}
