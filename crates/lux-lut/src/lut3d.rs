//! 3-dimensional lookup table.
//!
//! A cube of RGB output values indexed by RGB input in `[0, 1]`. Inputs
//! outside the unit cube are clamped to its surface.

use crate::{Interpolation, LutError, LutResult};

/// A 3-dimensional lookup table.
///
/// # Structure
///
/// - `size^3` entries, each an RGB output triplet
/// - Stored in R-major order: R varies fastest, then G, then B
///
/// # Example
///
/// ```rust
/// use lux_lut::Lut3D;
///
/// let lut = Lut3D::identity(33);
/// let out = lut.apply([0.5, 0.3, 0.2]);
/// assert!((out[0] - 0.5).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    data: Vec<[f32; 3]>,
    size: usize,
    interpolation: Interpolation,
}

impl Lut3D {
    /// Smallest cube edge that can be interpolated.
    pub const MIN_SIZE: usize = 2;

    /// Creates an identity (pass-through) cube of edge `size`.
    ///
    /// Sizes below [`Self::MIN_SIZE`] are raised to it.
    pub fn identity(size: usize) -> Self {
        let size = size.max(Self::MIN_SIZE);
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }
        Self {
            data,
            size,
            interpolation: Interpolation::Linear,
        }
    }

    /// Creates a cube from R-major data with exactly `size^3` entries.
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        if size < Self::MIN_SIZE {
            return Err(LutError::InvalidSize(format!(
                "cube edge {} is below the minimum of {}",
                size,
                Self::MIN_SIZE
            )));
        }
        let expected = size
            .checked_mul(size)
            .and_then(|s| s.checked_mul(size))
            .ok_or_else(|| LutError::InvalidSize(format!("cube edge {size} overflows")))?;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} entries for size {}, got {}",
                expected,
                size,
                data.len()
            )));
        }
        Ok(Self {
            data,
            size,
            interpolation: Interpolation::Linear,
        })
    }

    /// Sets the interpolation method.
    pub fn with_interpolation(mut self, interp: Interpolation) -> Self {
        self.interpolation = interp;
        self
    }

    /// Cube edge length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Interpolation used by [`Self::apply`].
    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Total number of lattice entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.data.len()
    }

    /// Raw R-major entries.
    #[inline]
    pub fn data(&self) -> &[[f32; 3]] {
        &self.data
    }

    /// Lattice value at grid position (r, g, b).
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[b * self.size * self.size + g * self.size + r]
    }

    /// Returns true if every lattice point maps to itself within `eps`.
    pub fn is_identity(&self, eps: f32) -> bool {
        let n = (self.size - 1) as f32;
        (0..self.size).all(|b| {
            (0..self.size).all(|g| {
                (0..self.size).all(|r| {
                    let v = self.get(r, g, b);
                    (v[0] - r as f32 / n).abs() <= eps
                        && (v[1] - g as f32 / n).abs() <= eps
                        && (v[2] - b as f32 / n).abs() <= eps
                })
            })
        })
    }

    /// Maps an RGB value through the cube.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self.interpolation {
            Interpolation::Nearest => self.apply_nearest(rgb),
            Interpolation::Linear => self.apply_trilinear(rgb),
            Interpolation::Tetrahedral => self.apply_tetrahedral(rgb),
        }
    }

    fn apply_nearest(&self, rgb: [f32; 3]) -> [f32; 3] {
        let n = (self.size - 1) as f32;
        let [r, g, b] = clamp_unit(rgb);
        let last = self.size - 1;
        self.get(
            ((r * n).round() as usize).min(last),
            ((g * n).round() as usize).min(last),
            ((b * n).round() as usize).min(last),
        )
    }

    /// Lattice cell origin and fractional position inside it.
    #[inline]
    fn cell(&self, rgb: [f32; 3]) -> ([usize; 3], [f32; 3]) {
        let n = (self.size - 1) as f32;
        let [r, g, b] = clamp_unit(rgb);
        let max_origin = self.size - 2;
        let ri = ((r * n).floor() as usize).min(max_origin);
        let gi = ((g * n).floor() as usize).min(max_origin);
        let bi = ((b * n).floor() as usize).min(max_origin);
        (
            [ri, gi, bi],
            [r * n - ri as f32, g * n - gi as f32, b * n - bi as f32],
        )
    }

    fn apply_trilinear(&self, rgb: [f32; 3]) -> [f32; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(rgb);

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        std::array::from_fn(|i| {
            let c00 = c000[i] + (c100[i] - c000[i]) * rf;
            let c01 = c001[i] + (c101[i] - c001[i]) * rf;
            let c10 = c010[i] + (c110[i] - c010[i]) * rf;
            let c11 = c011[i] + (c111[i] - c011[i]) * rf;
            let c0 = c00 + (c10 - c00) * gf;
            let c1 = c01 + (c11 - c01) * gf;
            c0 + (c1 - c0) * bf
        })
    }

    fn apply_tetrahedral(&self, rgb: [f32; 3]) -> [f32; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(rgb);

        let c000 = self.get(ri, gi, bi);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        // Walk from c000 to c111 along the axes in order of decreasing weight
        let (w, a, b) = if rf > gf {
            if gf > bf {
                ([rf, gf, bf], self.get(ri + 1, gi, bi), self.get(ri + 1, gi + 1, bi))
            } else if rf > bf {
                ([rf, bf, gf], self.get(ri + 1, gi, bi), self.get(ri + 1, gi, bi + 1))
            } else {
                ([bf, rf, gf], self.get(ri, gi, bi + 1), self.get(ri + 1, gi, bi + 1))
            }
        } else if gf > bf {
            if rf > bf {
                ([gf, rf, bf], self.get(ri, gi + 1, bi), self.get(ri + 1, gi + 1, bi))
            } else {
                ([gf, bf, rf], self.get(ri, gi + 1, bi), self.get(ri, gi + 1, bi + 1))
            }
        } else {
            ([bf, gf, rf], self.get(ri, gi, bi + 1), self.get(ri, gi + 1, bi + 1))
        };

        std::array::from_fn(|i| {
            c000[i] + w[0] * (a[i] - c000[i]) + w[1] * (b[i] - a[i]) + w[2] * (c111[i] - b[i])
        })
    }
}

#[inline]
fn clamp_unit(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
}
