//! Interpolation methods for LUT evaluation.

/// Interpolation method for cube lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest lattice point.
    Nearest,

    /// Trilinear blend of the 8 surrounding lattice points.
    #[default]
    Linear,

    /// Blend of the 4 corners of the enclosing tetrahedron.
    ///
    /// Keeps the grey axis exact and avoids the hue shifts trilinear shows
    /// on strong grades.
    Tetrahedral,
}
