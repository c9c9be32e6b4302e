//! Packed 2D LUT strips.
//!
//! Real-time renderers store a 3D cube of edge `N` as a 2D image made of `N`
//! square slices, one per blue level. Inside a slice red runs along x and
//! green along y, both from the top-left corner.
//!
//! ```text
//! Horizontal (N^2 x N):  | b=0 | b=1 | ... | b=N-1 |
//!
//! Vertical (N x N^2):    | b=0   |
//!                        | b=1   |
//!                        | ...   |
//!                        | b=N-1 |
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::{LutError, LutResult, Lut3D};

/// How cube slices are arranged in a strip image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedLayout {
    /// Slices side by side: `N^2` wide, `N` tall.
    Horizontal,
    /// Slices stacked: `N` wide, `N^2` tall.
    Vertical,
}

impl PackedLayout {
    /// Infers the layout and cube edge from strip dimensions.
    pub fn detect(width: u32, height: u32) -> LutResult<(Self, usize)> {
        let (w, h) = (u64::from(width), u64::from(height));
        let layout = if w == h * h {
            Self::Horizontal
        } else if h == w * w {
            Self::Vertical
        } else {
            return Err(LutError::InvalidLayout {
                width,
                height,
                reason: "expected N^2 x N or N x N^2".into(),
            });
        };
        Ok((layout, layout.edge(width, height)?))
    }

    /// Cube edge implied by strip dimensions under this layout.
    fn edge(self, width: u32, height: u32) -> LutResult<usize> {
        let (w, h) = (u64::from(width), u64::from(height));
        let n = match self {
            Self::Horizontal if w == h * h => height,
            Self::Vertical if h == w * w => width,
            _ => {
                return Err(LutError::InvalidLayout {
                    width,
                    height,
                    reason: format!("dimensions do not match {self:?} packing"),
                });
            }
        };
        if (n as usize) < Lut3D::MIN_SIZE {
            return Err(LutError::InvalidLayout {
                width,
                height,
                reason: format!("cube edge must be at least {}", Lut3D::MIN_SIZE),
            });
        }
        Ok(n as usize)
    }

    /// Strip pixel holding lattice point (r, g, b) for a cube of edge `n`.
    #[inline]
    fn position(self, n: usize, r: usize, g: usize, b: usize) -> (usize, usize) {
        match self {
            Self::Horizontal => (b * n + r, g),
            Self::Vertical => (r, b * n + g),
        }
    }
}

impl Lut3D {
    /// Decodes a packed strip into a cube.
    ///
    /// `data` holds `width * height * channels` normalized values, row by
    /// row. Only the first three channels are read, so RGB and RGBA strips
    /// both work.
    ///
    /// ```rust
    /// use lux_lut::{Lut3D, PackedLayout};
    ///
    /// // 2x2x2 identity as a 4x2 horizontal RGB strip
    /// let data = vec![
    ///     0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  0.0, 0.0, 1.0,  1.0, 0.0, 1.0,
    ///     0.0, 1.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 1.0,  1.0, 1.0, 1.0,
    /// ];
    /// let lut = Lut3D::from_packed(4, 2, 3, &data, PackedLayout::Horizontal).unwrap();
    /// assert!(lut.is_identity(0.0));
    /// ```
    pub fn from_packed(
        width: u32,
        height: u32,
        channels: usize,
        data: &[f32],
        layout: PackedLayout,
    ) -> LutResult<Self> {
        if channels < 3 {
            return Err(LutError::InvalidSize(format!(
                "strip needs at least 3 channels, got {channels}"
            )));
        }
        let n = layout.edge(width, height)?;
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} strip values for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }

        let mut cube = Vec::with_capacity(n * n * n);
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    let (x, y) = layout.position(n, r, g, b);
                    let i = (y * width as usize + x) * channels;
                    cube.push([data[i], data[i + 1], data[i + 2]]);
                }
            }
        }
        Self::from_data(cube, n)
    }
}

/// Loads an 8 or 16-bit RGB(A) PNG strip as a cube.
///
/// The layout is inferred from the aspect ratio with
/// [`PackedLayout::detect`].
pub fn load_packed_png<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| LutError::Decode(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| LutError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| LutError::Decode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(LutError::Decode(format!(
                "unsupported color type {other:?}, expected RGB or RGBA"
            )));
        }
    };

    let data: Vec<f32> = match info.bit_depth {
        png::BitDepth::Eight => bytes.iter().map(|&v| f32::from(v) / 255.0).collect(),
        png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| f32::from(u16::from_be_bytes([c[0], c[1]])) / 65535.0)
            .collect(),
        other => {
            return Err(LutError::Decode(format!("unsupported bit depth {other:?}")));
        }
    };

    let (layout, edge) = PackedLayout::detect(info.width, info.height)?;
    debug!(
        path = %path.display(),
        ?layout,
        edge,
        "loaded packed LUT strip"
    );
    Lut3D::from_packed(info.width, info.height, channels, &data, layout)
}
