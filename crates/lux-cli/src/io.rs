//! Frame and display image files.
//!
//! HDR frames and estimates are RGBA EXR; display images are 8-bit sRGB
//! tagged PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use lux_core::RgbaImage;

/// Reads the first RGBA layer of an EXR file. Missing alpha reads as 1.
pub fn read_exr(path: &Path) -> Result<RgbaImage> {
    use exr::prelude::*;

    let image = read_first_rgba_layer_from_file(
        path,
        |resolution, _| {
            let width = resolution.width();
            (width, vec![0.0f32; width * resolution.height() * 4])
        },
        |(width, buffer), position, (r, g, b, a): (f32, f32, f32, f32)| {
            let idx = (position.y() * *width + position.x()) * 4;
            if idx + 4 <= buffer.len() {
                buffer[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
            }
        },
    )
    .with_context(|| format!("Failed to read EXR: {}", path.display()))?;

    let size = image.layer_data.size;
    let (_, data) = image.layer_data.channel_data.pixels;
    lux_core::RgbaImage::from_data(size.width() as u32, size.height() as u32, data)
        .with_context(|| format!("Unexpected pixel layout in {}", path.display()))
}

/// Writes an RGBA EXR file.
pub fn write_exr(path: &Path, image: &RgbaImage) -> Result<()> {
    use exr::prelude::*;

    let (width, height) = (image.width() as usize, image.height() as usize);
    write_rgba_file(path, width, height, |x, y| {
        let px = image.pixel(x as u32, y as u32);
        (px[0], px[1], px[2], px[3])
    })
    .with_context(|| format!("Failed to write EXR: {}", path.display()))
}

/// Quantizes display values in `[0, 1]` to 8 bits.
fn to_u8(image: &RgbaImage) -> Vec<u8> {
    image
        .data()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

/// Writes an 8-bit RGBA PNG with an sRGB chunk.
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    if image.is_empty() {
        bail!("Refusing to write empty image: {}", path.display());
    }
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to write PNG header: {}", path.display()))?;
    writer
        .write_image_data(&to_u8(image))
        .with_context(|| format!("Failed to write PNG data: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exr_round_trip() {
        let mut img = RgbaImage::new(5, 3);
        img.set_pixel(4, 2, [10.5, -0.25, 0.125, 0.5]);
        img.set_pixel(0, 1, [1.0, 2.0, 3.0, 1.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.exr");
        write_exr(&path, &img).unwrap();
        let back = read_exr(&path).unwrap();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back.pixel(4, 2), [10.5, -0.25, 0.125, 0.5]);
        assert_eq!(back.pixel(0, 1), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_png_written() {
        let img = RgbaImage::filled(4, 4, [0.0, 0.5, 1.0, 1.0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_png(&path, &img).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_quantize() {
        let img = RgbaImage::filled(1, 1, [-1.0, 0.5, 2.0, 1.0]);
        assert_eq!(to_u8(&img), vec![0, 128, 255, 255]);
    }
}
