//! Raster strip rendering for colormaps.
//!
//! Strips are used as editor thumbnails and as 1D GPU lookup textures.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageBuffer, Rgba, RgbaImage};

use super::control::Colormap;
use crate::error::{ColorloomError, Result};

/// Render a 1-pixel-tall lookup strip, sampling `lookup_color` at
/// `x / width` for each column.
pub fn render_strip(colormap: &Colormap, width: u32) -> RgbaImage {
    let mut img = ImageBuffer::new(width.max(1), 1);
    for x in 0..width.max(1) {
        let color = colormap.lookup_color(x as f32 / width.max(1) as f32);
        img.put_pixel(x, 0, Rgba(to_rgba_bytes(color)));
    }
    img
}

/// Render a thumbnail strip of the given height (the 1-pixel strip
/// repeated row-wise).
pub fn render_thumbnail(colormap: &Colormap, width: u32, height: u32) -> RgbaImage {
    let strip = render_strip(colormap, width);
    let mut img = ImageBuffer::new(strip.width(), height.max(1));
    for y in 0..height.max(1) {
        for x in 0..strip.width() {
            img.put_pixel(x, y, *strip.get_pixel(x, 0));
        }
    }
    img
}

/// Encode an image as a base64 PNG string for editor preview payloads.
pub fn encode_png_base64(img: &RgbaImage) -> Result<String> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| ColorloomError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(STANDARD.encode(buffer.into_inner()))
}

fn to_rgba_bytes(color: [f32; 3]) -> [u8; 4] {
    [
        (color[0] * 255.0).round().clamp(0.0, 255.0) as u8,
        (color[1] * 255.0).round().clamp(0.0, 255.0) as u8,
        (color[2] * 255.0).round().clamp(0.0, 255.0) as u8,
        255,
    ]
}
