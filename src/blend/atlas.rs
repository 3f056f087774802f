//! Stacked layer atlas with seam and corner blending.
//!
//! Layer textures stack vertically in one atlas, so a layer's actual V
//! coordinate is `(layer + local_v) / n`. Sampling near a tile edge blends
//! with the wrapped opposite edge to hide tiling seams; near a corner,
//! where two margins overlap, a three-way blend takes over.

use image::RgbaImage;
use ndarray::Array3;
use once_cell::sync::Lazy;

use super::MAX_LAYERS;
use crate::error::{ColorloomError, Result};

/// Side length of the generated placeholder tile.
const PLACEHOLDER_SIZE: u32 = 32;

/// A vertical stack of equally-sized tile textures.
#[derive(Debug, Clone)]
pub struct LayerAtlas {
    layers: usize,
    tile_width: usize,
    tile_height: usize,
    /// (layers * tile_height, tile_width, 4)
    data: Array3<f32>,
}

impl LayerAtlas {
    /// Build an atlas from per-layer tiles. All tiles must share one size.
    pub fn new(tiles: &[&RgbaImage]) -> Result<Self> {
        if tiles.len() > MAX_LAYERS {
            return Err(ColorloomError::GradientCapacity {
                count: tiles.len(),
                max: MAX_LAYERS,
            });
        }
        if tiles.is_empty() {
            return Ok(Self {
                layers: 0,
                tile_width: 0,
                tile_height: 0,
                data: Array3::zeros((0, 0, 4)),
            });
        }

        let (w, h) = (tiles[0].width() as usize, tiles[0].height() as usize);
        for (i, tile) in tiles.iter().enumerate() {
            if tile.width() as usize != w || tile.height() as usize != h {
                return Err(ColorloomError::ImageGeneration {
                    message: format!(
                        "Tile {} is {}x{}, expected {}x{}",
                        i,
                        tile.width(),
                        tile.height(),
                        w,
                        h
                    ),
                });
            }
        }

        let mut data = Array3::zeros((tiles.len() * h, w, 4));
        for (layer, tile) in tiles.iter().enumerate() {
            for (x, y, pixel) in tile.enumerate_pixels() {
                for c in 0..4 {
                    data[[layer * h + y as usize, x as usize, c]] =
                        pixel.0[c] as f32 / 255.0;
                }
            }
        }

        Ok(Self {
            layers: tiles.len(),
            tile_width: w,
            tile_height: h,
            data,
        })
    }

    /// Build an atlas where missing tiles fall back to the placeholder
    /// rather than failing the whole render.
    pub fn with_placeholders(tiles: &[Option<&RgbaImage>]) -> Result<Self> {
        let placeholder = placeholder_tile();
        let resolved: Vec<&RgbaImage> =
            tiles.iter().map(|t| t.unwrap_or(placeholder)).collect();
        Self::new(&resolved)
    }

    /// Number of stacked layers
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Sample a layer at a tile-local UV (nearest texel, wrapping).
    ///
    /// The local V is mapped into the layer's vertical band of the atlas:
    /// atlas V = `(layer + local_v) / layers`.
    pub fn sample(&self, layer: usize, u: f32, v: f32) -> [f32; 4] {
        if layer >= self.layers || self.tile_width == 0 {
            return [0.0, 0.0, 0.0, 0.0];
        }
        let uu = wrap_unit(u);
        let vv = wrap_unit(v);

        let atlas_v = (layer as f32 + vv) / self.layers as f32;
        let rows = self.layers * self.tile_height;
        let row = ((atlas_v * rows as f32).floor() as usize).min(rows - 1);
        let col = ((uu * self.tile_width as f32).floor() as usize).min(self.tile_width - 1);

        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
            self.data[[row, col, 3]],
        ]
    }

    /// Sample with seam blending inside `margin` of any tile edge.
    ///
    /// Within the margin of one edge, the sample blends toward the wrapped
    /// opposite edge with a linear weight over the fractional distance into
    /// the margin, so both sides of a seam converge to the same color. In a
    /// corner, where two margins overlap, the two side blends are joined by
    /// a shared corner color that every adjacent tile agrees on, weighted
    /// by distance from the corner diagonal and a radial falloff toward the
    /// corner point.
    pub fn sample_seam_blended(&self, layer: usize, u: f32, v: f32, margin: f32) -> [f32; 4] {
        let uu = wrap_unit(u);
        let vv = wrap_unit(v);
        let own = self.sample(layer, uu, vv);
        if margin <= 0.0 {
            return own;
        }

        let du = uu.min(1.0 - uu);
        let dv = vv.min(1.0 - vv);
        let in_u = du < margin;
        let in_v = dv < margin;

        if !in_u && !in_v {
            return own;
        }

        if in_u && !in_v {
            let alpha = 0.5 + du / (2.0 * margin);
            return lerp4(self.sample(layer, 1.0 - uu, vv), own, alpha);
        }
        if in_v && !in_u {
            let alpha = 0.5 + dv / (2.0 * margin);
            return lerp4(self.sample(layer, uu, 1.0 - vv), own, alpha);
        }

        // Corner: three-way blend between the horizontal and vertical side
        // blends and a shared corner color.
        let horizontal = self.sample(layer, 1.0 - uu, vv);
        let vertical = self.sample(layer, uu, 1.0 - vv);
        let diagonal = self.sample(layer, 1.0 - uu, 1.0 - vv);

        let alpha_u = 0.5 + du / (2.0 * margin);
        let alpha_v = 0.5 + dv / (2.0 * margin);
        let side_h = lerp4(horizontal, own, alpha_u);
        let side_v = lerp4(vertical, own, alpha_v);

        // Proximity to each edge: 1 at the edge, 0 at the margin boundary
        let nu = 1.0 - du / margin;
        let nv = 1.0 - dv / margin;

        let side = if nu + nv > 0.0 {
            lerp4(side_v, side_h, nu / (nu + nv))
        } else {
            lerp4(side_v, side_h, 0.5)
        };

        // All four tiles meeting at the corner agree on this color
        let shared = [
            (own[0] + horizontal[0] + vertical[0] + diagonal[0]) * 0.25,
            (own[1] + horizontal[1] + vertical[1] + diagonal[1]) * 0.25,
            (own[2] + horizontal[2] + vertical[2] + diagonal[2]) * 0.25,
            (own[3] + horizontal[3] + vertical[3] + diagonal[3]) * 0.25,
        ];

        // Corner dominance: strongest on the corner diagonal, falling off
        // radially toward the margin boundaries
        let diagonal_weight = 1.0 - (nu - nv).abs();
        let radial = (nu * nv).max(0.0).sqrt();
        let corner_weight = (radial * diagonal_weight).clamp(0.0, 1.0);

        lerp4(side, shared, corner_weight)
    }
}

/// The deterministic checkerboard tile used when an asset's texture is
/// missing or unfetchable.
pub fn placeholder_tile() -> &'static RgbaImage {
    static PLACEHOLDER: Lazy<RgbaImage> = Lazy::new(|| {
        let mut img = RgbaImage::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let check = ((x / 4) + (y / 4)) % 2 == 0;
            let value = if check { 160 } else { 96 };
            pixel.0 = [value, value, value, 255];
        }
        img
    });
    &PLACEHOLDER
}

fn wrap_unit(x: f32) -> f32 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped.is_finite() {
        wrapped
    } else {
        0.0
    }
}

fn lerp4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}
