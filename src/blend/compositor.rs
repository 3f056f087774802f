//! Per-fragment transfer-function compositing.
//!
//! Resolves a stack of weighted, seam-blended layer samples plus a
//! colormap-sampled base color into the final fragment color. The editor
//! preview renders through the same function the shader semantics are
//! defined by, so the two paths cannot drift apart.

use image::{ImageBuffer, Rgba, RgbaImage};
use tracing::debug;

use super::atlas::LayerAtlas;
use super::blend_map::BlendMap;
use crate::colormap::Colormap;
use crate::error::{ColorloomError, Result};

/// How the composited texture color combines with the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// The texture color replaces the base color
    Opaque,
    /// The texture color multiplies the colormap-sampled base color
    TexturedColormap,
}

/// A configured compositor over one blend map and one layer atlas.
#[derive(Debug, Clone)]
pub struct Compositor {
    blend_map: BlendMap,
    atlas: LayerAtlas,
    seam_margin: f32,
    /// 0 = grayscale, 1 = full texture color
    pub saturation: f32,
    /// 0 = white, 1 = full texture contribution
    pub intensity: f32,
    pub mode: RenderMode,
}

impl Compositor {
    /// Pair a blend map with a layer atlas. The two must agree on the
    /// number of layers.
    pub fn new(blend_map: BlendMap, atlas: LayerAtlas, seam_margin: f32) -> Result<Self> {
        if blend_map.layers() != atlas.layers() {
            return Err(ColorloomError::InvalidParameter {
                param: "atlas".to_string(),
                message: format!(
                    "Blend map covers {} layers but atlas has {}",
                    blend_map.layers(),
                    atlas.layers()
                ),
            });
        }
        Ok(Self {
            blend_map,
            atlas,
            seam_margin,
            saturation: 1.0,
            intensity: 1.0,
            mode: RenderMode::TexturedColormap,
        })
    }

    /// Number of texture layers in play
    pub fn layers(&self) -> usize {
        self.atlas.layers()
    }

    /// Resolve one fragment.
    ///
    /// `blend_coord` selects per-layer weights from the blend map; `uv` is
    /// the tile-local texture coordinate. With zero layers (or no layer
    /// carrying weight) texture compositing is skipped entirely and the
    /// base color comes through unchanged. Weights that sum above 1.0 are
    /// not renormalized; the final channels are clamped instead.
    pub fn shade(&self, base_color: [f32; 3], blend_coord: f32, uv: (f32, f32)) -> [f32; 3] {
        if self.atlas.layers() == 0 {
            return base_color;
        }

        let weights = self.blend_map.weights(blend_coord);
        let mut texture = [0.0f32; 3];
        let mut covered = false;
        for (layer, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            covered = true;
            let sample = self
                .atlas
                .sample_seam_blended(layer, uv.0, uv.1, self.seam_margin);
            for c in 0..3 {
                texture[c] += sample[c] * weight;
            }
        }
        if !covered {
            return base_color;
        }

        // Saturation: pull toward the luminance gray; intensity: pull
        // toward white
        let gray = luminance(texture);
        let mut rgb = [0.0f32; 3];
        for c in 0..3 {
            let saturated = gray + (texture[c] - gray) * self.saturation;
            rgb[c] = 1.0 + (saturated - 1.0) * self.intensity;
        }

        let out = match self.mode {
            RenderMode::Opaque => rgb,
            RenderMode::TexturedColormap => [
                base_color[0] * rgb[0],
                base_color[1] * rgb[1],
                base_color[2] * rgb[2],
            ],
        };
        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
        ]
    }

    /// Render the editor-preview strip: blend coordinate sweeps left to
    /// right, tiles repeat every `height` pixels horizontally.
    pub fn render_preview(&self, base: &Colormap, width: u32, height: u32) -> RgbaImage {
        let width = width.max(1);
        let height = height.max(1);
        debug!(
            width = width,
            height = height,
            layers = self.layers(),
            "Rendering compositor preview"
        );

        let mut img = ImageBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let t = x as f32 / width as f32;
                let base_color = base.lookup_color(t);
                let u = x as f32 / height as f32;
                let v = y as f32 / height as f32;
                let rgb = self.shade(base_color, t, (u, v));
                img.put_pixel(
                    x,
                    y,
                    Rgba([
                        (rgb[0] * 255.0).round().clamp(0.0, 255.0) as u8,
                        (rgb[1] * 255.0).round().clamp(0.0, 255.0) as u8,
                        (rgb[2] * 255.0).round().clamp(0.0, 255.0) as u8,
                        255,
                    ]),
                );
            }
        }
        img
    }
}

fn luminance(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::{AssetCategory, Side, VisAssetGradient};
    use uuid::Uuid;

    fn solid_tile(rgba: [u8; 4]) -> RgbaImage {
        let mut img = RgbaImage::new(8, 8);
        for pixel in img.pixels_mut() {
            pixel.0 = rgba;
        }
        img
    }

    fn texture_gradient(count: usize) -> VisAssetGradient {
        let mut gradient = VisAssetGradient::new(Uuid::new_v4(), AssetCategory::Texture);
        for _ in 0..count {
            gradient
                .insert_stop(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
                .unwrap();
        }
        gradient
    }

    fn red_blue_compositor() -> Compositor {
        let gradient = texture_gradient(2);
        let blend_map = BlendMap::from_gradient(&gradient, 1024, 0.01).unwrap();
        let red = solid_tile([255, 0, 0, 255]);
        let blue = solid_tile([0, 0, 255, 255]);
        let atlas = LayerAtlas::new(&[&red, &blue]).unwrap();
        Compositor::new(blend_map, atlas, 0.1).unwrap()
    }

    #[test]
    fn test_zero_layers_falls_back_to_base_color() {
        let gradient = texture_gradient(0);
        let blend_map = BlendMap::from_gradient(&gradient, 64, 0.01).unwrap();
        let atlas = LayerAtlas::new(&[]).unwrap();
        let compositor = Compositor::new(blend_map, atlas, 0.1).unwrap();

        let base = [0.3, 0.5, 0.7];
        assert_eq!(compositor.shade(base, 0.5, (0.5, 0.5)), base);
    }

    #[test]
    fn test_layer_count_mismatch_rejected() {
        let gradient = texture_gradient(2);
        let blend_map = BlendMap::from_gradient(&gradient, 64, 0.01).unwrap();
        let tile = solid_tile([255, 255, 255, 255]);
        let atlas = LayerAtlas::new(&[&tile]).unwrap();
        assert!(Compositor::new(blend_map, atlas, 0.1).is_err());
    }

    #[test]
    fn test_opaque_mode_selects_the_weighted_layer() {
        let mut compositor = red_blue_compositor();
        compositor.mode = RenderMode::Opaque;

        let left = compositor.shade([1.0, 1.0, 1.0], 0.25, (0.5, 0.5));
        assert!(left[0] > 0.99 && left[2] < 0.01, "left was {:?}", left);

        let right = compositor.shade([1.0, 1.0, 1.0], 0.75, (0.5, 0.5));
        assert!(right[2] > 0.99 && right[0] < 0.01, "right was {:?}", right);
    }

    #[test]
    fn test_boundary_mixes_both_layers() {
        let mut compositor = red_blue_compositor();
        compositor.mode = RenderMode::Opaque;

        let mid = compositor.shade([1.0, 1.0, 1.0], 0.5, (0.5, 0.5));
        assert!(mid[0] > 0.2 && mid[2] > 0.2, "boundary was {:?}", mid);
    }

    #[test]
    fn test_multiply_mode_modulates_base() {
        let compositor = red_blue_compositor();
        assert_eq!(compositor.mode, RenderMode::TexturedColormap);

        // Red texture over a green base multiplies to black
        let out = compositor.shade([0.0, 1.0, 0.0], 0.25, (0.5, 0.5));
        assert!(out[0] < 0.01 && out[1] < 0.01 && out[2] < 0.01, "out was {:?}", out);

        // Red texture over a white base stays red
        let out = compositor.shade([1.0, 1.0, 1.0], 0.25, (0.5, 0.5));
        assert!(out[0] > 0.99 && out[1] < 0.01);
    }

    #[test]
    fn test_zero_saturation_is_grayscale() {
        let mut compositor = red_blue_compositor();
        compositor.mode = RenderMode::Opaque;
        compositor.saturation = 0.0;

        let out = compositor.shade([1.0, 1.0, 1.0], 0.25, (0.5, 0.5));
        assert!((out[0] - out[1]).abs() < 1e-6);
        assert!((out[1] - out[2]).abs() < 1e-6);
        // Red's luminance
        assert!((out[0] - 0.2126).abs() < 0.01);
    }

    #[test]
    fn test_zero_intensity_is_white() {
        let mut compositor = red_blue_compositor();
        compositor.mode = RenderMode::Opaque;
        compositor.intensity = 0.0;

        let out = compositor.shade([1.0, 1.0, 1.0], 0.25, (0.5, 0.5));
        assert_eq!(out, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_over_unity_weights_are_not_renormalized() {
        let gradient = texture_gradient(2);
        let mut blend_map = BlendMap::from_gradient(&gradient, 64, 0.01).unwrap();
        // Force both layers to full weight everywhere: overlapping groups
        // are summed as-is, over-brightening instead of renormalizing
        blend_map.data_mut().fill(1.0);

        let white = solid_tile([128, 128, 128, 255]);
        let atlas = LayerAtlas::new(&[&white, &white]).unwrap();
        let mut compositor = Compositor::new(blend_map, atlas, 0.1).unwrap();
        compositor.mode = RenderMode::Opaque;

        // Two layers of 0.502 gray at weight 1.0 each sum past 1.0 and
        // clamp at the channel level
        let out = compositor.shade([0.0, 0.0, 0.0], 0.5, (0.5, 0.5));
        assert_eq!(out, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_preview_dimensions_and_determinism() {
        let compositor = red_blue_compositor();
        let mut base = Colormap::new();
        base.add_control_point(0.0, [1.0, 1.0, 1.0]);

        let a = compositor.render_preview(&base, 64, 16);
        let b = compositor.render_preview(&base, 64, 16);
        assert_eq!(a.dimensions(), (64, 16));
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
