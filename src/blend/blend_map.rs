//! Blend-map texture construction and weight lookup.
//!
//! A blend map is a 2D texture encoding, per blend coordinate and per RGBA
//! channel, the weight of one layer. Layers pack four to a row group (the
//! hardware constraint of 4 channels per lookup); group `g` holds layers
//! `4g .. 4g+3` and is sampled at the vertical center of its rows.

use ndarray::Array3;

use super::{LAYERS_PER_GROUP, MAX_LAYERS};
use crate::error::{ColorloomError, Result};
use crate::gradient::VisAssetGradient;

/// Rows per group in the generated texture.
const GROUP_HEIGHT: usize = 4;

/// A precomputed per-layer weight texture over the [0, 1] blend domain.
#[derive(Debug, Clone)]
pub struct BlendMap {
    layers: usize,
    width: usize,
    /// (groups * GROUP_HEIGHT, width, 4)
    data: Array3<f32>,
}

impl BlendMap {
    /// Build a blend map from a gradient's segment boundaries.
    ///
    /// Each layer's weight is 1 inside its segment and crossfades linearly
    /// to the neighboring layer across a feather-wide band centered on each
    /// boundary. The crossfades partition unity, so weights sum to 1 at
    /// every coordinate.
    pub fn from_gradient(
        gradient: &VisAssetGradient,
        width: usize,
        feather: f32,
    ) -> Result<Self> {
        gradient.validate()?;
        if width == 0 {
            return Err(ColorloomError::InvalidParameter {
                param: "width".to_string(),
                message: "Blend map width cannot be 0".to_string(),
            });
        }
        if feather <= 0.0 {
            return Err(ColorloomError::InvalidParameter {
                param: "feather".to_string(),
                message: format!("Boundary feather must be positive, got {}", feather),
            });
        }

        let layers = gradient.len();
        let groups = layers.div_ceil(LAYERS_PER_GROUP).max(1);
        let mut data = Array3::zeros((groups * GROUP_HEIGHT, width, 4));

        for layer in 0..layers {
            let (left, right) = gradient.segment_bounds(layer);
            let group = layer / LAYERS_PER_GROUP;
            let channel = layer % LAYERS_PER_GROUP;
            let interior = layer + 1 < layers;

            for x in 0..width {
                let t = x as f32 / (width - 1).max(1) as f32;
                let weight = segment_weight(t, left, right, feather, layer > 0, interior);
                for row in 0..GROUP_HEIGHT {
                    data[[group * GROUP_HEIGHT + row, x, channel]] = weight;
                }
            }
        }

        Ok(Self {
            layers,
            width,
            data,
        })
    }

    /// Number of layers this map covers
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// The raw texture data, `(groups * group_height, width, 4)`
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    /// Aggregate the flat per-layer weight array at a blend coordinate.
    ///
    /// Mirrors the shader lookup: each group is sampled once at the center
    /// row of its band, and the four channel values of that sample are the
    /// weights of the group's layers.
    pub fn weights(&self, blend_coord: f32) -> Vec<f32> {
        let t = blend_coord.clamp(0.0, 1.0);
        let col = ((t * (self.width - 1) as f32).round() as usize).min(self.width - 1);

        let mut weights = Vec::with_capacity(self.layers);
        for layer in 0..self.layers {
            let group = layer / LAYERS_PER_GROUP;
            let channel = layer % LAYERS_PER_GROUP;
            let row = group * GROUP_HEIGHT + GROUP_HEIGHT / 2;
            weights.push(self.data[[row, col, channel]]);
        }
        weights
    }
}

/// Weight of a segment `[left, right]` at coordinate `t`, with linear
/// crossfades of width `feather` centered on interior boundaries. Domain
/// edges (left == 0, right == 1) are not feathered.
fn segment_weight(
    t: f32,
    left: f32,
    right: f32,
    feather: f32,
    feather_left: bool,
    feather_right: bool,
) -> f32 {
    let rise = if feather_left {
        ramp((t - left) / feather + 0.5)
    } else if t >= left {
        1.0
    } else {
        0.0
    };
    let fall = if feather_right {
        ramp((right - t) / feather + 0.5)
    } else if t <= right {
        1.0
    } else {
        0.0
    };
    rise * fall
}

fn ramp(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}
