//! VisAsset gradients: discrete visual assets composed across [0, 1].
//!
//! A VisAsset gradient orders up to [`crate::blend::MAX_LAYERS`] asset
//! references along the blend domain, with `vis_assets.len() - 1` boundary
//! positions between them. Boundaries are strictly ascending and every
//! mutation preserves that invariant or leaves the gradient untouched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blend::MAX_LAYERS;
use crate::error::{ColorloomError, Result};

/// Minimum width of a gradient segment, twice the default blend-map
/// boundary feather, so no segment collapses below the crossfade region.
pub const MIN_SEGMENT_WIDTH: f32 = 0.02;

/// The asset categories a gradient can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Glyph,
    Line,
    Texture,
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::Glyph => write!(f, "glyph"),
            AssetCategory::Line => write!(f, "line"),
            AssetCategory::Texture => write!(f, "texture"),
        }
    }
}

/// Which side of the adjacent asset a new stop lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// An ordered composition of discrete VisAssets across the [0, 1] domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisAssetGradient {
    /// Identity of this gradient in the persisted state document
    pub uuid: Uuid,
    /// Category every member asset must share
    pub gradient_type: AssetCategory,
    /// Always "discrete" for asset gradients
    #[serde(default = "default_gradient_scale")]
    pub gradient_scale: String,
    /// Boundary positions, strictly ascending, one fewer than assets
    pub points: Vec<f32>,
    /// Member asset UUIDs in display order
    pub vis_assets: Vec<Uuid>,
}

fn default_gradient_scale() -> String {
    "discrete".to_string()
}

impl VisAssetGradient {
    /// Create an empty gradient of the given category
    pub fn new(uuid: Uuid, gradient_type: AssetCategory) -> Self {
        Self {
            uuid,
            gradient_type,
            gradient_scale: default_gradient_scale(),
            points: Vec::new(),
            vis_assets: Vec::new(),
        }
    }

    /// Check the structural invariants.
    ///
    /// Violations are blocking: a malformed descriptor is refused, not
    /// auto-repaired.
    pub fn validate(&self) -> Result<()> {
        let expected = self.vis_assets.len().saturating_sub(1);
        if self.points.len() != expected {
            return Err(ColorloomError::MalformedDescriptor {
                message: format!(
                    "Gradient {} has {} assets but {} boundaries (expected {})",
                    self.uuid,
                    self.vis_assets.len(),
                    self.points.len(),
                    expected
                ),
            });
        }
        if self.vis_assets.len() > MAX_LAYERS {
            return Err(ColorloomError::GradientCapacity {
                count: self.vis_assets.len(),
                max: MAX_LAYERS,
            });
        }
        for pair in self.points.windows(2) {
            if pair[0] >= pair[1] {
                return Err(ColorloomError::MalformedDescriptor {
                    message: format!(
                        "Gradient {} boundaries are not strictly ascending: {} then {}",
                        self.uuid, pair[0], pair[1]
                    ),
                });
            }
        }
        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            if *first <= 0.0 || *last >= 1.0 {
                return Err(ColorloomError::MalformedDescriptor {
                    message: format!(
                        "Gradient {} boundaries fall outside (0, 1)",
                        self.uuid
                    ),
                });
            }
        }
        Ok(())
    }

    /// Number of member assets
    pub fn len(&self) -> usize {
        self.vis_assets.len()
    }

    /// Whether the gradient has no member assets
    pub fn is_empty(&self) -> bool {
        self.vis_assets.is_empty()
    }

    /// The segment bounds `[left, right]` of the asset at `index`
    pub fn segment_bounds(&self, index: usize) -> (f32, f32) {
        let left = if index == 0 {
            0.0
        } else {
            self.points[index - 1]
        };
        let right = if index + 1 == self.vis_assets.len() {
            1.0
        } else {
            self.points[index]
        };
        (left, right)
    }

    /// The index of the asset whose segment covers blend coordinate `t`
    pub fn segment_of(&self, t: f32) -> Option<usize> {
        if self.vis_assets.is_empty() {
            return None;
        }
        let index = self
            .points
            .iter()
            .position(|&boundary| t < boundary)
            .unwrap_or(self.points.len());
        Some(index)
    }

    /// Insert a new asset next to `adjacent`.
    ///
    /// The new boundary is the midpoint of the adjacent asset's segment,
    /// so the insert splits that segment in two. With `adjacent` absent
    /// the asset is appended after the last stop. Inserting into an empty
    /// gradient adopts the asset's category. Fails without mutating on
    /// capacity overflow, category mismatch, or an unknown adjacent asset.
    pub fn insert_stop(
        &mut self,
        asset: Uuid,
        category: AssetCategory,
        adjacent: Option<Uuid>,
        side: Side,
    ) -> Result<()> {
        if self.vis_assets.len() >= MAX_LAYERS {
            return Err(ColorloomError::GradientCapacity {
                count: self.vis_assets.len(),
                max: MAX_LAYERS,
            });
        }

        if self.vis_assets.is_empty() {
            self.gradient_type = category;
            self.vis_assets.push(asset);
            return Ok(());
        }

        if category != self.gradient_type {
            return Err(ColorloomError::CategoryMismatch {
                expected: self.gradient_type.to_string(),
                actual: category.to_string(),
            });
        }

        let (anchor, side) = match adjacent {
            Some(uuid) => (self.index_of(uuid)?, side),
            None => (self.vis_assets.len() - 1, Side::Right),
        };

        let (left, right) = self.segment_bounds(anchor);
        let boundary = (left + right) / 2.0;

        // Boundary index `anchor` separates the anchor's segment from the
        // new asset's half, whichever side the asset lands on.
        match side {
            Side::Left => self.vis_assets.insert(anchor, asset),
            Side::Right => self.vis_assets.insert(anchor + 1, asset),
        }
        self.points.insert(anchor, boundary);

        Ok(())
    }

    /// Remove an asset, merging its segment into the left neighbor when one
    /// exists, otherwise the right neighbor.
    pub fn remove_stop(&mut self, asset: Uuid) -> Result<()> {
        let index = self.index_of(asset)?;
        self.vis_assets.remove(index);
        if index > 0 {
            self.points.remove(index - 1);
        } else if !self.points.is_empty() {
            self.points.remove(0);
        }
        Ok(())
    }

    /// Swap one asset for another of the same category.
    ///
    /// An empty gradient adopts the replacement's category instead; a
    /// category mismatch fails without mutating.
    pub fn replace_stop(
        &mut self,
        old_asset: Uuid,
        new_asset: Uuid,
        category: AssetCategory,
    ) -> Result<()> {
        if self.vis_assets.is_empty() {
            self.gradient_type = category;
            self.vis_assets.push(new_asset);
            return Ok(());
        }

        if category != self.gradient_type {
            return Err(ColorloomError::CategoryMismatch {
                expected: self.gradient_type.to_string(),
                actual: category.to_string(),
            });
        }

        let index = self.index_of(old_asset)?;
        self.vis_assets[index] = new_asset;
        Ok(())
    }

    /// Move the boundary to the right of the asset at `asset_index`,
    /// clamped a minimum segment width away from both neighbors.
    pub fn resize_boundary(&mut self, asset_index: usize, new_boundary: f32) -> Result<()> {
        if asset_index >= self.points.len() {
            return Err(ColorloomError::InvalidParameter {
                param: "asset_index".to_string(),
                message: format!(
                    "No boundary at index {} ({} boundaries)",
                    asset_index,
                    self.points.len()
                ),
            });
        }

        let left = if asset_index == 0 {
            0.0
        } else {
            self.points[asset_index - 1]
        };
        let right = if asset_index + 1 == self.points.len() {
            1.0
        } else {
            self.points[asset_index + 1]
        };

        let lo = left + MIN_SEGMENT_WIDTH;
        let hi = right - MIN_SEGMENT_WIDTH;
        self.points[asset_index] = if lo <= hi {
            new_boundary.clamp(lo, hi)
        } else {
            // Neighbors already closer than two minimum segments; split
            // the difference rather than inverting the clamp range
            (left + right) / 2.0
        };

        Ok(())
    }

    fn index_of(&self, asset: Uuid) -> Result<usize> {
        self.vis_assets
            .iter()
            .position(|&uuid| uuid == asset)
            .ok_or_else(|| ColorloomError::AssetNotFound {
                uuid: asset.to_string(),
            })
    }
}
