//! Editor session state.
//!
//! One session owns one descriptor under edit. The session object replaces
//! any module-level "current gradient" state: callers create it, thread it
//! through edit operations, and write the descriptor back wholesale when
//! done. Category dispatch is a tagged enum resolved by pattern match, not
//! a string-keyed handler table.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::colormap::Colormap;
use crate::error::{ColorloomError, Result};
use crate::gradient::{AssetCategory, PrimitiveGradient, Side, VisAssetGradient};

/// A descriptor under edit, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GradientDescriptor {
    /// A color transfer function
    Colormap { name: String, colormap: Colormap },
    /// A discrete composition of visual assets
    VisAsset { gradient: VisAssetGradient },
    /// An opacity/scalar map
    Primitive { gradient: PrimitiveGradient },
}

impl GradientDescriptor {
    /// Check the descriptor's structural invariants
    pub fn validate(&self) -> Result<()> {
        match self {
            GradientDescriptor::Colormap { .. } => Ok(()),
            GradientDescriptor::VisAsset { gradient } => gradient.validate(),
            GradientDescriptor::Primitive { gradient } => gradient.validate(),
        }
    }

    /// A short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GradientDescriptor::Colormap { .. } => "colormap",
            GradientDescriptor::VisAsset { .. } => "visAsset",
            GradientDescriptor::Primitive { .. } => "primitive",
        }
    }
}

/// A single active editing session for one descriptor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    uuid: Uuid,
    descriptor: GradientDescriptor,
    dirty: bool,
}

impl EditorSession {
    /// Open a session over a descriptor.
    ///
    /// Malformed descriptors are refused outright (a blocking validation
    /// error), never auto-repaired.
    pub fn open(uuid: Uuid, descriptor: GradientDescriptor) -> Result<Self> {
        descriptor.validate()?;
        info!(
            uuid = %uuid,
            kind = descriptor.kind(),
            "Opening editor session"
        );
        Ok(Self {
            uuid,
            descriptor,
            dirty: false,
        })
    }

    /// Open a session from a persisted JSON descriptor subtree
    pub fn open_json(uuid: Uuid, json: &str) -> Result<Self> {
        let descriptor: GradientDescriptor = serde_json::from_str(json)?;
        Self::open(uuid, descriptor)
    }

    /// The descriptor's identity in the persisted state document
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The descriptor under edit
    pub fn descriptor(&self) -> &GradientDescriptor {
        &self.descriptor
    }

    /// Whether any mutation has been applied since open/save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialize the descriptor subtree for a wholesale write-back, and
    /// mark the session clean
    pub fn save_json(&mut self) -> Result<String> {
        let json = serde_json::to_string(&self.descriptor)?;
        self.dirty = false;
        Ok(json)
    }

    /// Insert a control point into a colormap descriptor
    pub fn add_control_point(&mut self, position: f32, color: [f32; 3]) -> Result<()> {
        let colormap = self.colormap_mut()?;
        colormap.add_control_point(position, color);
        self.dirty = true;
        Ok(())
    }

    /// Flip a colormap descriptor
    pub fn flip_colormap(&mut self) -> Result<()> {
        let colormap = self.colormap_mut()?;
        colormap.flip();
        self.dirty = true;
        Ok(())
    }

    /// Drop a new asset into a VisAsset gradient next to `adjacent`.
    ///
    /// Returns whether the drop was applied. A category mismatch is the
    /// one rejection that is not an error here: the drop is ignored with a
    /// debug log, matching the editor's drag-and-drop ergonomics. Every
    /// other failure (capacity, unknown adjacent, wrong descriptor kind)
    /// surfaces as an error and leaves the gradient untouched.
    pub fn drop_asset(
        &mut self,
        asset: Uuid,
        category: AssetCategory,
        adjacent: Option<Uuid>,
        side: Side,
    ) -> Result<bool> {
        let uuid = self.uuid;
        let gradient = self.visasset_mut()?;
        match gradient.insert_stop(asset, category, adjacent, side) {
            Ok(()) => {
                self.dirty = true;
                Ok(true)
            }
            Err(ColorloomError::CategoryMismatch { expected, actual }) => {
                debug!(
                    uuid = %uuid,
                    expected = %expected,
                    actual = %actual,
                    "Ignoring drop of mismatched asset category"
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove an asset from a VisAsset gradient
    pub fn remove_asset(&mut self, asset: Uuid) -> Result<()> {
        self.visasset_mut()?.remove_stop(asset)?;
        self.dirty = true;
        Ok(())
    }

    /// Replace an asset in a VisAsset gradient. Category mismatches are
    /// ignored with a debug log, like [`Self::drop_asset`].
    pub fn replace_asset(
        &mut self,
        old_asset: Uuid,
        new_asset: Uuid,
        category: AssetCategory,
    ) -> Result<bool> {
        let uuid = self.uuid;
        let gradient = self.visasset_mut()?;
        match gradient.replace_stop(old_asset, new_asset, category) {
            Ok(()) => {
                self.dirty = true;
                Ok(true)
            }
            Err(ColorloomError::CategoryMismatch { expected, actual }) => {
                debug!(
                    uuid = %uuid,
                    expected = %expected,
                    actual = %actual,
                    "Ignoring replacement with mismatched asset category"
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Move a boundary in a VisAsset gradient
    pub fn resize_boundary(&mut self, asset_index: usize, new_boundary: f32) -> Result<()> {
        self.visasset_mut()?
            .resize_boundary(asset_index, new_boundary)?;
        self.dirty = true;
        Ok(())
    }

    /// Add a stop to a primitive gradient
    pub fn add_primitive_stop(&mut self, point: f32, value: &str) -> Result<()> {
        self.primitive_mut()?.add_stop(point, value);
        self.dirty = true;
        Ok(())
    }

    fn colormap_mut(&mut self) -> Result<&mut Colormap> {
        match &mut self.descriptor {
            GradientDescriptor::Colormap { colormap, .. } => Ok(colormap),
            other => Err(wrong_kind("colormap", other.kind())),
        }
    }

    fn visasset_mut(&mut self) -> Result<&mut VisAssetGradient> {
        match &mut self.descriptor {
            GradientDescriptor::VisAsset { gradient } => Ok(gradient),
            other => Err(wrong_kind("visAsset", other.kind())),
        }
    }

    fn primitive_mut(&mut self) -> Result<&mut PrimitiveGradient> {
        match &mut self.descriptor {
            GradientDescriptor::Primitive { gradient } => Ok(gradient),
            other => Err(wrong_kind("primitive", other.kind())),
        }
    }
}

fn wrong_kind(wanted: &str, actual: &str) -> ColorloomError {
    ColorloomError::InvalidParameter {
        param: "descriptor".to_string(),
        message: format!("Operation needs a {} descriptor, session holds {}", wanted, actual),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visasset_session() -> EditorSession {
        let uuid = Uuid::new_v4();
        let gradient = VisAssetGradient::new(uuid, AssetCategory::Texture);
        EditorSession::open(uuid, GradientDescriptor::VisAsset { gradient }).unwrap()
    }

    #[test]
    fn test_open_rejects_malformed_descriptor() {
        let uuid = Uuid::new_v4();
        let mut gradient = VisAssetGradient::new(uuid, AssetCategory::Texture);
        gradient.vis_assets = vec![Uuid::new_v4(), Uuid::new_v4()];
        gradient.points = vec![]; // missing boundary

        let result = EditorSession::open(uuid, GradientDescriptor::VisAsset { gradient });
        assert!(matches!(
            result,
            Err(ColorloomError::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_drop_asset_applies_and_dirties() {
        let mut session = visasset_session();
        assert!(!session.is_dirty());

        let applied = session
            .drop_asset(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
            .unwrap();
        assert!(applied);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_mismatched_drop_is_a_silent_no_op() {
        let mut session = visasset_session();
        session
            .drop_asset(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
            .unwrap();
        let mut clean = session.clone();
        clean.save_json().unwrap();

        let applied = clean
            .drop_asset(Uuid::new_v4(), AssetCategory::Glyph, None, Side::Right)
            .unwrap();
        assert!(!applied);
        assert!(!clean.is_dirty());
    }

    #[test]
    fn test_capacity_error_propagates() {
        let mut session = visasset_session();
        for _ in 0..16 {
            session
                .drop_asset(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
                .unwrap();
        }
        let result =
            session.drop_asset(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right);
        assert!(matches!(
            result,
            Err(ColorloomError::GradientCapacity { .. })
        ));
    }

    #[test]
    fn test_colormap_ops_require_colormap_descriptor() {
        let mut session = visasset_session();
        assert!(session.add_control_point(0.5, [1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_descriptor_json_roundtrip() {
        let uuid = Uuid::new_v4();
        let mut colormap = Colormap::new();
        colormap.add_control_point(0.0, [0.0, 0.0, 0.0]);
        colormap.add_control_point(1.0, [1.0, 1.0, 1.0]);

        let mut session = EditorSession::open(
            uuid,
            GradientDescriptor::Colormap {
                name: "Grayscale".to_string(),
                colormap,
            },
        )
        .unwrap();

        let json = session.save_json().unwrap();
        assert!(json.contains(r#""kind":"colormap""#));

        let reopened = EditorSession::open_json(uuid, &json).unwrap();
        assert_eq!(reopened.descriptor(), session.descriptor());
    }

    #[test]
    fn test_save_clears_dirty() {
        let mut session = visasset_session();
        session
            .drop_asset(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
            .unwrap();
        assert!(session.is_dirty());
        session.save_json().unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_primitive_session_ops() {
        let uuid = Uuid::new_v4();
        let mut session = EditorSession::open(
            uuid,
            GradientDescriptor::Primitive {
                gradient: PrimitiveGradient::new(),
            },
        )
        .unwrap();

        session.add_primitive_stop(0.0, "0%").unwrap();
        session.add_primitive_stop(1.0, "100%").unwrap();
        assert!(session.is_dirty());

        match session.descriptor() {
            GradientDescriptor::Primitive { gradient } => {
                assert_eq!(gradient.len(), 2);
            }
            other => panic!("unexpected descriptor: {:?}", other),
        }
    }
}
