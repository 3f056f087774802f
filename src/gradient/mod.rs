//! Gradient descriptors and their structural operations.
//!
//! Two descriptor families live here: primitive (opacity/scalar) gradients
//! made of paired point/value lists, and VisAsset gradients composing
//! discrete artist-authored assets across the [0, 1] domain with movable
//! boundaries.

pub mod primitive;
pub mod value;
pub mod visasset;

pub use primitive::PrimitiveGradient;
pub use value::{PrimitiveKind, PrimitiveValue};
pub use visasset::{AssetCategory, Side, VisAssetGradient, MIN_SEGMENT_WIDTH};
