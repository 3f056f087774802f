//! Transfer-function blend maps and the layer compositor.
//!
//! Up to [`MAX_LAYERS`] texture layers stack into one atlas; a precomputed
//! blend-map texture packs per-layer weights four to a row group (one RGBA
//! channel each), and the compositor resolves a blend coordinate plus a
//! tile-local UV into a single seam-blended color. The same function backs
//! the editor preview and the shader-side semantics, so both paths match.

pub mod atlas;
pub mod blend_map;
pub mod compositor;

/// Maximum number of stacked texture layers (the shader's stacking limit).
pub const MAX_LAYERS: usize = 16;

/// Layers packed per blend-map row group, one per RGBA channel.
pub const LAYERS_PER_GROUP: usize = 4;

pub use atlas::{placeholder_tile, LayerAtlas};
pub use blend_map::BlendMap;
pub use compositor::{Compositor, RenderMode};
