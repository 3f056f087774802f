//! # colorloom
//!
//! A colormap, gradient, and transfer-function compositing engine for
//! scientific visualization.
//!
//! This library provides the core data model and numerics for composing
//! visualizations out of hand-authored colormaps, textures, lines, and
//! glyphs: perceptually-interpolated color transfer functions, gradient
//! descriptors with movable blend boundaries, and the blend-map compositor
//! that resolves stacked texture layers into per-fragment colors.
//!
//! ## Key Features
//!
//! - **Lab-space colormaps**: control-point transfer functions interpolated
//!   in CIE-Lab, with XML round-trip and raster strip rendering
//! - **Gradient descriptors**: primitive (opacity) and VisAsset gradients
//!   with invariant-preserving structural edits
//! - **Blend-map compositing**: up to 16 stacked texture layers resolved
//!   through grouped weight maps, with seam and corner blending
//! - **Range normalization**: layered per-variable and per-key-data range
//!   resolution with clamped remapping
//!
//! ## Architecture
//!
//! - **Color layer**: pure sRGB ↔ CIE-Lab conversion underneath everything
//! - **Descriptor layer**: colormaps and gradients as value-like documents
//!   loaded from and written back to a persisted state store
//! - **Compositing layer**: blend maps, the layer atlas, and the
//!   per-fragment compositor shared by editor preview and shader semantics

pub mod blend;
pub mod color;
pub mod colormap;
pub mod config;
pub mod error;
pub mod gradient;
pub mod logging;
pub mod range;
pub mod session;

pub use blend::{BlendMap, Compositor, LayerAtlas, RenderMode, MAX_LAYERS};
pub use colormap::{ColorPoint, Colormap};
pub use config::Config;
pub use error::{ColorloomError, Result};
pub use gradient::{AssetCategory, PrimitiveGradient, Side, VisAssetGradient};
pub use logging::{init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation};
pub use range::{normalize, DataRange, RangeResolver};
pub use session::{EditorSession, GradientDescriptor};
