//! Control-point colormaps.
//!
//! A colormap is an ordered list of (position, color) control points with
//! Lab-space interpolated lookup, XML round-trip serialization, and raster
//! strip rendering for thumbnails and GPU lookup textures.

pub mod control;
pub mod raster;
pub mod xml;

pub use control::{ColorPoint, Colormap};
pub use raster::{encode_png_base64, render_strip, render_thumbnail};
