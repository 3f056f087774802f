//! Color space conversion for perceptual colormap interpolation.
//!
//! Colormap control points are interpolated in CIE-Lab rather than raw RGB
//! to avoid muddy intermediate hues.

pub mod space;

pub use space::{lab_to_rgb, perceptual_distance, rgb_to_lab};
