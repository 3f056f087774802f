//! Error types for the colorloom engine.
//!
//! This module defines a comprehensive error enum that covers all possible
//! error conditions across the colormap, gradient, and compositing layers.

use thiserror::Error;

/// The main error type for colorloom operations.
#[derive(Error, Debug)]
pub enum ColorloomError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed descriptor errors (structural invariant violations)
    #[error("Malformed descriptor: {message}")]
    MalformedDescriptor { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Gradient capacity exceeded (asset count would pass the layer cap)
    #[error("Gradient capacity exceeded: {count} assets, maximum is {max}")]
    GradientCapacity { count: usize, max: usize },

    /// Asset category does not match the gradient's declared type
    #[error("Category mismatch: gradient is {expected}, asset is {actual}")]
    CategoryMismatch { expected: String, actual: String },

    /// Referenced asset not present in the gradient
    #[error("Asset not found: {uuid}")]
    AssetNotFound { uuid: String },

    /// Primitive value parse errors
    #[error("Invalid primitive value: {value} - {message}")]
    InvalidPrimitive { value: String, message: String },

    /// Colormap XML parse/write errors
    #[error("Colormap XML error: {message}")]
    ColormapXml { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with ColorloomError
pub type Result<T> = std::result::Result<T, ColorloomError>;
