//! Configuration management for colorloom.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ColorloomError, Result};

/// Command-line arguments for the colorloom strip renderer
#[derive(Parser, Debug)]
#[command(name = "colorloom")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a colormap XML file or gradient JSON descriptor
    pub descriptor: PathBuf,

    /// Output PNG path
    #[arg(short, long, env = "COLORLOOM_OUTPUT", default_value = "strip.png")]
    pub output: PathBuf,

    /// Strip width in pixels
    #[arg(short, long, env = "COLORLOOM_WIDTH")]
    pub width: Option<u32>,

    /// Strip height in pixels
    #[arg(long, env = "COLORLOOM_HEIGHT")]
    pub height: Option<u32>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "COLORLOOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COLORLOOM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Blend-map and compositing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Horizontal resolution of generated blend-map textures
    #[serde(default = "default_blend_map_width")]
    pub map_width: usize,

    /// Feather width of the crossfade at gradient segment boundaries,
    /// as a fraction of the [0, 1] blend domain
    #[serde(default = "default_boundary_feather")]
    pub boundary_feather: f32,

    /// Seam blending margin at tile edges, as a fraction of tile size
    #[serde(default = "default_seam_margin")]
    pub seam_margin: f32,
}

/// Raster strip rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Width of rendered lookup strips in pixels
    #[serde(default = "default_strip_width")]
    pub strip_width: u32,

    /// Height of rendered thumbnail strips in pixels
    #[serde(default = "default_thumb_height")]
    pub thumb_height: u32,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Blend-map and compositing configuration
    #[serde(default)]
    pub blend: BlendConfig,

    /// Raster strip configuration
    #[serde(default)]
    pub raster: RasterConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build configuration from already-parsed arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(width) = args.width {
            config.raster.strip_width = width;
        }
        if let Some(height) = args.height {
            config.raster.thumb_height = height;
        }
        config.log_level = args.log_level.clone();

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.blend = other.blend;
        self.raster = other.raster;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.blend.map_width == 0 {
            return Err(ColorloomError::Config {
                message: "Blend map width cannot be 0".to_string(),
            });
        }

        // The feather must leave room for the minimum segment width
        // (2x feather) times the maximum layer count
        if self.blend.boundary_feather <= 0.0
            || self.blend.boundary_feather * 2.0 * crate::blend::MAX_LAYERS as f32 >= 1.0
        {
            return Err(ColorloomError::Config {
                message: format!(
                    "Boundary feather {} leaves no room for {} segments",
                    self.blend.boundary_feather,
                    crate::blend::MAX_LAYERS
                ),
            });
        }

        // A seam margin of 0.5 or more would make opposite margins overlap
        if self.blend.seam_margin <= 0.0 || self.blend.seam_margin >= 0.5 {
            return Err(ColorloomError::Config {
                message: format!(
                    "Seam margin must be in (0, 0.5), got {}",
                    self.blend.seam_margin
                ),
            });
        }

        if self.raster.strip_width == 0 || self.raster.thumb_height == 0 {
            return Err(ColorloomError::Config {
                message: "Raster strip dimensions cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ColorloomError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blend: BlendConfig::default(),
            raster: RasterConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            map_width: default_blend_map_width(),
            boundary_feather: default_boundary_feather(),
            seam_margin: default_seam_margin(),
        }
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            strip_width: default_strip_width(),
            thumb_height: default_thumb_height(),
        }
    }
}

// Default value functions for serde
fn default_blend_map_width() -> usize {
    1024
}

fn default_boundary_feather() -> f32 {
    0.01
}

fn default_seam_margin() -> f32 {
    0.1
}

fn default_strip_width() -> u32 {
    512
}

fn default_thumb_height() -> u32 {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}
