//! colorloom - render colormap and gradient descriptors to PNG strips
//!
//! This is the command-line entry point: it loads a colormap XML file or a
//! gradient JSON descriptor and writes the rendered lookup strip out as a
//! PNG.

use anyhow::Context;
use tracing::info;

use colorloom::colormap::{self, xml};
use colorloom::gradient::PrimitiveGradient;
use colorloom::{Colormap, Config};

fn main() -> anyhow::Result<()> {
    let (config, args) = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    colorloom::init_tracing(&config.log_level);
    info!("Starting colorloom v{}", env!("CARGO_PKG_VERSION"));

    let raw = std::fs::read_to_string(&args.descriptor)
        .with_context(|| format!("Failed to read descriptor {:?}", args.descriptor))?;

    let (label, map) = load_descriptor(&raw)
        .with_context(|| format!("Failed to parse descriptor {:?}", args.descriptor))?;

    info!(
        name = %label,
        points = map.len(),
        "Loaded descriptor"
    );

    let width = config.raster.strip_width;
    let height = config.raster.thumb_height;
    let strip = colorloom::log_timed_operation("render_strip", || {
        colormap::render_thumbnail(&map, width, height)
    });
    strip
        .save(&args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    info!(
        output = %args.output.display(),
        width = width,
        height = height,
        "Strip written"
    );
    Ok(())
}

/// Accept either the ColorMaps XML format or a primitive-gradient JSON
/// descriptor, by sniffing the leading non-whitespace character.
fn load_descriptor(raw: &str) -> anyhow::Result<(String, Colormap)> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('<') {
        let (name, map) = xml::from_xml(raw)?;
        Ok((name, map))
    } else {
        let gradient: PrimitiveGradient = serde_json::from_str(raw)?;
        let map = gradient.to_opacity_colormap()?;
        Ok(("opacity gradient".to_string(), map))
    }
}
