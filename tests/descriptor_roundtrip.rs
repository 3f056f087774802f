//! Integration tests for colorloom
//!
//! These tests exercise the descriptor formats and the full
//! normalize-lookup-composite pipeline end to end, through the filesystem
//! where the real system would go through the state store.

use pretty_assertions::assert_eq;
use uuid::Uuid;

use colorloom::blend::{BlendMap, Compositor, LayerAtlas, RenderMode};
use colorloom::colormap::{render_strip, xml};
use colorloom::gradient::{AssetCategory, PrimitiveGradient, Side, VisAssetGradient};
use colorloom::range::{DataRange, RangeResolver};
use colorloom::{Colormap, EditorSession, GradientDescriptor};

fn write_and_read_back(contents: &str, file_name: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, contents).unwrap();
    std::fs::read_to_string(&path).unwrap()
}

#[test]
fn test_colormap_xml_file_roundtrip() {
    let mut cm = Colormap::new();
    cm.add_control_point(0.0, [0.231, 0.298, 0.753]);
    cm.add_control_point(0.5, [0.865, 0.865, 0.865]);
    cm.add_control_point(1.0, [0.706, 0.016, 0.150]);

    let written = xml::to_xml(&cm, "CoolWarm").unwrap();
    let raw = write_and_read_back(&written, "coolwarm.xml");
    let (name, reloaded) = xml::from_xml(&raw).unwrap();

    assert_eq!(name, "CoolWarm");
    assert_eq!(reloaded.len(), 3);
    for (a, b) in reloaded.points().iter().zip(cm.points()) {
        assert!((a.position - b.position).abs() < 1e-6);
        for c in 0..3 {
            assert!((a.color[c] - b.color[c]).abs() < 1e-6);
        }
    }
}

#[test]
fn test_gradient_descriptor_file_roundtrip_after_edits() {
    let uuid = Uuid::new_v4();
    let gradient = VisAssetGradient::new(uuid, AssetCategory::Texture);
    let mut session = EditorSession::open(uuid, GradientDescriptor::VisAsset { gradient }).unwrap();

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    session
        .drop_asset(first, AssetCategory::Texture, None, Side::Right)
        .unwrap();
    session
        .drop_asset(second, AssetCategory::Texture, Some(first), Side::Right)
        .unwrap();
    session.resize_boundary(0, 0.3).unwrap();

    let json = session.save_json().unwrap();
    let raw = write_and_read_back(&json, "gradient.json");
    let reopened = EditorSession::open_json(uuid, &raw).unwrap();

    match reopened.descriptor() {
        GradientDescriptor::VisAsset { gradient } => {
            assert_eq!(gradient.vis_assets, vec![first, second]);
            assert_eq!(gradient.points.len(), 1);
            assert!((gradient.points[0] - 0.3).abs() < 1e-6);
            assert!(gradient.validate().is_ok());
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[test]
fn test_malformed_descriptor_file_is_refused() {
    let raw = r#"{"kind":"primitive","gradient":{"points":[0.0,1.0],"values":["0%"]}}"#;
    let result = EditorSession::open_json(Uuid::new_v4(), raw);
    assert!(result.is_err());
}

#[test]
fn test_normalize_lookup_composite_pipeline() {
    // Raw scalar data with a configured global range
    let mut resolver = RangeResolver::new();
    resolver.set_global("pressure", DataRange::new(900.0, 1100.0));
    let observed = DataRange::observe(&[950.0, 1000.0, 1050.0]);

    // A black-to-white transfer function
    let mut cm = Colormap::new();
    cm.add_control_point(0.0, [0.0, 0.0, 0.0]);
    cm.add_control_point(1.0, [1.0, 1.0, 1.0]);

    // Two solid texture layers split at 0.5
    let mut gradient = VisAssetGradient::new(Uuid::new_v4(), AssetCategory::Texture);
    for _ in 0..2 {
        gradient
            .insert_stop(Uuid::new_v4(), AssetCategory::Texture, None, Side::Right)
            .unwrap();
    }
    let blend_map = BlendMap::from_gradient(&gradient, 1024, 0.01).unwrap();

    let mut red = image::RgbaImage::new(8, 8);
    let mut blue = image::RgbaImage::new(8, 8);
    for pixel in red.pixels_mut() {
        pixel.0 = [255, 0, 0, 255];
    }
    for pixel in blue.pixels_mut() {
        pixel.0 = [0, 0, 255, 255];
    }
    let atlas = LayerAtlas::new(&[&red, &blue]).unwrap();
    let mut compositor = Compositor::new(blend_map, atlas, 0.1).unwrap();
    compositor.mode = RenderMode::Opaque;

    // 950 hPa normalizes to 0.25 under the global range: the red layer
    let t = resolver.normalize("surface", "pressure", observed, 950.0);
    assert!((t - 0.25).abs() < 1e-6);
    let color = compositor.shade(cm.lookup_color(t), t, (0.5, 0.5));
    assert!(color[0] > 0.99 && color[2] < 0.01, "got {:?}", color);

    // 1100 hPa clamps to 1.0: the blue layer
    let t = resolver.normalize("surface", "pressure", observed, 1100.0);
    assert_eq!(t, 1.0);
    let color = compositor.shade(cm.lookup_color(t), t, (0.5, 0.5));
    assert!(color[2] > 0.99 && color[0] < 0.01, "got {:?}", color);
}

#[test]
fn test_opacity_gradient_drives_grayscale_strip() {
    let mut gradient = PrimitiveGradient::new();
    gradient.add_stop(0.0, "0%");
    gradient.add_stop(1.0, "100%");

    let cm = gradient.to_opacity_colormap().unwrap();
    let strip = render_strip(&cm, 64);

    let first = strip.get_pixel(0, 0).0;
    let last = strip.get_pixel(63, 0).0;
    assert_eq!(first, [0, 0, 0, 255]);
    assert!(last[0] > 250);
    // Grayscale throughout
    for x in 0..64 {
        let px = strip.get_pixel(x, 0).0;
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}
