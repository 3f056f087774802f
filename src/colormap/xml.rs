//! Colormap XML round-trip.
//!
//! The interchange format is the `<ColorMaps>` document:
//!
//! ```xml
//! <ColorMaps>
//!   <ColorMap space="CIELAB" indexedLookup="false" name="...">
//!     <Point r="0.0" g="0.0" b="0.0" x="0.0"/>
//!   </ColorMap>
//! </ColorMaps>
//! ```
//!
//! Tag names are case-sensitive (`ColorMap`, `Point` capitalized) and must
//! be preserved exactly on write; the format itself carries no point-order
//! guarantee, so deserialization explicitly re-sorts by position.

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::control::{ColorPoint, Colormap};
use crate::error::{ColorloomError, Result};

/// Serialize a colormap to the `<ColorMaps>` XML document format.
pub fn to_xml(colormap: &Colormap, name: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Start(BytesStart::new("ColorMaps")))
        .map_err(write_err)?;

    let mut map_el = BytesStart::new("ColorMap");
    map_el.push_attribute(("space", "CIELAB"));
    map_el.push_attribute(("indexedLookup", "false"));
    map_el.push_attribute(("name", name));
    writer.write_event(Event::Start(map_el)).map_err(write_err)?;

    for point in colormap.points() {
        let mut point_el = BytesStart::new("Point");
        point_el.push_attribute(("r", format_float(point.color[0]).as_str()));
        point_el.push_attribute(("g", format_float(point.color[1]).as_str()));
        point_el.push_attribute(("b", format_float(point.color[2]).as_str()));
        point_el.push_attribute(("x", format_float(point.position).as_str()));
        writer
            .write_event(Event::Empty(point_el))
            .map_err(write_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("ColorMap")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("ColorMaps")))
        .map_err(write_err)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| {
        ColorloomError::ColormapXml {
            message: format!("Generated XML is not valid UTF-8: {}", e),
        }
    })
}

/// Parse the first `<ColorMap>` element of a `<ColorMaps>` document.
///
/// Returns the colormap's name attribute together with the colormap itself,
/// points re-sorted by position ascending.
pub fn from_xml(xml: &str) -> Result<(String, Colormap)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut name = String::new();
    let mut points: Vec<ColorPoint> = Vec::new();
    let mut in_colormap = false;
    let mut found = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"ColorMap" if !found => {
                    in_colormap = true;
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| ColorloomError::ColormapXml {
                            message: format!("Bad ColorMap attribute: {}", e),
                        })?;
                        if attr.key.as_ref() == b"name" {
                            name = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                }
                b"Point" if in_colormap => {
                    points.push(parse_point(&e)?);
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"ColorMap" => {
                in_colormap = false;
                found = true;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ColorloomError::ColormapXml {
                    message: format!(
                        "Parse error at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                });
            }
        }
    }

    if !found && points.is_empty() {
        return Err(ColorloomError::ColormapXml {
            message: "No ColorMap element found".to_string(),
        });
    }

    Ok((name, Colormap::from_points(points)))
}

fn parse_point(element: &BytesStart<'_>) -> Result<ColorPoint> {
    let mut r = None;
    let mut g = None;
    let mut b = None;
    let mut x = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| ColorloomError::ColormapXml {
            message: format!("Bad Point attribute: {}", e),
        })?;
        let value = parse_float_attr(&attr.value)?;
        match attr.key.as_ref() {
            b"r" => r = Some(value),
            b"g" => g = Some(value),
            b"b" => b = Some(value),
            b"x" => x = Some(value),
            _ => {}
        }
    }

    match (r, g, b, x) {
        (Some(r), Some(g), Some(b), Some(x)) => Ok(ColorPoint {
            position: x,
            color: [r, g, b],
        }),
        _ => Err(ColorloomError::ColormapXml {
            message: "Point element missing one of r/g/b/x attributes".to_string(),
        }),
    }
}

fn parse_float_attr(raw: &[u8]) -> Result<f32> {
    let text = std::str::from_utf8(raw).map_err(|e| ColorloomError::ColormapXml {
        message: format!("Attribute is not UTF-8: {}", e),
    })?;
    text.parse::<f32>().map_err(|e| ColorloomError::ColormapXml {
        message: format!("Attribute {:?} is not a number: {}", text, e),
    })
}

/// Format a float so it round-trips exactly and always carries a decimal
/// point (the Debug form of f32: "0.0", not "0").
fn format_float(value: f32) -> String {
    format!("{:?}", value)
}

fn write_err(e: quick_xml::Error) -> ColorloomError {
    ColorloomError::ColormapXml {
        message: format!("Write error: {}", e),
    }
}
