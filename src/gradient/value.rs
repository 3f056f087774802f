//! Typed primitive values with unit-suffixed display formatting.
//!
//! Editor payloads carry primitive values as human-editable display strings
//! ("42%", "90deg"). Each primitive kind has a static unit spec (suffix,
//! display multiplier, UI stepper increment) with explicit parse/format
//! functions, so the display format stays distinct from the internal float
//! representation.

use serde::{Deserialize, Serialize};

use crate::error::{ColorloomError, Result};

/// The kinds of primitive values that appear in gradient descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// A fraction in [0, 1], displayed as a percentage
    Percent,
    /// An angle in degrees
    Angle,
    /// A unitless scalar
    Scalar,
    /// A whole number
    Integer,
}

/// Display spec for one primitive kind.
struct UnitSpec {
    suffix: &'static str,
    /// Internal value is multiplied by this for display
    scale: f32,
    /// UI stepper increment, in display units
    increment: f32,
}

const UNIT_TABLE: &[(PrimitiveKind, UnitSpec)] = &[
    (
        PrimitiveKind::Percent,
        UnitSpec {
            suffix: "%",
            scale: 100.0,
            increment: 1.0,
        },
    ),
    (
        PrimitiveKind::Angle,
        UnitSpec {
            suffix: "deg",
            scale: 1.0,
            increment: 10.0,
        },
    ),
    (
        PrimitiveKind::Scalar,
        UnitSpec {
            suffix: "",
            scale: 1.0,
            increment: 0.1,
        },
    ),
    (
        PrimitiveKind::Integer,
        UnitSpec {
            suffix: "",
            scale: 1.0,
            increment: 1.0,
        },
    ),
];

impl PrimitiveKind {
    fn spec(&self) -> &'static UnitSpec {
        // The table covers every variant
        UNIT_TABLE
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, spec)| spec)
            .unwrap_or(&UNIT_TABLE[2].1)
    }

    /// The UI stepper increment for this kind, in display units
    pub fn increment(&self) -> f32 {
        self.spec().increment
    }

    /// The display unit suffix for this kind
    pub fn suffix(&self) -> &'static str {
        self.spec().suffix
    }
}

/// A primitive value paired with its kind, parsed from or formatted to the
/// display-string form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveValue {
    kind: PrimitiveKind,
    value: f32,
}

impl PrimitiveValue {
    /// Wrap an internal value
    pub fn new(kind: PrimitiveKind, value: f32) -> Self {
        let value = match kind {
            PrimitiveKind::Integer => value.round(),
            _ => value,
        };
        Self { kind, value }
    }

    /// Parse a display string ("42%", "90deg", "0.3") into a value
    pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let spec = kind.spec();
        let number_part = if !spec.suffix.is_empty() && trimmed.ends_with(spec.suffix) {
            &trimmed[..trimmed.len() - spec.suffix.len()]
        } else {
            trimmed
        };

        let display_value: f32 =
            number_part
                .trim()
                .parse()
                .map_err(|e| ColorloomError::InvalidPrimitive {
                    value: text.to_string(),
                    message: format!("{}", e),
                })?;

        if !display_value.is_finite() {
            return Err(ColorloomError::InvalidPrimitive {
                value: text.to_string(),
                message: "Value is not finite".to_string(),
            });
        }

        Ok(Self::new(kind, display_value / spec.scale))
    }

    /// The internal value (e.g. a [0, 1] fraction for `Percent`)
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The kind this value was parsed as
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Format back to the display-string form
    pub fn format(&self) -> String {
        let spec = self.kind.spec();
        let display = self.value * spec.scale;
        match self.kind {
            PrimitiveKind::Integer => format!("{}{}", display.round() as i64, spec.suffix),
            _ => {
                // Trim a trailing ".0" so "42%" round-trips as "42%"
                let mut text = format!("{:?}", display);
                if let Some(stripped) = text.strip_suffix(".0") {
                    text = stripped.to_string();
                }
                format!("{}{}", text, spec.suffix)
            }
        }
    }
}
