//! Primitive (opacity/scalar) gradients.
//!
//! A primitive gradient pairs an ordered point list with a parallel list of
//! display-string values. The pairing is structural: a point and its value
//! are added and removed together, never independently.

use serde::{Deserialize, Serialize};

use super::value::{PrimitiveKind, PrimitiveValue};
use crate::colormap::Colormap;
use crate::error::{ColorloomError, Result};

/// An opacity/scalar map over the [0, 1] domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveGradient {
    /// Stop positions, sorted ascending
    pub points: Vec<f32>,
    /// Display-string values paired with `points`
    pub values: Vec<String>,
}

impl PrimitiveGradient {
    /// Create an empty gradient
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the structural invariants.
    ///
    /// A mismatch between the point and value lists is a blocking error -
    /// the editor refuses to open such a descriptor rather than repairing
    /// it.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() != self.values.len() {
            return Err(ColorloomError::MalformedDescriptor {
                message: format!(
                    "Primitive gradient has {} points but {} values",
                    self.points.len(),
                    self.values.len()
                ),
            });
        }
        for pair in self.points.windows(2) {
            if pair[0] > pair[1] {
                return Err(ColorloomError::MalformedDescriptor {
                    message: format!(
                        "Primitive gradient points are not sorted: {} before {}",
                        pair[0], pair[1]
                    ),
                });
            }
        }
        Ok(())
    }

    /// Number of stops
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the gradient has no stops
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a stop, keeping both lists sorted and paired
    pub fn add_stop(&mut self, point: f32, value: &str) {
        let index = self
            .points
            .iter()
            .position(|&p| p > point)
            .unwrap_or(self.points.len());
        self.points.insert(index, point);
        self.values.insert(index, value.to_string());
    }

    /// Remove the stop at `index`, dropping the point and its paired value
    /// together
    pub fn remove_stop(&mut self, index: usize) -> Result<()> {
        if index >= self.points.len() {
            return Err(ColorloomError::InvalidParameter {
                param: "index".to_string(),
                message: format!(
                    "Stop index {} out of range for {} stops",
                    index,
                    self.points.len()
                ),
            });
        }
        self.points.remove(index);
        self.values.remove(index);
        Ok(())
    }

    /// Convert into a grayscale colormap: each (point, value) pair becomes
    /// a control point at `(point, v, v, v)` with `v` the parsed value.
    ///
    /// The result goes through the same colormap machinery as color
    /// transfer functions, so lookups interpolate and clamp identically.
    pub fn to_colormap(&self, kind: PrimitiveKind) -> Result<Colormap> {
        self.validate()?;
        let mut colormap = Colormap::new();
        for (point, text) in self.points.iter().zip(&self.values) {
            let value = PrimitiveValue::parse(kind, text)?.value().clamp(0.0, 1.0);
            colormap.add_control_point(*point, [value, value, value]);
        }
        Ok(colormap)
    }

    /// Convert into an opacity colormap, interpreting values as percentages
    pub fn to_opacity_colormap(&self) -> Result<Colormap> {
        self.to_colormap(PrimitiveKind::Percent)
    }
}
