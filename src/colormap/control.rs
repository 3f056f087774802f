//! Colormap control points and Lab-interpolated color lookup.

use serde::{Deserialize, Serialize};

use crate::color::{lab_to_rgb, perceptual_distance, rgb_to_lab};

/// A single colormap control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPoint {
    /// Position along the [0, 1] colormap domain
    pub position: f32,
    /// sRGB color, channels in [0, 1]
    pub color: [f32; 3],
}

/// An ordered list of control points defining a color transfer function.
///
/// The point list is kept sorted by position ascending at all times; every
/// mutation re-sorts. Duplicate positions are legal, and the sort is stable,
/// so insertion order among equal positions is preserved and lookups stay
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    points: Vec<ColorPoint>,
}

impl Colormap {
    /// Create an empty colormap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a colormap from a list of control points (sorted on entry)
    pub fn from_points(points: Vec<ColorPoint>) -> Self {
        let mut cm = Self { points };
        cm.sort_points();
        cm
    }

    /// The control points, sorted by position ascending
    pub fn points(&self) -> &[ColorPoint] {
        &self.points
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the colormap has no control points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a control point and re-sort
    pub fn add_control_point(&mut self, position: f32, color: [f32; 3]) {
        self.points.push(ColorPoint { position, color });
        self.sort_points();
    }

    /// Replace the point at `index` and re-sort. Out-of-range indices are
    /// ignored.
    pub fn edit_control_point(&mut self, index: usize, position: f32, color: [f32; 3]) {
        if let Some(point) = self.points.get_mut(index) {
            point.position = position;
            point.color = color;
            self.sort_points();
        }
    }

    /// Remove the point at `index`. Out-of-range indices are ignored.
    pub fn remove_control_point(&mut self, index: usize) {
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    /// Mirror the colormap: each position becomes `1 - position`
    pub fn flip(&mut self) {
        for point in &mut self.points {
            point.position = 1.0 - point.position;
        }
        self.sort_points();
    }

    /// Look up the color at a position by Lab-space interpolation.
    ///
    /// Zero control points yields white; a single point yields its color
    /// regardless of position; positions at or beyond the extremes clamp to
    /// the nearest endpoint's color. In between, the bracketing pair is
    /// found by linear scan (first point whose position is >= the query)
    /// and both endpoint colors are interpolated in Lab.
    pub fn lookup_color(&self, position: f32) -> [f32; 3] {
        match self.points.len() {
            0 => [1.0, 1.0, 1.0],
            1 => self.points[0].color,
            n => {
                let first = self.points[0];
                let last = self.points[n - 1];
                if position <= first.position {
                    return first.color;
                }
                if position >= last.position {
                    return last.color;
                }

                let upper = self
                    .points
                    .iter()
                    .position(|p| p.position >= position)
                    .unwrap_or(n - 1);
                let p1 = self.points[upper - 1];
                let p2 = self.points[upper];

                // p1.position < position <= p2.position, so the span is nonzero
                let alpha = (position - p1.position) / (p2.position - p1.position);

                let lab1 = rgb_to_lab(p1.color);
                let lab2 = rgb_to_lab(p2.color);
                let lab = [
                    lab1[0] + alpha * (lab2[0] - lab1[0]),
                    lab1[1] + alpha * (lab2[1] - lab1[1]),
                    lab1[2] + alpha * (lab2[2] - lab1[2]),
                ];
                lab_to_rgb(lab)
            }
        }
    }

    /// The index of the control point whose color is perceptually closest
    /// to `color` (CIE94 distance). Used by editors to select a point from
    /// a picked color.
    pub fn nearest_control_point(&self, color: [f32; 3]) -> Option<usize> {
        let target = rgb_to_lab(color);
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, perceptual_distance(target, rgb_to_lab(p.color))))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    fn sort_points(&mut self) {
        // Stable sort: insertion order is preserved among equal positions
        self.points.sort_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    fn black_to_white() -> Colormap {
        let mut cm = Colormap::new();
        cm.add_control_point(0.0, BLACK);
        cm.add_control_point(1.0, WHITE);
        cm
    }

    #[test]
    fn test_empty_colormap_is_white() {
        let cm = Colormap::new();
        assert_eq!(cm.lookup_color(0.0), WHITE);
        assert_eq!(cm.lookup_color(0.5), WHITE);
        assert_eq!(cm.lookup_color(1.0), WHITE);
    }

    #[test]
    fn test_single_point_colormap() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.5, RED);
        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(cm.lookup_color(x), RED);
        }
    }

    #[test]
    fn test_endpoint_clamping() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.2, BLACK);
        cm.add_control_point(0.8, WHITE);

        assert_eq!(cm.lookup_color(0.0), BLACK);
        assert_eq!(cm.lookup_color(0.2), BLACK);
        assert_eq!(cm.lookup_color(0.8), WHITE);
        assert_eq!(cm.lookup_color(1.0), WHITE);
    }

    #[test]
    fn test_lab_midpoint_of_black_and_white() {
        // Lab interpolation puts the perceptual midpoint at roughly 0.4663
        // sRGB, not 0.5 - the value for L=50 gray computed from the stated
        // conversion formulas.
        let cm = black_to_white();
        let mid = cm.lookup_color(0.5);
        for channel in mid {
            assert!(
                (channel - 0.4663).abs() < 1e-3,
                "midpoint channel was {}",
                channel
            );
        }
    }

    #[test]
    fn test_points_stay_sorted_after_insert() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.9, WHITE);
        cm.add_control_point(0.1, BLACK);
        cm.add_control_point(0.5, RED);

        let positions: Vec<f32> = cm.points().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_edit_resorts() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.1, BLACK);
        cm.add_control_point(0.9, WHITE);
        cm.edit_control_point(0, 0.95, BLACK);

        let positions: Vec<f32> = cm.points().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.9, 0.95]);
        assert_eq!(cm.points()[1].color, BLACK);
    }

    #[test]
    fn test_flip_twice_restores_points() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.0, BLACK);
        cm.add_control_point(0.3, RED);
        cm.add_control_point(1.0, WHITE);
        let original: Vec<ColorPoint> = cm.points().to_vec();

        cm.flip();
        let flipped: Vec<f32> = cm.points().iter().map(|p| p.position).collect();
        assert_eq!(flipped, vec![0.0, 0.7, 1.0]);
        assert_eq!(cm.points()[1].color, RED);

        cm.flip();
        // The (position, color) pairs as a set match the original
        for point in &original {
            assert!(cm
                .points()
                .iter()
                .any(|p| (p.position - point.position).abs() < 1e-6 && p.color == point.color));
        }
    }

    #[test]
    fn test_duplicate_positions_keep_insertion_order() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.5, RED);
        cm.add_control_point(0.5, WHITE);
        cm.add_control_point(0.5, BLACK);

        assert_eq!(cm.points()[0].color, RED);
        assert_eq!(cm.points()[1].color, WHITE);
        assert_eq!(cm.points()[2].color, BLACK);

        // The first point at the duplicated position is the right bracket,
        // so a query below it interpolates toward RED, deterministically.
        let mut with_anchor = cm.clone();
        with_anchor.add_control_point(0.0, BLACK);
        let near = with_anchor.lookup_color(0.49);
        assert!(near[0] > near[1], "should interpolate toward red: {:?}", near);
    }

    #[test]
    fn test_nearest_control_point() {
        let mut cm = Colormap::new();
        cm.add_control_point(0.0, BLACK);
        cm.add_control_point(0.5, RED);
        cm.add_control_point(1.0, WHITE);

        assert_eq!(cm.nearest_control_point([0.9, 0.1, 0.1]), Some(1));
        assert_eq!(cm.nearest_control_point([0.05, 0.05, 0.05]), Some(0));
        assert_eq!(Colormap::new().nearest_control_point(RED), None);
    }

    #[test]
    fn test_interpolation_is_monotonic_in_lightness() {
        let cm = black_to_white();
        let mut prev = -1.0;
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            let c = cm.lookup_color(x);
            assert!(c[0] >= prev, "lightness regressed at {}", x);
            prev = c[0];
        }
    }
}
