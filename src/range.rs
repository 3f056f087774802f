//! Data range normalization and range resolution.
//!
//! Raw scalar values are remapped into [0, 1] before any colormap or blend
//! lookup. Ranges resolve with per-(keydata, variable) specific entries
//! taking precedence over per-variable global entries, falling back to the
//! dataset's observed min/max.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// An inclusive scalar range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub min: f32,
    pub max: f32,
}

impl DataRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Observed min/max of a data slice, ignoring non-finite values.
    /// An empty or all-NaN slice yields the degenerate range [0, 0].
    pub fn observe(values: &[f32]) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &value in values {
            if value.is_finite() {
                min = min.min(value);
                max = max.max(value);
            }
        }
        if min > max {
            Self::new(0.0, 0.0)
        } else {
            Self::new(min, max)
        }
    }

    /// Remap a value into [0, 1], clamped at the range edges
    pub fn normalize(&self, value: f32) -> f32 {
        normalize(value, self.min, self.max)
    }
}

/// Remap `value` from [min, max] into [0, 1], clamped.
///
/// A degenerate range (`min == max`, or min above max) maps every value to
/// 0.5 rather than dividing by zero.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Resolves which range applies to a (key data, variable) pair.
///
/// Precedence: specific per-(keydata, variable) range, then the variable's
/// global range, then the observed fallback supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RangeResolver {
    /// Per-variable global ranges
    global: HashMap<String, DataRange>,
    /// Per-(keydata, variable) overrides
    specific: HashMap<(String, String), DataRange>,
}

impl RangeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global range for a variable
    pub fn set_global(&mut self, variable: &str, range: DataRange) {
        self.global.insert(variable.to_string(), range);
    }

    /// Set a custom range for one (key data, variable) pair
    pub fn set_specific(&mut self, key_data: &str, variable: &str, range: DataRange) {
        debug!(
            key_data = key_data,
            variable = variable,
            min = range.min,
            max = range.max,
            "Setting specific data range"
        );
        self.specific
            .insert((key_data.to_string(), variable.to_string()), range);
    }

    /// Turn the custom range off for a pair.
    ///
    /// The specific entry is deleted, not hidden: resolution falls back to
    /// the global range (or observed fallback) afterwards.
    pub fn clear_specific(&mut self, key_data: &str, variable: &str) {
        self.specific
            .remove(&(key_data.to_string(), variable.to_string()));
    }

    /// Whether a custom range is active for a pair
    pub fn has_specific(&self, key_data: &str, variable: &str) -> bool {
        self.specific
            .contains_key(&(key_data.to_string(), variable.to_string()))
    }

    /// Resolve the effective range for a pair
    pub fn resolve(&self, key_data: &str, variable: &str, observed: DataRange) -> DataRange {
        if let Some(range) = self
            .specific
            .get(&(key_data.to_string(), variable.to_string()))
        {
            return *range;
        }
        if let Some(range) = self.global.get(variable) {
            return *range;
        }
        observed
    }

    /// Resolve and normalize in one step
    pub fn normalize(
        &self,
        key_data: &str,
        variable: &str,
        observed: DataRange,
        value: f32,
    ) -> f32 {
        self.resolve(key_data, variable, observed).normalize(value)
    }
}
