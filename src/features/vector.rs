//! Feature Vector - Core data structure for model input
//!
//! Values are always laid out by `FEATURE_LAYOUT`. Never pass a raw
//! `Vec<f64>` to the classifier.

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

/// Fixed-schema feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a zeroed vector (the fill value for unset columns)
    pub fn new() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    #[cfg(test)]
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by index, ignored when out of range
    pub fn set(&mut self, index: usize, value: f64) {
        if index < FEATURE_COUNT {
            self.values[index] = value;
        }
    }

    /// Set feature by name
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        if let Some(index) = feature_index(name) {
            self.set(index, value);
            true
        } else {
            false
        }
    }

    /// (name, value) pairs in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to JSON for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": FEATURE_VERSION,
            "layout_hash": layout_hash(),
            "named_values": self
                .named_values()
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}
