//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier was trained on exactly these 20 columns in exactly this
//! order. Encoding, scaling and artifact validation all read from here.
//!
//! ## Rules (NEVER break these):
//! 1. Add column → increment FEATURE_VERSION and retrain
//! 2. Change order → increment FEATURE_VERSION and retrain
//! 3. Remove column → increment FEATURE_VERSION and retrain

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Column names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Numeric passthrough (0-5) ===
    "Age",                   // 0: scaled
    "RestingBP",             // 1: scaled
    "Cholesterol",           // 2: scaled
    "FastingBS",             // 3: raw 0/1
    "MaxHR",                 // 4: scaled
    "Oldpeak",               // 5: scaled

    // === Sex (6-7) ===
    "Sex_F",
    "Sex_M",

    // === Chest pain type (8-11) ===
    "ChestPainType_ASY",
    "ChestPainType_ATA",
    "ChestPainType_NAP",
    "ChestPainType_TA",

    // === Resting ECG (12-14) ===
    "RestingECG_LVH",
    "RestingECG_Normal",
    "RestingECG_ST",

    // === Exercise angina (15-16) ===
    "ExerciseAngina_N",
    "ExerciseAngina_Y",

    // === ST slope (17-19) ===
    "ST_Slope_Down",
    "ST_Slope_Flat",
    "ST_Slope_Up",
];

/// Total number of columns
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 20;

/// Number of columns the scaler operates on
pub const SCALED_COUNT: usize = 5;

/// Columns the scaler was fitted on, in the scaler's own order
pub const SCALED_COLUMNS: [&str; SCALED_COUNT] =
    ["Age", "RestingBP", "Cholesterol", "MaxHR", "Oldpeak"];

/// Positions of SCALED_COLUMNS inside FEATURE_LAYOUT
pub const SCALED_INDICES: [usize; SCALED_COUNT] = [0, 1, 2, 4, 5];

// ============================================================================
// ONE-HOT TABLE
// ============================================================================

/// Categorical input fields that expand into indicator columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    Sex,
    ChestPainType,
    RestingEcg,
    ExerciseAngina,
    StSlope,
}

impl CategoricalField {
    /// Column name prefix used at training time
    pub fn prefix(&self) -> &'static str {
        match self {
            CategoricalField::Sex => "Sex",
            CategoricalField::ChestPainType => "ChestPainType",
            CategoricalField::RestingEcg => "RestingECG",
            CategoricalField::ExerciseAngina => "ExerciseAngina",
            CategoricalField::StSlope => "ST_Slope",
        }
    }
}

/// (field, label) → column index for every indicator column
pub const ONE_HOT_COLUMNS: &[(CategoricalField, &str, usize)] = &[
    (CategoricalField::Sex, "F", 6),
    (CategoricalField::Sex, "M", 7),
    (CategoricalField::ChestPainType, "ASY", 8),
    (CategoricalField::ChestPainType, "ATA", 9),
    (CategoricalField::ChestPainType, "NAP", 10),
    (CategoricalField::ChestPainType, "TA", 11),
    (CategoricalField::RestingEcg, "LVH", 12),
    (CategoricalField::RestingEcg, "Normal", 13),
    (CategoricalField::RestingEcg, "ST", 14),
    (CategoricalField::ExerciseAngina, "N", 15),
    (CategoricalField::ExerciseAngina, "Y", 16),
    (CategoricalField::StSlope, "Down", 17),
    (CategoricalField::StSlope, "Flat", 18),
    (CategoricalField::StSlope, "Up", 19),
];

/// Indicator column for a categorical label, `None` for labels the model never saw
pub fn one_hot_column(field: CategoricalField, label: &str) -> Option<usize> {
    ONE_HOT_COLUMNS
        .iter()
        .find(|(f, l, _)| *f == field && *l == label)
        .map(|(_, _, index)| *index)
}

/// All indicator columns belonging to one field
#[cfg(test)]
pub fn sibling_columns(field: CategoricalField) -> impl Iterator<Item = usize> {
    ONE_HOT_COLUMNS
        .iter()
        .filter(move |(f, _, _)| *f == field)
        .map(|(_, _, index)| *index)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub scaled_columns: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            scaled_columns: SCALED_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Column names stored in an artifact don't match the expected columns
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutMismatchError {
    #[error("expected {expected} feature names, got {actual}")]
    Count { expected: usize, actual: usize },

    #[error("feature {index} is '{actual}', expected '{expected}'")]
    Name {
        index: usize,
        expected: String,
        actual: String,
    },
}

/// Check a list of column names against an expected list, order included
pub fn validate_feature_names(
    actual: &[String],
    expected: &[&str],
) -> Result<(), LayoutMismatchError> {
    if actual.len() != expected.len() {
        return Err(LayoutMismatchError::Count {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        if a != e {
            return Err(LayoutMismatchError::Name {
                index,
                expected: e.to_string(),
                actual: a.clone(),
            });
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
#[cfg(test)]
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 20);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_scaled_indices_point_at_scaled_columns() {
        for (name, index) in SCALED_COLUMNS.iter().zip(SCALED_INDICES) {
            assert_eq!(feature_name(index), Some(*name));
        }
    }

    #[test]
    fn test_one_hot_table_matches_layout() {
        for (field, label, index) in ONE_HOT_COLUMNS {
            let expected = format!("{}_{}", field.prefix(), label);
            assert_eq!(feature_name(*index), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_every_non_numeric_column_is_an_indicator() {
        let mut covered: Vec<usize> = SCALED_INDICES.to_vec();
        covered.push(feature_index("FastingBS").unwrap());
        covered.extend(ONE_HOT_COLUMNS.iter().map(|(_, _, i)| *i));
        covered.sort_unstable();
        assert_eq!(covered, (0..FEATURE_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_one_hot_column_lookup() {
        assert_eq!(one_hot_column(CategoricalField::Sex, "M"), Some(7));
        assert_eq!(one_hot_column(CategoricalField::StSlope, "Up"), Some(19));
        assert_eq!(one_hot_column(CategoricalField::StSlope, "Sideways"), None);
        assert_eq!(one_hot_column(CategoricalField::Sex, "ASY"), None);
    }

    #[test]
    fn test_sibling_columns() {
        let ecg: Vec<usize> = sibling_columns(CategoricalField::RestingEcg).collect();
        assert_eq!(ecg, vec![12, 13, 14]);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_feature_names() {
        let names: Vec<String> = SCALED_COLUMNS.iter().map(|s| s.to_string()).collect();
        assert!(validate_feature_names(&names, &SCALED_COLUMNS).is_ok());

        let short = names[..4].to_vec();
        assert_eq!(
            validate_feature_names(&short, &SCALED_COLUMNS),
            Err(LayoutMismatchError::Count { expected: 5, actual: 4 })
        );

        let mut swapped = names.clone();
        swapped.swap(0, 1);
        assert!(matches!(
            validate_feature_names(&swapped, &SCALED_COLUMNS),
            Err(LayoutMismatchError::Name { index: 0, .. })
        ));
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert_eq!(info.scaled_columns.len(), SCALED_COUNT);
    }
}
