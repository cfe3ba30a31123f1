//! Fitted scaler for the numeric columns
//!
//! Loaded from a JSON document exported from the training notebook.

use serde::{Deserialize, Serialize};

use crate::features::layout::{validate_feature_names, SCALED_COLUMNS, SCALED_COUNT};
use crate::features::NumericTransform;
use super::ArtifactError;

/// Scaler document as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerDocument {
    /// `(x - mean) / scale`
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

/// Validated scaler
#[derive(Debug, Clone, PartialEq)]
pub enum Scaler {
    Standard {
        mean: [f64; SCALED_COUNT],
        scale: [f64; SCALED_COUNT],
    },
    MinMax {
        min: [f64; SCALED_COUNT],
        scale: [f64; SCALED_COUNT],
    },
}

impl Scaler {
    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
        }
    }
}

impl TryFrom<ScalerDocument> for Scaler {
    type Error = ArtifactError;

    fn try_from(doc: ScalerDocument) -> Result<Self, Self::Error> {
        match doc {
            ScalerDocument::Standard { feature_names, mean, scale } => {
                check_names(feature_names.as_deref())?;
                let mean = column_array("mean", mean)?;
                let mut scale = column_array("scale", scale)?;
                // Zero-variance columns were fitted with a unit scale
                for s in scale.iter_mut() {
                    if *s == 0.0 {
                        *s = 1.0;
                    }
                }
                Ok(Scaler::Standard { mean, scale })
            }
            ScalerDocument::MinMax { feature_names, min, scale } => {
                check_names(feature_names.as_deref())?;
                Ok(Scaler::MinMax {
                    min: column_array("min", min)?,
                    scale: column_array("scale", scale)?,
                })
            }
        }
    }
}

impl NumericTransform for Scaler {
    fn transform(&self, values: &mut [f64; SCALED_COUNT]) {
        match self {
            Scaler::Standard { mean, scale } => {
                for i in 0..SCALED_COUNT {
                    values[i] = (values[i] - mean[i]) / scale[i];
                }
            }
            Scaler::MinMax { min, scale } => {
                for i in 0..SCALED_COUNT {
                    values[i] = values[i] * scale[i] + min[i];
                }
            }
        }
    }
}

fn check_names(names: Option<&[String]>) -> Result<(), ArtifactError> {
    match names {
        Some(names) => validate_feature_names(names, &SCALED_COLUMNS)
            .map_err(|source| ArtifactError::FeatureNames { artifact: "scaler", source }),
        None => Ok(()),
    }
}

fn column_array(name: &str, values: Vec<f64>) -> Result<[f64; SCALED_COUNT], ArtifactError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::InvalidScaler(format!("{} contains a non-finite value", name)));
    }

    let len = values.len();
    values.try_into().map_err(|_| {
        ArtifactError::InvalidScaler(format!("{} has {} values, expected {}", name, len, SCALED_COUNT))
    })
}
