//! Classifier trait and on-disk document
//!
//! Swap the model type by changing the `kind` in the artifact file.
//! Every implementation is read-only after load and safe to share.

use serde::{Deserialize, Serialize};

use crate::features::layout::{validate_feature_names, FEATURE_COUNT, FEATURE_LAYOUT};
use super::forest::{RandomForest, TreeDocument};
use super::logistic::LogisticRegression;
use super::ArtifactError;

/// Labels the service can emit, index = probability column
pub const CLASSES: [i64; 2] = [0, 1];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output, serialized as the `/predict` response body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class (0 or 1)
    pub result: i64,
    /// Probability of class 1
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("classifier produced a non-finite probability")]
    NonFinite,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over the 20-column layout
pub trait Classifier: Send + Sync {
    /// Model family, as written in the artifact's `kind`
    fn kind(&self) -> &'static str;

    /// Number of trees, `None` for non-ensemble models
    fn n_estimators(&self) -> Option<usize> {
        None
    }

    /// Class probabilities in `CLASSES` order
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> [f64; 2];

    /// Label and positive-class probability from one probability pass
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<PredictionResult, InferenceError> {
        let proba = self.predict_proba(features);
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::NonFinite);
        }

        // First class wins a tie
        let label = if proba[1] > proba[0] { CLASSES[1] } else { CLASSES[0] };

        Ok(PredictionResult {
            result: label,
            probability: proba[1],
        })
    }
}

// ============================================================================
// ARTIFACT DOCUMENT
// ============================================================================

/// Classifier document as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierDocument {
    RandomForest {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        classes: Vec<i64>,
        trees: Vec<TreeDocument>,
    },
    LogisticRegression {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        classes: Vec<i64>,
        coef: Vec<f64>,
        intercept: f64,
    },
}

impl ClassifierDocument {
    /// Validate and build the runtime classifier
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        match self {
            ClassifierDocument::RandomForest { feature_names, classes, trees } => {
                check_header(feature_names.as_deref(), &classes)?;
                Ok(Box::new(RandomForest::from_documents(trees)?))
            }
            ClassifierDocument::LogisticRegression { feature_names, classes, coef, intercept } => {
                check_header(feature_names.as_deref(), &classes)?;
                Ok(Box::new(LogisticRegression::new(coef, intercept)?))
            }
        }
    }
}

fn check_header(feature_names: Option<&[String]>, classes: &[i64]) -> Result<(), ArtifactError> {
    if classes != CLASSES {
        return Err(ArtifactError::InvalidClassifier(format!(
            "classes must be {:?}, got {:?}",
            CLASSES, classes
        )));
    }

    if let Some(names) = feature_names {
        validate_feature_names(names, FEATURE_LAYOUT)
            .map_err(|source| ArtifactError::FeatureNames { artifact: "classifier", source })?;
    }

    Ok(())
}
