//! Model Module - artifact loading and inference
//!
//! Scaler and classifier are JSON artifacts exported offline.
//! Easy to swap model: implement `Classifier` and add a document kind.

use std::path::PathBuf;

use crate::features::layout::LayoutMismatchError;

pub mod artifacts;
pub mod classifier;
pub mod forest;
pub mod logistic;
pub mod scaler;

#[cfg(test)]
pub mod fixtures;

// Re-export common types
pub use artifacts::{ArtifactInfo, ArtifactStore};
pub use classifier::{InferenceError, PredictionResult};

/// Failure while loading or validating an artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{artifact} feature names don't match the layout: {source}")]
    FeatureNames {
        artifact: &'static str,
        #[source]
        source: LayoutMismatchError,
    },

    #[error("invalid scaler: {0}")]
    InvalidScaler(String),

    #[error("invalid classifier: {0}")]
    InvalidClassifier(String),
}
