//! Artifact Store - scaler + classifier loaded once at startup
//!
//! Read-only after construction. Shared across requests behind an `Arc`.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::features::layout::LayoutInfo;
use super::classifier::{Classifier, ClassifierDocument, CLASSES};
use super::scaler::{Scaler, ScalerDocument};
use super::ArtifactError;

pub struct ArtifactStore {
    scaler: Scaler,
    classifier: Box<dyn Classifier>,
    model_path: PathBuf,
    scaler_path: PathBuf,
    loaded_at: DateTime<Utc>,
}

/// Loaded artifact description for the model info endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub classifier: ClassifierInfo,
    pub scaler: ScalerInfo,
    pub layout: LayoutInfo,
    pub model_path: String,
    pub scaler_path: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifierInfo {
    pub kind: &'static str,
    pub n_estimators: Option<usize>,
    pub classes: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScalerInfo {
    pub kind: &'static str,
}

impl ArtifactStore {
    /// Load and validate both artifact files
    pub fn load(model_path: impl AsRef<Path>, scaler_path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let model_path = model_path.as_ref();
        let scaler_path = scaler_path.as_ref();

        tracing::info!("Loading scaler from: {}", scaler_path.display());
        let scaler: ScalerDocument = read_json(scaler_path)?;
        let scaler = Scaler::try_from(scaler)?;

        tracing::info!("Loading classifier from: {}", model_path.display());
        let classifier: ClassifierDocument = read_json(model_path)?;
        let classifier = classifier.into_classifier()?;

        let mut store = Self::from_parts(scaler, classifier);
        store.model_path = model_path.to_path_buf();
        store.scaler_path = scaler_path.to_path_buf();
        Ok(store)
    }

    /// Build from already validated parts
    pub fn from_parts(scaler: Scaler, classifier: Box<dyn Classifier>) -> Self {
        Self {
            scaler,
            classifier,
            model_path: PathBuf::from("<memory>"),
            scaler_path: PathBuf::from("<memory>"),
            loaded_at: Utc::now(),
        }
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            classifier: ClassifierInfo {
                kind: self.classifier.kind(),
                n_estimators: self.classifier.n_estimators(),
                classes: CLASSES.to_vec(),
            },
            scaler: ScalerInfo {
                kind: self.scaler.kind(),
            },
            layout: LayoutInfo::current(),
            model_path: self.model_path.display().to_string(),
            scaler_path: self.scaler_path.display().to_string(),
            loaded_at: self.loaded_at,
        }
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("scaler", &self.scaler.kind())
            .field("classifier", &self.classifier.kind())
            .field("model_path", &self.model_path)
            .field("scaler_path", &self.scaler_path)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
