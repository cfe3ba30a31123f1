//! Logistic regression over the scaled layout

use crate::features::layout::FEATURE_COUNT;
use super::classifier::Classifier;
use super::ArtifactError;

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coef: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        if coef.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(ArtifactError::InvalidClassifier(
                "logistic regression has a non-finite coefficient".to_string(),
            ));
        }

        let len = coef.len();
        let coef = coef.try_into().map_err(|_| {
            ArtifactError::InvalidClassifier(format!(
                "logistic regression has {} coefficients, expected {}",
                len, FEATURE_COUNT
            ))
        })?;

        Ok(Self { coef, intercept })
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let z = self
            .coef
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| acc + c * x);
        let p = 1.0 / (1.0 + (-z).exp());
        [1.0 - p, p]
    }
}
