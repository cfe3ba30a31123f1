//! Small hand-checkable artifacts shared by tests
//!
//! Scaler: Age → (Age - 50) / 10, others standardized likewise.
//! Forest: tree 0 splits on scaled Age at 0.0, tree 1 on ST_Slope_Up at 0.5.

use serde_json::json;

use super::classifier::ClassifierDocument;
use super::scaler::{Scaler, ScalerDocument};
use super::ArtifactStore;

pub fn scaler_value() -> serde_json::Value {
    json!({
        "kind": "standard",
        "feature_names": ["Age", "RestingBP", "Cholesterol", "MaxHR", "Oldpeak"],
        "mean": [50.0, 130.0, 200.0, 140.0, 1.0],
        "scale": [10.0, 20.0, 50.0, 25.0, 1.0]
    })
}

pub fn forest_value() -> serde_json::Value {
    json!({
        "kind": "random_forest",
        "classes": [0, 1],
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [[9.0, 11.0], [8.0, 2.0], [1.0, 9.0]]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [19, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [[7.0, 5.0], [1.0, 3.0], [6.0, 2.0]]
            }
        ]
    })
}

pub fn scaler_json() -> String {
    scaler_value().to_string()
}

pub fn forest_json() -> String {
    forest_value().to_string()
}

/// Store built from the fixtures above
///
/// `[40,1,1,140,289,0,0,172,0,0,0]` → probability 0.225, result 0.
/// `[65,1,3,150,250,1,1,110,1,2.0,1]` → probability 0.825, result 1.
pub fn store() -> ArtifactStore {
    let scaler: ScalerDocument = serde_json::from_value(scaler_value()).unwrap();
    let classifier: ClassifierDocument = serde_json::from_value(forest_value()).unwrap();

    ArtifactStore::from_parts(
        Scaler::try_from(scaler).unwrap(),
        classifier.into_classifier().unwrap(),
    )
}
