//! Random forest evaluation
//!
//! Trees use the scikit-learn array layout (`tree_.children_left`,
//! `tree_.children_right`, `tree_.feature`, `tree_.threshold`,
//! `tree_.value`), one entry per node, root at 0.

use serde::{Deserialize, Serialize};

use crate::features::layout::FEATURE_COUNT;
use super::classifier::{Classifier, CLASSES};
use super::ArtifactError;

/// Child index marking a leaf
const TREE_LEAF: i64 = -1;

/// One tree as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions)
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: [f64; 2],
    },
}

/// Validated decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Build from the array layout
    ///
    /// Children must come after their parent, so traversal always terminates.
    pub fn from_document(doc: TreeDocument) -> Result<Self, ArtifactError> {
        let n = doc.children_left.len();
        if n == 0 {
            return Err(invalid("tree has no nodes"));
        }
        if doc.children_right.len() != n
            || doc.feature.len() != n
            || doc.threshold.len() != n
            || doc.value.len() != n
        {
            return Err(invalid("tree arrays have different lengths"));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (doc.children_left[i], doc.children_right[i]);

            let node = if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(invalid(format!("node {} has only a right child", i)));
                }
                Node::Leaf { proba: leaf_proba(i, &doc.value[i])? }
            } else {
                let feature = usize::try_from(doc.feature[i])
                    .ok()
                    .filter(|f| *f < FEATURE_COUNT)
                    .ok_or_else(|| invalid(format!("node {} splits on feature {}", i, doc.feature[i])))?;

                let threshold = doc.threshold[i];
                if !threshold.is_finite() {
                    return Err(invalid(format!("node {} has a non-finite threshold", i)));
                }

                Node::Split {
                    feature,
                    threshold,
                    left: child_index(i, left, n)?,
                    right: child_index(i, right, n)?,
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Leaf class distribution for one sample
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { proba } => return *proba,
                Node::Split { feature, threshold, left, right } => {
                    index = if features[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn invalid(reason: impl Into<String>) -> ArtifactError {
    ArtifactError::InvalidClassifier(reason.into())
}

fn child_index(parent: usize, child: i64, n: usize) -> Result<usize, ArtifactError> {
    usize::try_from(child)
        .ok()
        .filter(|c| *c > parent && *c < n)
        .ok_or_else(|| invalid(format!("node {} has invalid child {}", parent, child)))
}

fn leaf_proba(node: usize, weights: &[f64]) -> Result<[f64; 2], ArtifactError> {
    if weights.len() != CLASSES.len() {
        return Err(invalid(format!(
            "leaf {} has {} class weights, expected {}",
            node,
            weights.len(),
            CLASSES.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(invalid(format!("leaf {} has a negative or non-finite weight", node)));
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(invalid(format!("leaf {} has zero total weight", node)));
    }

    Ok([weights[0] / total, weights[1] / total])
}

// ============================================================================
// FOREST
// ============================================================================

/// Averaged ensemble of decision trees
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self, ArtifactError> {
        if trees.is_empty() {
            return Err(invalid("forest has no trees"));
        }
        Ok(Self { trees })
    }

    pub fn from_documents(docs: Vec<TreeDocument>) -> Result<Self, ArtifactError> {
        let trees = docs
            .into_iter()
            .enumerate()
            .map(|(i, doc)| {
                DecisionTree::from_document(doc).map_err(|e| match e {
                    ArtifactError::InvalidClassifier(reason) => invalid(format!("tree {}: {}", i, reason)),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(trees)
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_estimators(&self) -> Option<usize> {
        Some(self.trees.len())
    }

    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let proba = tree.predict_proba(features);
            sum[0] += proba[0];
            sum[1] += proba[1];
        }

        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}
