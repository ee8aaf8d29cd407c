//! Regression Tree Ensemble

use crate::{Estimator, EstimatorError};
use feature_assembler::{FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Child index marking a leaf node
const LEAF: i64 = -1;

/// One regression tree in flattened, array-per-attribute form
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise the walk
/// descends left when `x[feature[i]] <= threshold[i]`. A tree is only
/// checked once it joins a [`ForestEstimator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl RegressionTree {
    /// Create a tree from its node arrays
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
    ) -> Self {
        Self {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        }
    }

    fn node_count(&self) -> usize {
        self.value.len()
    }

    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), EstimatorError> {
        let n = self.node_count();
        let invalid = |reason: String| {
            EstimatorError::ModelLoadError(format!("tree {}: {}", tree_idx, reason))
        };

        if n == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }

        let lengths = [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(invalid(format!(
                "node arrays differ in length: {:?} vs {} values",
                lengths, n
            )));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(invalid(format!("node {} has exactly one child", node)));
                }
                if !self.value[node].is_finite() {
                    return Err(invalid(format!("leaf {} has non-finite value", node)));
                }
                continue;
            }

            let in_range = |child: i64| child >= 0 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(invalid(format!(
                    "node {} has child index out of range ({}, {})",
                    node, left, right
                )));
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!(
                    "node {} splits on unknown feature {}",
                    node, feature
                )));
            }
        }

        Ok(())
    }

    fn predict(&self, tree_idx: usize, x: &[f64; FEATURE_DIMENSION]) -> Result<f64, EstimatorError> {
        let mut node = 0usize;

        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.node_count() {
            let left = self.children_left[node];
            if left == LEAF {
                return Ok(self.value[node]);
            }

            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }

        Err(EstimatorError::InferenceFailed(format!(
            "tree {} did not reach a leaf",
            tree_idx
        )))
    }
}

/// Forest as exported, before structural validation
#[derive(Debug, Deserialize)]
struct RawForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

/// Averaging ensemble of regression trees (random forest)
///
/// Every constructor, deserialization included, validates the structure, so
/// `predict` never indexes outside the trees or the feature vector.
#[derive(Debug, Clone, Serialize)]
pub struct ForestEstimator {
    /// Number of input features the trees were trained on
    n_features: usize,
    /// Trees whose predictions are averaged
    trees: Vec<RegressionTree>,
}

impl<'de> Deserialize<'de> for ForestEstimator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawForest::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

impl ForestEstimator {
    /// Create a forest and validate its structure
    pub fn new(trees: Vec<RegressionTree>) -> Result<Self, EstimatorError> {
        Self::from_raw(RawForest {
            n_features: FEATURE_DIMENSION,
            trees,
        })
    }

    fn from_raw(raw: RawForest) -> Result<Self, EstimatorError> {
        let forest = Self {
            n_features: raw.n_features,
            trees: raw.trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate a forest from its JSON export
    pub fn from_json(json: &str) -> Result<Self, EstimatorError> {
        let raw: RawForest = serde_json::from_str(json)
            .map_err(|e| EstimatorError::ModelLoadError(format!("invalid forest JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Load a forest from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EstimatorError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;

        let forest = Self::from_json(&json)?;
        info!(
            "Loaded forest with {} trees from {}",
            forest.trees.len(),
            path.display()
        );
        Ok(forest)
    }

    /// Number of trees in the ensemble
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), EstimatorError> {
        if self.n_features != FEATURE_DIMENSION {
            return Err(EstimatorError::InvalidInputShape {
                expected: format!("[1, {}]", FEATURE_DIMENSION),
                actual: format!("[1, {}]", self.n_features),
            });
        }

        if self.trees.is_empty() {
            return Err(EstimatorError::ModelLoadError(
                "forest has no trees".to_string(),
            ));
        }

        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx, self.n_features)?;
        }

        Ok(())
    }
}

impl Estimator for ForestEstimator {
    fn predict(&self, features: FeatureVector) -> Result<f64, EstimatorError> {
        let x = features.values();
        let mut sum = 0.0;
        for (idx, tree) in self.trees.iter().enumerate() {
            sum += tree.predict(idx, x)?;
        }

        let prediction = sum / self.trees.len() as f64;
        debug!("Forest prediction: {:.4}", prediction);
        Ok(prediction)
    }
}
