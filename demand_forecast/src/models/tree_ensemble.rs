//! Additive ensemble of regression trees
//!
//! Covers boosted-tree regressors exported to JSON: each tree is a flat node
//! array rooted at index 0, and the ensemble output is `base_score` plus the
//! leaf value reached in every tree.

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, FeatureMatrix};
use serde::{Deserialize, Serialize};

/// A node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `x[feature] < threshold` go left, all others right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Create a tree from its nodes
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Check that children point forward inside the tree and features exist.
    ///
    /// Forward-only child links make every walk from the root terminate.
    fn check(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ForecastError::ModelLoadError("tree has no nodes".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(ForecastError::ModelLoadError(format!(
                            "node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ForecastError::ModelLoadError(format!(
                            "node {} has a NaN threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ForecastError::ModelLoadError(format!(
                                "node {} has invalid child {}",
                                idx, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ForecastError::ModelLoadError(format!(
                            "leaf {} has a non-finite value",
                            idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `row`, whose values are in model feature order
    fn leaf_value(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] < threshold { left } else { right };
                }
            }
        }
    }
}

/// Sum of regression trees on top of a base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Features the split indices refer to, in order
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    /// Create a new ensemble
    pub fn new(
        feature_names: Vec<String>,
        base_score: f64,
        trees: Vec<RegressionTree>,
    ) -> Result<Self> {
        let model = Self {
            feature_names,
            base_score,
            trees,
        };
        model.check()?;
        Ok(model)
    }

    /// Structural consistency of a deserialized ensemble
    pub fn check(&self) -> Result<()> {
        if !self.base_score.is_finite() {
            return Err(ForecastError::ModelLoadError(
                "base score must be finite".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.feature_names.len()).map_err(|e| match e {
                ForecastError::ModelLoadError(msg) => {
                    ForecastError::ModelLoadError(format!("tree {}: {}", i, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl DemandModel for TreeEnsemble {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        let indices = features.column_indices(&self.feature_names)?;
        let mut ordered = vec![0.0; indices.len()];

        Ok(features
            .rows()
            .iter()
            .map(|row| {
                for (slot, &idx) in ordered.iter_mut().zip(&indices) {
                    *slot = row[idx];
                }
                self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| tree.leaf_value(&ordered))
                        .sum::<f64>()
            })
            .collect())
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn name(&self) -> &str {
        "tree_ensemble"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree::new(vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ])
    }

    #[test]
    fn test_ensemble_sums_leaves() {
        let model = TreeEnsemble::new(
            vec!["lag_1".to_string(), "dayofweek".to_string()],
            10.0,
            vec![stump(0, 20.0, -1.0, 1.0), stump(1, 5.0, 0.0, 4.0)],
        )
        .unwrap();

        let matrix = FeatureMatrix::new(
            vec!["lag_1".to_string(), "dayofweek".to_string()],
            vec![vec![15.0, 6.0], vec![20.0, 0.0]],
        )
        .unwrap();

        // threshold is exclusive on the left branch
        assert_eq!(model.predict(&matrix).unwrap(), vec![13.0, 11.0]);
    }

    #[test]
    fn test_backward_child_is_rejected() {
        let tree = RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 1.0 },
        ]);

        let result = TreeEnsemble::new(vec!["lag_1".to_string()], 0.0, vec![tree]);
        assert!(matches!(result, Err(ForecastError::ModelLoadError(_))));
    }

    #[test]
    fn test_unknown_feature_index_is_rejected() {
        let result = TreeEnsemble::new(
            vec!["lag_1".to_string()],
            0.0,
            vec![stump(3, 1.0, 0.0, 1.0)],
        );

        match result {
            Err(ForecastError::ModelLoadError(msg)) => assert!(msg.starts_with("tree 0")),
            other => panic!("Expected ModelLoadError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_ensemble_predicts_base_score() {
        let model = TreeEnsemble::new(vec![], 4.5, vec![]).unwrap();
        let matrix = FeatureMatrix::new(vec!["lag_1".to_string()], vec![vec![1.0]]).unwrap();
        assert_eq!(model.predict(&matrix).unwrap(), vec![4.5]);
    }
}
