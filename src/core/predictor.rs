use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a fitted regression model
#[derive(Debug, Error, PartialEq)]
pub enum PredictorError {
    #[error("X has {actual} features, but the model is expecting {expected} features as input")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Model produced a non-finite prediction")]
    NonFinite,
}

/// A fitted regression model mapping a scaled feature vector to a scalar
pub trait Predictor: Send + Sync {
    /// Number of input features the model expects
    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<f64, PredictorError>;
}

/// Serialized model artifact, tagged by model family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Validate the artifact and turn it into a boxed predictor
    pub fn into_predictor(self) -> Result<Box<dyn Predictor>, PredictorError> {
        match self {
            ModelArtifact::Linear(model) => Ok(Box::new(model)),
            ModelArtifact::TreeEnsemble(model) => {
                model.check()?;
                Ok(Box::new(model))
            }
        }
    }
}

fn check_shape(expected: usize, features: &[f64]) -> Result<(), PredictorError> {
    if features.len() != expected {
        return Err(PredictorError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

fn finite(value: f64) -> Result<f64, PredictorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictorError::NonFinite)
    }
}

/// Ordinary least squares / ridge style linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Predictor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictorError> {
        check_shape(self.coefficients.len(), features)?;

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();

        finite(self.intercept + dot)
    }
}

/// How leaf values of an ensemble are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Random forest: average of the trees
    Mean,
    /// Gradient boosting: `base_score + learning_rate * sum`
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNode {
    Split(Split),
    Leaf(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

/// Flat-array decision tree, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root to a leaf; left when `x[feature] <= threshold`
    ///
    /// Bounded by the node count, so a malformed tree that skipped `check`
    /// still terminates with an error.
    fn evaluate(&self, features: &[f64]) -> Result<f64, PredictorError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                PredictorError::InvalidModel(format!("node index {} out of range", idx))
            })?;
            match node {
                TreeNode::Leaf(value) => return Ok(*value),
                TreeNode::Split(split) => {
                    let x = features.get(split.feature).ok_or_else(|| {
                        PredictorError::InvalidModel(format!(
                            "node {} splits on feature {} of {}",
                            idx,
                            split.feature,
                            features.len()
                        ))
                    })?;
                    idx = if *x <= split.threshold { split.left } else { split.right };
                }
            }
        }
        Err(PredictorError::InvalidModel("tree does not reach a leaf".to_string()))
    }

    /// Children must point forward and stay in bounds, which rules out cycles
    fn check(&self, n_features: usize) -> Result<(), PredictorError> {
        if self.nodes.is_empty() {
            return Err(PredictorError::InvalidModel("empty tree".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split(split) = node {
                if split.feature >= n_features {
                    return Err(PredictorError::InvalidModel(format!(
                        "node {} splits on feature {} of {}",
                        i, split.feature, n_features
                    )));
                }
                for child in [split.left, split.right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(PredictorError::InvalidModel(format!(
                            "node {} has invalid child {}",
                            i, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn default_learning_rate() -> f64 { 1.0 }

/// Random forest or gradient boosted regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub trees: Vec<Tree>,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub n_features: usize,
}

impl TreeEnsemble {
    pub fn check(&self) -> Result<(), PredictorError> {
        if self.trees.is_empty() {
            return Err(PredictorError::InvalidModel("ensemble has no trees".to_string()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.check(self.n_features))
    }
}

impl Predictor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictorError> {
        check_shape(self.n_features, features)?;

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        let value = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + self.learning_rate * total,
        };

        finite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split(Split { feature, threshold, left: 1, right: 2 }),
                TreeNode::Leaf(left),
                TreeNode::Leaf(right),
            ],
        }
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearRegressor {
            coefficients: vec![2.0, -1.0],
            intercept: 10.0,
        };
        assert_eq!(model.predict(&[3.0, 4.0]).unwrap(), 12.0);
    }

    #[test]
    fn test_linear_shape_mismatch() {
        let model = LinearRegressor {
            coefficients: vec![1.0, 1.0, 1.0],
            intercept: 0.0,
        };
        assert_eq!(
            model.predict(&[1.0]),
            Err(PredictorError::ShapeMismatch { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn test_forest_mean() {
        let model = TreeEnsemble {
            trees: vec![stump(0, 0.5, 100.0, 200.0), stump(1, 0.0, 300.0, 400.0)],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
            n_features: 2,
        };
        model.check().unwrap();

        // tree 1 goes right (200), tree 2 goes left (300)
        assert_eq!(model.predict(&[1.0, -1.0]).unwrap(), 250.0);
    }

    #[test]
    fn test_boosting_sum() {
        let model = TreeEnsemble {
            trees: vec![stump(0, 0.5, -1.0, 1.0), stump(0, 0.5, -2.0, 2.0)],
            aggregation: Aggregation::Sum,
            base_score: 100.0,
            learning_rate: 0.5,
            n_features: 1,
        };
        assert_eq!(model.predict(&[0.0]).unwrap(), 98.5);
    }

    #[test]
    fn test_threshold_goes_left() {
        let model = TreeEnsemble {
            trees: vec![stump(0, 1.0, 5.0, 7.0)],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
            n_features: 1,
        };
        assert_eq!(model.predict(&[1.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_cycle_rejected() {
        let tree = Tree {
            nodes: vec![
                TreeNode::Split(Split { feature: 0, threshold: 0.0, left: 1, right: 0 }),
                TreeNode::Leaf(1.0),
            ],
        };
        assert!(matches!(tree.check(1), Err(PredictorError::InvalidModel(_))));
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        let tree = stump(3, 0.0, 1.0, 2.0);
        assert!(matches!(tree.check(2), Err(PredictorError::InvalidModel(_))));
    }

    #[test]
    fn test_unchecked_ensemble_errors_instead_of_panicking() {
        let json = r#"{
            "aggregation": "mean",
            "n_features": 1,
            "trees": [[
                {"split": {"feature": 0, "threshold": 0.0, "left": 5, "right": 6}}
            ]]
        }"#;
        let model: TreeEnsemble = serde_json::from_str(json).unwrap();

        assert!(matches!(model.predict(&[1.0]), Err(PredictorError::InvalidModel(_))));
    }

    #[test]
    fn test_unchecked_cycle_terminates() {
        let model = TreeEnsemble {
            trees: vec![Tree {
                nodes: vec![
                    TreeNode::Split(Split { feature: 0, threshold: 0.0, left: 1, right: 1 }),
                    TreeNode::Split(Split { feature: 0, threshold: 0.0, left: 0, right: 0 }),
                ],
            }],
            aggregation: Aggregation::Sum,
            base_score: 0.0,
            learning_rate: 1.0,
            n_features: 1,
        };

        assert!(matches!(model.predict(&[1.0]), Err(PredictorError::InvalidModel(_))));
    }

    #[test]
    fn test_unchecked_feature_out_of_range() {
        let model = TreeEnsemble {
            trees: vec![stump(4, 0.0, 1.0, 2.0)],
            aggregation: Aggregation::Mean,
            base_score: 0.0,
            learning_rate: 1.0,
            n_features: 2,
        };

        assert!(matches!(model.predict(&[1.0, 2.0]), Err(PredictorError::InvalidModel(_))));
    }

    #[test]
    fn test_artifact_json() {
        let json = r#"{
            "kind": "tree_ensemble",
            "aggregation": "sum",
            "base_score": 1.0,
            "n_features": 1,
            "trees": [[
                {"split": {"feature": 0, "threshold": 0.0, "left": 1, "right": 2}},
                {"leaf": 1.0},
                {"leaf": 3.0}
            ]]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        let model = artifact.into_predictor().unwrap();

        assert_eq!(model.n_features(), 1);
        assert_eq!(model.predict(&[2.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_linear_artifact_json() {
        let json = r#"{"kind": "linear", "coefficients": [1.5], "intercept": 2.0}"#;
        let model = serde_json::from_str::<ModelArtifact>(json)
            .unwrap()
            .into_predictor()
            .unwrap();
        assert_eq!(model.predict(&[2.0]).unwrap(), 5.0);
    }
}
