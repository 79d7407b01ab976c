//! Pre-trained classifier artifacts.
//!
//! Models are trained offline and shipped as a JSON document. The runtime
//! only performs inference. Every artifact pins the feature ordering it was
//! trained on through `feature_schema` and `feature_names`; an artifact that
//! disagrees with [`FEATURE_NAMES`] is rejected at load time instead of being
//! fed a silently misaligned vector.
//!
//! ```text
//! {
//!   "model_id": "phish-lr",
//!   "model_version": "2024.06",
//!   "feature_schema": "url-features/v1",
//!   "feature_names": ["url_length", "https_used", ...],
//!   "estimator": { "kind": "logistic_regression", "coefficients": [...], "intercept": -1.2 }
//! }
//! ```

use crate::error::{ModelError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Class predicted by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Legitimate,
    Phishing,
}

/// Inference capability of a loaded classifier.
///
/// `predict_proba` is optional; classifiers without a probability interface
/// keep the default and the engine reports fixed placeholder confidences.
pub trait Classifier: Send + Sync {
    /// Predict the class of one feature vector.
    fn predict(&self, vector: &FeatureVector) -> Result<Label>;

    /// Class probabilities as `[legitimate, phishing]`.
    fn predict_proba(&self, _vector: &FeatureVector) -> Option<Result<[f64; 2]>> {
        None
    }
}

/// A serialized classifier with its feature contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_id: String,
    pub model_version: String,
    pub feature_schema: String,
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

/// Supported estimator families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Label only, no probability interface.
    LinearSvm {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    DecisionTree {
        nodes: Vec<TreeNode>,
    },
    RandomForest {
        trees: Vec<Vec<TreeNode>>,
    },
}

/// One node of a flattened decision tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training sample counts as `[legitimate, phishing]`.
    Leaf { counts: [f64; 2] },
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse, and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the feature contract and that every parameter is finite.
    pub fn validate(&self) -> Result<()> {
        if self.feature_schema != FEATURE_SCHEMA {
            return Err(ModelError::SchemaMismatch {
                expected: FEATURE_SCHEMA.to_string(),
                got: self.feature_schema.clone(),
            });
        }
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                what: "feature_names",
                expected: FEATURE_COUNT,
                got: self.feature_names.len(),
            });
        }
        let pairs = self.feature_names.iter().zip(FEATURE_NAMES);
        for (index, (got, expected)) in pairs.enumerate() {
            if got != expected {
                return Err(ModelError::FeatureNameMismatch {
                    index,
                    expected: expected.to_string(),
                    got: got.clone(),
                });
            }
        }
        self.estimator.validate()
    }

    /// Estimator family name, as written in the artifact.
    pub fn kind(&self) -> &'static str {
        self.estimator.kind()
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        self.estimator.predict(vector)
    }

    fn predict_proba(&self, vector: &FeatureVector) -> Option<Result<[f64; 2]>> {
        self.estimator.predict_proba(vector)
    }
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::LinearSvm { .. } => "linear_svm",
            Self::DecisionTree { .. } => "decision_tree",
            Self::RandomForest { .. } => "random_forest",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
            }
            | Self::LinearSvm {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(ModelError::DimensionMismatch {
                        what: "coefficients",
                        expected: FEATURE_COUNT,
                        got: coefficients.len(),
                    });
                }
                for (i, &c) in coefficients.iter().enumerate() {
                    ensure_finite(c, || format!("coefficient {i}"))?;
                }
                ensure_finite(*intercept, || "intercept".to_string())
            }
            Self::DecisionTree { nodes } => validate_tree(nodes),
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Empty("trees"));
                }
                trees.iter().try_for_each(|t| validate_tree(t))
            }
        }
    }
}

impl Classifier for Estimator {
    fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
            }
            | Self::LinearSvm {
                coefficients,
                intercept,
            } => {
                let z = decision_function(coefficients, *intercept, vector)?;
                Ok(if z > 0.0 {
                    Label::Phishing
                } else {
                    Label::Legitimate
                })
            }
            Self::DecisionTree { .. } | Self::RandomForest { .. } => {
                let [legitimate, phishing] = self.tree_proba(vector)?;
                Ok(if phishing > legitimate {
                    Label::Phishing
                } else {
                    Label::Legitimate
                })
            }
        }
    }

    fn predict_proba(&self, vector: &FeatureVector) -> Option<Result<[f64; 2]>> {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
            } => Some(decision_function(coefficients, *intercept, vector).map(|z| {
                let p = sigmoid(z);
                [1.0 - p, p]
            })),
            Self::LinearSvm { .. } => None,
            Self::DecisionTree { .. } | Self::RandomForest { .. } => Some(self.tree_proba(vector)),
        }
    }
}

impl Estimator {
    fn tree_proba(&self, vector: &FeatureVector) -> Result<[f64; 2]> {
        match self {
            Self::DecisionTree { nodes } => walk_tree(nodes, vector),
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Empty("trees"));
                }
                let mut sum = [0.0, 0.0];
                for tree in trees {
                    let p = walk_tree(tree, vector)?;
                    sum[0] += p[0];
                    sum[1] += p[1];
                }
                let n = trees.len() as f64;
                Ok([sum[0] / n, sum[1] / n])
            }
            _ => Err(ModelError::Inference(format!(
                "{} has no tree structure",
                self.kind()
            ))),
        }
    }
}

/// Load a classifier from disk. Failure is logged and yields `None`.
pub fn load_classifier(path: &Path) -> Option<Arc<dyn Classifier>> {
    match ModelArtifact::load(path) {
        Ok(artifact) => {
            info!(
                "loaded {} model {} v{} from {}",
                artifact.kind(),
                artifact.model_id,
                artifact.model_version,
                path.display()
            );
            Some(Arc::new(artifact))
        }
        Err(e) => {
            warn!(
                "classifier unavailable ({}): {e}; using rule-based scoring",
                path.display()
            );
            None
        }
    }
}

// ─── Math ───────────────────────────────────────────────────────

fn decision_function(coefficients: &[f64], intercept: f64, x: &FeatureVector) -> Result<f64> {
    if coefficients.len() != FEATURE_COUNT {
        return Err(ModelError::DimensionMismatch {
            what: "coefficients",
            expected: FEATURE_COUNT,
            got: coefficients.len(),
        });
    }
    let z = coefficients
        .iter()
        .zip(x.iter())
        .map(|(w, v)| w * v)
        .sum::<f64>()
        + intercept;
    if !z.is_finite() {
        return Err(ModelError::NonFinite {
            what: "decision value".to_string(),
            value: z,
        });
    }
    Ok(z)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}

fn walk_tree(nodes: &[TreeNode], x: &FeatureVector) -> Result<[f64; 2]> {
    let mut index = 0;
    // A well-formed tree reaches a leaf in fewer steps than it has nodes.
    for _ in 0..nodes.len() {
        let node = nodes
            .get(index)
            .ok_or_else(|| ModelError::Inference(format!("tree node {index} out of range")))?;
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = x.get(*feature).ok_or_else(|| {
                    ModelError::Inference(format!("split feature {feature} out of range"))
                })?;
                index = if *value <= *threshold { *left } else { *right };
            }
            TreeNode::Leaf { counts } => {
                let total = counts[0] + counts[1];
                if total <= 0.0 {
                    return Err(ModelError::Inference(format!("leaf {index} has no samples")));
                }
                return Ok([counts[0] / total, counts[1] / total]);
            }
        }
    }
    Err(ModelError::Inference("tree traversal did not reach a leaf".to_string()))
}

fn validate_tree(nodes: &[TreeNode]) -> Result<()> {
    if nodes.is_empty() {
        return Err(ModelError::Empty("tree nodes"));
    }
    for (i, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split { threshold, .. } => {
                ensure_finite(*threshold, || format!("threshold at node {i}"))?
            }
            TreeNode::Leaf { counts } => {
                ensure_finite(counts[0], || format!("leaf count at node {i}"))?;
                ensure_finite(counts[1], || format!("leaf count at node {i}"))?;
            }
        }
    }
    Ok(())
}

fn ensure_finite(value: f64, what: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::NonFinite {
            what: what(),
            value,
        })
    }
}
