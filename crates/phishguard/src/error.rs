//! Errors raised while loading or running a classifier.
//!
//! None of these reach callers of `PredictionEngine::predict`; they decide
//! whether the engine uses the classifier or the rule-based fallback.

use thiserror::Error;

/// Classifier artifact and inference errors.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("feature schema mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: String, got: String },

    #[error("feature name mismatch at position {index}: expected {expected}, got {got}")]
    FeatureNameMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("{what} dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("non-finite {what}: {value}")]
    NonFinite { what: String, value: f64 },

    #[error("model has no {0}")]
    Empty(&'static str),

    #[error("inference error: {0}")]
    Inference(String),
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
