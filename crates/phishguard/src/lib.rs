//! PhishGuard — classify URLs as phishing or legitimate.
//!
//! ```text
//! url ──▶ features::extract ──▶ FeatureRecord ──┬──▶ Classifier (model artifact)
//!                                               │        │ error / absent
//!                                               │        ▼
//!                                               └──▶ rules::score
//!                                                        │
//!                                                        ▼
//!                                               PredictionResult
//! ```
//!
//! The classifier is loaded once at startup and held immutably by a
//! [`PredictionEngine`]. A missing or broken artifact is not an error: the
//! engine scores with fixed rules instead.

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod rules;

pub use config::Config;
pub use engine::{EngineMode, PredictionEngine, PredictionResult};
pub use error::ModelError;
pub use features::{
    extract, FeatureRecord, FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA,
};
pub use model::{Classifier, Label, ModelArtifact};
