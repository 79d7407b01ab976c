//! Two-tier prediction: classifier inference with a rule-based fallback.
//!
//! The engine holds an optional, immutable classifier handle. Each call
//! extracts features once and tries the available strategies in order. A
//! classifier failure affects only the current call; the next call tries the
//! classifier again.

use crate::config::Config;
use crate::error::{ModelError, Result};
use crate::features::{self, FeatureRecord, FeatureVector};
use crate::model::{self, Classifier, Label};
use crate::rules;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Confidence reported when a classifier without probabilities says phishing.
pub const PHISHING_PLACEHOLDER_CONFIDENCE: f64 = 95.0;

/// Confidence reported when a classifier without probabilities says legitimate.
pub const LEGITIMATE_PLACEHOLDER_CONFIDENCE: f64 = 92.0;

/// Tolerance for class probabilities summing to one.
const PROBA_SUM_TOLERANCE: f64 = 1e-6;

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub is_phishing: bool,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    /// Full feature set, whichever strategy produced the verdict.
    pub features: FeatureRecord,
}

/// Label and confidence produced by one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_phishing: bool,
    pub confidence: f64,
}

/// Which strategy the engine tries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Classifier,
    RuleBased,
}

/// A scoring strategy.
pub enum Strategy<'a> {
    Model(&'a dyn Classifier),
    Rules,
}

impl Strategy<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Model(_) => "classifier",
            Strategy::Rules => "rules",
        }
    }

    /// Score a feature record. Only the model strategy can fail.
    pub fn score(&self, features: &FeatureRecord) -> Result<Verdict> {
        match self {
            Strategy::Model(classifier) => classify(*classifier, &features.to_vector()),
            Strategy::Rules => Ok(rules::score(features).verdict()),
        }
    }
}

/// Runs a classifier, turning panics into inference errors.
fn classify(classifier: &dyn Classifier, vector: &FeatureVector) -> Result<Verdict> {
    panic::catch_unwind(AssertUnwindSafe(|| -> Result<Verdict> {
        let label = classifier.predict(vector)?;
        let confidence = match classifier.predict_proba(vector) {
            Some(proba) => max_probability(proba?)? * 100.0,
            None => match label {
                Label::Phishing => PHISHING_PLACEHOLDER_CONFIDENCE,
                Label::Legitimate => LEGITIMATE_PLACEHOLDER_CONFIDENCE,
            },
        };
        Ok(Verdict {
            is_phishing: label == Label::Phishing,
            confidence: confidence.clamp(0.0, 100.0),
        })
    }))
    .unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ModelError::Inference(format!("classifier panicked: {msg}")))
    })
}

fn max_probability(proba: [f64; 2]) -> Result<f64> {
    for p in proba {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ModelError::Inference(format!("invalid class probability {p}")));
        }
    }
    let sum = proba[0] + proba[1];
    if (sum - 1.0).abs() > PROBA_SUM_TOLERANCE {
        return Err(ModelError::Inference(format!("class probabilities sum to {sum}")));
    }
    Ok(proba[0].max(proba[1]))
}

/// Classifies URLs. Cheap to clone and safe to share across threads.
#[derive(Clone, Default)]
pub struct PredictionEngine {
    classifier: Option<Arc<dyn Classifier>>,
}

impl std::fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("mode", &self.mode())
            .finish()
    }
}

impl PredictionEngine {
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self { classifier }
    }

    /// An engine that never consults a classifier.
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: impl Classifier + 'static) -> Self {
        Self::new(Some(Arc::new(classifier)))
    }

    /// Load the configured model artifact. A missing or invalid artifact
    /// leaves the engine in rule-based mode.
    pub fn from_config(config: &Config) -> Self {
        Self::new(model::load_classifier(&config.model_path))
    }

    pub fn mode(&self) -> EngineMode {
        if self.classifier.is_some() {
            EngineMode::Classifier
        } else {
            EngineMode::RuleBased
        }
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> impl Iterator<Item = Strategy<'_>> {
        self.classifier
            .as_deref()
            .map(|classifier| Strategy::Model(classifier))
            .into_iter()
            .chain(std::iter::once(Strategy::Rules))
    }

    /// Classify a URL. Never fails, whatever the input.
    pub fn predict(&self, url: &str) -> PredictionResult {
        let features = features::extract(url);

        let verdict = self
            .strategies()
            .find_map(|strategy| match strategy.score(&features) {
                Ok(verdict) => {
                    debug!(
                        strategy = strategy.name(),
                        is_phishing = verdict.is_phishing,
                        confidence = verdict.confidence,
                        "scored url"
                    );
                    Some(verdict)
                }
                Err(e) => {
                    warn!("{} strategy failed, falling back: {e}", strategy.name());
                    None
                }
            })
            .unwrap_or_else(|| rules::score(&features).verdict());

        PredictionResult {
            is_phishing: verdict.is_phishing,
            confidence: verdict.confidence,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        label: Label,
        proba: Option<[f64; 2]>,
    }

    impl Classifier for Fixed {
        fn predict(&self, _vector: &FeatureVector) -> Result<Label> {
            Ok(self.label)
        }

        fn predict_proba(&self, _vector: &FeatureVector) -> Option<Result<[f64; 2]>> {
            self.proba.map(Ok)
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict(&self, _vector: &FeatureVector) -> Result<Label> {
            Err(ModelError::Inference("boom".to_string()))
        }
    }

    struct Panicking;

    impl Classifier for Panicking {
        fn predict(&self, _vector: &FeatureVector) -> Result<Label> {
            panic!("model exploded")
        }
    }

    #[test]
    fn test_rule_based_mode() {
        let engine = PredictionEngine::rule_based();
        assert_eq!(engine.mode(), EngineMode::RuleBased);

        let r = engine.predict("http://a.com");
        assert!(!r.is_phishing);
        assert_eq!(r.confidence, 95.0);

        let r = engine.predict("http://1.2.3.4");
        assert!(r.is_phishing);
        assert_eq!(r.features.url_length, 14);
    }

    #[test]
    fn test_classifier_probability_confidence() {
        let engine = PredictionEngine::with_classifier(Fixed {
            label: Label::Legitimate,
            proba: Some([0.8, 0.2]),
        });
        assert_eq!(engine.mode(), EngineMode::Classifier);

        // Rules would call this phishing; the classifier wins.
        let r = engine.predict("http://1.2.3.4/login");
        assert!(!r.is_phishing);
        assert!((r.confidence - 80.0).abs() < 1e-9);
        assert!(r.features.has_ip);
    }

    #[test]
    fn test_classifier_placeholder_confidence() {
        let phishing = PredictionEngine::with_classifier(Fixed {
            label: Label::Phishing,
            proba: None,
        });
        assert_eq!(phishing.predict("https://example.com").confidence, 95.0);

        let legit = PredictionEngine::with_classifier(Fixed {
            label: Label::Legitimate,
            proba: None,
        });
        assert_eq!(legit.predict("https://example.com").confidence, 92.0);
    }

    #[test]
    fn test_failing_classifier_matches_rule_based() {
        let rules = PredictionEngine::rule_based();
        let failing = PredictionEngine::with_classifier(Failing);
        for url in ["http://a.com", "http://1.2.3.4/login", "garbage", ""] {
            assert_eq!(failing.predict(url), rules.predict(url));
        }
        // Handle is kept for the next call.
        assert_eq!(failing.mode(), EngineMode::Classifier);
    }

    #[test]
    fn test_panicking_classifier_falls_back() {
        let rules = PredictionEngine::rule_based();
        let engine = PredictionEngine::with_classifier(Panicking);
        let url = "http://user@192.168.0.1/verify";
        assert_eq!(engine.predict(url), rules.predict(url));
    }

    #[test]
    fn test_invalid_probabilities_fall_back() {
        let rules = PredictionEngine::rule_based();
        for proba in [[f64::NAN, 0.5], [0.7, 0.7], [-0.5, 1.5]] {
            let engine = PredictionEngine::with_classifier(Fixed {
                label: Label::Legitimate,
                proba: Some(proba),
            });
            assert_eq!(engine.predict("http://a.com"), rules.predict("http://a.com"));
        }
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = PredictionEngine::rule_based()
            .strategies()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["rules"]);

        let engine = PredictionEngine::with_classifier(Failing);
        let names: Vec<_> = engine.strategies().map(|s| s.name()).collect();
        assert_eq!(names, ["classifier", "rules"]);
    }

    #[test]
    fn test_result_json_shape() {
        let r = PredictionEngine::rule_based().predict("http://a.com");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["isPhishing"], false);
        assert_eq!(json["confidence"], 95.0);
        assert_eq!(json["features"]["urlLength"], 12);
    }
}
