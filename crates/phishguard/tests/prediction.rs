use phishguard::{Config, EngineMode, ModelArtifact, PredictionEngine};
use std::sync::Arc;
use std::thread;

const MODEL_JSON: &str = include_str!("fixtures/phishing_model.json");

const SAMPLE_URLS: &[&str] = &[
    "",
    " ",
    "https://example.com",
    "http://a.com",
    "http://192.168.1.1/login",
    "http://paypal.com@evil.example/verify-account",
    "https://www.google.com/search?q=rust&hl=en",
    "://::::",
    "http://[::1]:8080/",
    "javascript:alert(1)",
    "http://xn--80ak6aa92e.com/",
    "http://ünïcödé.example/päth",
    "%%%%%%%%",
    "http://a.b.c.d.e.f.g.h/very/deep/path/with/many/segments?x=1&y=2#frag",
];

fn engine_with_fixture() -> (tempfile::TempDir, PredictionEngine) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phishing_model.json");
    std::fs::write(&path, MODEL_JSON).unwrap();
    let engine = PredictionEngine::from_config(&Config { model_path: path });
    (dir, engine)
}

#[test]
fn fixture_artifact_is_valid() {
    let artifact = ModelArtifact::from_json(MODEL_JSON).unwrap();
    assert_eq!(artifact.kind(), "logistic_regression");
}

#[test]
fn loads_classifier_from_disk() {
    let (_dir, engine) = engine_with_fixture();
    assert_eq!(engine.mode(), EngineMode::Classifier);

    let r = engine.predict("http://192.168.1.1/login");
    assert!(r.is_phishing);
    assert!(r.confidence > 50.0 && r.confidence <= 100.0);

    let r = engine.predict("https://example.com");
    assert!(!r.is_phishing);
}

#[test]
fn missing_artifact_degrades_to_rules() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PredictionEngine::from_config(&Config {
        model_path: dir.path().join("nope.json"),
    });
    assert_eq!(engine.mode(), EngineMode::RuleBased);
    assert_eq!(engine.predict("http://a.com").confidence, 95.0);
}

#[test]
fn corrupt_artifact_degrades_to_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phishing_model.json");
    std::fs::write(&path, "{ not json").unwrap();
    let engine = PredictionEngine::from_config(&Config { model_path: path });
    assert_eq!(engine.mode(), EngineMode::RuleBased);
}

#[test]
fn every_input_yields_a_bounded_result() {
    let (_dir, with_model) = engine_with_fixture();
    let rules = PredictionEngine::rule_based();
    for url in SAMPLE_URLS {
        for engine in [&with_model, &rules] {
            let r = engine.predict(url);
            assert_eq!(r.features.url_length, url.chars().count());
            assert!((0.0..=100.0).contains(&r.confidence), "{url}: {}", r.confidence);
        }
        assert!(rules.predict(url).confidence <= 95.0);
    }
}

#[test]
fn predictions_are_idempotent() {
    let (_dir, engine) = engine_with_fixture();
    for url in SAMPLE_URLS {
        assert_eq!(engine.predict(url), engine.predict(url));
    }
}

#[test]
fn rule_boundary_examples() {
    let engine = PredictionEngine::rule_based();
    assert!(!engine.predict("http://a.com").is_phishing);
    assert!(engine.predict("http://1.2.3.4").is_phishing);
    assert!(engine.predict("http://a.com/login").is_phishing);
    assert!(!engine.predict("https://1.2.3.4/").is_phishing);
}

#[test]
fn concurrent_callers_share_one_engine() {
    let (_dir, engine) = engine_with_fixture();
    let engine = Arc::new(engine);
    let expected: Vec<_> = SAMPLE_URLS.iter().map(|u| engine.predict(u)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                SAMPLE_URLS
                    .iter()
                    .map(|u| engine.predict(u))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
