//! `phishguard model` — report classifier artifact status.

use crate::cli::output::{self, Styled};
use anyhow::Result;
use phishguard::{Config, ModelArtifact};

/// Run the model command.
pub fn run(config: &Config) -> Result<()> {
    let loaded = ModelArtifact::load(&config.model_path);

    if output::is_json() {
        let value = match &loaded {
            Ok(artifact) => serde_json::json!({
                "loaded": true,
                "path": config.model_path,
                "model_id": artifact.model_id,
                "model_version": artifact.model_version,
                "kind": artifact.kind(),
                "feature_schema": artifact.feature_schema,
            }),
            Err(e) => serde_json::json!({
                "loaded": false,
                "path": config.model_path,
                "error": e.to_string(),
                "fallback": "rule_based",
            }),
        };
        output::print_json(&value);
        return Ok(());
    }

    let s = Styled::new();
    output::print_section(&s, "Classifier");
    output::print_check(
        s.ok_sym(),
        "path",
        &config.model_path.display().to_string(),
    );
    match loaded {
        Ok(artifact) => {
            output::print_check(s.ok_sym(), "model", &artifact.model_id);
            output::print_check(s.ok_sym(), "version", &artifact.model_version);
            output::print_check(s.ok_sym(), "kind", artifact.kind());
            output::print_check(s.ok_sym(), "feature schema", &artifact.feature_schema);
        }
        Err(e) => {
            output::print_check(s.fail_sym(), "status", &s.red(&e.to_string()));
            output::print_check(s.warn_sym(), "fallback", "rule-based scoring");
        }
    }
    Ok(())
}
