//! `phishguard features <URL>` — show what the classifier sees.

use crate::cli::output::{self, Styled};
use anyhow::Result;
use phishguard::{extract, FeatureRecord, FEATURE_NAMES, FEATURE_SCHEMA};

/// Run the features command.
pub fn run(url: &str) -> Result<()> {
    let features = extract(url);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "url": url,
            "schema": FEATURE_SCHEMA,
            "features": features,
            "vector": features.to_vector(),
        }));
        return Ok(());
    }

    let s = Styled::new();
    output::print_section(&s, &format!("Features ({FEATURE_SCHEMA})"));
    for (name, value) in vector_rows(&features) {
        println!("    {name:<24} {value}");
    }
    println!(
        "    {:<24} {}",
        "special_char_count",
        s.dim(&format!("{} (not in vector)", features.special_char_count))
    );
    Ok(())
}

/// Feature names paired with their vector values, in classifier order.
pub fn vector_rows(features: &FeatureRecord) -> Vec<(&'static str, f64)> {
    FEATURE_NAMES
        .iter()
        .copied()
        .zip(features.to_vector())
        .collect()
}
