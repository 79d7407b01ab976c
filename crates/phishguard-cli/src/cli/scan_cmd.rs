//! `phishguard scan <URL>...` — classify URLs.

use crate::cli::output::{self, Styled};
use anyhow::{bail, Result};
use phishguard::rules;
use phishguard::{EngineMode, PredictionEngine, PredictionResult};
use serde::Serialize;

/// One scanned URL as printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub url: &'a str,
    #[serde(flatten)]
    pub result: &'a PredictionResult,
}

/// Reject input the engine would accept but a caller almost certainly
/// did not mean to send.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        bail!("URL cannot be empty");
    }
    Ok(())
}

/// Run the scan command.
pub fn run(engine: &PredictionEngine, urls: &[String]) -> Result<()> {
    for url in urls {
        validate_url(url)?;
    }

    let results: Vec<PredictionResult> = urls.iter().map(|url| engine.predict(url)).collect();

    if output::is_json() {
        let reports: Vec<ScanReport<'_>> = urls
            .iter()
            .zip(&results)
            .map(|(url, result)| ScanReport { url, result })
            .collect();
        output::print_json(&serde_json::to_value(&reports)?);
        return Ok(());
    }

    let s = Styled::new();
    if !output::is_quiet() {
        output::print_header(&s);
        if engine.mode() == EngineMode::RuleBased {
            eprintln!(
                "  {} {}",
                s.warn_sym(),
                s.yellow("No classifier loaded; using rule-based scoring.")
            );
            eprintln!();
        }
    }

    for (url, result) in urls.iter().zip(&results) {
        print_result(&s, url, result);
    }
    Ok(())
}

fn print_result(s: &Styled, url: &str, result: &PredictionResult) {
    let verdict = if result.is_phishing {
        format!("{} {}", s.fail_sym(), s.red("PHISHING"))
    } else {
        format!("{} {}", s.ok_sym(), s.green("LEGITIMATE"))
    };
    println!(
        "  {verdict}  {url}  {}",
        s.dim(&format!("({:.1}% confidence)", result.confidence))
    );

    if output::is_verbose() {
        let signals = rules::score(&result.features);
        for rule in &signals.matched {
            println!(
                "      + {} {}",
                rule.weight(),
                s.dim(rule.description())
            );
        }
        println!("      = rule score {}", signals.score);
    }
}
