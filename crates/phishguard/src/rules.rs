//! Rule-based phishing scoring, used when no classifier is usable.

use crate::engine::Verdict;
use crate::features::FeatureRecord;

/// Minimum score classified as phishing.
pub const PHISHING_THRESHOLD: u32 = 5;

/// Upper bound of rule-based confidence.
pub const MAX_RULE_CONFIDENCE: f64 = 95.0;

/// One weighted heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    LongUrl,
    NoHttps,
    IpAddress,
    AtSymbol,
    ManyDots,
    SuspiciousKeyword,
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::LongUrl,
        Rule::NoHttps,
        Rule::IpAddress,
        Rule::AtSymbol,
        Rule::ManyDots,
        Rule::SuspiciousKeyword,
    ];

    pub fn weight(self) -> u32 {
        match self {
            Rule::LongUrl => 2,
            Rule::NoHttps => 3,
            Rule::IpAddress => 4,
            Rule::AtSymbol => 3,
            Rule::ManyDots => 2,
            Rule::SuspiciousKeyword => 2,
        }
    }

    pub fn matches(self, f: &FeatureRecord) -> bool {
        match self {
            Rule::LongUrl => f.url_length > 75,
            Rule::NoHttps => !f.https_used,
            Rule::IpAddress => f.has_ip,
            Rule::AtSymbol => f.has_at_symbol,
            Rule::ManyDots => f.subdomain_count > 3,
            Rule::SuspiciousKeyword => f.has_suspicious_keywords,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::LongUrl => "URL longer than 75 characters",
            Rule::NoHttps => "not served over HTTPS",
            Rule::IpAddress => "contains an IPv4 address",
            Rule::AtSymbol => "contains '@'",
            Rule::ManyDots => "more than 3 dots",
            Rule::SuspiciousKeyword => "contains a suspicious keyword",
        }
    }
}

/// Summed score and the rules that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleScore {
    pub score: u32,
    pub matched: Vec<Rule>,
}

impl RuleScore {
    pub fn is_phishing(&self) -> bool {
        self.score >= PHISHING_THRESHOLD
    }

    /// Confidence in `[0, MAX_RULE_CONFIDENCE]`.
    pub fn confidence(&self) -> f64 {
        let score = i64::from(self.score);
        let raw = if self.is_phishing() {
            score * 10 + 50
        } else {
            (10 - score) * 10 + 50
        };
        (raw as f64).clamp(0.0, MAX_RULE_CONFIDENCE)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict {
            is_phishing: self.is_phishing(),
            confidence: self.confidence(),
        }
    }
}

/// Score a feature record against every rule.
pub fn score(features: &FeatureRecord) -> RuleScore {
    let matched: Vec<Rule> = Rule::ALL
        .into_iter()
        .filter(|rule| rule.matches(features))
        .collect();
    RuleScore {
        score: matched.iter().map(|rule| rule.weight()).sum(),
        matched,
    }
}
