//! Extract the fixed-order URL feature record consumed by classifiers.
//!
//! Extraction is total: any string yields a [`FeatureRecord`]. Fields that
//! need a parsed authority fall back to `0`/`false` when the string does not
//! parse as an absolute URL with a host; every other field is a plain scan of
//! the raw string.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Version tag of the feature ordering. Model artifacts must declare it.
pub const FEATURE_SCHEMA: &str = "url-features/v1";

/// Number of features in the classifier input vector.
pub const FEATURE_COUNT: usize = 10;

/// Classifier input order. Changing this requires a new [`FEATURE_SCHEMA`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "url_length",
    "https_used",
    "has_ip",
    "has_at_symbol",
    "subdomain_count",
    "url_depth",
    "has_suspicious_keywords",
    "domain_length",
    "has_numbers_in_domain",
    "has_hyphen",
];

/// Keywords matched case-insensitively anywhere in the URL.
pub const SUSPICIOUS_KEYWORDS: &[&str] =
    &["login", "verify", "account", "secure", "update", "confirm"];

/// Characters counted by `special_char_count`.
pub const SPECIAL_CHARS: &[char] = &[
    '@', '?', '-', '=', '.', '#', '%', '+', '$', '!', '*', ',', ';', '_', '&',
];

/// Numeric classifier input, ordered as [`FEATURE_NAMES`].
pub type FeatureVector = [f64; FEATURE_COUNT];

static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap());

/// Features derived from one URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub url_length: usize,
    pub https_used: bool,
    #[serde(rename = "hasIP")]
    pub has_ip: bool,
    pub has_at_symbol: bool,
    /// Count of `.` in the whole URL, not a DNS label count.
    pub subdomain_count: usize,
    /// Count of `/` in the whole URL.
    pub url_depth: usize,
    pub has_suspicious_keywords: bool,
    pub domain_length: usize,
    pub has_numbers_in_domain: bool,
    pub has_hyphen: bool,
    /// Reported only; never part of [`FeatureVector`].
    pub special_char_count: usize,
}

impl FeatureRecord {
    /// Build the classifier input vector, booleans as `0.0`/`1.0`.
    pub fn to_vector(&self) -> FeatureVector {
        [
            self.url_length as f64,
            flag(self.https_used),
            flag(self.has_ip),
            flag(self.has_at_symbol),
            self.subdomain_count as f64,
            self.url_depth as f64,
            flag(self.has_suspicious_keywords),
            self.domain_length as f64,
            flag(self.has_numbers_in_domain),
            flag(self.has_hyphen),
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Extract features from a raw URL string. Never fails.
pub fn extract(url: &str) -> FeatureRecord {
    let authority = raw_authority(url);
    let lowered = url.to_lowercase();

    FeatureRecord {
        url_length: url.chars().count(),
        https_used: https_used(url),
        has_ip: IP_RE.is_match(url),
        has_at_symbol: url.contains('@'),
        subdomain_count: url.matches('.').count(),
        url_depth: url.matches('/').count(),
        has_suspicious_keywords: SUSPICIOUS_KEYWORDS.iter().any(|k| lowered.contains(k)),
        domain_length: authority.map_or(0, |a| a.chars().count()),
        has_numbers_in_domain: authority.is_some_and(|a| a.chars().any(|c| c.is_ascii_digit())),
        has_hyphen: url.contains('-'),
        special_char_count: url.chars().filter(|c| SPECIAL_CHARS.contains(c)).count(),
    }
}

/// Scheme check on the string as written, so leading junk is not skipped.
fn https_used(raw: &str) -> bool {
    raw.get(..6).is_some_and(|prefix| prefix.eq_ignore_ascii_case("https:"))
}

/// Host and port exactly as written between `scheme://` and the path,
/// without user-info. The parser only decides whether there is a host.
fn raw_authority(raw: &str) -> Option<&str> {
    let parsed = Url::parse(raw).ok()?;
    parsed.host_str().filter(|h| !h.is_empty())?;

    let (_, rest) = raw.split_once("://")?;
    let end = rest.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!host_port.is_empty()).then_some(host_port)
}
