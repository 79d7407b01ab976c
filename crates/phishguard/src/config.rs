//! Engine configuration: where the classifier artifact lives.

use std::path::PathBuf;

/// Overrides the model artifact path.
pub const MODEL_PATH_ENV: &str = "PHISHGUARD_MODEL_PATH";

/// Overrides the PhishGuard home directory.
pub const HOME_ENV: &str = "PHISHGUARD_HOME";

/// Artifact file name under `<home>/model/`.
pub const MODEL_FILE_NAME: &str = "phishing_model.json";

/// PhishGuard home directory (`$PHISHGUARD_HOME`, else `~/.phishguard`).
pub fn phishguard_home() -> PathBuf {
    if let Ok(p) = std::env::var(HOME_ENV) {
        return PathBuf::from(p);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".phishguard")
}

/// Settings needed to construct a `PredictionEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub model_path: PathBuf,
}

impl Config {
    /// Resolve from the environment, with an optional explicit path taking
    /// precedence.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self {
            model_path: resolve_model_path(
                explicit,
                std::env::var(MODEL_PATH_ENV).ok(),
                phishguard_home(),
            ),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(None)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn resolve_model_path(
    explicit: Option<PathBuf>,
    env_path: Option<String>,
    home: PathBuf,
) -> PathBuf {
    explicit
        .or_else(|| env_path.filter(|p| !p.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| home.join("model").join(MODEL_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_model_path(
            Some(PathBuf::from("/opt/model.json")),
            Some("/env/model.json".to_string()),
            PathBuf::from("/home/u/.phishguard"),
        );
        assert_eq!(path, PathBuf::from("/opt/model.json"));
    }

    #[test]
    fn test_env_path_before_default() {
        let path = resolve_model_path(
            None,
            Some("/env/model.json".to_string()),
            PathBuf::from("/home/u/.phishguard"),
        );
        assert_eq!(path, PathBuf::from("/env/model.json"));
    }

    #[test]
    fn test_default_under_home() {
        let path = resolve_model_path(
            None,
            Some("  ".to_string()),
            PathBuf::from("/home/u/.phishguard"),
        );
        assert_eq!(
            path,
            PathBuf::from("/home/u/.phishguard/model/phishing_model.json")
        );
    }
}
