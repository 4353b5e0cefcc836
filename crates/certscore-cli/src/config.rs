//! CLI configuration: scoring rules plus run defaults, read from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use certscore_core::rubric::{RubricEntry, RubricRegistry};
use certscore_core::{ScoringConfig, ScoringEngine};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "certscore.toml";

/// Top-level certscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertscoreConfig {
    /// Scoring rules handed to the engine.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Rubric entries replacing the built-in ones for their question type.
    #[serde(default)]
    pub rubric: Vec<RubricEntry>,
    /// Max submissions scored concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./certscore-results")
}

impl Default for CertscoreConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            rubric: Vec::new(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

impl CertscoreConfig {
    /// The built-in rubric with this config's overrides applied.
    pub fn registry(&self) -> Result<RubricRegistry> {
        if self.rubric.is_empty() {
            return Ok(RubricRegistry::builtin());
        }
        let mut entries: BTreeMap<_, _> = RubricRegistry::builtin()
            .entries()
            .map(|e| (e.question_type, e.clone()))
            .collect();
        for entry in &self.rubric {
            tracing::debug!("rubric override for {}", entry.question_type);
            entries.insert(entry.question_type, entry.clone());
        }
        RubricRegistry::from_entries(entries.into_values()).context("invalid rubric override")
    }

    /// Build a scoring engine from this config.
    pub fn engine(&self) -> Result<ScoringEngine> {
        ScoringEngine::new(self.scoring.clone(), self.registry()?)
            .context("invalid scoring configuration")
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `certscore.toml` in the current directory
/// 2. `~/.config/certscore/config.toml`
///
/// `CERTSCORE_PASSING_THRESHOLD` overrides the passing threshold.
pub fn load_config_from(path: Option<&Path>) -> Result<CertscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CertscoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => {
            tracing::warn!("no {} found, using default scoring rules", CONFIG_FILE);
            CertscoreConfig::default()
        }
    };

    if let Ok(value) = std::env::var("CERTSCORE_PASSING_THRESHOLD") {
        config.scoring.passing_threshold = value
            .trim()
            .parse()
            .with_context(|| format!("invalid CERTSCORE_PASSING_THRESHOLD: '{value}'"))?;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("certscore"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use certscore_core::QuestionType;

    #[test]
    fn parse_partial_config() {
        let config: CertscoreConfig = toml::from_str(
            r#"
parallelism = 2

[scoring]
passing_threshold = 0.7
detailed_feedback = false
"#,
        )
        .unwrap();
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.scoring.passing_threshold, 0.7);
        assert!(!config.scoring.detailed_feedback);
        // Untouched fields keep their defaults.
        assert_eq!(config.scoring.scoring_precision, 2);
        assert_eq!(config.output_dir, PathBuf::from("./certscore-results"));
    }

    #[test]
    fn rubric_override_replaces_one_type() {
        let config: CertscoreConfig = toml::from_str(
            r#"
[[rubric]]
question_type = "true_false"
total_points = 2.0
partial_credit_enabled = false
partial_credit_weights = {}
accuracy_weight = 1.0
speed_weight = 0.0
complexity_multiplier = 1.0
"#,
        )
        .unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.get(QuestionType::TrueFalse).unwrap().total_points, 2.0);
        assert_eq!(registry.get(QuestionType::CaseAnalysis).unwrap().total_points, 10.0);
    }

    #[test]
    fn invalid_scoring_rules_are_rejected() {
        let mut config = CertscoreConfig::default();
        config.scoring.passing_threshold = 1.5;
        let err = config.engine().unwrap_err();
        assert!(format!("{err:#}").contains("passing_threshold"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/certscore.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[scoring]\nscoring_precision = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.scoring.scoring_precision, 3);
    }
}
