//! JSON persistence for single scores and batch reports.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use certscore_core::report::AssessmentScore;
use certscore_core::statistics::{mean, round_to};

/// Write one assessment score as pretty-printed JSON.
pub fn save_score_json(score: &AssessmentScore, path: &Path) -> Result<()> {
    write_json(score, path, "score")
}

/// Load one assessment score from a JSON file.
pub fn load_score_json(path: &Path) -> Result<AssessmentScore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read score from {}", path.display()))?;
    serde_json::from_str(&content).context("failed to parse score JSON")
}

fn write_json<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {what}"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {what} to {}", path.display()))?;
    Ok(())
}

/// A submission that could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Where the submission came from, usually a file path.
    pub source: String,
    pub error: String,
}

/// The outcome of scoring many submissions in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub scores: Vec<AssessmentScore>,
    #[serde(default)]
    pub failures: Vec<BatchFailure>,
}

/// Headline numbers over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub attempts: usize,
    pub scored: usize,
    pub failed: usize,
    pub passed: usize,
    pub mean_percentage: f64,
    /// Mean of each competency over the scores that report it.
    pub competency_means: BTreeMap<String, f64>,
}

impl BatchReport {
    pub fn new(scores: Vec<AssessmentScore>, failures: Vec<BatchFailure>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            scores,
            failures,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn stats(&self) -> BatchStats {
        let percentages: Vec<f64> = self.scores.iter().map(|s| s.percentage_score).collect();

        let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for score in &self.scores {
            for (name, value) in &score.competency_scores {
                samples.entry(name.clone()).or_default().push(*value);
            }
        }

        BatchStats {
            attempts: self.scores.len() + self.failures.len(),
            scored: self.scores.len(),
            failed: self.failures.len(),
            passed: self.scores.iter().filter(|s| s.passed).count(),
            mean_percentage: round_to(mean(&percentages), 2),
            competency_means: samples
                .into_iter()
                .map(|(name, values)| (name, mean(&values)))
                .collect(),
        }
    }

    /// Save the batch report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_json(self, path, "batch report")
    }

    /// Load a batch report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse batch report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certscore_core::model::{Assessment, Question, QuestionType, StudentAnswer};
    use certscore_core::ScoringEngine;
    use serde_json::json;

    fn score_for(student: &str, response: &str) -> AssessmentScore {
        let assessment = Assessment::new(
            "exam-1",
            student,
            vec![Question::new("q1", QuestionType::MultipleChoice, json!("A"))
                .with_competencies(["medical_terminology"])],
        );
        let answers = vec![StudentAnswer::new("q1", response).with_time(60)];
        ScoringEngine::default().score(&assessment, &answers).unwrap()
    }

    #[test]
    fn score_roundtrip_through_file() {
        let score = score_for("s1", "A");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("score.json");

        save_score_json(&score, &path).unwrap();
        let loaded = load_score_json(&path).unwrap();
        assert_eq!(loaded, score);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load_score_json(Path::new("/nonexistent/score.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/score.json"));
    }

    #[test]
    fn batch_stats() {
        let report = BatchReport::new(
            vec![score_for("s1", "A"), score_for("s2", "B")],
            vec![BatchFailure {
                source: "broken.json".into(),
                error: "malformed submission".into(),
            }],
        );
        let stats = report.stats();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.scored, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.mean_percentage, 50.0);
        assert_eq!(stats.competency_means["medical_terminology"], 0.5);
        assert!(report.has_failures());
    }

    #[test]
    fn batch_roundtrip_through_file() {
        let report = BatchReport::new(vec![score_for("s1", "A")], vec![]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");

        report.save_json(&path).unwrap();
        let loaded = BatchReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.scores.len(), 1);
        assert!(!loaded.has_failures());
    }
}
