//! Scoring configuration.
//!
//! The engine never loads this itself; callers build it (or deserialize it
//! from their own config file) and hand it to [`crate::engine::ScoringEngine`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::QuestionType;

/// Tunable scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Fraction of total points needed to pass.
    #[serde(default = "default_passing_threshold")]
    pub passing_threshold: f64,
    /// When false, partial-credit graders award all or nothing.
    #[serde(default = "default_true")]
    pub partial_credit_enabled: bool,
    /// Enable the multiple-choice speed bonus.
    #[serde(default = "default_true")]
    pub time_bonus_enabled: bool,
    /// Fraction of expected time under which the speed bonus applies.
    #[serde(default = "default_speed_bonus_threshold")]
    pub speed_bonus_threshold: f64,
    /// Roll scores up per competency.
    #[serde(default = "default_true")]
    pub competency_tracking: bool,
    /// Per-criterion feedback instead of a bare correct/incorrect.
    #[serde(default = "default_true")]
    pub detailed_feedback: bool,
    /// Decimal digits kept on reported points and percentages.
    #[serde(default = "default_precision")]
    pub scoring_precision: u32,
    /// Per-type multipliers used for the weighted reporting percentage.
    #[serde(default = "default_type_weights")]
    pub question_type_weights: BTreeMap<String, f64>,
    /// Competencies always reported, even without contributing questions.
    #[serde(default = "default_competency_categories")]
    pub competency_categories: Vec<String>,
}

fn default_passing_threshold() -> f64 {
    0.80
}
fn default_true() -> bool {
    true
}
fn default_speed_bonus_threshold() -> f64 {
    0.75
}
fn default_precision() -> u32 {
    2
}

fn default_type_weights() -> BTreeMap<String, f64> {
    [
        (QuestionType::MultipleChoice, 1.0),
        (QuestionType::ScenarioBased, 1.5),
        (QuestionType::WordConstruction, 1.2),
        (QuestionType::CaseAnalysis, 2.0),
        (QuestionType::PracticalCoding, 2.5),
        (QuestionType::Matching, 1.0),
        (QuestionType::TrueFalse, 0.8),
    ]
    .into_iter()
    .map(|(t, w)| (t.as_str().to_string(), w))
    .collect()
}

fn default_competency_categories() -> Vec<String> {
    [
        "medical_terminology",
        "coding_accuracy",
        "guideline_application",
        "clinical_correlation",
        "regulatory_compliance",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            passing_threshold: default_passing_threshold(),
            partial_credit_enabled: true,
            time_bonus_enabled: true,
            speed_bonus_threshold: default_speed_bonus_threshold(),
            competency_tracking: true,
            detailed_feedback: true,
            scoring_precision: default_precision(),
            question_type_weights: default_type_weights(),
            competency_categories: default_competency_categories(),
        }
    }
}

impl ScoringConfig {
    /// Reject values the engine cannot score with.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(0.0..=1.0).contains(&self.passing_threshold) {
            return Err(ScoringError::configuration(format!(
                "passing_threshold must be between 0.0 and 1.0, got {}",
                self.passing_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.speed_bonus_threshold) {
            return Err(ScoringError::configuration(format!(
                "speed_bonus_threshold must be between 0.0 and 1.0, got {}",
                self.speed_bonus_threshold
            )));
        }
        if self.scoring_precision > 10 {
            return Err(ScoringError::configuration(format!(
                "scoring_precision must be at most 10, got {}",
                self.scoring_precision
            )));
        }
        if let Some((tag, weight)) = self
            .question_type_weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ScoringError::configuration(format!(
                "question type weight for {tag} must be non-negative, got {weight}"
            )));
        }
        Ok(())
    }

    /// Reporting multiplier for a question type (1.0 when unset).
    pub fn type_weight(&self, question_type: QuestionType) -> f64 {
        self.question_type_weights
            .get(question_type.as_str())
            .copied()
            .unwrap_or(1.0)
    }
}
