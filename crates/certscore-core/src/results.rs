//! Per-question scoring results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::QuestionType;

/// Outcome of one partial-credit criterion, before it is flattened into a
/// [`ScoringResult`] breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    /// Criterion name, see [`crate::rubric::criteria`].
    pub name: String,
    /// Points awarded.
    pub earned: f64,
    /// Points available for this criterion.
    pub max: f64,
    /// Display form of the expected value, shown when the criterion fails.
    pub expected: Option<String>,
}

impl CriterionScore {
    pub fn new(name: impl Into<String>, earned: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            earned,
            max,
            expected: None,
        }
    }

    pub fn expecting(mut self, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        if !expected.is_empty() {
            self.expected = Some(expected);
        }
        self
    }

    pub fn is_full(&self) -> bool {
        self.max > 0.0 && self.earned >= self.max - 1e-9
    }

    pub fn is_partial(&self) -> bool {
        self.earned > 0.0 && !self.is_full()
    }
}

/// Context recorded alongside a score for later analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub response_time_seconds: u64,
    pub attempt_number: u32,
    #[serde(default)]
    pub confidence_level: Option<u8>,
    pub complexity_multiplier: f64,
    /// Practical coding only.
    #[serde(default)]
    pub compliance_score: Option<f64>,
}

/// The graded outcome of a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub question_id: String,
    pub question_type: QuestionType,
    pub points_earned: f64,
    pub points_possible: f64,
    /// `points_earned / points_possible * 100`.
    pub percentage: f64,
    pub is_correct: bool,
    pub partial_credit_applied: bool,
    pub feedback: String,
    /// Points per criterion, each rounded on its own. `points_earned` rounds
    /// the unrounded sum, so the entries may differ from it in the last digit.
    pub breakdown: BTreeMap<String, f64>,
    pub analysis: QuestionAnalysis,
}

impl ScoringResult {
    /// Percentage as a fraction clamped to `[0, 1]`, used for competency rollup.
    pub fn fraction(&self) -> f64 {
        (self.percentage / 100.0).clamp(0.0, 1.0)
    }
}
