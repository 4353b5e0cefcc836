//! Rubric registry: point values and partial-credit weights per question type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::QuestionType;

/// Criterion names used in rubric weights and result breakdowns.
pub mod criteria {
    pub const PRIMARY_CODE: &str = "primary_code";
    pub const SECONDARY_CODES: &str = "secondary_codes";
    pub const MODIFIERS: &str = "modifiers";
    pub const CLINICAL_CORRELATION: &str = "clinical_correlation";

    pub const PREFIX: &str = "prefix";
    pub const ROOT: &str = "root";
    pub const SUFFIX: &str = "suffix";

    pub const DIAGNOSIS: &str = "diagnosis";
    pub const PROCEDURE_CODING: &str = "procedure_coding";
    pub const GUIDELINE: &str = "guideline";
    pub const DOCUMENTATION: &str = "documentation";

    pub const CODE_ACCURACY: &str = "code_accuracy";
    pub const SEQUENCE: &str = "sequence";
    pub const COMPLIANCE: &str = "compliance";

    /// Matching rubrics weight this as points per pair, not a fraction.
    pub const PER_CORRECT_MATCH: &str = "per_correct_match";

    pub const ANSWER: &str = "answer";
    pub const SPEED_BONUS: &str = "speed_bonus";
}

/// Scoring parameters for one question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricEntry {
    pub question_type: QuestionType,
    pub total_points: f64,
    pub partial_credit_enabled: bool,
    pub partial_credit_weights: BTreeMap<String, f64>,
    pub accuracy_weight: f64,
    /// Also the fraction of total points granted as a speed bonus.
    pub speed_weight: f64,
    /// Reporting only; never changes points.
    pub complexity_multiplier: f64,
}

impl RubricEntry {
    fn new(
        question_type: QuestionType,
        total_points: f64,
        weights: &[(&str, f64)],
        accuracy_weight: f64,
        speed_weight: f64,
        complexity_multiplier: f64,
    ) -> Self {
        Self {
            question_type,
            total_points,
            partial_credit_enabled: !weights.is_empty(),
            partial_credit_weights: weights
                .iter()
                .map(|(name, w)| (name.to_string(), *w))
                .collect(),
            accuracy_weight,
            speed_weight,
            complexity_multiplier,
        }
    }

    /// Weight fraction of a criterion, 0.0 when the rubric does not name it.
    pub fn weight(&self, criterion: &str) -> f64 {
        self.partial_credit_weights
            .get(criterion)
            .copied()
            .unwrap_or(0.0)
    }

    /// Maximum points a criterion can contribute.
    pub fn criterion_points(&self, criterion: &str) -> f64 {
        self.total_points * self.weight(criterion)
    }

    fn check(&self) -> Result<(), ScoringError> {
        if !(self.total_points.is_finite() && self.total_points > 0.0) {
            return Err(ScoringError::configuration(format!(
                "rubric for {} must have positive total_points, got {}",
                self.question_type, self.total_points
            )));
        }
        if self.question_type != QuestionType::Matching {
            let sum: f64 = self.partial_credit_weights.values().sum();
            if sum > 1.0 + 1e-9 || self.partial_credit_weights.values().any(|w| *w < 0.0) {
                return Err(ScoringError::configuration(format!(
                    "rubric weights for {} must be non-negative and sum to at most 1.0, got {sum}",
                    self.question_type
                )));
            }
        }
        Ok(())
    }
}

/// Immutable lookup from question type to rubric.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricRegistry {
    entries: BTreeMap<QuestionType, RubricEntry>,
}

impl RubricRegistry {
    /// The built-in table, one entry per question type.
    pub fn builtin() -> Self {
        use criteria::*;
        use QuestionType::*;

        let entries = [
            RubricEntry::new(MultipleChoice, 1.0, &[], 1.0, 0.1, 1.0),
            RubricEntry::new(
                ScenarioBased,
                5.0,
                &[
                    (PRIMARY_CODE, 0.6),
                    (SECONDARY_CODES, 0.2),
                    (MODIFIERS, 0.1),
                    (CLINICAL_CORRELATION, 0.1),
                ],
                0.8,
                0.1,
                1.5,
            ),
            RubricEntry::new(
                WordConstruction,
                2.0,
                &[(PREFIX, 0.3), (ROOT, 0.4), (SUFFIX, 0.3)],
                0.9,
                0.1,
                1.2,
            ),
            RubricEntry::new(
                CaseAnalysis,
                10.0,
                &[
                    (DIAGNOSIS, 0.3),
                    (PROCEDURE_CODING, 0.4),
                    (GUIDELINE, 0.2),
                    (DOCUMENTATION, 0.1),
                ],
                0.7,
                0.1,
                2.0,
            ),
            RubricEntry::new(
                PracticalCoding,
                15.0,
                &[
                    (CODE_ACCURACY, 0.5),
                    (SEQUENCE, 0.2),
                    (MODIFIERS, 0.15),
                    (COMPLIANCE, 0.15),
                ],
                0.8,
                0.1,
                2.5,
            ),
            RubricEntry::new(Matching, 3.0, &[(PER_CORRECT_MATCH, 1.0)], 1.0, 0.05, 1.0),
            RubricEntry::new(TrueFalse, 0.5, &[], 1.0, 0.05, 0.8),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.question_type, e))
                .collect(),
        }
    }

    /// Build a custom registry. Types left out fail at lookup time.
    pub fn from_entries<I>(entries: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = RubricEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            entry.check()?;
            if map.insert(entry.question_type, entry).is_some() {
                return Err(ScoringError::configuration(
                    "duplicate rubric entry for one question type",
                ));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, question_type: QuestionType) -> Result<&RubricEntry, ScoringError> {
        self.entries.get(&question_type).ok_or_else(|| {
            ScoringError::configuration(format!("no rubric registered for {question_type}"))
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &RubricEntry> {
        self.entries.values()
    }
}

impl Default for RubricRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
