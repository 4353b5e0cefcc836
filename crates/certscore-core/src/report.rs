//! Assessment-level score types and the flattened summary view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::ScoringResult;

/// Version tag stamped into every score's metadata.
pub const SCORING_VERSION: &str = "1.0";

/// Bookkeeping about how a score was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringMetadata {
    pub scoring_timestamp: DateTime<Utc>,
    pub scoring_version: String,
    /// Questions actually graded.
    pub total_questions: usize,
    pub questions_correct: usize,
    pub partial_credit_questions: usize,
    /// Answers dropped because their question is not in the assessment.
    pub skipped_answers: usize,
    /// Mean seconds per submitted answer.
    pub average_response_time: f64,
    /// Passing threshold as a percentage.
    pub passing_threshold: f64,
    /// Percentage with points weighted by question type. Reporting only.
    pub weighted_percentage: f64,
}

/// The complete result of scoring one assessment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScore {
    pub student_id: String,
    pub assessment_id: String,
    /// One entry per graded answer, in submission order.
    pub individual_scores: Vec<ScoringResult>,
    pub total_points_earned: f64,
    pub total_points_possible: f64,
    pub percentage_score: f64,
    pub passed: bool,
    /// Mean fraction in `[0, 1]` per competency.
    pub competency_scores: BTreeMap<String, f64>,
    pub time_taken_minutes: u64,
    pub metadata: ScoringMetadata,
}

/// Per-question line of a [`ScoreSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScoreSummary {
    pub question_id: String,
    pub points_earned: f64,
    pub points_possible: f64,
    pub percentage: f64,
    pub is_correct: bool,
    pub feedback: String,
}

/// Flattened view meant for embedding into a larger content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_points_earned: f64,
    pub total_points_possible: f64,
    pub percentage_score: f64,
    pub passed: bool,
    pub competency_scores: BTreeMap<String, f64>,
    pub time_taken_minutes: u64,
    pub individual_question_scores: Vec<QuestionScoreSummary>,
    pub scoring_metadata: ScoringMetadata,
    pub scored_at: DateTime<Utc>,
}

impl AssessmentScore {
    /// Flatten into the summary view.
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            total_points_earned: self.total_points_earned,
            total_points_possible: self.total_points_possible,
            percentage_score: self.percentage_score,
            passed: self.passed,
            competency_scores: self.competency_scores.clone(),
            time_taken_minutes: self.time_taken_minutes,
            individual_question_scores: self
                .individual_scores
                .iter()
                .map(|r| QuestionScoreSummary {
                    question_id: r.question_id.clone(),
                    points_earned: r.points_earned,
                    points_possible: r.points_possible,
                    percentage: r.percentage,
                    is_correct: r.is_correct,
                    feedback: r.feedback.clone(),
                })
                .collect(),
            scoring_metadata: self.metadata.clone(),
            scored_at: self.metadata.scoring_timestamp,
        }
    }

    /// Competencies below `threshold`, weakest first.
    pub fn weakest_competencies(&self, threshold: f64) -> Vec<(&str, f64)> {
        let mut weak: Vec<(&str, f64)> = self
            .competency_scores
            .iter()
            .filter(|(_, score)| **score < threshold)
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        weak
    }
}
