//! Per-question-type graders.
//!
//! [`grade`] dispatches on [`QuestionType`] with an exhaustive match; each
//! partial-credit grader returns its criteria and [`finish`] turns them into a
//! [`ScoringResult`] the same way for every type.

use std::collections::BTreeMap;

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::feedback::FeedbackComposer;
use crate::model::{Question, QuestionType, StudentAnswer};
use crate::results::{CriterionScore, QuestionAnalysis, ScoringResult};
use crate::rubric::RubricEntry;
use crate::statistics::round_to;

pub mod case_analysis;
pub mod exact;
pub mod matching;
pub mod practical;
pub mod scenario;
pub mod word;

/// Fraction of total points at which a partial-credit answer counts as correct.
pub const CORRECTNESS_THRESHOLD: f64 = 0.8;

/// Minimum explanation length that earns presence-based credit.
pub const MIN_EXPLANATION_CHARS: usize = 50;

/// Read-only inputs shared by every grader.
#[derive(Debug, Clone, Copy)]
pub struct GradeContext<'a> {
    pub config: &'a ScoringConfig,
    pub rubric: &'a RubricEntry,
    pub feedback: FeedbackComposer,
}

impl<'a> GradeContext<'a> {
    pub fn new(config: &'a ScoringConfig, rubric: &'a RubricEntry) -> Self {
        Self {
            config,
            rubric,
            feedback: FeedbackComposer::new(config.detailed_feedback),
        }
    }

    fn partial_credit(&self) -> bool {
        self.config.partial_credit_enabled && self.rubric.partial_credit_enabled
    }

    /// A criterion worth `weight × total_points × ratio`.
    pub(crate) fn weighted(&self, criterion: &str, ratio: f64) -> CriterionScore {
        let max = self.rubric.criterion_points(criterion);
        CriterionScore::new(criterion, max * ratio.clamp(0.0, 1.0), max)
    }
}

/// What a partial-credit grader hands back before scoring is finalized.
#[derive(Debug, Clone, Default)]
pub struct Graded {
    pub criteria: Vec<CriterionScore>,
    pub is_correct: bool,
    pub compliance_score: Option<f64>,
}

impl Graded {
    /// Correct when the criteria reach [`CORRECTNESS_THRESHOLD`] of `total_points`.
    pub fn by_threshold(criteria: Vec<CriterionScore>, total_points: f64) -> Self {
        let earned = raw_points(&criteria);
        Self {
            is_correct: earned >= total_points * CORRECTNESS_THRESHOLD - 1e-9,
            criteria,
            compliance_score: None,
        }
    }
}

fn raw_points(criteria: &[CriterionScore]) -> f64 {
    criteria.iter().map(|c| c.earned).sum()
}

/// Grade one answer with the grader for `question_type`.
pub fn grade(
    question_type: QuestionType,
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<ScoringResult, ScoringError> {
    match question_type {
        QuestionType::MultipleChoice => exact::grade_multiple_choice(question, answer, ctx),
        QuestionType::TrueFalse => exact::grade_true_false(question, answer, ctx),
        QuestionType::ScenarioBased => {
            let graded = scenario::grade(question, answer, ctx)?;
            Ok(finish(question_type, question, answer, ctx, graded))
        }
        QuestionType::WordConstruction => {
            let graded = word::grade(question, answer, ctx)?;
            Ok(finish(question_type, question, answer, ctx, graded))
        }
        QuestionType::CaseAnalysis => {
            let graded = case_analysis::grade(question, answer, ctx)?;
            Ok(finish(question_type, question, answer, ctx, graded))
        }
        QuestionType::PracticalCoding => {
            let graded = practical::grade(question, answer, ctx)?;
            Ok(finish(question_type, question, answer, ctx, graded))
        }
        QuestionType::Matching => {
            let graded = matching::grade(question, answer, ctx)?;
            Ok(finish(question_type, question, answer, ctx, graded))
        }
    }
}

/// Sum, cap, round, and package a partial-credit grade.
pub(crate) fn finish(
    question_type: QuestionType,
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
    graded: Graded,
) -> ScoringResult {
    let total = ctx.rubric.total_points;
    let precision = ctx.config.scoring_precision;
    let partial = ctx.partial_credit();

    let raw = if partial {
        raw_points(&graded.criteria).min(total)
    } else if graded.is_correct {
        total
    } else {
        0.0
    };
    let points_earned = round_to(raw, precision);

    let breakdown: BTreeMap<String, f64> = graded
        .criteria
        .iter()
        .map(|c| (c.name.clone(), round_to(c.earned, precision)))
        .collect();

    let feedback = ctx
        .feedback
        .compose(question_type, &graded.criteria, graded.is_correct);

    ScoringResult {
        question_id: question.id.clone(),
        question_type,
        points_earned,
        points_possible: total,
        percentage: points_earned / total * 100.0,
        is_correct: graded.is_correct,
        partial_credit_applied: partial,
        feedback,
        breakdown,
        analysis: analysis(answer, ctx, graded.compliance_score),
    }
}

pub(crate) fn analysis(
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
    compliance_score: Option<f64>,
) -> QuestionAnalysis {
    QuestionAnalysis {
        response_time_seconds: answer.time_taken_seconds,
        attempt_number: answer.attempt_number,
        confidence_level: answer.confidence_level,
        complexity_multiplier: ctx.rubric.complexity_multiplier,
        compliance_score,
    }
}

/// Presence heuristic for free-text explanations.
pub(crate) fn explanation_is_substantive(explanation: Option<&str>) -> bool {
    explanation.is_some_and(|e| e.trim().chars().count() > MIN_EXPLANATION_CHARS)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::rubric::RubricRegistry;
    use serde_json::Value;

    /// Grade a single answer with the built-in rubric and the given config.
    pub fn grade_with(
        config: &ScoringConfig,
        question: &Question,
        answer: &StudentAnswer,
    ) -> Result<ScoringResult, ScoringError> {
        let registry = RubricRegistry::builtin();
        let kind = question.kind()?;
        let rubric = registry.get(kind)?;
        let ctx = GradeContext::new(config, rubric);
        grade(kind, question, answer, &ctx)
    }

    pub fn grade_default(
        question_type: QuestionType,
        correct: Value,
        response: Value,
    ) -> ScoringResult {
        let question = Question::new("q1", question_type, correct);
        let answer = StudentAnswer::new("q1", response);
        grade_with(&ScoringConfig::default(), &question, &answer).unwrap()
    }
}
