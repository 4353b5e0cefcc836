//! Exact-match graders for multiple choice and true/false.

use std::collections::BTreeMap;

use crate::error::ScoringError;
use crate::model::{Question, QuestionType, StudentAnswer};
use crate::response::{normalize, scalar_text};
use crate::results::{CriterionScore, ScoringResult};
use crate::rubric::criteria;
use crate::statistics::round_to;

use super::{analysis, GradeContext};

/// Expected time assumed when a question does not declare one.
pub const DEFAULT_EXPECTED_SECONDS: u64 = 60;

pub fn grade_multiple_choice(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<ScoringResult, ScoringError> {
    grade_exact(QuestionType::MultipleChoice, question, answer, ctx, true)
}

pub fn grade_true_false(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<ScoringResult, ScoringError> {
    grade_exact(QuestionType::TrueFalse, question, answer, ctx, false)
}

fn grade_exact(
    question_type: QuestionType,
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
    speed_bonus: bool,
) -> Result<ScoringResult, ScoringError> {
    if question.correct_answer.is_null() {
        return Err(ScoringError::malformed_question(
            &question.id,
            "correct_answer is missing",
        ));
    }

    let total = ctx.rubric.total_points;
    let expected = scalar_text(&question.correct_answer);
    let is_correct = normalize(&scalar_text(&answer.response)) == normalize(&expected);

    let mut criteria =
        vec![CriterionScore::new(criteria::ANSWER, if is_correct { total } else { 0.0 }, total)
            .expecting(expected)];

    if speed_bonus && is_correct && ctx.config.time_bonus_enabled {
        let expected_secs = question
            .expected_time_seconds
            .unwrap_or(DEFAULT_EXPECTED_SECONDS) as f64;
        if (answer.time_taken_seconds as f64) < expected_secs * ctx.config.speed_bonus_threshold {
            let bonus = total * ctx.rubric.speed_weight;
            criteria.push(CriterionScore::new(criteria::SPEED_BONUS, bonus, bonus));
        }
    }

    let precision = ctx.config.scoring_precision;
    let points_earned = round_to(criteria.iter().map(|c| c.earned).sum(), precision);
    let breakdown: BTreeMap<String, f64> = criteria
        .iter()
        .map(|c| (c.name.clone(), round_to(c.earned, precision)))
        .collect();

    Ok(ScoringResult {
        question_id: question.id.clone(),
        question_type,
        points_earned,
        points_possible: total,
        percentage: points_earned / total * 100.0,
        is_correct,
        partial_credit_applied: false,
        feedback: ctx.feedback.compose(question_type, &criteria, is_correct),
        breakdown,
        analysis: analysis(answer, ctx, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::graders::test_support::*;
    use serde_json::json;

    fn mc(expected_time: u64, response: &str, taken: u64) -> ScoringResult {
        let question = Question::new("q1", QuestionType::MultipleChoice, json!("B"))
            .with_expected_time(expected_time);
        let answer = StudentAnswer::new("q1", response).with_time(taken);
        grade_with(&ScoringConfig::default(), &question, &answer).unwrap()
    }

    #[test]
    fn correct_with_speed_bonus() {
        let result = mc(60, "B", 30);
        assert!((result.points_earned - 1.1).abs() < 1e-9);
        assert_eq!(result.points_possible, 1.0);
        assert!(result.is_correct);
        assert!(!result.partial_credit_applied);
        assert_eq!(result.breakdown["speed_bonus"], 0.1);
        assert_eq!(result.feedback, "Correct answer! | Speed bonus earned");
    }

    #[test]
    fn correct_without_bonus_when_slow() {
        let result = mc(60, " b ", 45);
        assert_eq!(result.points_earned, 1.0);
        assert_eq!(result.percentage, 100.0);
        assert!(!result.breakdown.contains_key("speed_bonus"));
    }

    #[test]
    fn wrong_answer_scores_zero() {
        let result = mc(60, "C", 5);
        assert_eq!(result.points_earned, 0.0);
        assert!(!result.is_correct);
        assert_eq!(result.feedback, "Incorrect. The correct answer is: B");
    }

    #[test]
    fn bonus_uses_default_expected_time() {
        let question = Question::new("q1", QuestionType::MultipleChoice, json!("A"));
        let fast = StudentAnswer::new("q1", "a").with_time(44);
        let slow = StudentAnswer::new("q1", "a").with_time(45);
        let config = ScoringConfig::default();
        assert!((grade_with(&config, &question, &fast).unwrap().points_earned - 1.1).abs() < 1e-9);
        assert_eq!(grade_with(&config, &question, &slow).unwrap().points_earned, 1.0);
    }

    #[test]
    fn bonus_disabled_by_config() {
        let config = ScoringConfig {
            time_bonus_enabled: false,
            ..Default::default()
        };
        let question = Question::new("q1", QuestionType::MultipleChoice, json!("A"));
        let answer = StudentAnswer::new("q1", "A").with_time(1);
        assert_eq!(grade_with(&config, &question, &answer).unwrap().points_earned, 1.0);
    }

    #[test]
    fn true_false_never_gets_bonus() {
        let result = grade_default(QuestionType::TrueFalse, json!(true), json!("True"));
        assert_eq!(result.points_earned, 0.5);
        assert!(result.is_correct);

        let wrong = grade_default(QuestionType::TrueFalse, json!(true), json!(false));
        assert_eq!(wrong.points_earned, 0.0);
    }

    #[test]
    fn missing_correct_answer_is_an_error() {
        let question = Question::new("q9", QuestionType::TrueFalse, serde_json::Value::Null);
        let answer = StudentAnswer::new("q9", "true");
        let err = grade_with(&ScoringConfig::default(), &question, &answer).unwrap_err();
        assert!(matches!(err, ScoringError::MalformedQuestion { .. }));
    }
}
