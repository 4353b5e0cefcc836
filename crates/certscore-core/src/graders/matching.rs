//! Matching grader: unit credit per correctly paired item.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ScoringError;
use crate::feedback::MATCH_PREFIX;
use crate::model::{Question, StudentAnswer};
use crate::response::{normalize, scalar_text, RawResponse};
use crate::results::CriterionScore;
use crate::rubric::criteria;

use super::{GradeContext, Graded};

const PAIR_SEPARATORS: &[&str] = &["->", "=", ":", "-"];

/// Parse `item=match` style pairs separated by commas, semicolons, or newlines.
pub fn parse_pairs(text: &str) -> BTreeMap<String, String> {
    text.split([',', ';', '\n'])
        .filter_map(|piece| {
            let piece = piece.trim();
            PAIR_SEPARATORS
                .iter()
                .find_map(|sep| piece.split_once(sep))
                .map(|(item, value)| (item.trim().to_string(), value.trim().to_string()))
        })
        .filter(|(item, value)| !item.is_empty() && !value.is_empty())
        .collect()
}

fn normalized_map(map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(k, v)| (normalize(k), normalize(&scalar_text(v))))
        .collect()
}

fn response_pairs(
    question_id: &str,
    answer: &StudentAnswer,
) -> Result<BTreeMap<String, String>, ScoringError> {
    match RawResponse::parse(question_id, &answer.response)? {
        RawResponse::Record(record) => Ok(normalized_map(&record)),
        RawResponse::Text(text) => {
            let pairs = parse_pairs(&text);
            if pairs.is_empty() && !text.trim().is_empty() {
                return Err(ScoringError::malformed_answer(
                    question_id,
                    "expected item=match pairs",
                ));
            }
            Ok(pairs
                .into_iter()
                .map(|(k, v)| (normalize(&k), normalize(&v)))
                .collect())
        }
    }
}

pub fn grade(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<Graded, ScoringError> {
    let correct = match &question.correct_answer {
        Value::Object(map) if !map.is_empty() => map,
        _ => {
            return Err(ScoringError::malformed_question(
                &question.id,
                "matching correct_answer must be a non-empty item-to-match record",
            ))
        }
    };
    let given = response_pairs(&question.id, answer)?;
    let per_pair = ctx.rubric.weight(criteria::PER_CORRECT_MATCH);

    let criteria: Vec<CriterionScore> = correct
        .iter()
        .map(|(item, expected)| {
            let expected = scalar_text(expected);
            let hit = given
                .get(&normalize(item))
                .is_some_and(|v| *v == normalize(&expected));
            CriterionScore::new(
                format!("{MATCH_PREFIX}{item}"),
                if hit { per_pair } else { 0.0 },
                per_pair,
            )
            .expecting(expected)
        })
        .collect();

    let is_correct = criteria.iter().all(CriterionScore::is_full);
    Ok(Graded {
        criteria,
        is_correct,
        compliance_score: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::graders::test_support::*;
    use crate::model::QuestionType;
    use serde_json::json;

    fn correct() -> Value {
        json!({"cardi": "heart", "nephr": "kidney", "hepat": "liver"})
    }

    #[test]
    fn parse_pair_text() {
        let pairs = parse_pairs("cardi=heart; nephr: kidney\nhepat -> liver, junk");
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs["hepat"], "liver");
        assert_eq!(pairs["nephr"], "kidney");
    }

    #[test]
    fn all_pairs_correct() {
        let result = grade_default(
            QuestionType::Matching,
            correct(),
            json!({"cardi": "Heart", "nephr": "kidney", "hepat": "liver"}),
        );
        assert_eq!(result.points_earned, 3.0);
        assert!(result.is_correct);
    }

    #[test]
    fn one_pair_per_point() {
        let result = grade_default(
            QuestionType::Matching,
            correct(),
            json!("cardi=heart, nephr=liver, hepat=kidney"),
        );
        assert_eq!(result.points_earned, 1.0);
        assert!(!result.is_correct);
        assert_eq!(result.breakdown["match:cardi"], 1.0);
        assert!(result.feedback.contains("✗ Match for nephr incorrect. Correct: kidney"));
    }

    #[test]
    fn capped_at_total_points() {
        let result = grade_default(
            QuestionType::Matching,
            json!({"a": "1", "b": "2", "c": "3", "d": "4", "e": "5"}),
            json!({"a": "1", "b": "2", "c": "3", "d": "4", "e": "5"}),
        );
        assert_eq!(result.points_earned, 3.0);
        assert_eq!(result.percentage, 100.0);
    }

    #[test]
    fn unparseable_text_is_malformed() {
        let question = Question::new("q1", QuestionType::Matching, correct());
        let answer = StudentAnswer::new("q1", "heart kidney liver");
        let err = grade_with(&ScoringConfig::default(), &question, &answer).unwrap_err();
        assert!(matches!(err, ScoringError::MalformedAnswer { .. }));
    }

    #[test]
    fn empty_response_scores_zero() {
        let result = grade_default(QuestionType::Matching, correct(), Value::Null);
        assert_eq!(result.points_earned, 0.0);
    }

    #[test]
    fn scalar_correct_answer_is_rejected() {
        let question = Question::new("q1", QuestionType::Matching, json!("heart"));
        let answer = StudentAnswer::new("q1", "cardi=heart");
        let err = grade_with(&ScoringConfig::default(), &question, &answer).unwrap_err();
        assert!(matches!(err, ScoringError::MalformedQuestion { .. }));
    }
}
