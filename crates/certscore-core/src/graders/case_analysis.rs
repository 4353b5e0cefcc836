//! Case analysis grader: diagnosis codes, procedure codes, cited guidelines,
//! and documentation.

use serde::Deserialize;

use crate::error::ScoringError;
use crate::model::{Question, StudentAnswer};
use crate::response::{code_list, decode_answer, decode_correct, optional_text, RawResponse};
use crate::rubric::criteria;
use crate::statistics::set_overlap_ratio;

use super::{explanation_is_substantive, GradeContext, Graded};

/// Structured case analysis. Also the shape of the correct answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseAnswer {
    #[serde(default, deserialize_with = "code_list")]
    pub diagnoses: Vec<String>,
    #[serde(default, deserialize_with = "code_list")]
    pub procedures: Vec<String>,
    /// Guideline references cited, e.g. "I.C.9.e.1".
    #[serde(default, alias = "guidelines", deserialize_with = "code_list")]
    pub guideline_references: Vec<String>,
    #[serde(default, alias = "documentation", deserialize_with = "optional_text")]
    pub explanation: Option<String>,
}

impl CaseAnswer {
    /// Parse a response; plain text becomes a single diagnosis code.
    pub fn from_response(question_id: &str, answer: &StudentAnswer) -> Result<Self, ScoringError> {
        match RawResponse::parse(question_id, &answer.response)? {
            RawResponse::Record(record) => decode_answer(question_id, record),
            RawResponse::Text(text) => Ok(Self {
                diagnoses: vec![text.trim().to_string()],
                ..Default::default()
            }),
        }
    }
}

fn overlap_or_zero(given: &[String], expected: &[String]) -> f64 {
    if expected.is_empty() {
        0.0
    } else {
        set_overlap_ratio(given, expected)
    }
}

pub fn grade(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<Graded, ScoringError> {
    let correct: CaseAnswer = decode_correct(&question.id, &question.correct_answer)?;
    let given = CaseAnswer::from_response(&question.id, answer)?;

    let documented = explanation_is_substantive(given.explanation.as_deref());

    let criteria = vec![
        ctx.weighted(
            criteria::DIAGNOSIS,
            overlap_or_zero(&given.diagnoses, &correct.diagnoses),
        )
        .expecting(correct.diagnoses.join(", ")),
        ctx.weighted(
            criteria::PROCEDURE_CODING,
            overlap_or_zero(&given.procedures, &correct.procedures),
        )
        .expecting(correct.procedures.join(", ")),
        ctx.weighted(
            criteria::GUIDELINE,
            overlap_or_zero(&given.guideline_references, &correct.guideline_references),
        )
        .expecting(correct.guideline_references.join(", ")),
        ctx.weighted(criteria::DOCUMENTATION, if documented { 1.0 } else { 0.0 }),
    ];

    Ok(Graded::by_threshold(criteria, ctx.rubric.total_points))
}

#[cfg(test)]
mod tests {
    use crate::graders::test_support::*;
    use crate::model::QuestionType;
    use serde_json::{json, Value};

    fn correct() -> Value {
        json!({
            "diagnoses": ["E11.9", "I10"],
            "procedures": ["99214"],
            "guidelines": ["I.C.4.a"]
        })
    }

    #[test]
    fn complete_analysis() {
        let result = grade_default(
            QuestionType::CaseAnalysis,
            correct(),
            json!({
                "diagnoses": ["I10", "E11.9"],
                "procedures": ["99214"],
                "guideline_references": ["I.C.4.a"],
                "documentation": "Type 2 diabetes without complications and essential hypertension, established patient visit"
            }),
        );
        assert_eq!(result.points_earned, 10.0);
        assert_eq!(result.points_possible, 10.0);
        assert!(result.is_correct);
    }

    #[test]
    fn partial_analysis() {
        let result = grade_default(
            QuestionType::CaseAnalysis,
            correct(),
            json!({"diagnoses": ["E11.9"], "procedures": ["99214"]}),
        );
        // 10 * 0.3 * 0.5 + 10 * 0.4
        assert_eq!(result.points_earned, 5.5);
        assert!(!result.is_correct);
        assert!(result.feedback.contains("✓ Diagnosis partially correct"));
        assert!(result.feedback.contains("✓ Procedure coding correct"));
        assert!(result.feedback.contains("✗ Guideline incorrect. Correct: I.C.4.a"));
    }

    #[test]
    fn null_explanation_counts_as_missing() {
        let result = grade_default(
            QuestionType::CaseAnalysis,
            correct(),
            json!({"diagnoses": ["E11.9", "I10"], "procedures": [99214], "explanation": null}),
        );
        // 10 * 0.3 + 10 * 0.4
        assert_eq!(result.points_earned, 7.0);
        assert_eq!(result.breakdown["documentation"], 0.0);
    }

    #[test]
    fn plain_text_is_a_diagnosis() {
        let result = grade_default(QuestionType::CaseAnalysis, correct(), json!("I10"));
        assert_eq!(result.breakdown["diagnosis"], 1.5);
        assert_eq!(result.points_earned, 1.5);
    }
}
