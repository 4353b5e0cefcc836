//! Clinical scenario grader: primary code, secondary codes, modifiers, and an
//! explanation presence check.

use serde::Deserialize;

use crate::error::ScoringError;
use crate::model::{Question, StudentAnswer};
use crate::response::{
    code_list, decode_answer, decode_correct, normalize, optional_text, RawResponse,
};
use crate::rubric::criteria;
use crate::statistics::set_overlap_ratio;

use super::{explanation_is_substantive, GradeContext, Graded};

/// Structured scenario answer. Also the shape of the correct answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioAnswer {
    #[serde(default, deserialize_with = "optional_text")]
    pub primary_code: Option<String>,
    #[serde(default, deserialize_with = "code_list")]
    pub secondary_codes: Vec<String>,
    #[serde(default, deserialize_with = "code_list")]
    pub modifiers: Vec<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub explanation: Option<String>,
}

impl ScenarioAnswer {
    /// Parse a response; plain text becomes the primary code.
    pub fn from_response(question_id: &str, answer: &StudentAnswer) -> Result<Self, ScoringError> {
        match RawResponse::parse(question_id, &answer.response)? {
            RawResponse::Record(record) => decode_answer(question_id, record),
            RawResponse::Text(text) => Ok(Self {
                primary_code: Some(text),
                ..Default::default()
            }),
        }
    }
}

pub fn grade(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<Graded, ScoringError> {
    let correct: ScenarioAnswer = decode_correct(&question.id, &question.correct_answer)?;
    let given = ScenarioAnswer::from_response(&question.id, answer)?;

    let expected_primary = correct.primary_code.as_deref().map(str::trim).unwrap_or("");
    let primary_ok = !expected_primary.is_empty()
        && given
            .primary_code
            .as_deref()
            .is_some_and(|p| normalize(p) == normalize(expected_primary));

    let secondary = if correct.secondary_codes.is_empty() {
        0.0
    } else {
        set_overlap_ratio(&given.secondary_codes, &correct.secondary_codes)
    };
    let modifiers = if correct.modifiers.is_empty() {
        0.0
    } else {
        set_overlap_ratio(&given.modifiers, &correct.modifiers)
    };
    let correlation = explanation_is_substantive(given.explanation.as_deref());

    let criteria = vec![
        ctx.weighted(criteria::PRIMARY_CODE, if primary_ok { 1.0 } else { 0.0 })
            .expecting(expected_primary),
        ctx.weighted(criteria::SECONDARY_CODES, secondary)
            .expecting(correct.secondary_codes.join(", ")),
        ctx.weighted(criteria::MODIFIERS, modifiers)
            .expecting(correct.modifiers.join(", ")),
        ctx.weighted(criteria::CLINICAL_CORRELATION, if correlation { 1.0 } else { 0.0 }),
    ];

    Ok(Graded::by_threshold(criteria, ctx.rubric.total_points))
}
