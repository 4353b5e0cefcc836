//! Practical coding grader: code set accuracy, sequencing, per-code
//! modifiers, and guideline compliance.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::ScoringError;
use crate::model::{Guidelines, Question, StudentAnswer};
use crate::response::{
    code_list, decode_answer, decode_correct, modifier_map, optional_code_list, RawResponse,
};
use crate::rubric::criteria;
use crate::statistics::{compliance_score, modifier_accuracy, sequence_accuracy, set_overlap_ratio};

use super::{GradeContext, Graded};

/// Structured coding answer. Also the shape of the correct answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodingAnswer {
    #[serde(default, deserialize_with = "code_list")]
    pub codes: Vec<String>,
    /// Ordered codes; only scored when the correct answer declares one.
    #[serde(default, deserialize_with = "optional_code_list")]
    pub sequence: Option<Vec<String>>,
    /// Modifiers per code.
    #[serde(default, deserialize_with = "modifier_map")]
    pub modifiers: BTreeMap<String, Vec<String>>,
}

/// A parsed response plus the names of the fields it actually carried.
#[derive(Debug, Clone)]
pub struct ParsedCoding {
    pub answer: CodingAnswer,
    pub fields: BTreeSet<String>,
}

impl ParsedCoding {
    /// Parse a response; plain text becomes a single submitted code.
    pub fn from_response(question_id: &str, answer: &StudentAnswer) -> Result<Self, ScoringError> {
        match RawResponse::parse(question_id, &answer.response)? {
            RawResponse::Record(record) => {
                let fields = record
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, _)| k.clone())
                    .collect();
                Ok(Self {
                    answer: decode_answer(question_id, record)?,
                    fields,
                })
            }
            RawResponse::Text(text) => Ok(Self {
                answer: CodingAnswer {
                    codes: vec![text.trim().to_string()],
                    ..Default::default()
                },
                fields: BTreeSet::from(["codes".to_string()]),
            }),
        }
    }
}

pub fn grade(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<Graded, ScoringError> {
    let correct: CodingAnswer = decode_correct(&question.id, &question.correct_answer)?;
    let given = ParsedCoding::from_response(&question.id, answer)?;

    let code_ratio = if correct.codes.is_empty() {
        0.0
    } else {
        set_overlap_ratio(&given.answer.codes, &correct.codes)
    };

    let sequence_ratio = match &correct.sequence {
        Some(expected) => {
            let submitted = given.answer.sequence.as_deref().unwrap_or(&[]);
            sequence_accuracy(submitted, expected)
        }
        None => 0.0,
    };

    let modifier_ratio = if correct.modifiers.is_empty() {
        0.0
    } else {
        modifier_accuracy(&given.answer.modifiers, &correct.modifiers)
    };

    let guidelines = question.guidelines.clone().unwrap_or_default();
    let compliance = compliance_score(
        |field| given.fields.contains(field),
        &given.answer.codes,
        &guidelines,
    );

    let criteria = vec![
        ctx.weighted(criteria::CODE_ACCURACY, code_ratio)
            .expecting(correct.codes.join(", ")),
        ctx.weighted(criteria::SEQUENCE, sequence_ratio)
            .expecting(correct.sequence.as_deref().unwrap_or(&[]).join(" > ")),
        ctx.weighted(criteria::MODIFIERS, modifier_ratio)
            .expecting(describe_modifiers(&correct.modifiers)),
        ctx.weighted(criteria::COMPLIANCE, compliance)
            .expecting(describe_guidelines(&guidelines)),
    ];

    let mut graded = Graded::by_threshold(criteria, ctx.rubric.total_points);
    graded.compliance_score = Some(compliance);
    Ok(graded)
}

fn describe_modifiers(modifiers: &BTreeMap<String, Vec<String>>) -> String {
    modifiers
        .iter()
        .map(|(code, mods)| format!("{code}: {}", mods.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_guidelines(guidelines: &Guidelines) -> String {
    let mut parts = Vec::new();
    if !guidelines.required_elements.is_empty() {
        parts.push(format!(
            "include {}",
            guidelines.required_elements.join(", ")
        ));
    }
    if !guidelines.forbidden_combinations.is_empty() {
        let combos: Vec<String> = guidelines
            .forbidden_combinations
            .iter()
            .map(|c| c.join("+"))
            .collect();
        parts.push(format!("do not combine {}", combos.join(", ")));
    }
    parts.join("; ")
}
