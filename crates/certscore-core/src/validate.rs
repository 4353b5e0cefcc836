//! Static checks on assessment definitions.
//!
//! Scoring fails hard on a bad question; these checks let authors find the
//! same problems ahead of time, plus a few that scoring tolerates.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ScoringError;
use crate::graders::case_analysis::CaseAnswer;
use crate::graders::practical::CodingAnswer;
use crate::graders::scenario::ScenarioAnswer;
use crate::graders::word::WordParts;
use crate::model::{Assessment, Question, QuestionType};
use crate::response::decode_correct;

/// One problem found in an assessment definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    /// `None` for assessment-level problems.
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.question_id {
            Some(id) => write!(f, "{id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Check an assessment definition. An empty result means no problems found.
pub fn validate_assessment(assessment: &Assessment) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if assessment.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "assessment has no questions".into(),
        });
    }

    let mut seen = HashSet::new();
    for question in &assessment.questions {
        if !seen.insert(question.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &question.id,
                "duplicate question id; answers will be graded against the last definition",
            ));
        }
        if question.competencies.is_empty() {
            warnings.push(ValidationWarning::question(
                &question.id,
                "no competencies; this question will not count toward any competency",
            ));
        }
        match question.kind() {
            Ok(kind) => {
                if let Err(e) = check_correct_answer(kind, question) {
                    warnings.push(ValidationWarning::question(&question.id, describe(&e)));
                }
                if question.guidelines.is_some() && kind != QuestionType::PracticalCoding {
                    warnings.push(ValidationWarning::question(
                        &question.id,
                        format!("guidelines are ignored for {kind} questions"),
                    ));
                }
            }
            Err(e) => warnings.push(ValidationWarning::question(&question.id, describe(&e))),
        }
    }

    warnings
}

fn describe(err: &ScoringError) -> String {
    match err {
        ScoringError::MalformedQuestion { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

fn check_correct_answer(kind: QuestionType, question: &Question) -> Result<(), ScoringError> {
    let id = question.id.as_str();
    let correct = &question.correct_answer;
    match kind {
        QuestionType::MultipleChoice | QuestionType::TrueFalse => match correct {
            Value::Null => Err(ScoringError::malformed_question(id, "correct_answer is missing")),
            Value::Object(_) | Value::Array(_) => Err(ScoringError::malformed_question(
                id,
                format!("{kind} correct_answer must be a single value"),
            )),
            _ => Ok(()),
        },
        QuestionType::ScenarioBased => decode_correct::<ScenarioAnswer>(id, correct).map(drop),
        QuestionType::WordConstruction => decode_correct::<WordParts>(id, correct).map(drop),
        QuestionType::CaseAnalysis => decode_correct::<CaseAnswer>(id, correct).map(drop),
        QuestionType::PracticalCoding => decode_correct::<CodingAnswer>(id, correct).map(drop),
        QuestionType::Matching => match correct {
            Value::Object(map) if !map.is_empty() => Ok(()),
            Value::Null => Err(ScoringError::malformed_question(id, "correct_answer is missing")),
            _ => Err(ScoringError::malformed_question(
                id,
                "matching correct_answer must be a non-empty item-to-match record",
            )),
        },
    }
}
