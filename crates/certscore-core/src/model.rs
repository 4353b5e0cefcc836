//! Core data model types for certscore.
//!
//! Assessment definitions, questions, and the answers a learner submits.
//! Correct answers and responses stay as raw JSON values here; each grader
//! decodes the shape its question type needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ScoringError;

/// The closed set of question formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    ScenarioBased,
    WordConstruction,
    CaseAnalysis,
    PracticalCoding,
    Matching,
    TrueFalse,
}

impl QuestionType {
    /// Every question type, in rubric table order.
    pub const ALL: [QuestionType; 7] = [
        QuestionType::MultipleChoice,
        QuestionType::ScenarioBased,
        QuestionType::WordConstruction,
        QuestionType::CaseAnalysis,
        QuestionType::PracticalCoding,
        QuestionType::Matching,
        QuestionType::TrueFalse,
    ];

    /// The wire tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::ScenarioBased => "scenario_based",
            QuestionType::WordConstruction => "word_construction",
            QuestionType::CaseAnalysis => "case_analysis",
            QuestionType::PracticalCoding => "practical_coding",
            QuestionType::Matching => "matching",
            QuestionType::TrueFalse => "true_false",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| ScoringError::configuration(format!("unknown question type: {s}")))
    }
}

/// Compliance rules a practical coding answer is checked against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guidelines {
    /// Fields the response record must contain.
    #[serde(default)]
    pub required_elements: Vec<String>,
    /// Code sets that must not all appear together.
    #[serde(default)]
    pub forbidden_combinations: Vec<Vec<String>>,
}

/// A single question in an assessment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the assessment.
    pub id: String,
    /// Question-type tag, resolved to a [`QuestionType`] at scoring time.
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    /// Expected answer. A scalar for exact-match types, a record otherwise.
    #[serde(default)]
    pub correct_answer: Value,
    /// Competency tags this question contributes to.
    #[serde(default)]
    pub competencies: Vec<String>,
    /// Expected response time, used for the speed bonus.
    #[serde(default)]
    pub expected_time_seconds: Option<u64>,
    /// Compliance guidelines for practical coding questions.
    #[serde(default)]
    pub guidelines: Option<Guidelines>,
}

fn default_question_type() -> String {
    QuestionType::MultipleChoice.as_str().to_string()
}

impl Question {
    pub fn new(id: impl Into<String>, question_type: QuestionType, correct_answer: Value) -> Self {
        Self {
            id: id.into(),
            question_type: question_type.as_str().to_string(),
            correct_answer,
            competencies: Vec::new(),
            expected_time_seconds: None,
            guidelines: None,
        }
    }

    pub fn with_competencies<I, S>(mut self, competencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competencies = competencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expected_time(mut self, seconds: u64) -> Self {
        self.expected_time_seconds = Some(seconds);
        self
    }

    pub fn with_guidelines(mut self, guidelines: Guidelines) -> Self {
        self.guidelines = Some(guidelines);
        self
    }

    /// Resolve the type tag.
    pub fn kind(&self) -> Result<QuestionType, ScoringError> {
        self.question_type.parse()
    }
}

/// One answer submitted by a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAnswer {
    /// The question this answers.
    pub question_id: String,
    /// Type tag declared by the submitting client. Informational only.
    #[serde(default, alias = "type")]
    pub question_type: Option<String>,
    /// Raw response: scalar, text (possibly serialized JSON), or record.
    #[serde(default)]
    pub response: Value,
    /// Time spent on the question.
    #[serde(default)]
    pub time_taken_seconds: u64,
    /// Attempt counter, starting at 1.
    #[serde(default = "default_attempt")]
    pub attempt_number: u32,
    /// Self-reported confidence.
    #[serde(default)]
    pub confidence_level: Option<u8>,
}

fn default_attempt() -> u32 {
    1
}

impl StudentAnswer {
    pub fn new(question_id: impl Into<String>, response: impl Into<Value>) -> Self {
        Self {
            question_id: question_id.into(),
            question_type: None,
            response: response.into(),
            time_taken_seconds: 0,
            attempt_number: 1,
            confidence_level: None,
        }
    }

    pub fn with_time(mut self, seconds: u64) -> Self {
        self.time_taken_seconds = seconds;
        self
    }
}

/// An assessment definition taken by one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default = "unknown")]
    pub id: String,
    #[serde(default = "unknown")]
    pub student_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn unknown() -> String {
    "unknown".to_string()
}

impl Assessment {
    pub fn new(id: impl Into<String>, student_id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            student_id: student_id.into(),
            title: None,
            questions,
        }
    }
}

/// An assessment together with the answers submitted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub assessment_data: Assessment,
    #[serde(default)]
    pub student_answers: Vec<StudentAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::ScenarioBased.to_string(), "scenario_based");
        assert_eq!(
            "Practical_Coding".parse::<QuestionType>().unwrap(),
            QuestionType::PracticalCoding
        );
        assert_eq!(
            " true_false ".parse::<QuestionType>().unwrap(),
            QuestionType::TrueFalse
        );
        let err = "essay".parse::<QuestionType>().unwrap_err();
        assert!(matches!(err, ScoringError::Configuration(_)));
    }

    #[test]
    fn question_defaults_to_multiple_choice() {
        let q: Question = serde_json::from_value(json!({"id": "q1", "correct_answer": "A"})).unwrap();
        assert_eq!(q.kind().unwrap(), QuestionType::MultipleChoice);
        assert!(q.competencies.is_empty());
        assert!(q.guidelines.is_none());
    }

    #[test]
    fn answer_defaults() {
        let a: StudentAnswer =
            serde_json::from_value(json!({"question_id": "q1", "response": "B"})).unwrap();
        assert_eq!(a.attempt_number, 1);
        assert_eq!(a.time_taken_seconds, 0);
        assert_eq!(a.response, json!("B"));
    }

    #[test]
    fn submission_parses_hook_record() {
        let raw = json!({
            "assessment_data": {
                "id": "exam-1",
                "student_id": "s-9",
                "questions": [
                    {"id": "q1", "type": "true_false", "correct_answer": true}
                ]
            },
            "student_answers": [
                {"question_id": "q1", "question_type": "true_false", "response": "True", "time_taken_seconds": 12}
            ]
        });
        let sub: Submission = serde_json::from_value(raw).unwrap();
        assert_eq!(sub.assessment_data.student_id, "s-9");
        assert_eq!(sub.student_answers[0].time_taken_seconds, 12);
        assert_eq!(sub.student_answers[0].question_type.as_deref(), Some("true_false"));
    }
}
