//! Scoring error types.
//!
//! Graders and the registry return [`ScoringError`]; the engine wraps any of
//! them in [`AssessmentScoringError`] so callers get one error type per
//! scoring call and never a partial score.

use thiserror::Error;

/// Errors raised while grading a single question.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Unknown question-type tag, missing rubric entry, or invalid config.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The student's response cannot be coerced into the shape its question
    /// type requires, even after fallback parsing.
    #[error("malformed answer for question {question_id}: {reason}")]
    MalformedAnswer { question_id: String, reason: String },

    /// The question definition carries a correct answer of the wrong shape.
    #[error("malformed question {question_id}: {reason}")]
    MalformedQuestion { question_id: String, reason: String },

    /// A submission record that does not decode into an assessment and its
    /// answers.
    #[error("malformed submission: {0}")]
    MalformedSubmission(String),

    /// Scoring results could not be encoded for the caller.
    #[error("failed to encode scoring results: {0}")]
    Encoding(String),
}

impl ScoringError {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        ScoringError::Configuration(msg.into())
    }

    pub fn malformed_answer<I: Into<String>, R: Into<String>>(question_id: I, reason: R) -> Self {
        ScoringError::MalformedAnswer {
            question_id: question_id.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_question<I: Into<String>, R: Into<String>>(
        question_id: I,
        reason: R,
    ) -> Self {
        ScoringError::MalformedQuestion {
            question_id: question_id.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a whole assessment scoring call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("assessment scoring failed for {assessment_id}: {source}")]
pub struct AssessmentScoringError {
    /// The assessment that could not be scored.
    pub assessment_id: String,
    /// The underlying grading failure.
    #[source]
    pub source: ScoringError,
}

impl AssessmentScoringError {
    pub fn new<S: Into<String>>(assessment_id: S, source: ScoringError) -> Self {
        Self {
            assessment_id: assessment_id.into(),
            source,
        }
    }
}
