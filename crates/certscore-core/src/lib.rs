//! certscore-core: Assessment scoring engine, rubrics, and graders.
//!
//! This crate defines the assessment data model, the rubric table, the
//! per-question-type graders, and the orchestrator that rolls graded answers
//! up into an [`report::AssessmentScore`]. It performs no file I/O.

pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod graders;
pub mod hook;
pub mod model;
pub mod report;
pub mod response;
pub mod results;
pub mod rubric;
pub mod statistics;
pub mod validate;

pub use config::ScoringConfig;
pub use engine::ScoringEngine;
pub use error::{AssessmentScoringError, ScoringError};
pub use model::{Assessment, Question, QuestionType, StudentAnswer, Submission};
pub use report::AssessmentScore;
pub use rubric::RubricRegistry;
