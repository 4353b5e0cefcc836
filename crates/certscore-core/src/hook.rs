//! Post-assessment hook over untyped submission records.
//!
//! A host pipeline hands over the raw JSON record it holds for a finished
//! attempt; the hook scores it and hands the same record back with the
//! results attached.

use serde_json::{Map, Value};

use crate::engine::ScoringEngine;
use crate::error::{AssessmentScoringError, ScoringError};
use crate::model::Submission;

/// The only hook type this crate handles.
pub const POST_ASSESSMENT: &str = "post_assessment";

/// Score a submission record and attach `scoring_results`, `final_score`,
/// and `passed` to it.
pub fn post_assessment(
    engine: &ScoringEngine,
    record: Value,
) -> Result<Value, AssessmentScoringError> {
    let assessment_id = record
        .pointer("/assessment_data/id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let Value::Object(mut fields) = record else {
        return Err(AssessmentScoringError::new(
            assessment_id,
            ScoringError::MalformedSubmission("record must be a JSON object".into()),
        ));
    };

    let submission: Submission = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| {
            AssessmentScoringError::new(
                assessment_id.clone(),
                ScoringError::MalformedSubmission(e.to_string()),
            )
        })?;

    let score = engine.score_submission(&submission)?;
    let summary = serde_json::to_value(score.summary()).map_err(|e| {
        AssessmentScoringError::new(assessment_id.clone(), ScoringError::Encoding(e.to_string()))
    })?;

    attach(&mut fields, summary, score.percentage_score, score.passed);
    Ok(Value::Object(fields))
}

fn attach(fields: &mut Map<String, Value>, summary: Value, final_score: f64, passed: bool) {
    fields.insert("scoring_results".into(), summary);
    fields.insert("final_score".into(), Value::from(final_score));
    fields.insert("passed".into(), Value::Bool(passed));
}

/// Dispatch on `hook_type`. Unknown hook types pass the record through.
pub fn run_hook(
    engine: &ScoringEngine,
    record: Value,
    hook_type: &str,
) -> Result<Value, AssessmentScoringError> {
    if hook_type == POST_ASSESSMENT {
        post_assessment(engine, record)
    } else {
        tracing::warn!("unknown hook type '{}', record left unchanged", hook_type);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "submission_id": "sub-42",
            "assessment_data": {
                "id": "test_assessment",
                "student_id": "student_123",
                "questions": [
                    {"id": "q1", "type": "multiple_choice", "correct_answer": "A",
                     "competencies": ["medical_terminology"]},
                    {"id": "q2", "type": "scenario_based",
                     "correct_answer": {"primary_code": "I21.9", "secondary_codes": ["Z95.1"], "modifiers": ["25"]},
                     "competencies": ["coding_accuracy"]}
                ]
            },
            "student_answers": [
                {"question_id": "q1", "question_type": "multiple_choice", "response": "A", "time_taken_seconds": 30},
                {"question_id": "q2", "question_type": "scenario_based",
                 "response": {"primary_code": "I21.9", "secondary_codes": ["Z95.1"], "modifiers": ["25"]},
                 "time_taken_seconds": 120}
            ]
        })
    }

    #[test]
    fn post_assessment_attaches_results() {
        let engine = ScoringEngine::default();
        let out = post_assessment(&engine, record()).unwrap();

        // Existing fields survive.
        assert_eq!(out["submission_id"], "sub-42");
        // 1.1 (bonus at 30s) + 4.5 of 6.0
        assert_eq!(out["final_score"], json!(93.33));
        assert_eq!(out["passed"], json!(true));

        let results = &out["scoring_results"];
        assert_eq!(results["total_points_possible"], json!(6.0));
        assert_eq!(results["individual_question_scores"].as_array().unwrap().len(), 2);
        assert_eq!(results["scoring_metadata"]["scoring_version"], "1.0");
        assert!(results["scored_at"].is_string());
    }

    #[test]
    fn run_hook_dispatches() {
        let engine = ScoringEngine::default();
        let out = run_hook(&engine, record(), POST_ASSESSMENT).unwrap();
        assert!(out.get("scoring_results").is_some());
    }

    #[test]
    fn unknown_hook_type_is_a_no_op() {
        let engine = ScoringEngine::default();
        let out = run_hook(&engine, record(), "pre_save").unwrap();
        assert_eq!(out, record());
    }

    #[test]
    fn malformed_record() {
        let engine = ScoringEngine::default();
        let err = post_assessment(&engine, json!({"assessment_data": {"id": "a1", "questions": 3}}))
            .unwrap_err();
        assert_eq!(err.assessment_id, "a1");
        assert!(matches!(err.source, ScoringError::MalformedSubmission(_)));

        let err = post_assessment(&engine, json!("nope")).unwrap_err();
        assert_eq!(err.assessment_id, "unknown");
    }

    #[test]
    fn scoring_failure_propagates() {
        let engine = ScoringEngine::default();
        let mut bad = record();
        bad["assessment_data"]["questions"][0]["type"] = json!("essay");
        let err = post_assessment(&engine, bad).unwrap_err();
        assert_eq!(err.assessment_id, "test_assessment");
        assert!(matches!(err.source, ScoringError::Configuration(_)));
    }
}
