//! Two-step decoding of raw responses and correct answers.
//!
//! Step one looks for a JSON record, either as an object or as text holding a
//! serialized object. When there is none, step two hands the grader the raw
//! text so it can build its documented fallback shape. A record whose fields
//! have the wrong shape has no fallback and is reported as malformed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ScoringError;

/// A response after the first decoding step.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// A JSON record, given directly or as serialized text.
    Record(Map<String, Value>),
    /// Anything else, flattened to text.
    Text(String),
}

impl RawResponse {
    /// Classify a student's response.
    pub fn parse(question_id: &str, value: &Value) -> Result<Self, ScoringError> {
        match value {
            Value::Object(map) => Ok(RawResponse::Record(map.clone())),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Ok(RawResponse::Record(map)),
                _ => Ok(RawResponse::Text(text.clone())),
            },
            Value::Array(_) => Err(ScoringError::malformed_answer(
                question_id,
                "expected a record or text, got a list",
            )),
            scalar => Ok(RawResponse::Text(scalar_text(scalar))),
        }
    }
}

/// Decode a response record into a typed shape.
pub fn decode_answer<T: DeserializeOwned>(
    question_id: &str,
    record: Map<String, Value>,
) -> Result<T, ScoringError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| ScoringError::malformed_answer(question_id, e.to_string()))
}

/// Decode a question's correct answer, which must be a record.
pub fn decode_correct<T: DeserializeOwned>(
    question_id: &str,
    correct: &Value,
) -> Result<T, ScoringError> {
    match correct {
        Value::Object(_) => serde_json::from_value(correct.clone())
            .map_err(|e| ScoringError::malformed_question(question_id, e.to_string())),
        Value::Null => Err(ScoringError::malformed_question(
            question_id,
            "correct_answer is missing",
        )),
        _ => Err(ScoringError::malformed_question(
            question_id,
            "correct_answer must be a record for this question type",
        )),
    }
}

/// Text form of a scalar: strings verbatim, `null` as empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Case- and whitespace-insensitive comparison key.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Accepts a code list as `null`, a single string or number, or a list of them.
pub fn code_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    codes_from_value(&value).map_err(serde::de::Error::custom)
}

/// Accepts a single code or free text as `null`, a string, or a number.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected text or a code, got {other}"
        ))),
    }
}

/// Like [`optional_text`], with `null` read as empty text.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

/// Like [`code_list`] but keeps `None` apart from an empty list.
pub fn optional_code_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    codes_from_value(&value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Per-code modifier lists, each value accepted in any [`code_list`] form.
pub fn modifier_map<'de, D>(
    deserializer: D,
) -> Result<std::collections::BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Default::default()),
        Value::Object(map) => map
            .into_iter()
            .map(|(code, mods)| {
                codes_from_value(&mods)
                    .map(|m| (code, m))
                    .map_err(serde::de::Error::custom)
            })
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "expected a map of code to modifiers, got {other}"
        ))),
    }
}

fn codes_from_value(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.trim().to_string()]),
        Value::Number(n) => Ok(vec![n.to_string()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(format!("expected a code, got {other}")),
            })
            .collect(),
        other => Err(format!("expected a code list, got {other}")),
    }
}
