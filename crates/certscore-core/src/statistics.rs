//! Accuracy metrics shared by the graders, plus aggregation helpers.

use std::collections::{BTreeMap, HashSet};

use crate::model::Guidelines;

/// Deduction per required element missing from a response.
pub const MISSING_ELEMENT_PENALTY: f64 = 0.2;
/// Deduction per forbidden code combination present in a response.
pub const FORBIDDEN_COMBINATION_PENALTY: f64 = 0.3;

/// `|submitted ∩ correct| / |correct|`, over distinct values.
///
/// Returns 0.0 when `correct` is empty; graders skip the criterion in that case.
pub fn set_overlap_ratio<S: AsRef<str>>(submitted: &[S], correct: &[S]) -> f64 {
    let correct: HashSet<&str> = correct.iter().map(AsRef::as_ref).collect();
    if correct.is_empty() {
        return 0.0;
    }
    let submitted: HashSet<&str> = submitted.iter().map(AsRef::as_ref).collect();
    submitted.intersection(&correct).count() as f64 / correct.len() as f64
}

/// Position-wise sequence accuracy.
///
/// Counts positions where the submitted sequence holds the same value as the
/// correct one and divides by the correct length. Positions past the end of
/// a shorter submission count as misses. This is not an alignment: a single
/// inserted code shifts every later position.
pub fn sequence_accuracy<S: AsRef<str>>(submitted: &[S], correct: &[S]) -> f64 {
    if correct.is_empty() {
        return 1.0;
    }
    if submitted.is_empty() {
        return 0.0;
    }
    let matches = correct
        .iter()
        .zip(submitted)
        .filter(|(c, s)| c.as_ref() == s.as_ref())
        .count();
    matches as f64 / correct.len() as f64
}

/// Mean per-code modifier overlap across the codes that have expected modifiers.
///
/// A code whose expected modifier list is empty scores 1.0 only when the
/// submission also lists none for it.
pub fn modifier_accuracy(
    submitted: &BTreeMap<String, Vec<String>>,
    correct: &BTreeMap<String, Vec<String>>,
) -> f64 {
    if correct.is_empty() {
        return 1.0;
    }
    if submitted.is_empty() {
        return 0.0;
    }
    let total: f64 = correct
        .iter()
        .map(|(code, expected)| {
            let given = submitted.get(code).map(Vec::as_slice).unwrap_or(&[]);
            if expected.is_empty() {
                if given.is_empty() {
                    1.0
                } else {
                    0.0
                }
            } else {
                set_overlap_ratio(given, expected)
            }
        })
        .sum();
    total / correct.len() as f64
}

/// Compliance ratio in `[0, 1]` for a coding response.
///
/// `has_field` reports whether the response record carries a named element.
pub fn compliance_score<F, S>(has_field: F, codes: &[S], guidelines: &Guidelines) -> f64
where
    F: Fn(&str) -> bool,
    S: AsRef<str>,
{
    let mut score = 1.0;

    for element in &guidelines.required_elements {
        if !has_field(element) {
            score -= MISSING_ELEMENT_PENALTY;
        }
    }

    let codes: HashSet<&str> = codes.iter().map(AsRef::as_ref).collect();
    for combo in &guidelines.forbidden_combinations {
        if !combo.is_empty() && combo.iter().all(|c| codes.contains(c.as_str())) {
            score -= FORBIDDEN_COMBINATION_PENALTY;
        }
    }

    f64::max(0.0, score)
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round half away from zero to `digits` decimal places.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
