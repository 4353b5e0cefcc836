//! Medical word construction grader.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{Question, StudentAnswer};
use crate::response::{decode_answer, decode_correct, normalize, text, RawResponse};
use crate::rubric::criteria;

use super::{GradeContext, Graded};

/// Prefixes recognized when a learner submits a whole word.
pub const KNOWN_PREFIXES: &[&str] = &[
    "pre", "post", "anti", "hyper", "hypo", "inter", "intra", "sub", "super",
];

/// Suffixes recognized when a learner submits a whole word.
pub const KNOWN_SUFFIXES: &[&str] = &[
    "itis", "osis", "emia", "ology", "pathy", "trophy", "scopy", "tomy",
];

/// A word split into its components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordParts {
    #[serde(default, deserialize_with = "text")]
    pub prefix: String,
    #[serde(default, deserialize_with = "text")]
    pub root: String,
    #[serde(default, deserialize_with = "text")]
    pub suffix: String,
}

impl WordParts {
    /// Split a word by stripping the longest known prefix, then the longest
    /// known suffix. Whatever remains is the root.
    pub fn parse_word(word: &str) -> Self {
        let mut rest = word.trim().to_lowercase();

        let prefix = longest_match(KNOWN_PREFIXES, |p| rest.starts_with(p));
        if let Some(p) = prefix {
            rest.drain(..p.len());
        }

        let suffix = longest_match(KNOWN_SUFFIXES, |s| rest.ends_with(s));
        if let Some(s) = suffix {
            rest.truncate(rest.len() - s.len());
        }

        Self {
            prefix: prefix.unwrap_or_default().to_string(),
            root: rest,
            suffix: suffix.unwrap_or_default().to_string(),
        }
    }

    pub fn from_response(question_id: &str, answer: &StudentAnswer) -> Result<Self, ScoringError> {
        match RawResponse::parse(question_id, &answer.response)? {
            RawResponse::Record(record) => decode_answer(question_id, record),
            RawResponse::Text(text) => Ok(Self::parse_word(&text)),
        }
    }
}

fn longest_match<F>(candidates: &[&'static str], matches: F) -> Option<&'static str>
where
    F: Fn(&str) -> bool,
{
    candidates
        .iter()
        .copied()
        .filter(|&c| matches(c))
        .max_by_key(|c| c.len())
}

pub fn grade(
    question: &Question,
    answer: &StudentAnswer,
    ctx: &GradeContext<'_>,
) -> Result<Graded, ScoringError> {
    let correct: WordParts = decode_correct(&question.id, &question.correct_answer)?;
    let given = WordParts::from_response(&question.id, answer)?;

    let component = |name: &str, expected: &str, actual: &str| {
        let expected = expected.trim();
        let hit = !expected.is_empty() && normalize(expected) == normalize(actual);
        ctx.weighted(name, if hit { 1.0 } else { 0.0 })
            .expecting(expected)
    };

    let criteria = vec![
        component(criteria::PREFIX, &correct.prefix, &given.prefix),
        component(criteria::ROOT, &correct.root, &given.root),
        component(criteria::SUFFIX, &correct.suffix, &given.suffix),
    ];

    Ok(Graded::by_threshold(criteria, ctx.rubric.total_points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graders::test_support::*;
    use crate::model::QuestionType;
    use serde_json::json;

    #[test]
    fn parse_prefix_and_suffix() {
        assert_eq!(
            WordParts::parse_word("Hypertension"),
            WordParts {
                prefix: "hyper".into(),
                root: "tension".into(),
                suffix: String::new()
            }
        );
        assert_eq!(
            WordParts::parse_word("pericarditis"),
            WordParts {
                prefix: String::new(),
                root: "pericard".into(),
                suffix: "itis".into()
            }
        );
    }

    #[test]
    fn parse_bare_root() {
        let parts = WordParts::parse_word("intracranial");
        assert_eq!(parts.prefix, "intra");
        assert_eq!(parts.root, "cranial");

        let parts = WordParts::parse_word("cardiac");
        assert_eq!(parts, WordParts { root: "cardiac".into(), ..Default::default() });
    }

    #[test]
    fn hypertension_scores_prefix_and_root() {
        let result = grade_default(
            QuestionType::WordConstruction,
            json!({"prefix": "hyper", "root": "tension", "suffix": ""}),
            json!("hypertension"),
        );
        assert!((result.points_earned - 1.4).abs() < 1e-9);
        assert_eq!(result.points_possible, 2.0);
        assert!(!result.is_correct);
    }

    #[test]
    fn structured_response_all_parts() {
        let result = grade_default(
            QuestionType::WordConstruction,
            json!({"prefix": "peri", "root": "card", "suffix": "itis"}),
            json!({"prefix": "PERI", "root": "card", "suffix": "itis"}),
        );
        assert_eq!(result.points_earned, 2.0);
        assert!(result.is_correct);
        assert_eq!(result.feedback, "✓ Prefix correct | ✓ Root correct | ✓ Suffix correct");
    }

    #[test]
    fn null_part_reads_as_empty() {
        let result = grade_default(
            QuestionType::WordConstruction,
            json!({"prefix": "hyper", "root": "tension", "suffix": null}),
            json!({"prefix": "hyper", "root": "tension", "suffix": null}),
        );
        assert!((result.points_earned - 1.4).abs() < 1e-9);
        assert!(!result.feedback.contains("Suffix"));
    }

    #[test]
    fn wrong_suffix_feedback() {
        let result = grade_default(
            QuestionType::WordConstruction,
            json!({"prefix": "", "root": "gastr", "suffix": "itis"}),
            json!("gastroscopy"),
        );
        assert!((result.points_earned - 0.0).abs() < 1e-9);
        assert!(result.feedback.contains("✗ Root incorrect. Correct: gastr"));
        assert!(result.feedback.contains("✗ Suffix incorrect. Correct: itis"));
        assert!(!result.feedback.contains("Prefix"));
    }
}
