//! Human-readable feedback from a criterion breakdown.
//!
//! Purely presentational: nothing here changes a score.

use crate::model::QuestionType;
use crate::results::CriterionScore;
use crate::rubric::criteria;

/// Separator between per-criterion markers.
pub const SEPARATOR: &str = " | ";

/// Prefix for per-pair criteria produced by the matching grader.
pub const MATCH_PREFIX: &str = "match:";

/// Builds feedback strings.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackComposer {
    detailed: bool,
}

impl FeedbackComposer {
    pub fn new(detailed: bool) -> Self {
        Self { detailed }
    }

    /// Compose feedback for one graded question.
    pub fn compose(
        &self,
        question_type: QuestionType,
        criteria: &[CriterionScore],
        is_correct: bool,
    ) -> String {
        if !self.detailed {
            return if is_correct { "Correct" } else { "Incorrect" }.to_string();
        }

        match question_type {
            QuestionType::MultipleChoice | QuestionType::TrueFalse => {
                compose_exact(criteria, is_correct)
            }
            _ => compose_criteria(criteria),
        }
    }
}

impl Default for FeedbackComposer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn compose_exact(criteria: &[CriterionScore], is_correct: bool) -> String {
    let mut parts = Vec::new();
    if is_correct {
        parts.push("Correct answer!".to_string());
    } else {
        let expected = criteria
            .iter()
            .find(|c| c.name == criteria::ANSWER)
            .and_then(|c| c.expected.as_deref())
            .unwrap_or("");
        parts.push(format!("Incorrect. The correct answer is: {expected}"));
    }
    if criteria
        .iter()
        .any(|c| c.name == criteria::SPEED_BONUS && c.earned > 0.0)
    {
        parts.push("Speed bonus earned".to_string());
    }
    parts.join(SEPARATOR)
}

fn compose_criteria(criteria: &[CriterionScore]) -> String {
    criteria
        .iter()
        .filter_map(|c| {
            let label = label(&c.name);
            if c.is_full() {
                Some(format!("✓ {label} correct"))
            } else if c.is_partial() {
                Some(format!("✓ {label} partially correct"))
            } else {
                c.expected
                    .as_ref()
                    .map(|expected| format!("✗ {label} incorrect. Correct: {expected}"))
            }
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// "secondary_codes" -> "Secondary codes", "match:heart" -> "Match for heart".
fn label(name: &str) -> String {
    if let Some(item) = name.strip_prefix(MATCH_PREFIX) {
        return format!("Match for {item}");
    }
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(label("secondary_codes"), "Secondary codes");
        assert_eq!(label("match:cardi"), "Match for cardi");
        assert_eq!(label(""), "");
    }

    #[test]
    fn scenario_feedback_markers() {
        let criteria = vec![
            CriterionScore::new(criteria::PRIMARY_CODE, 3.0, 3.0).expecting("I21.9"),
            CriterionScore::new(criteria::SECONDARY_CODES, 0.5, 1.0).expecting("Z95.1, Z86.79"),
            CriterionScore::new(criteria::MODIFIERS, 0.0, 0.5).expecting("25"),
            CriterionScore::new(criteria::CLINICAL_CORRELATION, 0.0, 0.5),
        ];
        let text = FeedbackComposer::default().compose(QuestionType::ScenarioBased, &criteria, false);
        assert_eq!(
            text,
            "✓ Primary code correct | ✓ Secondary codes partially correct | ✗ Modifiers incorrect. Correct: 25"
        );
    }

    #[test]
    fn exact_feedback() {
        let wrong = vec![CriterionScore::new(criteria::ANSWER, 0.0, 1.0).expecting("C")];
        let composer = FeedbackComposer::default();
        assert_eq!(
            composer.compose(QuestionType::MultipleChoice, &wrong, false),
            "Incorrect. The correct answer is: C"
        );

        let fast = vec![
            CriterionScore::new(criteria::ANSWER, 1.0, 1.0).expecting("C"),
            CriterionScore::new(criteria::SPEED_BONUS, 0.1, 0.1),
        ];
        assert_eq!(
            composer.compose(QuestionType::MultipleChoice, &fast, true),
            "Correct answer! | Speed bonus earned"
        );
    }

    #[test]
    fn terse_feedback() {
        let criteria = vec![CriterionScore::new(criteria::ROOT, 0.8, 0.8)];
        let composer = FeedbackComposer::new(false);
        assert_eq!(
            composer.compose(QuestionType::WordConstruction, &criteria, true),
            "Correct"
        );
        assert_eq!(
            composer.compose(QuestionType::WordConstruction, &criteria, false),
            "Incorrect"
        );
    }
}
