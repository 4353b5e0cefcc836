//! Assessment scoring orchestrator.
//!
//! Dispatches every answer of one attempt to its grader, accumulates points,
//! decides pass/fail, and rolls results up per competency. Either a complete
//! [`AssessmentScore`] comes back or an error does; never a partial score.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::error::{AssessmentScoringError, ScoringError};
use crate::graders::{self, GradeContext};
use crate::model::{Assessment, Question, StudentAnswer, Submission};
use crate::report::{AssessmentScore, ScoringMetadata, SCORING_VERSION};
use crate::results::ScoringResult;
use crate::rubric::RubricRegistry;
use crate::statistics::{mean, round_to};

/// The scoring engine. Holds only immutable configuration, so one instance
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    registry: RubricRegistry,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, registry: RubricRegistry) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn registry(&self) -> &RubricRegistry {
        &self.registry
    }

    /// Grade a single answer against its question.
    pub fn grade_answer(
        &self,
        question: &Question,
        answer: &StudentAnswer,
    ) -> Result<ScoringResult, ScoringError> {
        let kind = question.kind()?;
        if let Some(declared) = &answer.question_type {
            if declared.parse().ok() != Some(kind) {
                tracing::debug!(
                    "answer for {} declares type '{}', grading as {}",
                    question.id,
                    declared,
                    kind
                );
            }
        }
        let rubric = self.registry.get(kind)?;
        let ctx = GradeContext::new(&self.config, rubric);
        graders::grade(kind, question, answer, &ctx)
    }

    /// Score a whole attempt, stamping the current time into the metadata.
    pub fn score(
        &self,
        assessment: &Assessment,
        answers: &[StudentAnswer],
    ) -> Result<AssessmentScore, AssessmentScoringError> {
        self.score_at(assessment, answers, Utc::now())
    }

    /// Score a hook/CLI submission record.
    pub fn score_submission(
        &self,
        submission: &Submission,
    ) -> Result<AssessmentScore, AssessmentScoringError> {
        self.score(&submission.assessment_data, &submission.student_answers)
    }

    /// Score a whole attempt with an explicit metadata timestamp.
    pub fn score_at(
        &self,
        assessment: &Assessment,
        answers: &[StudentAnswer],
        timestamp: DateTime<Utc>,
    ) -> Result<AssessmentScore, AssessmentScoringError> {
        self.score_inner(assessment, answers, timestamp)
            .map_err(|source| {
                tracing::error!("assessment {} aborted: {}", assessment.id, source);
                AssessmentScoringError::new(assessment.id.clone(), source)
            })
    }

    fn score_inner(
        &self,
        assessment: &Assessment,
        answers: &[StudentAnswer],
        timestamp: DateTime<Utc>,
    ) -> Result<AssessmentScore, ScoringError> {
        let precision = self.config.scoring_precision;
        let questions: HashMap<&str, &Question> = assessment
            .questions
            .iter()
            .map(|q| (q.id.as_str(), q))
            .collect();

        let mut competency_samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        if self.config.competency_tracking {
            for category in &self.config.competency_categories {
                competency_samples.entry(category.clone()).or_default();
            }
        }

        let mut results = Vec::with_capacity(answers.len());
        let mut earned = 0.0;
        let mut possible = 0.0;
        let mut weighted_earned = 0.0;
        let mut weighted_possible = 0.0;
        let mut skipped = 0usize;

        for answer in answers {
            let Some(question) = questions.get(answer.question_id.as_str()) else {
                tracing::warn!(
                    "question {} not found in assessment {}, skipping answer",
                    answer.question_id,
                    assessment.id
                );
                skipped += 1;
                continue;
            };

            let result = self.grade_answer(question, answer)?;
            tracing::debug!(
                "graded {} ({}): {}/{}",
                result.question_id,
                result.question_type,
                result.points_earned,
                result.points_possible
            );

            earned += result.points_earned;
            possible += result.points_possible;
            let weight = self.config.type_weight(result.question_type);
            weighted_earned += result.points_earned * weight;
            weighted_possible += result.points_possible * weight;

            if self.config.competency_tracking {
                for competency in &question.competencies {
                    competency_samples
                        .entry(competency.clone())
                        .or_default()
                        .push(result.fraction());
                }
            }

            results.push(result);
        }

        let percentage = percentage_of(earned, possible);
        let percentage_score = round_to(percentage, precision);
        let passed = possible > 0.0 && percentage >= self.config.passing_threshold * 100.0;

        let competency_scores = competency_samples
            .into_iter()
            .map(|(name, samples)| (name, mean(&samples)))
            .collect();

        let total_seconds = answers
            .iter()
            .fold(0u64, |acc, a| acc.saturating_add(a.time_taken_seconds));
        let average_response_time = if answers.is_empty() {
            0.0
        } else {
            round_to(total_seconds as f64 / answers.len() as f64, precision)
        };

        let metadata = ScoringMetadata {
            scoring_timestamp: timestamp,
            scoring_version: SCORING_VERSION.to_string(),
            total_questions: results.len(),
            questions_correct: results.iter().filter(|r| r.is_correct).count(),
            partial_credit_questions: results.iter().filter(|r| r.partial_credit_applied).count(),
            skipped_answers: skipped,
            average_response_time,
            passing_threshold: round_to(self.config.passing_threshold * 100.0, precision),
            weighted_percentage: round_to(
                percentage_of(weighted_earned, weighted_possible),
                precision,
            ),
        };

        tracing::info!(
            "assessment {} scored: {:.1}% ({}/{} points), passed: {}",
            assessment.id,
            percentage_score,
            round_to(earned, precision),
            round_to(possible, precision),
            passed
        );

        Ok(AssessmentScore {
            student_id: assessment.student_id.clone(),
            assessment_id: assessment.id.clone(),
            individual_scores: results,
            total_points_earned: round_to(earned, precision),
            total_points_possible: round_to(possible, precision),
            percentage_score,
            passed,
            competency_scores,
            time_taken_minutes: total_seconds / 60,
            metadata,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            registry: RubricRegistry::builtin(),
        }
    }
}

fn percentage_of(earned: f64, possible: f64) -> f64 {
    if possible > 0.0 {
        earned / possible * 100.0
    } else {
        0.0
    }
}
