//! The `certscore score` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use certscore_core::report::AssessmentScore;
use certscore_core::{ScoringEngine, Submission};
use certscore_report::html::write_html_report;
use certscore_report::json::{save_score_json, BatchFailure, BatchReport};

use crate::config::load_config_from;
use crate::loader::{load_submission, load_tree};

/// Competency level below which an area is listed for review.
const REVIEW_THRESHOLD: f64 = 0.7;

pub async fn execute(
    submission_path: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    parallelism: Option<usize>,
    threshold: Option<f64>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(t) = threshold {
        config.scoring.passing_threshold = t;
    }
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let formats = parse_formats(&format)?;
    let engine = Arc::new(config.engine()?);
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let submissions: Vec<(String, Submission)> = load_tree(&submission_path, load_submission)?
        .into_iter()
        .map(|(path, s)| (path.display().to_string(), s))
        .collect();
    anyhow::ensure!(
        !submissions.is_empty(),
        "no submissions found in {}",
        submission_path.display()
    );

    eprintln!(
        "certscore v{} - scoring {} submission(s)",
        env!("CARGO_PKG_VERSION"),
        submissions.len()
    );
    let start = Instant::now();
    let batch = score_batch(engine, submissions, parallelism).await;
    eprintln!(
        "\nComplete: {}/{} scored, {} failed ({:.1}s)",
        batch.scores.len(),
        batch.scores.len() + batch.failures.len(),
        batch.failures.len(),
        start.elapsed().as_secs_f64()
    );

    print_summary(&batch);
    write_reports(&batch, &output, &formats)?;

    if batch.has_failures() {
        anyhow::bail!(
            "{} submission(s) could not be scored",
            batch.failures.len()
        );
    }
    Ok(())
}

fn parse_formats(format: &str) -> Result<Vec<&'static str>> {
    if format == "all" {
        return Ok(vec!["json", "html"]);
    }
    format
        .split(',')
        .map(|f| match f.trim() {
            "json" => Ok("json"),
            "html" => Ok("html"),
            other => Err(anyhow::anyhow!(
                "unknown format '{other}', expected json, html, or all"
            )),
        })
        .collect()
}

/// Score submissions concurrently, at most `parallelism` at a time.
///
/// Results come back in input order regardless of completion order.
pub async fn score_batch(
    engine: Arc<ScoringEngine>,
    submissions: Vec<(String, Submission)>,
    parallelism: usize,
) -> BatchReport {
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
    let mut futures = FuturesUnordered::new();

    for (index, (source, submission)) in submissions.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        let semaphore = Arc::clone(&semaphore);

        futures.push(async move {
            let outcome = async {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                let score = tokio::task::spawn_blocking(move || {
                    engine.score_submission(&submission)
                })
                .await??;
                Ok::<AssessmentScore, anyhow::Error>(score)
            }
            .await;
            (index, source, outcome)
        });
    }

    let mut outcomes = Vec::new();
    while let Some((index, source, outcome)) = futures.next().await {
        match &outcome {
            Ok(score) => eprintln!(
                "  Scored: {} :: {} {:.1}% {}",
                score.assessment_id,
                score.student_id,
                score.percentage_score,
                if score.passed { "PASS" } else { "FAIL" }
            ),
            Err(e) => eprintln!("  ERROR: {source}: {e:#}"),
        }
        outcomes.push((index, source, outcome));
    }
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut scores = Vec::new();
    let mut failures = Vec::new();
    for (_, source, outcome) in outcomes {
        match outcome {
            Ok(score) => scores.push(score),
            Err(e) => failures.push(BatchFailure {
                source,
                error: format!("{e:#}"),
            }),
        }
    }
    BatchReport::new(scores, failures)
}

fn print_summary(batch: &BatchReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Assessment",
        "Score",
        "Points",
        "Result",
        "Correct",
        "Review",
    ]);

    for score in &batch.scores {
        let review: Vec<&str> = score
            .weakest_competencies(REVIEW_THRESHOLD)
            .into_iter()
            .take(2)
            .map(|(name, _)| name)
            .collect();
        table.add_row(vec![
            Cell::new(&score.student_id),
            Cell::new(&score.assessment_id),
            Cell::new(format!("{:.1}%", score.percentage_score)),
            Cell::new(format!(
                "{}/{}",
                score.total_points_earned, score.total_points_possible
            )),
            Cell::new(if score.passed { "PASS" } else { "FAIL" }),
            Cell::new(format!(
                "{}/{}",
                score.metadata.questions_correct, score.metadata.total_questions
            )),
            Cell::new(if review.is_empty() {
                "-".to_string()
            } else {
                review.join(", ")
            }),
        ]);
    }

    println!("{table}");

    let stats = batch.stats();
    if stats.scored > 1 {
        println!(
            "{} of {} passed, mean score {:.1}%",
            stats.passed, stats.scored, stats.mean_percentage
        );
    }
}

fn write_reports(batch: &BatchReport, output: &Path, formats: &[&str]) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = batch.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match *fmt {
            "json" => {
                for score in &batch.scores {
                    let path = output.join(format!("{}.json", report_stem(score)));
                    save_score_json(score, &path)?;
                }
                let path = output.join(format!("batch-{timestamp}.json"));
                batch.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                for score in &batch.scores {
                    let path = output.join(format!("{}.html", report_stem(score)));
                    write_html_report(score, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
            }
            _ => unreachable!("formats are checked before scoring"),
        }
    }
    Ok(())
}

/// File name stem for one score, safe on every platform.
fn report_stem(score: &AssessmentScore) -> String {
    format!("{}-{}", score.assessment_id, score.student_id)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
