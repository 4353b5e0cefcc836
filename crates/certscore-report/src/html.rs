//! HTML report generator.
//!
//! Produces a self-contained HTML file with the stylesheet inlined.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use certscore_core::report::AssessmentScore;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report for one scored attempt.
pub fn generate_html(score: &AssessmentScore) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>certscore report: {} / {}</title>\n",
        html_escape(&score.assessment_id),
        html_escape(&score.student_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>certscore report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Assessment: <strong>{}</strong> | Student: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(&score.assessment_id),
        html_escape(&score.student_id),
        score.metadata.total_questions,
        score.metadata.scoring_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    let verdict = if score.passed { "pass" } else { "fail" };
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Points</th><th>Result</th><th>Weighted</th><th>Correct</th><th>Time</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.1}%</td><td>{}/{}</td><td class=\"{}\">{}</td><td>{:.1}%</td><td>{}/{}</td><td>{} min</td></tr></tbody>\n",
        score.percentage_score,
        score.total_points_earned,
        score.total_points_possible,
        verdict,
        if score.passed { "PASSED" } else { "FAILED" },
        score.metadata.weighted_percentage,
        score.metadata.questions_correct,
        score.metadata.total_questions,
        score.time_taken_minutes,
    ));
    html.push_str("</table>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Passing threshold: {:.1}%</p>\n",
        score.metadata.passing_threshold
    ));

    if !score.competency_scores.is_empty() {
        html.push_str("<h2>Competencies</h2>\n");
        html.push_str(&generate_competency_chart(&score.competency_scores));
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Type</th><th>Points</th><th>Percent</th><th>Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &score.individual_scores {
        let class = if r.is_correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            class,
            html_escape(&r.question_id),
            r.question_type,
            r.points_earned,
            r.points_possible,
            r.percentage,
            html_escape(&r.feedback),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(score).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(score: &AssessmentScore, path: &Path) -> Result<()> {
    let html = generate_html(score);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_competency_chart(competencies: &BTreeMap<String, f64>) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 220;

    let total_height = competencies.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (name, value)) in competencies.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let fraction = value.clamp(0.0, 1.0);
        let width = (fraction * max_width as f64) as usize;

        let color = if fraction >= 0.8 {
            "#22c55e"
        } else if fraction >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&name.replace('_', " "))
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            fraction * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; color: #1a1a1a; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #e5e7eb; padding: 0.4rem 0.8rem; text-align: left; vertical-align: top; }
th { background: #f3f4f6; }
td.pass, tr.pass { background: #dcfce7; }
td.fail, tr.fail { background: #fde2e2; }
pre { overflow-x: auto; padding: 1rem; background: #f3f4f6; }
summary { cursor: pointer; font-weight: bold; }
"#;
