//! The `certscore validate` command.

use std::path::PathBuf;

use anyhow::Result;

use certscore_core::validate::validate_assessment;

use crate::loader::{load_assessment, load_tree};

pub fn execute(assessment_path: PathBuf) -> Result<()> {
    let assessments = load_tree(&assessment_path, load_assessment)?;
    anyhow::ensure!(
        !assessments.is_empty(),
        "no assessment definitions found in {}",
        assessment_path.display()
    );

    let mut total_warnings = 0;

    for (path, assessment) in &assessments {
        println!(
            "Assessment: {} ({} questions) [{}]",
            assessment.title.as_deref().unwrap_or(&assessment.id),
            assessment.questions.len(),
            path.display()
        );

        let warnings = validate_assessment(assessment);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All assessments valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
