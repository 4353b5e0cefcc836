//! The `certscore rubric` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let registry = config.registry()?;

    let mut table = Table::new();
    table.set_header(vec![
        "Type",
        "Points",
        "Partial credit",
        "Accuracy",
        "Speed",
        "Complexity",
        "Type weight",
    ]);

    for entry in registry.entries() {
        let criteria = if entry.partial_credit_enabled && !entry.partial_credit_weights.is_empty() {
            entry
                .partial_credit_weights
                .iter()
                .map(|(name, weight)| format!("{name} {weight}"))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "none".to_string()
        };
        table.add_row(vec![
            Cell::new(entry.question_type),
            Cell::new(entry.total_points),
            Cell::new(criteria),
            Cell::new(entry.accuracy_weight),
            Cell::new(entry.speed_weight),
            Cell::new(entry.complexity_multiplier),
            Cell::new(config.scoring.type_weight(entry.question_type)),
        ]);
    }

    println!("{table}");
    println!(
        "Passing threshold: {:.0}%",
        config.scoring.passing_threshold * 100.0
    );
    Ok(())
}
