//! The `certscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("certscore.toml").exists() {
        println!("certscore.toml already exists, skipping.");
    } else {
        std::fs::write("certscore.toml", SAMPLE_CONFIG)?;
        println!("Created certscore.toml");
    }

    std::fs::create_dir_all("submissions")?;
    let example_path = std::path::Path::new("submissions/example.json");
    if example_path.exists() {
        println!("submissions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SUBMISSION)?;
        println!("Created submissions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Adjust the scoring rules in certscore.toml");
    println!("  2. Run: certscore validate --assessment submissions/example.json");
    println!("  3. Run: certscore score --submission submissions/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# certscore configuration

parallelism = 4
output_dir = "./certscore-results"

[scoring]
passing_threshold = 0.80
partial_credit_enabled = true
time_bonus_enabled = true
speed_bonus_threshold = 0.75
competency_tracking = true
detailed_feedback = true
scoring_precision = 2
competency_categories = [
    "medical_terminology",
    "coding_accuracy",
    "guideline_application",
    "clinical_correlation",
    "regulatory_compliance",
]

[scoring.question_type_weights]
multiple_choice = 1.0
scenario_based = 1.5
word_construction = 1.2
case_analysis = 2.0
practical_coding = 2.5
matching = 1.0
true_false = 0.8

# Replace the built-in rubric for a question type:
#
# [[rubric]]
# question_type = "true_false"
# total_points = 1.0
# partial_credit_enabled = false
# partial_credit_weights = {}
# accuracy_weight = 1.0
# speed_weight = 0.05
# complexity_multiplier = 0.8
"#;

const EXAMPLE_SUBMISSION: &str = r#"{
  "assessment_data": {
    "id": "example_assessment",
    "student_id": "student_123",
    "title": "Cardiology coding practice",
    "questions": [
      {
        "id": "q1",
        "type": "multiple_choice",
        "correct_answer": "A",
        "competencies": ["medical_terminology"]
      },
      {
        "id": "q2",
        "type": "scenario_based",
        "correct_answer": {
          "primary_code": "I21.9",
          "secondary_codes": ["Z95.1"],
          "modifiers": ["25"]
        },
        "competencies": ["coding_accuracy", "clinical_correlation"]
      }
    ]
  },
  "student_answers": [
    {
      "question_id": "q1",
      "question_type": "multiple_choice",
      "response": "A",
      "time_taken_seconds": 45,
      "attempt_number": 1
    },
    {
      "question_id": "q2",
      "question_type": "scenario_based",
      "response": {
        "primary_code": "I21.9",
        "secondary_codes": ["Z95.1"],
        "modifiers": ["25"],
        "explanation": "Acute myocardial infarction with previous cardiac device"
      },
      "time_taken_seconds": 180,
      "attempt_number": 1
    }
  ]
}
"#;
