//! certscore CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod loader;

#[derive(Parser)]
#[command(name = "certscore", version, about = "Assessment scoring engine for medical coding exams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score submissions
    Score {
        /// Path to a submission .json file or directory
        #[arg(long)]
        submission: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Max concurrent scorings (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Passing threshold as a fraction, e.g. 0.7
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Validate assessment definitions
    Validate {
        /// Path to an assessment or submission .json file, or a directory
        #[arg(long)]
        assessment: PathBuf,
    },

    /// Show the rubric table
    Rubric {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example submission
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("certscore=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            submission,
            config,
            output,
            format,
            parallelism,
            threshold,
        } => {
            commands::score::execute(submission, config, output, format, parallelism, threshold)
                .await
        }
        Commands::Validate { assessment } => commands::validate::execute(assessment),
        Commands::Rubric { config } => commands::rubric::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
