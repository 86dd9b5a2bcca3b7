use clap::{Parser, Subcommand};

mod commands;
mod input;
mod render;

use commands::{BatchArgs, ClassifyArgs, ThresholdsArgs};

#[derive(Parser)]
#[command(name = "posture")]
#[command(
    about = "Classify an options snapshot into a premium posture (decision support, not trading advice)",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single snapshot file
    Classify(ClassifyArgs),
    /// Classify a JSON array of snapshots with one set of thresholds
    Batch(BatchArgs),
    /// Show the effective thresholds
    Thresholds(ThresholdsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Classify(args) => commands::run_classify(args),
        Commands::Batch(args) => commands::run_batch(args),
        Commands::Thresholds(args) => commands::run_thresholds(args),
    }
}
