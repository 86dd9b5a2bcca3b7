//! Classify one snapshot file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use crate::commands::load_classifier;
use crate::input::read_snapshot;
use crate::render::{OutputFormat, Report};

/// Arguments for the classify command.
#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// JSON file holding one snapshot
    #[arg(short, long, default_value = "data/sample_option_snapshot.json")]
    pub snapshot: PathBuf,

    /// Thresholds TOML file (defaults to config/Thresholds.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Runs the classify command.
///
/// # Errors
/// Returns an error if the thresholds or the snapshot cannot be loaded.
pub fn run_classify(args: ClassifyArgs) -> Result<()> {
    let classifier = load_classifier(args.config.as_deref())?;
    let snapshot = read_snapshot(&args.snapshot, Utc::now().date_naive())?;

    let verdict = classifier
        .classify(&snapshot)
        .context("Classification failed")?;
    let report = Report::new(&snapshot, &verdict);

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
