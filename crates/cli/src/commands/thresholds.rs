//! Print the effective thresholds after layering defaults, file and environment.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::commands::load_classifier;
use crate::render::{thresholds_text, OutputFormat};

/// Arguments for the thresholds command.
#[derive(Args, Debug, Clone)]
pub struct ThresholdsArgs {
    /// Thresholds TOML file (defaults to config/Thresholds.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Runs the thresholds command.
///
/// # Errors
/// Returns an error if the thresholds cannot be loaded or are inconsistent.
pub fn run_thresholds(args: ThresholdsArgs) -> Result<()> {
    let classifier = load_classifier(args.config.as_deref())?;
    let thresholds = classifier.thresholds();

    match args.format {
        OutputFormat::Text => print!("{}", thresholds_text(thresholds)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(thresholds)?),
    }

    Ok(())
}
