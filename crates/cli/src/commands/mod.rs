//! CLI commands for the posture classifier.

pub mod batch;
pub mod classify;
pub mod thresholds;

pub use batch::{run_batch, BatchArgs};
pub use classify::{run_classify, ClassifyArgs};
pub use thresholds::{run_thresholds, ThresholdsArgs};

use std::path::Path;

use anyhow::{Context, Result};
use posture_classifier::Classifier;
use posture_core::{ConfigLoader, Configuration};

/// Loads thresholds from `path`, or from the default location when absent,
/// and resolves them.
///
/// # Errors
/// Returns an error if the file cannot be loaded or a threshold is invalid.
pub fn load_classifier(path: Option<&Path>) -> Result<Classifier> {
    let config = load_configuration(path)?;
    let classifier = Classifier::new(&config).context("Invalid threshold configuration")?;
    tracing::info!(thresholds = config.len(), "Thresholds resolved");
    Ok(classifier)
}

fn load_configuration(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => ConfigLoader::load_from(path)
            .with_context(|| format!("Failed to load thresholds from {}", path.display())),
        None => ConfigLoader::load().context("Failed to load thresholds"),
    }
}
