//! Classification entry points.

use posture_core::{ClassifyError, ConfigError, Configuration, OptionSnapshot, Thresholds, Verdict};

use crate::combiner::Combiner;
use crate::evaluator::{evaluate_all, SignalSet};

/// Classifies one snapshot against a raw threshold configuration.
///
/// Thresholds are resolved and validated before any rule runs, so a broken
/// configuration fails the same way regardless of the snapshot.
///
/// # Errors
/// `ClassifyError::Configuration` if a threshold is missing, non-numeric or
/// inconsistent.
pub fn classify(
    snapshot: &OptionSnapshot,
    config: &Configuration,
) -> Result<Verdict, ClassifyError> {
    let thresholds = Thresholds::resolve(config)?;
    classify_with(snapshot, &thresholds)
}

/// Classifies one snapshot against already resolved thresholds.
///
/// # Errors
/// Only if an evaluator re-check rejects the snapshot, which cannot happen for
/// a snapshot built through `OptionSnapshot::new`.
pub fn classify_with(
    snapshot: &OptionSnapshot,
    thresholds: &Thresholds,
) -> Result<Verdict, ClassifyError> {
    let signals = evaluate_all(snapshot, thresholds)?;
    let verdict = Combiner::new(thresholds).combine(&signals);

    tracing::debug!(
        symbol = snapshot.symbol().unwrap_or("-"),
        posture = %verdict.posture(),
        confidence = %verdict.confidence(),
        reasons = verdict.reasons().len(),
        "Snapshot classified"
    );

    Ok(verdict)
}

/// Classifier with thresholds resolved once up front.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    /// Resolves and validates `config`.
    ///
    /// # Errors
    /// Returns `ConfigError` for a missing, non-numeric or inconsistent threshold.
    pub fn new(config: &Configuration) -> Result<Self, ConfigError> {
        Ok(Self::from_thresholds(Thresholds::resolve(config)?))
    }

    #[must_use]
    pub fn from_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Runs every evaluator without combining, for diagnostics.
    ///
    /// # Errors
    /// See [`classify_with`].
    pub fn evaluate(&self, snapshot: &OptionSnapshot) -> Result<SignalSet, ClassifyError> {
        evaluate_all(snapshot, &self.thresholds)
    }

    /// # Errors
    /// See [`classify_with`].
    pub fn classify(&self, snapshot: &OptionSnapshot) -> Result<Verdict, ClassifyError> {
        classify_with(snapshot, &self.thresholds)
    }

    /// Classifies each snapshot independently; one failure does not stop the rest.
    #[must_use]
    pub fn classify_all(&self, snapshots: &[OptionSnapshot]) -> Vec<Result<Verdict, ClassifyError>> {
        snapshots.iter().map(|s| self.classify(s)).collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_thresholds(Thresholds::default())
    }
}
