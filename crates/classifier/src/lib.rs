//! Deterministic options posture classifier.
//!
//! Five independent rule evaluators (volatility regime, time decay,
//! liquidity, event risk, objective alignment) each turn an
//! [`OptionSnapshot`](posture_core::OptionSnapshot) into a
//! [`Signal`](posture_core::Signal). The [`Combiner`] merges them into one
//! [`Verdict`](posture_core::Verdict) under a fixed precedence.
//!
//! ```no_run
//! use posture_classifier::classify;
//! use posture_core::{Configuration, OptionSnapshot};
//!
//! # fn run(snapshot: OptionSnapshot) -> Result<(), posture_core::ClassifyError> {
//! let verdict = classify(&snapshot, &Configuration::with_defaults())?;
//! println!("{} ({})", verdict.posture(), verdict.confidence());
//! # Ok(())
//! # }
//! ```

pub mod combiner;
pub mod engine;
pub mod evaluator;

pub use combiner::Combiner;
pub use engine::{classify, classify_with, Classifier};
pub use evaluator::{
    evaluate_all, evaluators, EventRisk, Liquidity, ObjectiveAlignment, RuleEvaluator, SignalSet,
    TimeDecay, VolatilityRegime,
};
