//! Core types for options posture classification: the validated snapshot,
//! threshold configuration, per-evaluator signals and the final verdict.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod signal;
pub mod snapshot;
pub mod verdict;

pub use config::{keys, Configuration, Thresholds};
pub use config_loader::ConfigLoader;
pub use error::{ClassifyError, ConfigError, InvalidInput};
pub use signal::{EvaluatorKind, Leaning, Signal};
pub use snapshot::{Objective, OptionRight, OptionSnapshot, SnapshotInput, Trend};
pub use verdict::{Confidence, Posture, Verdict};
