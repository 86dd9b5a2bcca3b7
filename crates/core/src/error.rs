//! Error taxonomy for classification.
//!
//! Two kinds only: a snapshot that violates its invariants, and a threshold
//! configuration that is missing, non-numeric or inconsistent. Both are
//! validation failures and are never retried.

use thiserror::Error;

/// A snapshot field violates its domain invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// A price-like field that must be strictly positive is not.
    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: String },

    /// A quote side is negative.
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: String },

    /// Ask below bid.
    #[error("ask ({ask}) must be >= bid ({bid})")]
    CrossedQuote { bid: String, ask: String },

    /// Days to expiry below zero.
    #[error("days_to_expiry must be >= 0, got {0}")]
    NegativeDte(i64),

    /// Days to event below zero.
    #[error("days_to_event must be >= 0, got {0}")]
    NegativeDaysToEvent(i64),

    /// IV rank outside [0, 100].
    #[error("iv_rank must be between 0 and 100, got {0}")]
    IvRankOutOfRange(f64),

    /// Delta outside the tolerated [-1.05, 1.05] band.
    #[error("delta looks out of range (expected roughly -1 to 1), got {0}")]
    DeltaOutOfRange(f64),

    /// NaN or infinite float.
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// A required threshold is missing, non-numeric, or inconsistent with another.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required threshold '{0}'")]
    Missing(String),

    #[error("threshold '{name}' is not numeric: {found}")]
    NonNumeric { name: String, found: String },

    #[error("threshold '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },

    /// The configuration source itself could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Any failure surfaced by a classification call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = InvalidInput::NonPositive {
            field: "price",
            value: "-1".to_string(),
        };
        assert_eq!(err.to_string(), "price must be > 0, got -1");

        let err = ConfigError::Missing("iv_rank_high".to_string());
        assert!(err.to_string().contains("iv_rank_high"));
    }

    #[test]
    fn classify_error_wraps_both_kinds() {
        let err: ClassifyError = InvalidInput::IvRankOutOfRange(120.0).into();
        assert!(matches!(err, ClassifyError::InvalidInput(_)));
        assert!(err.to_string().starts_with("invalid input"));

        let err: ClassifyError = ConfigError::Missing("dte_short".to_string()).into();
        assert!(matches!(err, ClassifyError::Configuration(_)));
    }
}
