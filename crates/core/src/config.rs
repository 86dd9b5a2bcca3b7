//! Threshold configuration.
//!
//! `Configuration` is the raw name → number mapping supplied by the caller.
//! `Thresholds` is the typed view the evaluators read; resolving it checks
//! that every required name is present and that the values are consistent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Threshold names.
pub mod keys {
    pub const IV_RANK_LOW: &str = "iv_rank_low";
    pub const IV_RANK_HIGH: &str = "iv_rank_high";
    pub const IV_RANK_FULL_WEIGHT_DISTANCE: &str = "iv_rank_full_weight_distance";
    pub const DTE_SHORT: &str = "dte_short";
    pub const DTE_LONG: &str = "dte_long";
    pub const LONG_DTE_WEIGHT: &str = "long_dte_weight";
    pub const MAX_SPREAD_RATIO: &str = "max_spread_ratio";
    pub const EVENT_RISK_WINDOW_DAYS: &str = "event_risk_window_days";
    pub const MAX_SIGNAL_WEIGHT: &str = "max_signal_weight";
    pub const LIQUIDITY_VETO_WEIGHT: &str = "liquidity_veto_weight";
    pub const CAUTION_DAMPENING: &str = "caution_dampening";
    pub const MIN_CONVICTION: &str = "min_conviction";
    pub const HIGH_CONVICTION: &str = "high_conviction";
    pub const MAX_THETA_FRACTION: &str = "max_theta_fraction";

    /// Every name `Thresholds::resolve` requires.
    pub const REQUIRED: [&str; 14] = [
        IV_RANK_LOW,
        IV_RANK_HIGH,
        IV_RANK_FULL_WEIGHT_DISTANCE,
        DTE_SHORT,
        DTE_LONG,
        LONG_DTE_WEIGHT,
        MAX_SPREAD_RATIO,
        EVENT_RISK_WINDOW_DAYS,
        MAX_SIGNAL_WEIGHT,
        LIQUIDITY_VETO_WEIGHT,
        CAUTION_DAMPENING,
        MIN_CONVICTION,
        HIGH_CONVICTION,
        MAX_THETA_FRACTION,
    ];
}

/// Raw threshold mapping, name → numeric value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, f64>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration holding every required threshold at its default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Thresholds::default().to_configuration()
    }

    /// Sets a threshold, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Builder form of [`Configuration::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Removes a threshold, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Names present in this configuration that no evaluator reads.
    #[must_use]
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !keys::REQUIRED.contains(k))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<f64, ConfigError> {
        let value = self
            .get(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::NonNumeric {
                name: name.to_string(),
                found: value.to_string(),
            })
        }
    }

    fn require_days(&self, name: &str) -> Result<u32, ConfigError> {
        let value = self.require(name)?;
        if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(ConfigError::invalid(
                name,
                format!("expected a whole number of days >= 0, got {value}"),
            ));
        }
        Ok(value as u32)
    }

    fn require_positive(&self, name: &str) -> Result<f64, ConfigError> {
        let value = self.require(name)?;
        if value <= 0.0 {
            return Err(ConfigError::invalid(name, format!("must be > 0, got {value}")));
        }
        Ok(value)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Typed, validated thresholds read by the rule evaluators and the combiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// IV rank at or below which premium is considered cheap.
    pub iv_rank_low: f64,
    /// IV rank at or above which premium is considered rich.
    pub iv_rank_high: f64,
    /// Distance past a band edge at which the volatility weight saturates.
    pub iv_rank_full_weight_distance: f64,
    /// DTE at or below which gamma/theta caution fires.
    pub dte_short: u32,
    /// DTE at or above which buying premium is tolerated.
    pub dte_long: u32,
    pub long_dte_weight: f64,
    /// Widest acceptable (ask - bid) / mid.
    pub max_spread_ratio: f64,
    pub event_risk_window_days: u32,
    pub max_signal_weight: f64,
    pub liquidity_veto_weight: f64,
    pub caution_dampening: f64,
    pub min_conviction: f64,
    pub high_conviction: f64,
    /// |theta| / option mid above which decay is flagged as aggressive.
    pub max_theta_fraction: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            iv_rank_low: 30.0,
            iv_rank_high: 60.0,
            iv_rank_full_weight_distance: 20.0,
            dte_short: 7,
            dte_long: 30,
            long_dte_weight: 0.25,
            max_spread_ratio: 0.10,
            event_risk_window_days: 7,
            max_signal_weight: 1.0,
            liquidity_veto_weight: 1.0,
            caution_dampening: 0.5,
            min_conviction: 0.3,
            high_conviction: 0.75,
            max_theta_fraction: 0.03,
        }
    }
}

impl Thresholds {
    /// Resolves and cross-checks every required threshold.
    ///
    /// # Errors
    /// `ConfigError::Missing` for an absent name, `NonNumeric` for NaN or
    /// infinity, `Invalid` for out-of-range or inconsistent values.
    pub fn resolve(config: &Configuration) -> Result<Self, ConfigError> {
        let iv_rank_low = config.require(keys::IV_RANK_LOW)?;
        let iv_rank_high = config.require(keys::IV_RANK_HIGH)?;
        if !(0.0..=100.0).contains(&iv_rank_low) || !(0.0..=100.0).contains(&iv_rank_high) {
            return Err(ConfigError::invalid(
                keys::IV_RANK_LOW,
                "IV rank bands must lie within [0, 100]",
            ));
        }
        if iv_rank_low >= iv_rank_high {
            return Err(ConfigError::invalid(
                keys::IV_RANK_LOW,
                format!("must be below {} ({iv_rank_low} >= {iv_rank_high})", keys::IV_RANK_HIGH),
            ));
        }

        let dte_short = config.require_days(keys::DTE_SHORT)?;
        let dte_long = config.require_days(keys::DTE_LONG)?;
        if dte_short >= dte_long {
            return Err(ConfigError::invalid(
                keys::DTE_SHORT,
                format!("must be below {} ({dte_short} >= {dte_long})", keys::DTE_LONG),
            ));
        }

        let max_signal_weight = config.require_positive(keys::MAX_SIGNAL_WEIGHT)?;

        let long_dte_weight = config.require_positive(keys::LONG_DTE_WEIGHT)?;
        // The weakest volatility signal is half the maximum weight.
        if long_dte_weight >= max_signal_weight / 2.0 {
            return Err(ConfigError::invalid(
                keys::LONG_DTE_WEIGHT,
                format!("must stay below half of {}", keys::MAX_SIGNAL_WEIGHT),
            ));
        }

        let liquidity_veto_weight = config.require_positive(keys::LIQUIDITY_VETO_WEIGHT)?;
        if liquidity_veto_weight > max_signal_weight {
            return Err(ConfigError::invalid(
                keys::LIQUIDITY_VETO_WEIGHT,
                format!("must not exceed {}", keys::MAX_SIGNAL_WEIGHT),
            ));
        }

        let caution_dampening = config.require(keys::CAUTION_DAMPENING)?;
        if caution_dampening < 0.0 {
            return Err(ConfigError::invalid(
                keys::CAUTION_DAMPENING,
                format!("must be >= 0, got {caution_dampening}"),
            ));
        }

        let min_conviction = config.require(keys::MIN_CONVICTION)?;
        let high_conviction = config.require(keys::HIGH_CONVICTION)?;
        if min_conviction < 0.0 || min_conviction > high_conviction {
            return Err(ConfigError::invalid(
                keys::MIN_CONVICTION,
                format!("must satisfy 0 <= {min_conviction} <= {}", keys::HIGH_CONVICTION),
            ));
        }

        Ok(Self {
            iv_rank_low,
            iv_rank_high,
            iv_rank_full_weight_distance: config
                .require_positive(keys::IV_RANK_FULL_WEIGHT_DISTANCE)?,
            dte_short,
            dte_long,
            long_dte_weight,
            max_spread_ratio: config.require_positive(keys::MAX_SPREAD_RATIO)?,
            event_risk_window_days: config.require_days(keys::EVENT_RISK_WINDOW_DAYS)?,
            max_signal_weight,
            liquidity_veto_weight,
            caution_dampening,
            min_conviction,
            high_conviction,
            max_theta_fraction: config.require_positive(keys::MAX_THETA_FRACTION)?,
        })
    }

    /// Flattens back into a name → value mapping.
    #[must_use]
    pub fn to_configuration(&self) -> Configuration {
        [
            (keys::IV_RANK_LOW, self.iv_rank_low),
            (keys::IV_RANK_HIGH, self.iv_rank_high),
            (
                keys::IV_RANK_FULL_WEIGHT_DISTANCE,
                self.iv_rank_full_weight_distance,
            ),
            (keys::DTE_SHORT, f64::from(self.dte_short)),
            (keys::DTE_LONG, f64::from(self.dte_long)),
            (keys::LONG_DTE_WEIGHT, self.long_dte_weight),
            (keys::MAX_SPREAD_RATIO, self.max_spread_ratio),
            (
                keys::EVENT_RISK_WINDOW_DAYS,
                f64::from(self.event_risk_window_days),
            ),
            (keys::MAX_SIGNAL_WEIGHT, self.max_signal_weight),
            (keys::LIQUIDITY_VETO_WEIGHT, self.liquidity_veto_weight),
            (keys::CAUTION_DAMPENING, self.caution_dampening),
            (keys::MIN_CONVICTION, self.min_conviction),
            (keys::HIGH_CONVICTION, self.high_conviction),
            (keys::MAX_THETA_FRACTION, self.max_theta_fraction),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_round_trip() {
        let config = Configuration::with_defaults();
        assert_eq!(config.len(), keys::REQUIRED.len());
        let thresholds = Thresholds::resolve(&config).unwrap();
        assert_eq!(thresholds, Thresholds::default());
    }

    #[test]
    fn every_required_key_is_enforced() {
        for name in keys::REQUIRED {
            let mut config = Configuration::with_defaults();
            config.remove(name);
            assert_eq!(
                Thresholds::resolve(&config),
                Err(ConfigError::Missing(name.to_string())),
                "removing {name} should fail"
            );
        }
    }

    #[test]
    fn nan_threshold_is_non_numeric() {
        let config = Configuration::with_defaults().with(keys::MAX_SPREAD_RATIO, f64::NAN);
        assert!(matches!(
            Thresholds::resolve(&config),
            Err(ConfigError::NonNumeric { .. })
        ));
    }

    #[test]
    fn rejects_inverted_iv_bands() {
        let config = Configuration::with_defaults()
            .with(keys::IV_RANK_LOW, 70.0)
            .with(keys::IV_RANK_HIGH, 40.0);
        assert!(matches!(
            Thresholds::resolve(&config),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_fractional_days() {
        let config = Configuration::with_defaults().with(keys::DTE_SHORT, 6.5);
        let err = Thresholds::resolve(&config).unwrap_err();
        assert!(err.to_string().contains("dte_short"));
    }

    #[test]
    fn rejects_inverted_dte_bands() {
        let config = Configuration::with_defaults()
            .with(keys::DTE_SHORT, 30.0)
            .with(keys::DTE_LONG, 30.0);
        assert!(Thresholds::resolve(&config).is_err());
    }

    #[test]
    fn long_dte_weight_must_stay_below_volatility_floor() {
        let config = Configuration::with_defaults().with(keys::LONG_DTE_WEIGHT, 0.5);
        assert!(Thresholds::resolve(&config).is_err());
    }

    #[test]
    fn veto_weight_cannot_exceed_max_weight() {
        let config = Configuration::with_defaults().with(keys::LIQUIDITY_VETO_WEIGHT, 1.5);
        assert!(Thresholds::resolve(&config).is_err());
    }

    #[test]
    fn conviction_bands_must_be_ordered() {
        let config = Configuration::with_defaults()
            .with(keys::MIN_CONVICTION, 0.9)
            .with(keys::HIGH_CONVICTION, 0.5);
        assert!(Thresholds::resolve(&config).is_err());
    }

    #[test]
    fn unknown_keys_are_reported() {
        let config = Configuration::with_defaults().with("iv_rnak_high", 65.0);
        assert_eq!(config.unknown_keys(), vec!["iv_rnak_high"]);
        // Extra keys do not block resolution.
        assert!(Thresholds::resolve(&config).is_ok());
    }

    #[test]
    fn configuration_serializes_as_flat_map() {
        let config = Configuration::new().with(keys::DTE_SHORT, 5.0);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"dte_short":5.0}"#);
    }
}
