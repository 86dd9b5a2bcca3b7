use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::{Configuration, Thresholds};
use crate::error::ConfigError;

/// Default location of the thresholds file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Thresholds.toml";

/// Prefix for environment overrides, e.g. `POSTURE_IV_RANK_HIGH=70`.
pub const ENV_PREFIX: &str = "POSTURE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads thresholds by layering defaults, `config/Thresholds.toml` and
    /// `POSTURE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value is not numeric.
    pub fn load() -> Result<Configuration, ConfigError> {
        let figment = Self::base()
            .merge(Toml::file(DEFAULT_CONFIG_PATH))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::extract(&figment)
    }

    /// Loads thresholds from an explicit TOML file, still layered over the
    /// defaults and under environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or a
    /// value is not numeric.
    pub fn load_from(path: &Path) -> Result<Configuration, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Load(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let figment = Self::base()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::extract(&figment)
    }

    /// Parses thresholds from TOML text over the defaults. No environment layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or a value is not numeric.
    pub fn from_toml_str(toml: &str) -> Result<Configuration, ConfigError> {
        Self::extract(&Self::base().merge(Toml::string(toml)))
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Thresholds::default().to_configuration()))
    }

    fn extract(figment: &Figment) -> Result<Configuration, ConfigError> {
        let raw: BTreeMap<String, serde_json::Value> = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let mut config = Configuration::new();
        for (name, value) in raw {
            match value.as_f64() {
                Some(v) => config.set(name, v),
                None => {
                    return Err(ConfigError::NonNumeric {
                        name,
                        found: value.to_string(),
                    })
                }
            }
        }

        for name in config.unknown_keys() {
            tracing::warn!(threshold = name, "Ignoring unknown threshold");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ConfigLoader::from_toml_str("").unwrap();
        assert_eq!(config, Configuration::with_defaults());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = ConfigLoader::from_toml_str("iv_rank_high = 70\nmax_spread_ratio = 0.05").unwrap();
        assert_eq!(config.get(keys::IV_RANK_HIGH), Some(70.0));
        assert_eq!(config.get(keys::MAX_SPREAD_RATIO), Some(0.05));
        assert_eq!(config.get(keys::IV_RANK_LOW), Some(30.0));
    }

    #[test]
    fn string_value_is_non_numeric() {
        let err = ConfigLoader::from_toml_str("dte_short = \"seven\"").unwrap_err();
        assert!(matches!(err, ConfigError::NonNumeric { ref name, .. } if name == "dte_short"));
    }

    #[test]
    fn boolean_value_is_non_numeric() {
        let err = ConfigLoader::from_toml_str("min_conviction = true").unwrap_err();
        assert!(matches!(err, ConfigError::NonNumeric { .. }));
    }

    #[test]
    fn malformed_toml_is_load_error() {
        let err = ConfigLoader::from_toml_str("iv_rank_high = = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "event_risk_window_days = 10").unwrap();
        let config = ConfigLoader::load_from(file.path()).unwrap();
        assert_eq!(config.get(keys::EVENT_RISK_WINDOW_DAYS), Some(10.0));
    }

    #[test]
    fn load_from_missing_file_fails() {
        let err = ConfigLoader::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
