//! `hfc.toml` loading and validation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// File read when `--config` is not given. A missing default file is fine.
pub const DEFAULT_CONFIG_FILE: &str = "hfc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid periods_per_year: {0}. Must be at least 1")]
    InvalidPeriodsPerYear(u32),

    #[error("Invalid {field}: {value}. Must be in (0, 100]")]
    InvalidRatio { field: &'static str, value: Decimal },

    #[error("Invalid {field}: {value}. Must not be negative")]
    NegativeRate { field: &'static str, value: Decimal },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Where a command gets its rate when `--rate` is omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    pub fallback_annual_rate_percent: Decimal,
    /// Environment variable holding a live rate, tried before the fallback.
    pub live_rate_env: String,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            fallback_annual_rate_percent: dec!(6.75),
            live_rate_env: "HFC_LIVE_RATE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AffordabilityConfig {
    pub front_end_ratio_percent: Decimal,
    pub back_end_ratio_percent: Decimal,
}

impl Default for AffordabilityConfig {
    fn default() -> Self {
        Self {
            front_end_ratio_percent: dec!(28),
            back_end_ratio_percent: dec!(36),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MortgageConfig {
    pub pmi_rate_percent: Decimal,
}

impl Default for MortgageConfig {
    fn default() -> Self {
        Self {
            pmi_rate_percent: dec!(0.5),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HfcConfig {
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    pub periods_per_year: u32,
    pub rates: RatesConfig,
    pub affordability: AffordabilityConfig,
    pub mortgage: MortgageConfig,
}

impl Default for HfcConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            periods_per_year: 12,
            rates: RatesConfig::default(),
            affordability: AffordabilityConfig::default(),
            mortgage: MortgageConfig::default(),
        }
    }
}

impl HfcConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HfcConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `explicit` if given (it must exist), otherwise `hfc.toml` if
    /// present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods_per_year == 0 {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        for (field, value) in [
            (
                "affordability.front_end_ratio_percent",
                self.affordability.front_end_ratio_percent,
            ),
            (
                "affordability.back_end_ratio_percent",
                self.affordability.back_end_ratio_percent,
            ),
        ] {
            if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(ConfigError::InvalidRatio { field, value });
            }
        }
        for (field, value) in [
            (
                "rates.fallback_annual_rate_percent",
                self.rates.fallback_annual_rate_percent,
            ),
            ("mortgage.pmi_rate_percent", self.mortgage.pmi_rate_percent),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeRate { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = HfcConfig::from_toml_str("").unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.periods_per_year, 12);
        assert_eq!(config.rates.fallback_annual_rate_percent, dec!(6.75));
        assert_eq!(config.rates.live_rate_env, "HFC_LIVE_RATE");
        assert_eq!(config.affordability.back_end_ratio_percent, dec!(36));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = HfcConfig::from_toml_str(
            r#"
log_level = "debug"
[rates]
fallback_annual_rate_percent = 7.1
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.rates.fallback_annual_rate_percent, dec!(7.1));
        assert_eq!(config.rates.live_rate_env, "HFC_LIVE_RATE");
        assert_eq!(config.mortgage.pmi_rate_percent, dec!(0.5));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(HfcConfig::from_toml_str(r#"log_level = "loud""#).is_err());
    }

    #[test]
    fn test_zero_periods_rejected() {
        assert!(matches!(
            HfcConfig::from_toml_str("periods_per_year = 0"),
            Err(ConfigError::InvalidPeriodsPerYear(0))
        ));
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let err = HfcConfig::from_toml_str(
            r#"
[affordability]
front_end_ratio_percent = 120
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRatio { .. }));
    }
}
