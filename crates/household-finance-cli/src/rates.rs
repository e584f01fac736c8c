//! Rate resolution for commands run without `--rate`.

use household_finance_core::rate_source::{FallbackRateSource, FixedRate, RateSource};
use household_finance_core::{HouseholdFinanceError, HouseholdFinanceResult, Percent};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use crate::config::RatesConfig;

/// Reads a live annual rate (percent) from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvRateSource {
    var: String,
}

impl EnvRateSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl RateSource for EnvRateSource {
    fn annual_rate_percent(&self) -> HouseholdFinanceResult<Percent> {
        let raw = std::env::var(&self.var).map_err(|_| HouseholdFinanceError::InvalidInput {
            field: self.var.clone(),
            reason: "environment variable not set".into(),
        })?;
        Decimal::from_str(raw.trim()).map_err(|e| HouseholdFinanceError::InvalidInput {
            field: self.var.clone(),
            reason: format!("not a number: {e}"),
        })
    }

    fn name(&self) -> &str {
        &self.var
    }
}

/// `explicit` if given, else the live rate, else the configured fallback.
pub fn resolve_rate(
    explicit: Option<Decimal>,
    config: &RatesConfig,
) -> HouseholdFinanceResult<Percent> {
    if let Some(rate) = explicit {
        return Ok(rate);
    }
    let source = FallbackRateSource::new(
        EnvRateSource::new(config.live_rate_env.clone()),
        FixedRate(config.fallback_annual_rate_percent),
    );
    let rate = source.annual_rate_percent()?;
    info!(%rate, source = source.name(), "resolved annual rate");
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_explicit_rate_wins() {
        let config = RatesConfig::default();
        assert_eq!(resolve_rate(Some(dec!(5.5)), &config).unwrap(), dec!(5.5));
    }

    #[test]
    fn test_unset_variable_uses_fallback() {
        let config = RatesConfig {
            fallback_annual_rate_percent: dec!(6.25),
            live_rate_env: "HFC_TEST_RATE_THAT_IS_NEVER_SET".to_string(),
        };
        assert_eq!(resolve_rate(None, &config).unwrap(), dec!(6.25));
    }

    #[test]
    fn test_env_source_reports_missing_variable() {
        let source = EnvRateSource::new("HFC_TEST_RATE_ALSO_NEVER_SET");
        assert!(source.annual_rate_percent().is_err());
    }
}
