//! Annual interest rate collaborators.
//!
//! The engine only ever consumes a number. Where that number comes from
//! (a live economic-data feed, a form field, a configured default) is
//! decided by whoever wires a `RateSource` in front of the calculators.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::HouseholdFinanceError;
use crate::types::Percent;
use crate::HouseholdFinanceResult;

/// Supplies an annual interest rate as a percentage.
pub trait RateSource {
    fn annual_rate_percent(&self) -> HouseholdFinanceResult<Percent>;

    /// Short label for logs and assumptions.
    fn name(&self) -> &str {
        "rate-source"
    }
}

/// A constant rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub Percent);

impl RateSource for FixedRate {
    fn annual_rate_percent(&self) -> HouseholdFinanceResult<Percent> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Try `primary`; on error or a negative rate use `fallback`.
#[derive(Debug, Clone)]
pub struct FallbackRateSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: RateSource, F: RateSource> FallbackRateSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RateSource, F: RateSource> RateSource for FallbackRateSource<P, F> {
    fn annual_rate_percent(&self) -> HouseholdFinanceResult<Percent> {
        match self.primary.annual_rate_percent() {
            Ok(rate) if rate >= Decimal::ZERO => Ok(rate),
            Ok(rate) => {
                warn!(
                    source = self.primary.name(),
                    %rate,
                    "negative rate from primary source, using fallback"
                );
                self.fallback.annual_rate_percent()
            }
            Err(e) => {
                warn!(source = self.primary.name(), error = %e, "primary rate source failed, using fallback");
                self.fallback.annual_rate_percent()
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}

/// Validate a rate handed in by any collaborator.
pub fn require_non_negative_rate(field: &str, rate: Percent) -> HouseholdFinanceResult<Percent> {
    if rate < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            field,
            "Interest rate must not be negative",
        ));
    }
    Ok(rate)
}
