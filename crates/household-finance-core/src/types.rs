use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HouseholdFinanceError;
use crate::HouseholdFinanceResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates as users enter them (6.5 = 6.5%).
pub type Percent = Decimal;

/// Standard number of payment periods per year (monthly).
pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term or savings horizon any calculator accepts.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Highest payment or compounding frequency accepted (daily).
pub const MAX_PERIODS_PER_YEAR: u32 = 365;

pub(crate) fn default_periods_per_year() -> u32 {
    MONTHS_PER_YEAR
}

pub(crate) fn validate_frequency(periods_per_year: u32) -> HouseholdFinanceResult<()> {
    if periods_per_year == 0 || periods_per_year > MAX_PERIODS_PER_YEAR {
        return Err(HouseholdFinanceError::invalid(
            "periods_per_year",
            format!("Periods per year must be between 1 and {MAX_PERIODS_PER_YEAR}"),
        ));
    }
    Ok(())
}

/// Reject a period count longer than `MAX_HORIZON_YEARS` at the given
/// frequency.
pub(crate) fn validate_period_count(
    field: &str,
    periods: u32,
    periods_per_year: u32,
) -> HouseholdFinanceResult<()> {
    validate_frequency(periods_per_year)?;
    if periods > MAX_HORIZON_YEARS * periods_per_year {
        return Err(HouseholdFinanceError::invalid(
            field,
            format!("Term must not exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    Ok(())
}

/// `years * periods_per_year`, with both bounded.
pub(crate) fn horizon_periods(
    field: &str,
    years: u32,
    periods_per_year: u32,
) -> HouseholdFinanceResult<u32> {
    validate_frequency(periods_per_year)?;
    if years > MAX_HORIZON_YEARS {
        return Err(HouseholdFinanceError::invalid(
            field,
            format!("Horizon must not exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    years
        .checked_mul(periods_per_year)
        .ok_or_else(|| HouseholdFinanceError::invalid(field, "Horizon is too long"))
}

/// Fixed-rate loan terms, immutable for the duration of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_periods: u32,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

impl LoanTerms {
    /// Monthly loan with the given term in months.
    pub fn monthly(principal: Money, annual_rate_percent: Percent, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_periods: term_months,
            periods_per_year: MONTHS_PER_YEAR,
        }
    }

    /// Per-period rate as a fraction (annual percent / 100 / periods per year).
    pub fn periodic_rate(&self) -> Rate {
        periodic_rate(self.annual_rate_percent, self.periods_per_year)
    }
}

/// Convert an annual percentage into a per-period fraction.
pub fn periodic_rate(annual_rate_percent: Percent, periods_per_year: u32) -> Rate {
    if periods_per_year == 0 {
        return Decimal::ZERO;
    }
    annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(periods_per_year)
}

/// Convert a percentage into a fraction.
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / Decimal::ONE_HUNDRED
}

/// Calendar date of the `index`-th period (0-based) after `start`.
///
/// Supports frequencies that divide a year into whole months (1, 2, 3, 4,
/// 6, 12) or whole weeks (13, 26, 52). Anything else yields `None`.
pub fn period_date(start: NaiveDate, index: u32, periods_per_year: u32) -> Option<NaiveDate> {
    if periods_per_year == 0 {
        return None;
    }
    if MONTHS_PER_YEAR % periods_per_year == 0 {
        let step = MONTHS_PER_YEAR / periods_per_year;
        start.checked_add_months(Months::new(index.checked_mul(step)?))
    } else if 364 % periods_per_year == 0 {
        let step = 364 / periods_per_year;
        start.checked_add_days(Days::new(u64::from(index) * u64::from(step)))
    } else {
        None
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        assert_eq!(periodic_rate(dec!(6), 12), dec!(0.005));
    }

    #[test]
    fn test_periodic_rate_zero_frequency() {
        assert_eq!(periodic_rate(dec!(6), 0), Decimal::ZERO);
    }

    #[test]
    fn test_horizon_limits() {
        assert_eq!(horizon_periods("years", 30, 12).unwrap(), 360);
        assert_eq!(horizon_periods("years", MAX_HORIZON_YEARS, 365).unwrap(), 36500);
        assert!(horizon_periods("years", 400_000_000, 12).is_err());
        assert!(horizon_periods("years", 10, 366).is_err());
        assert!(validate_period_count("term_periods", 1200, 12).is_ok());
        assert!(validate_period_count("term_periods", 1201, 12).is_err());
        assert!(validate_period_count("term_periods", u32::MAX, 12).is_err());
    }

    #[test]
    fn test_period_date_monthly_and_biweekly() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            period_date(start, 1, 12),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(
            period_date(start, 2, 26),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(period_date(start, 1, 24), None);
    }
}
