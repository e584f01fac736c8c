//! Forward compounding under the annuity-due convention.
//!
//! Each period's contribution lands before that period's interest accrues:
//! `end = (start + contribution) * (1 + r)`. The closed form in
//! `future_value` and the period-by-period rows in `project_growth` use
//! the same convention so they agree to rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::time_value::{annuity_due_fv_factor, compound_factor};
use crate::types::*;
use crate::HouseholdFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    #[serde(default)]
    pub initial: Money,
    #[serde(default)]
    pub periodic_contribution: Money,
    pub annual_rate_percent: Percent,
    pub years: u32,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Used only for `real_final_balance`.
    #[serde(default)]
    pub annual_inflation_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    pub period: u32,
    pub start_balance: Money,
    pub contribution: Money,
    pub interest_earned: Money,
    pub end_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub periods: Vec<GrowthRow>,
    pub final_balance: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    /// `final_balance` in today's money.
    pub real_final_balance: Money,
}

// ---------------------------------------------------------------------------
// Closed forms
// ---------------------------------------------------------------------------

/// Balance after `periods` of compounding an initial sum plus level
/// contributions made at the start of each period.
pub fn future_value(
    initial: Money,
    contribution: Money,
    periodic_rate: Rate,
    periods: u32,
) -> HouseholdFinanceResult<Money> {
    let overflow = || HouseholdFinanceError::NumericOverflow {
        context: "future value".into(),
    };
    let growth = compound_factor(periodic_rate, periods).ok_or_else(overflow)?;
    let annuity = annuity_due_fv_factor(periodic_rate, periods).ok_or_else(overflow)?;
    initial
        .checked_mul(growth)
        .and_then(|lump| contribution.checked_mul(annuity)?.checked_add(lump))
        .ok_or_else(overflow)
}

/// Deflate a nominal amount by `years` of annual inflation.
pub fn inflation_adjust(
    nominal: Money,
    annual_inflation_percent: Percent,
    years: u32,
) -> HouseholdFinanceResult<Money> {
    require_non_negative_rate("annual_inflation_percent", annual_inflation_percent)?;
    let deflator = compound_factor(percent_to_rate(annual_inflation_percent), years).ok_or_else(
        || HouseholdFinanceError::NumericOverflow {
            context: "inflation adjustment".into(),
        },
    )?;
    Ok(nominal / deflator)
}

pub(crate) fn validate_amounts(initial: Money, contribution: Money) -> HouseholdFinanceResult<()> {
    if initial < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "initial",
            "Initial balance must not be negative",
        ));
    }
    if contribution < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "periodic_contribution",
            "Contribution must not be negative",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Period-by-period balance projection with totals.
pub fn project_growth(
    input: &GrowthInput,
) -> HouseholdFinanceResult<ComputationOutput<GrowthProjection>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_amounts(input.initial, input.periodic_contribution)?;
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;
    let total_periods = horizon_periods("years", input.years, input.periods_per_year)?;
    let rate = periodic_rate(input.annual_rate_percent, input.periods_per_year);

    let mut rows = Vec::with_capacity(total_periods as usize);
    let mut balance = input.initial;
    for period in 1..=total_periods {
        let overflow = || HouseholdFinanceError::NumericOverflow {
            context: format!("growth projection at period {period}"),
        };
        let invested = balance
            .checked_add(input.periodic_contribution)
            .ok_or_else(overflow)?;
        let interest_earned = invested.checked_mul(rate).ok_or_else(overflow)?;
        let end_balance = invested.checked_add(interest_earned).ok_or_else(overflow)?;
        rows.push(GrowthRow {
            period,
            start_balance: balance,
            contribution: input.periodic_contribution,
            interest_earned,
            end_balance,
        });
        balance = end_balance;
    }

    let total_contributions = input.periodic_contribution * Decimal::from(total_periods);
    let total_interest = balance - input.initial - total_contributions;
    let real_final_balance =
        inflation_adjust(balance, input.annual_inflation_percent, input.years)?;

    debug!(periods = total_periods, final_balance = %balance, "growth projection built");

    let output = GrowthProjection {
        periods: rows,
        final_balance: balance,
        total_contributions,
        total_interest,
        real_final_balance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound growth (annuity-due contributions)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
