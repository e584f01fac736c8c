//! Maximum affordable home price under a monthly payment ceiling.
//!
//! Property tax is a percentage of the price being solved for, so the
//! price is found by fixed-point iteration: estimate the tax on the last
//! price, convert the remaining principal-and-interest budget back into a
//! loan amount, add the down payment, repeat. Each step is relaxed by
//! `1 / (1 + F*t)` (F = annuity factor, t = monthly tax rate) so the price
//! sequence starts at the tax-free upper bound and only ever moves down.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::dti::{max_payment_from_income, IncomeInput, PaymentCeiling};
use crate::amortization::breakdown::{monthly_property_tax, PaymentBreakdown};
use crate::amortization::compute_periodic_payment;
use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::time_value::annuity_pv_factor;
use crate::types::*;
use crate::HouseholdFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Iteration ceiling for the price solve.
pub const MAX_ITERATIONS: u32 = 10;

/// Successive prices closer than this are treated as converged.
pub const CONVERGENCE_TOLERANCE: Money = dec!(10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    /// Ceiling on the total monthly housing payment (PITI + HOA).
    pub max_monthly_payment: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub annual_tax_rate_percent: Percent,
    #[serde(default)]
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
}

/// How the price solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Successive prices differed by less than the tolerance.
    Converged,
    /// Stopped at `MAX_ITERATIONS`; the price is the last estimate.
    IterationCap,
    /// Fixed costs and taxes leave no room for principal and interest.
    BudgetExhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_price: Money,
    pub loan_amount: Money,
    pub monthly_breakdown: PaymentBreakdown,
    pub iterations: u32,
    pub status: SolveStatus,
    /// Price estimate after each step, starting with the tax-free bound.
    pub price_path: Vec<Money>,
    /// With `BudgetExhausted` from property tax: the highest price whose tax
    /// and fixed costs still fit the ceiling, bought outright from the down
    /// payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_valid_price: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeAffordabilityInput {
    pub income: IncomeInput,
    #[serde(default)]
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub annual_tax_rate_percent: Percent,
    #[serde(default)]
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeAffordabilityOutput {
    pub ceiling: PaymentCeiling,
    pub affordability: AffordabilityOutput,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

fn validate(input: &AffordabilityInput) -> HouseholdFinanceResult<()> {
    if input.max_monthly_payment <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "max_monthly_payment",
            "Maximum payment must be positive",
        ));
    }
    if input.term_years == 0 {
        return Err(HouseholdFinanceError::invalid(
            "term_years",
            "Term must be at least one year",
        ));
    }
    if input.down_payment < Decimal::ZERO
        || input.annual_insurance < Decimal::ZERO
        || input.monthly_hoa < Decimal::ZERO
    {
        return Err(HouseholdFinanceError::invalid(
            "down_payment",
            "Down payment, insurance and HOA must not be negative",
        ));
    }
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative_rate("annual_tax_rate_percent", input.annual_tax_rate_percent)?;
    Ok(())
}

/// Solve for the highest price whose monthly payment fits the ceiling.
pub fn solve_affordable_price(
    input: &AffordabilityInput,
) -> HouseholdFinanceResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let term_months = horizon_periods("term_years", input.term_years, MONTHS_PER_YEAR)?;
    let monthly_rate = periodic_rate(input.annual_rate_percent, MONTHS_PER_YEAR);
    let tax_rate = periodic_rate(input.annual_tax_rate_percent, MONTHS_PER_YEAR);
    let fixed_costs =
        input.monthly_hoa + input.annual_insurance / Decimal::from(MONTHS_PER_YEAR);

    let pv_factor = annuity_pv_factor(monthly_rate, term_months).ok_or_else(|| {
        HouseholdFinanceError::NumericOverflow {
            context: "affordability annuity factor".into(),
        }
    })?;
    let relaxation = Decimal::ONE + pv_factor * tax_rate;

    let budget_at = |price: Money| input.max_monthly_payment - fixed_costs - price * tax_rate;

    let mut price_path: Vec<Money> = Vec::new();
    let mut iterations = 0u32;
    let mut status = SolveStatus::IterationCap;

    let tax_free_budget = budget_at(Decimal::ZERO);
    let mut price = if tax_free_budget <= Decimal::ZERO {
        status = SolveStatus::BudgetExhausted;
        Decimal::ZERO
    } else {
        pv_factor
            .checked_mul(tax_free_budget)
            .and_then(|p| p.checked_add(input.down_payment))
            .ok_or_else(|| HouseholdFinanceError::NumericOverflow {
                context: "affordability tax-free price bound".into(),
            })?
    };
    price_path.push(price);

    if status != SolveStatus::BudgetExhausted {
        for i in 1..=MAX_ITERATIONS {
            iterations = i;
            let raw = pv_factor * budget_at(price) + input.down_payment;
            let next = price - (price - raw) / relaxation;

            if budget_at(next) <= Decimal::ZERO {
                status = SolveStatus::BudgetExhausted;
                break;
            }

            let delta = (next - price).abs();
            price = next;
            price_path.push(price);
            debug!(iteration = i, %price, %delta, "affordability price step");

            if delta < CONVERGENCE_TOLERANCE {
                status = SolveStatus::Converged;
                break;
            }
        }
    }

    let mut last_valid_price = None;
    match status {
        SolveStatus::Converged => {}
        SolveStatus::IterationCap => {
            warn!(iterations, %price, "affordability solve hit its iteration cap");
            warnings.push(format!(
                "Price did not settle within {MAX_ITERATIONS} iterations; returning last estimate"
            ));
        }
        SolveStatus::BudgetExhausted => {
            price = Decimal::ZERO;
            if tax_free_budget > Decimal::ZERO && tax_rate > Decimal::ZERO {
                last_valid_price = Some((tax_free_budget / tax_rate).min(input.down_payment));
            }
            warnings.push(
                "HOA, insurance and property tax leave no budget for principal and interest".into(),
            );
            if let Some(cash_price) = last_valid_price {
                warnings.push(format!(
                    "Without a loan, property tax fits the budget up to a price of {}",
                    cash_price.round_dp(2)
                ));
            }
        }
    }

    let loan_amount = (price - input.down_payment).max(Decimal::ZERO);
    let principal_interest = if loan_amount > Decimal::ZERO {
        compute_periodic_payment(loan_amount, monthly_rate, term_months)
    } else {
        Decimal::ZERO
    };
    let monthly_breakdown = PaymentBreakdown::new(
        principal_interest,
        monthly_property_tax(price, input.annual_tax_rate_percent),
        input.annual_insurance / Decimal::from(MONTHS_PER_YEAR),
        input.monthly_hoa,
        Decimal::ZERO,
    );

    let output = AffordabilityOutput {
        max_price: price,
        loan_amount,
        monthly_breakdown,
        iterations,
        status,
        price_path,
        last_valid_price,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Affordability back-solve (relaxed fixed-point on property tax)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Derive the payment ceiling from income and solve for the price.
pub fn solve_affordability_from_income(
    input: &IncomeAffordabilityInput,
) -> HouseholdFinanceResult<ComputationOutput<IncomeAffordabilityOutput>> {
    let start = Instant::now();
    let ceiling = max_payment_from_income(&input.income)?;

    if ceiling.max_monthly_payment <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "monthly_debts",
            "Existing debts leave no room for a housing payment",
        ));
    }

    let solved = solve_affordable_price(&AffordabilityInput {
        max_monthly_payment: ceiling.max_monthly_payment,
        down_payment: input.down_payment,
        annual_rate_percent: input.annual_rate_percent,
        term_years: input.term_years,
        annual_tax_rate_percent: input.annual_tax_rate_percent,
        annual_insurance: input.annual_insurance,
        monthly_hoa: input.monthly_hoa,
    })?;

    let output = IncomeAffordabilityOutput {
        ceiling,
        affordability: solved.result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt-to-income ceiling + affordability back-solve",
        input,
        solved.warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AffordabilityInput {
        AffordabilityInput {
            max_monthly_payment: dec!(2000),
            down_payment: dec!(40000),
            annual_rate_percent: dec!(7),
            term_years: 30,
            annual_tax_rate_percent: dec!(1.1),
            annual_insurance: dec!(1200),
            monthly_hoa: Decimal::ZERO,
        }
    }

    #[test]
    fn test_converges_within_cap() {
        let out = solve_affordable_price(&base()).unwrap().result;
        assert_eq!(out.status, SolveStatus::Converged);
        assert!(out.iterations <= MAX_ITERATIONS);
        assert!(out.max_price > dec!(40000));
        // Solved price spends the whole budget
        assert!((out.monthly_breakdown.total - dec!(2000)).abs() < dec!(1));
    }

    #[test]
    fn test_price_path_never_increases() {
        let out = solve_affordable_price(&base()).unwrap().result;
        for pair in out.price_path.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_no_tax_converges_at_first_step() {
        let mut input = base();
        input.annual_tax_rate_percent = Decimal::ZERO;
        let out = solve_affordable_price(&input).unwrap().result;
        assert_eq!(out.status, SolveStatus::Converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.price_path.len(), 2);
    }

    #[test]
    fn test_fixed_costs_exhaust_budget() {
        let mut input = base();
        input.monthly_hoa = dec!(2000);
        let out = solve_affordable_price(&input).unwrap();
        assert_eq!(out.result.status, SolveStatus::BudgetExhausted);
        assert_eq!(out.result.max_price, Decimal::ZERO);
        assert_eq!(out.result.iterations, 0);
        assert_eq!(out.result.last_valid_price, None);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_taxes_on_down_payment_exhaust_budget() {
        let mut input = base();
        input.down_payment = dec!(2000000);
        input.annual_tax_rate_percent = dec!(2);
        let out = solve_affordable_price(&input).unwrap().result;
        assert_eq!(out.status, SolveStatus::BudgetExhausted);
        assert_eq!(out.max_price, Decimal::ZERO);
        // 1900 of monthly budget covers tax on 1900 / (2% / 12)
        let cash_price = out.last_valid_price.unwrap();
        assert!((cash_price - dec!(1140000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_term_beyond_horizon_rejected() {
        let mut input = base();
        input.term_years = 400_000_000;
        assert!(matches!(
            solve_affordable_price(&input),
            Err(HouseholdFinanceError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_rate_uses_linear_factor() {
        let mut input = base();
        input.annual_rate_percent = Decimal::ZERO;
        input.annual_tax_rate_percent = Decimal::ZERO;
        input.annual_insurance = Decimal::ZERO;
        let out = solve_affordable_price(&input).unwrap().result;
        // 2000 * 360 + 40000
        assert_eq!(out.max_price, dec!(760000));
    }

    #[test]
    fn test_from_income() {
        let input = IncomeAffordabilityInput {
            income: IncomeInput {
                annual_income: dec!(100000),
                monthly_debts: dec!(500),
                front_end_ratio_percent: None,
                back_end_ratio_percent: None,
            },
            down_payment: dec!(40000),
            annual_rate_percent: dec!(7),
            term_years: 30,
            annual_tax_rate_percent: dec!(1.1),
            annual_insurance: dec!(1200),
            monthly_hoa: Decimal::ZERO,
        };
        let out = solve_affordability_from_income(&input).unwrap().result;
        // front 2333.33 vs back 3000 - 500 = 2500
        assert_eq!(out.ceiling.max_monthly_payment.round_dp(2), dec!(2333.33));
        assert_eq!(out.affordability.status, SolveStatus::Converged);
    }
}
