//! Inverse solves on the annuity-due growth model.

use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::projection::{future_value, validate_amounts};
use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::time_value::{annuity_due_fv_factor, compound_factor};
use crate::types::*;
use crate::HouseholdFinanceResult;

// ---------------------------------------------------------------------------
// Contribution for goal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalContributionInput {
    #[serde(default)]
    pub initial: Money,
    pub annual_rate_percent: Percent,
    pub years: u32,
    pub goal: Money,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalContributionOutput {
    pub required_contribution: Money,
    /// The initial balance reaches the goal with no contributions.
    pub lump_sum_sufficient: bool,
    /// `future_value` re-evaluated with the solved contribution.
    pub projected_balance: Money,
    pub total_contributions: Money,
}

fn validate_goal(goal: Money) -> HouseholdFinanceResult<()> {
    if goal <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid("goal", "Goal must be positive"));
    }
    Ok(())
}

/// Level per-period contribution needed to reach `goal` in `years`.
pub fn solve_contribution_for_goal(
    input: &GoalContributionInput,
) -> HouseholdFinanceResult<ComputationOutput<GoalContributionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_goal(input.goal)?;
    validate_amounts(input.initial, Decimal::ZERO)?;
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;
    if input.years == 0 {
        return Err(HouseholdFinanceError::invalid(
            "years",
            "Horizon must be at least one year",
        ));
    }

    let periods = horizon_periods("years", input.years, input.periods_per_year)?;
    let rate = periodic_rate(input.annual_rate_percent, input.periods_per_year);
    let overflow = || HouseholdFinanceError::NumericOverflow {
        context: "goal contribution".into(),
    };

    let growth = compound_factor(rate, periods).ok_or_else(overflow)?;
    let lump_sum_value = input.initial.checked_mul(growth).ok_or_else(overflow)?;
    let shortfall = input.goal - lump_sum_value;
    let lump_sum_sufficient = shortfall <= Decimal::ZERO;

    let required_contribution = if lump_sum_sufficient {
        warnings.push("Initial balance alone reaches the goal".into());
        Decimal::ZERO
    } else {
        let annuity = annuity_due_fv_factor(rate, periods).ok_or_else(overflow)?;
        shortfall.checked_div(annuity).ok_or_else(|| {
            HouseholdFinanceError::DivisionByZero {
                context: "goal contribution annuity factor".into(),
            }
        })?
    };

    let projected_balance = future_value(input.initial, required_contribution, rate, periods)?;

    let output = GoalContributionOutput {
        required_contribution,
        lump_sum_sufficient,
        projected_balance,
        total_contributions: required_contribution
            .checked_mul(Decimal::from(periods))
            .ok_or_else(overflow)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverse annuity-due future value",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Time to goal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeToGoalInput {
    #[serde(default)]
    pub initial: Money,
    #[serde(default)]
    pub periodic_contribution: Money,
    pub annual_rate_percent: Percent,
    /// Target in today's money when inflation is non-zero.
    pub goal: Money,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    #[serde(default)]
    pub annual_inflation_percent: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum GoalHorizon {
    /// Goal met after `periods`; `years` rounds up to whole years.
    Reached { periods: u32, years: u32 },
    /// Goal not met within `horizon_years`.
    Unreachable { horizon_years: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeToGoalOutput {
    pub horizon: GoalHorizon,
    /// Nominal balance when the simulation stopped.
    pub final_balance: Money,
    /// `final_balance` in today's money.
    pub final_real_balance: Money,
}

/// Simulate period by period until the balance reaches the goal, for at
/// most `MAX_HORIZON_YEARS`.
pub fn solve_time_to_goal(
    input: &TimeToGoalInput,
) -> HouseholdFinanceResult<ComputationOutput<TimeToGoalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_goal(input.goal)?;
    validate_amounts(input.initial, input.periodic_contribution)?;
    validate_frequency(input.periods_per_year)?;
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative_rate("annual_inflation_percent", input.annual_inflation_percent)?;

    let ppy = input.periods_per_year;
    let rate = periodic_rate(input.annual_rate_percent, ppy);
    let overflow = |context: &str| HouseholdFinanceError::NumericOverflow {
        context: context.into(),
    };

    // Per-period deflator so that twelve monthly steps equal one annual step.
    let inflation_step = if input.annual_inflation_percent.is_zero() {
        Decimal::ONE
    } else {
        (Decimal::ONE + percent_to_rate(input.annual_inflation_percent))
            .checked_powd(Decimal::ONE / Decimal::from(ppy))
            .ok_or_else(|| overflow("per-period inflation factor"))?
    };

    let max_periods = horizon_periods("periods_per_year", MAX_HORIZON_YEARS, ppy)?;
    let mut balance = input.initial;
    let mut deflator = Decimal::ONE;
    let mut horizon = GoalHorizon::Unreachable {
        horizon_years: MAX_HORIZON_YEARS,
    };

    if balance >= input.goal {
        horizon = GoalHorizon::Reached {
            periods: 0,
            years: 0,
        };
    } else {
        for period in 1..=max_periods {
            balance = balance
                .checked_add(input.periodic_contribution)
                .and_then(|b| b.checked_mul(Decimal::ONE + rate))
                .ok_or_else(|| overflow("time-to-goal balance"))?;
            deflator = deflator
                .checked_mul(inflation_step)
                .ok_or_else(|| overflow("time-to-goal deflator"))?;
            if balance / deflator >= input.goal {
                horizon = GoalHorizon::Reached {
                    periods: period,
                    years: period.div_ceil(ppy),
                };
                break;
            }
        }
    }

    if let GoalHorizon::Unreachable { horizon_years } = horizon {
        debug!(%balance, goal = %input.goal, "goal not reached within horizon");
        warnings.push(format!("Goal not reached within {horizon_years} years"));
    }

    let output = TimeToGoalOutput {
        horizon,
        final_balance: balance,
        final_real_balance: balance / deflator,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Period-by-period simulation to goal",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal_input() -> GoalContributionInput {
        GoalContributionInput {
            initial: dec!(10000),
            annual_rate_percent: dec!(7),
            years: 20,
            goal: dec!(500000),
            periods_per_year: 12,
        }
    }

    #[test]
    fn test_contribution_reproduces_goal() {
        let out = solve_contribution_for_goal(&goal_input()).unwrap().result;
        assert!(!out.lump_sum_sufficient);
        assert!(out.required_contribution > Decimal::ZERO);
        assert!((out.projected_balance - dec!(500000)).abs() < dec!(1));
    }

    #[test]
    fn test_lump_sum_already_enough() {
        let mut input = goal_input();
        input.initial = dec!(400000);
        let out = solve_contribution_for_goal(&input).unwrap();
        assert!(out.result.lump_sum_sufficient);
        assert_eq!(out.result.required_contribution, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_rate_contribution() {
        let input = GoalContributionInput {
            initial: Decimal::ZERO,
            annual_rate_percent: Decimal::ZERO,
            years: 1,
            goal: dec!(1200),
            periods_per_year: 12,
        };
        let out = solve_contribution_for_goal(&input).unwrap().result;
        assert_eq!(out.required_contribution, dec!(100));
    }

    #[test]
    fn test_contribution_horizon_limits() {
        let mut input = goal_input();
        input.years = 400_000_000;
        assert!(matches!(
            solve_contribution_for_goal(&input),
            Err(HouseholdFinanceError::InvalidInput { .. })
        ));
        input.years = MAX_HORIZON_YEARS;
        input.periods_per_year = MAX_PERIODS_PER_YEAR + 1;
        assert!(solve_contribution_for_goal(&input).is_err());
    }

    fn time_input() -> TimeToGoalInput {
        TimeToGoalInput {
            initial: Decimal::ZERO,
            periodic_contribution: dec!(100),
            annual_rate_percent: Decimal::ZERO,
            goal: dec!(1200),
            periods_per_year: 12,
            annual_inflation_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_time_to_goal_zero_rate() {
        let out = solve_time_to_goal(&time_input()).unwrap().result;
        assert_eq!(
            out.horizon,
            GoalHorizon::Reached {
                periods: 12,
                years: 1
            }
        );
    }

    #[test]
    fn test_time_to_goal_already_met() {
        let mut input = time_input();
        input.initial = dec!(5000);
        let out = solve_time_to_goal(&input).unwrap().result;
        assert_eq!(out.horizon, GoalHorizon::Reached { periods: 0, years: 0 });
    }

    #[test]
    fn test_time_to_goal_unreachable() {
        let mut input = time_input();
        input.periodic_contribution = Decimal::ZERO;
        input.initial = dec!(100);
        let out = solve_time_to_goal(&input).unwrap();
        assert_eq!(
            out.result.horizon,
            GoalHorizon::Unreachable {
                horizon_years: MAX_HORIZON_YEARS
            }
        );
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_inflation_delays_goal() {
        let mut input = time_input();
        input.annual_rate_percent = dec!(6);
        input.goal = dec!(50000);
        let nominal = solve_time_to_goal(&input).unwrap().result.horizon;
        input.annual_inflation_percent = dec!(3);
        let real = solve_time_to_goal(&input).unwrap().result.horizon;
        match (nominal, real) {
            (
                GoalHorizon::Reached { periods: a, .. },
                GoalHorizon::Reached { periods: b, .. },
            ) => assert!(b > a),
            other => panic!("expected both reached, got {other:?}"),
        }
    }
}
