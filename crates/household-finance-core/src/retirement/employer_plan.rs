//! Employer-sponsored plan (401(k)) projection with salary growth and match.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::types::*;
use crate::HouseholdFinanceResult;

fn default_match_multiplier() -> Percent {
    Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerPlanInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub annual_salary: Money,
    #[serde(default)]
    pub current_balance: Money,
    /// Employee deferral as a percentage of salary.
    pub contribution_rate_percent: Percent,
    #[serde(default)]
    pub salary_growth_percent: Percent,
    pub annual_return_percent: Percent,
    /// Salary percentage the employer matches up to.
    #[serde(default)]
    pub match_cap_percent: Percent,
    /// Employer dollars per employee dollar, as a percentage (50 = half).
    #[serde(default = "default_match_multiplier")]
    pub match_multiplier_percent: Percent,
    #[serde(default)]
    pub tax_bracket_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanYear {
    pub year: u32,
    pub age: u32,
    pub salary: Money,
    pub employee_contribution: Money,
    pub employer_match: Money,
    pub growth: Money,
    pub end_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerPlanOutput {
    pub projected_balance: Money,
    pub total_employee_contributions: Money,
    pub total_employer_match: Money,
    pub total_growth: Money,
    /// First-year deferral times the marginal bracket.
    pub annual_tax_saving: Money,
    /// First-year match forfeited by deferring less than the cap.
    pub match_lost: Money,
    pub years: Vec<PlanYear>,
}

/// Employer match on one year's deferral.
pub fn employer_match(
    salary: Money,
    employee_contribution: Money,
    match_cap: Rate,
    match_multiplier: Rate,
) -> Money {
    employee_contribution.min(salary * match_cap) * match_multiplier
}

fn validate(input: &EmployerPlanInput) -> HouseholdFinanceResult<()> {
    if input.retirement_age <= input.current_age {
        return Err(HouseholdFinanceError::invalid(
            "retirement_age",
            "Retirement age must be after current age",
        ));
    }
    if input.annual_salary <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "annual_salary",
            "Salary must be positive",
        ));
    }
    if input.current_balance < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "current_balance",
            "Balance must not be negative",
        ));
    }
    for (field, pct) in [
        ("contribution_rate_percent", input.contribution_rate_percent),
        ("match_cap_percent", input.match_cap_percent),
        ("tax_bracket_percent", input.tax_bracket_percent),
    ] {
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return Err(HouseholdFinanceError::invalid(
                field,
                "Percentage must be between 0 and 100",
            ));
        }
    }
    if input.retirement_age - input.current_age > MAX_HORIZON_YEARS {
        return Err(HouseholdFinanceError::invalid(
            "retirement_age",
            format!("Plan horizon must not exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    require_non_negative_rate("salary_growth_percent", input.salary_growth_percent)?;
    require_non_negative_rate("annual_return_percent", input.annual_return_percent)?;
    require_non_negative_rate("match_multiplier_percent", input.match_multiplier_percent)?;
    Ok(())
}

/// Year-by-year plan balance until retirement.
///
/// Contributions and match land at the start of each year, then the whole
/// balance earns that year's return. Salary grows after each year.
pub fn project_employer_plan(
    input: &EmployerPlanInput,
) -> HouseholdFinanceResult<ComputationOutput<EmployerPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let deferral = percent_to_rate(input.contribution_rate_percent);
    let match_cap = percent_to_rate(input.match_cap_percent);
    let multiplier = percent_to_rate(input.match_multiplier_percent);
    let growth_rate = percent_to_rate(input.annual_return_percent);
    let raise = percent_to_rate(input.salary_growth_percent);

    let horizon = input.retirement_age - input.current_age;
    let mut salary = input.annual_salary;
    let mut balance = input.current_balance;
    let mut total_employee = Decimal::ZERO;
    let mut total_match = Decimal::ZERO;
    let mut years = Vec::with_capacity(horizon as usize);

    for year in 1..=horizon {
        let overflow = |what: &str| HouseholdFinanceError::NumericOverflow {
            context: format!("plan {what} in year {year}"),
        };
        let employee_contribution = salary * deferral;
        let match_amount = employer_match(salary, employee_contribution, match_cap, multiplier);
        let invested = balance
            .checked_add(employee_contribution)
            .and_then(|b| b.checked_add(match_amount))
            .ok_or_else(|| overflow("contributions"))?;
        let growth = invested
            .checked_mul(growth_rate)
            .ok_or_else(|| overflow("growth"))?;
        balance = invested
            .checked_add(growth)
            .ok_or_else(|| overflow("balance"))?;
        total_employee = total_employee
            .checked_add(employee_contribution)
            .ok_or_else(|| overflow("employee total"))?;
        total_match = total_match
            .checked_add(match_amount)
            .ok_or_else(|| overflow("match total"))?;

        years.push(PlanYear {
            year,
            age: input.current_age + year,
            salary,
            employee_contribution,
            employer_match: match_amount,
            growth,
            end_balance: balance,
        });
        salary = salary
            .checked_mul(Decimal::ONE + raise)
            .ok_or_else(|| overflow("salary"))?;
    }

    let first_deferral = input.annual_salary * deferral;
    let full_match_deferral = input.annual_salary * match_cap;
    let match_lost = if first_deferral < full_match_deferral {
        (full_match_deferral - first_deferral) * multiplier
    } else {
        Decimal::ZERO
    };
    if match_lost > Decimal::ZERO {
        warnings.push(format!(
            "Deferring {}% leaves employer match on the table; the cap is {}%",
            input.contribution_rate_percent, input.match_cap_percent
        ));
    }

    let output = EmployerPlanOutput {
        projected_balance: balance,
        total_employee_contributions: total_employee,
        total_employer_match: total_match,
        total_growth: balance - input.current_balance - total_employee - total_match,
        annual_tax_saving: first_deferral * percent_to_rate(input.tax_bracket_percent),
        match_lost,
        years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Employer plan projection (start-of-year contributions)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
