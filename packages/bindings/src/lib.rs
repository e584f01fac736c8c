use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use household_finance_core::{
    affordability, amortization, comparison, debt_payoff, growth, retirement,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the request, run `op`, serialize whatever it returns.
fn call<I, O, E>(input_json: &str, op: impl FnOnce(&I) -> Result<O, E>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
    E: std::fmt::Display,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = op(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    call(&input_json, amortization::amortize)
}

#[napi]
pub fn payment_breakdown(input_json: String) -> NapiResult<String> {
    call(&input_json, amortization::breakdown::monthly_payment_breakdown)
}

#[napi]
pub fn auto_loan(input_json: String) -> NapiResult<String> {
    call(&input_json, amortization::auto_loan::finance_vehicle)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn affordable_price(input_json: String) -> NapiResult<String> {
    call(&input_json, affordability::solve_affordable_price)
}

#[napi]
pub fn affordable_price_from_income(input_json: String) -> NapiResult<String> {
    call(&input_json, affordability::solve_affordability_from_income)
}

#[napi]
pub fn max_payment_from_income(input_json: String) -> NapiResult<String> {
    call(&input_json, affordability::max_payment_from_income)
}

// ---------------------------------------------------------------------------
// Savings growth
// ---------------------------------------------------------------------------

#[napi]
pub fn project_growth(input_json: String) -> NapiResult<String> {
    call(&input_json, growth::project_growth)
}

#[napi]
pub fn goal_contribution(input_json: String) -> NapiResult<String> {
    call(&input_json, growth::solve_contribution_for_goal)
}

#[napi]
pub fn time_to_goal(input_json: String) -> NapiResult<String> {
    call(&input_json, growth::solve_time_to_goal)
}

// ---------------------------------------------------------------------------
// Loan comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    call(&input_json, comparison::compare_loans)
}

// ---------------------------------------------------------------------------
// Debt payoff
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PayoffMonthsRequest {
    balance: Decimal,
    apr_percent: Decimal,
    monthly_payment: Decimal,
}

#[napi]
pub fn card_payoff(input_json: String) -> NapiResult<String> {
    call(&input_json, debt_payoff::simulate_payoff)
}

#[napi]
pub fn compare_payoff_strategies(input_json: String) -> NapiResult<String> {
    call(&input_json, debt_payoff::compare_strategies)
}

#[napi]
pub fn payoff_months(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: &PayoffMonthsRequest| {
        debt_payoff::months_to_payoff(req.balance, req.apr_percent, req.monthly_payment)
    })
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[napi]
pub fn employer_plan(input_json: String) -> NapiResult<String> {
    call(&input_json, retirement::project_employer_plan)
}

#[napi]
pub fn ira_eligibility(input_json: String) -> NapiResult<String> {
    call(&input_json, retirement::ira_eligibility)
}
