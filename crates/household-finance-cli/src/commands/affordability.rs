use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use household_finance_core::affordability::back_solve::IncomeAffordabilityInput;
use household_finance_core::affordability::{
    solve_affordability_from_income, solve_affordable_price, AffordabilityInput, IncomeInput,
};

use crate::config::HfcConfig;
use crate::input;
use crate::rates::resolve_rate;

/// Arguments for the maximum affordable home price
#[derive(Args)]
pub struct AffordArgs {
    /// Ceiling on the total monthly housing payment
    #[arg(long, conflicts_with = "income")]
    pub max_payment: Option<Decimal>,

    /// Gross annual income; the payment ceiling comes from debt-to-income ratios
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Existing monthly debt payments (with --income)
    #[arg(long, default_value = "0")]
    pub debts: Decimal,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down: Decimal,

    /// Annual mortgage rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Annual property tax rate in percent of price
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Annual homeowner's insurance premium
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Path to JSON input file; an "income" object selects the income-based solve
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_afford(args: AffordArgs, config: &HfcConfig) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(request) = input::request::<Value>(args.input.as_deref())? {
        return if request.get("income").is_some() {
            let income_input: IncomeAffordabilityInput = serde_json::from_value(request)?;
            Ok(serde_json::to_value(solve_affordability_from_income(&income_input)?)?)
        } else {
            let afford_input: AffordabilityInput = serde_json::from_value(request)?;
            Ok(serde_json::to_value(solve_affordable_price(&afford_input)?)?)
        };
    }

    let annual_rate_percent = resolve_rate(args.rate, &config.rates)?;

    if let Some(annual_income) = args.income {
        let income_input = IncomeAffordabilityInput {
            income: IncomeInput {
                annual_income,
                monthly_debts: args.debts,
                front_end_ratio_percent: Some(config.affordability.front_end_ratio_percent),
                back_end_ratio_percent: Some(config.affordability.back_end_ratio_percent),
            },
            down_payment: args.down,
            annual_rate_percent,
            term_years: args.years,
            annual_tax_rate_percent: args.tax_rate,
            annual_insurance: args.insurance,
            monthly_hoa: args.hoa,
        };
        return Ok(serde_json::to_value(solve_affordability_from_income(
            &income_input,
        )?)?);
    }

    let afford_input = AffordabilityInput {
        max_monthly_payment: args
            .max_payment
            .ok_or("--max-payment or --income is required (or provide --input)")?,
        down_payment: args.down,
        annual_rate_percent,
        term_years: args.years,
        annual_tax_rate_percent: args.tax_rate,
        annual_insurance: args.insurance,
        monthly_hoa: args.hoa,
    };
    let result = solve_affordable_price(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
