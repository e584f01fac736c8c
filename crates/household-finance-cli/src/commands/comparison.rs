use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use household_finance_core::comparison::{compare_loans, ComparisonInput};
use household_finance_core::LoanTerms;

use crate::config::HfcConfig;
use crate::input;
use crate::rates::resolve_rate;

/// Arguments for comparing a current loan against a replacement
#[derive(Args)]
pub struct CompareArgs {
    /// Remaining principal on the current loan
    #[arg(long)]
    pub current_principal: Option<Decimal>,

    /// Current annual rate in percent
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Remaining periods on the current loan
    #[arg(long)]
    pub current_term: Option<u32>,

    /// Replacement principal (defaults to the current principal)
    #[arg(long)]
    pub new_principal: Option<Decimal>,

    /// Replacement annual rate in percent; live or configured rate if omitted
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Replacement term in periods
    #[arg(long)]
    pub new_term: Option<u32>,

    /// One-time cost of switching
    #[arg(long, default_value = "0")]
    pub switching_cost: Decimal,

    /// Payments per year for both loans (defaults to the configured value)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs, config: &HfcConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: ComparisonInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => {
            let periods_per_year = args.periods_per_year.unwrap_or(config.periods_per_year);
            let current_principal = args
                .current_principal
                .ok_or("--current-principal is required (or provide --input)")?;
            ComparisonInput {
                current: LoanTerms {
                    principal: current_principal,
                    annual_rate_percent: args
                        .current_rate
                        .ok_or("--current-rate is required (or provide --input)")?,
                    term_periods: args
                        .current_term
                        .ok_or("--current-term is required (or provide --input)")?,
                    periods_per_year,
                },
                replacement: LoanTerms {
                    principal: args.new_principal.unwrap_or(current_principal),
                    annual_rate_percent: resolve_rate(args.new_rate, &config.rates)?,
                    term_periods: args
                        .new_term
                        .ok_or("--new-term is required (or provide --input)")?,
                    periods_per_year,
                },
                switching_cost: args.switching_cost,
            }
        }
    };

    let result = compare_loans(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
