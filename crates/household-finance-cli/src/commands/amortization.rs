use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use household_finance_core::amortization::auto_loan::{finance_vehicle, AutoLoanInput};
use household_finance_core::amortization::breakdown::{monthly_payment_breakdown, HousingCostInput};
use household_finance_core::amortization::{amortize, AmortizationInput, LumpSumPayment};
use household_finance_core::LoanTerms;

use crate::config::HfcConfig;
use crate::input;
use crate::rates::resolve_rate;

/// Arguments for a fixed-rate loan schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate in percent (6.5 = 6.5%); live or configured rate if omitted
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of payment periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Payments per year (defaults to the configured value)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Extra principal paid every period
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Period of a one-time lump sum payment
    #[arg(long, requires = "lump_sum_amount")]
    pub lump_sum_period: Option<u32>,

    /// Amount of the one-time lump sum payment
    #[arg(long, requires = "lump_sum_period")]
    pub lump_sum_amount: Option<Decimal>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// Upfront origination fee in percent of principal (1 = 1 point)
    #[arg(long, default_value = "0")]
    pub origination_fee: Decimal,

    /// Omit the period-by-period schedule from the output
    #[arg(long)]
    pub summary: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a monthly PITI breakdown
#[derive(Args)]
pub struct BreakdownArgs {
    /// Home purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

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

    /// Annual PMI rate in percent of the loan (defaults to the configured value)
    #[arg(long)]
    pub pmi_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for vehicle financing
#[derive(Args)]
pub struct AutoLoanArgs {
    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cash down payment
    #[arg(long, default_value = "0")]
    pub down: Decimal,

    /// Trade-in value
    #[arg(long, default_value = "0")]
    pub trade_in: Decimal,

    /// Sales tax rate in percent
    #[arg(long, default_value = "0")]
    pub sales_tax: Decimal,

    /// Dealer, title and registration fees
    #[arg(long, default_value = "0")]
    pub fees: Decimal,

    /// Annual loan rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, default_value = "60")]
    pub months: u32,

    /// Omit the payment schedule from the output
    #[arg(long)]
    pub summary: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Drop a bulky array from the result object.
pub(crate) fn strip_result_field(value: &mut Value, pointer: &str, field: &str) {
    if let Some(Value::Object(map)) = value.pointer_mut(pointer) {
        map.remove(field);
    }
}

pub fn run_amortize(
    args: AmortizeArgs,
    config: &HfcConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => {
            let terms = LoanTerms {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: resolve_rate(args.rate, &config.rates)?,
                term_periods: args.term.ok_or("--term is required (or provide --input)")?,
                periods_per_year: args.periods_per_year.unwrap_or(config.periods_per_year),
            };
            AmortizationInput {
                terms,
                extra_per_period: args.extra.unwrap_or(Decimal::ZERO),
                lump_sum: args
                    .lump_sum_period
                    .zip(args.lump_sum_amount)
                    .map(|(period, amount)| LumpSumPayment { period, amount }),
                first_payment_date: args.first_payment_date,
                origination_fee_percent: args.origination_fee,
            }
        }
    };

    let result = amortize(&amort_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_result_field(&mut value, "/result", "schedule");
    }
    Ok(value)
}

pub fn run_breakdown(
    args: BreakdownArgs,
    config: &HfcConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let housing_input: HousingCostInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => HousingCostInput {
            home_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down,
            annual_rate_percent: resolve_rate(args.rate, &config.rates)?,
            term_years: args.years,
            annual_tax_rate_percent: args.tax_rate,
            annual_insurance: args.insurance,
            monthly_hoa: args.hoa,
            pmi_rate_percent: Some(args.pmi_rate.unwrap_or(config.mortgage.pmi_rate_percent)),
        },
    };

    let result = monthly_payment_breakdown(&housing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_auto_loan(
    args: AutoLoanArgs,
    config: &HfcConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let auto_input: AutoLoanInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => AutoLoanInput {
            vehicle_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down,
            trade_in_value: args.trade_in,
            sales_tax_rate_percent: args.sales_tax,
            fees: args.fees,
            annual_rate_percent: resolve_rate(args.rate, &config.rates)?,
            term_months: args.months,
        },
    };

    let result = finance_vehicle(&auto_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_result_field(&mut value, "/result/loan", "schedule");
    }
    Ok(value)
}
