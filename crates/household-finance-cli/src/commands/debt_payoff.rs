use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use household_finance_core::debt_payoff::{
    compare_strategies, months_to_payoff, simulate_payoff, PayoffInput, PayoffStrategy,
};

use super::amortization::strip_result_field;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Avalanche,
    Snowball,
    MinimumOnly,
}

impl From<StrategyArg> for PayoffStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Avalanche => PayoffStrategy::Avalanche,
            StrategyArg::Snowball => PayoffStrategy::Snowball,
            StrategyArg::MinimumOnly => PayoffStrategy::MinimumOnly,
        }
    }
}

/// Arguments for a multi-card payoff simulation
#[derive(Args)]
pub struct CardPayoffArgs {
    /// Path to JSON input file with the cards, budget and strategy
    #[arg(long)]
    pub input: Option<String>,

    /// Override the monthly budget from the input
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Override the strategy from the input
    #[arg(long, value_enum, conflicts_with = "compare")]
    pub strategy: Option<StrategyArg>,

    /// Run minimum-only, avalanche and snowball side by side
    #[arg(long)]
    pub compare: bool,

    /// Omit the month-by-month schedule from the output
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for the months needed to clear one balance
#[derive(Args)]
pub struct PayoffMonthsArgs {
    /// Outstanding balance
    #[arg(long)]
    pub balance: Decimal,

    /// Annual percentage rate
    #[arg(long)]
    pub apr: Decimal,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Decimal,
}

pub fn run_card_payoff(args: CardPayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut payoff_input: PayoffInput = input::request(args.input.as_deref())?
        .ok_or("card-payoff requires a JSON list of cards (--input or stdin)")?;
    if let Some(budget) = args.budget {
        payoff_input.monthly_budget = budget;
    }
    if let Some(strategy) = args.strategy {
        payoff_input.strategy = strategy.into();
    }

    if args.compare {
        return Ok(serde_json::to_value(compare_strategies(&payoff_input)?)?);
    }

    let result = simulate_payoff(&payoff_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_result_field(&mut value, "/result", "schedule");
    }
    Ok(value)
}

pub fn run_payoff_months(args: PayoffMonthsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let months = months_to_payoff(args.balance, args.apr, args.payment)?;
    Ok(json!({
        "balance": args.balance,
        "apr_percent": args.apr,
        "monthly_payment": args.payment,
        "months": months,
    }))
}
