use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use household_finance_core::growth::{
    project_growth, solve_contribution_for_goal, solve_time_to_goal, GoalContributionInput,
    GrowthInput, TimeToGoalInput,
};

use super::amortization::strip_result_field;
use crate::config::HfcConfig;
use crate::input;

/// Arguments for a savings growth projection
#[derive(Args)]
pub struct GrowArgs {
    /// Starting balance
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Contribution made at the start of every period
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding periods per year (defaults to the configured value)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Annual inflation in percent for the real balance
    #[arg(long, default_value = "0")]
    pub inflation: Decimal,

    /// Omit the period-by-period rows from the output
    #[arg(long)]
    pub summary: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the contribution needed to reach a goal
#[derive(Args)]
pub struct GoalContributionArgs {
    /// Starting balance
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Target balance
    #[arg(long)]
    pub goal: Option<Decimal>,

    /// Contribution periods per year (defaults to the configured value)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the time needed to reach a goal
#[derive(Args)]
pub struct TimeToGoalArgs {
    /// Starting balance
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Contribution made at the start of every period
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Target balance in today's money
    #[arg(long)]
    pub goal: Option<Decimal>,

    /// Contribution periods per year (defaults to the configured value)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Annual inflation in percent
    #[arg(long, default_value = "0")]
    pub inflation: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_grow(args: GrowArgs, config: &HfcConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: GrowthInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => GrowthInput {
            initial: args.initial,
            periodic_contribution: args.contribution,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            periods_per_year: args.periods_per_year.unwrap_or(config.periods_per_year),
            annual_inflation_percent: args.inflation,
        },
    };

    let result = project_growth(&growth_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_result_field(&mut value, "/result", "periods");
    }
    Ok(value)
}

pub fn run_goal_contribution(
    args: GoalContributionArgs,
    config: &HfcConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: GoalContributionInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => GoalContributionInput {
            initial: args.initial,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            goal: args.goal.ok_or("--goal is required (or provide --input)")?,
            periods_per_year: args.periods_per_year.unwrap_or(config.periods_per_year),
        },
    };

    let result = solve_contribution_for_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_time_to_goal(
    args: TimeToGoalArgs,
    config: &HfcConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: TimeToGoalInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => TimeToGoalInput {
            initial: args.initial,
            periodic_contribution: args.contribution,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            goal: args.goal.ok_or("--goal is required (or provide --input)")?,
            periods_per_year: args.periods_per_year.unwrap_or(config.periods_per_year),
            annual_inflation_percent: args.inflation,
        },
    };

    let result = solve_time_to_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}
