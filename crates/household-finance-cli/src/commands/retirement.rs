use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use household_finance_core::retirement::{
    ira_eligibility, project_employer_plan, EmployerPlanInput, FilingStatus, IraInput,
};

use super::amortization::strip_result_field;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilingStatusArg {
    Single,
    Joint,
    HeadOfHousehold,
    Separate,
}

impl From<FilingStatusArg> for FilingStatus {
    fn from(arg: FilingStatusArg) -> Self {
        match arg {
            FilingStatusArg::Single => FilingStatus::Single,
            FilingStatusArg::Joint => FilingStatus::MarriedFilingJointly,
            FilingStatusArg::HeadOfHousehold => FilingStatus::HeadOfHousehold,
            FilingStatusArg::Separate => FilingStatus::MarriedFilingSeparately,
        }
    }
}

/// Arguments for an employer retirement plan projection
#[derive(Args)]
pub struct EmployerPlanArgs {
    /// Current age
    #[arg(long)]
    pub age: Option<u32>,

    /// Retirement age
    #[arg(long)]
    pub retirement_age: Option<u32>,

    /// Annual salary
    #[arg(long)]
    pub salary: Option<Decimal>,

    /// Current plan balance
    #[arg(long, default_value = "0")]
    pub balance: Decimal,

    /// Employee deferral in percent of salary
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Annual salary growth in percent
    #[arg(long, default_value = "0")]
    pub salary_growth: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Salary percentage the employer matches up to
    #[arg(long, default_value = "0")]
    pub match_cap: Decimal,

    /// Employer dollars per employee dollar, in percent
    #[arg(long, default_value = "100")]
    pub match_multiplier: Decimal,

    /// Marginal tax bracket in percent
    #[arg(long, default_value = "0")]
    pub tax_bracket: Decimal,

    /// Omit the year-by-year rows from the output
    #[arg(long)]
    pub summary: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for IRA contribution eligibility
#[derive(Args)]
pub struct IraArgs {
    /// Age at the end of the tax year
    #[arg(long)]
    pub age: Option<u32>,

    /// Modified adjusted gross income
    #[arg(long)]
    pub magi: Option<Decimal>,

    /// Tax filing status
    #[arg(long, value_enum, default_value = "single")]
    pub filing_status: FilingStatusArg,

    /// Not covered by a workplace retirement plan
    #[arg(long)]
    pub not_covered: bool,

    /// Contribution you intend to make
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_employer_plan(args: EmployerPlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: EmployerPlanInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => EmployerPlanInput {
            current_age: args.age.ok_or("--age is required (or provide --input)")?,
            retirement_age: args
                .retirement_age
                .ok_or("--retirement-age is required (or provide --input)")?,
            annual_salary: args.salary.ok_or("--salary is required (or provide --input)")?,
            current_balance: args.balance,
            contribution_rate_percent: args
                .contribution
                .ok_or("--contribution is required (or provide --input)")?,
            salary_growth_percent: args.salary_growth,
            annual_return_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            match_cap_percent: args.match_cap,
            match_multiplier_percent: args.match_multiplier,
            tax_bracket_percent: args.tax_bracket,
        },
    };

    let result = project_employer_plan(&plan_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_result_field(&mut value, "/result", "years");
    }
    Ok(value)
}

pub fn run_ira(args: IraArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ira_input: IraInput = match input::request(args.input.as_deref())? {
        Some(request) => request,
        None => IraInput {
            age: args.age.ok_or("--age is required (or provide --input)")?,
            magi: args.magi.ok_or("--magi is required (or provide --input)")?,
            filing_status: args.filing_status.into(),
            covered_by_workplace_plan: !args.not_covered,
            desired_contribution: args.contribution,
        },
    };

    let result = ira_eligibility(&ira_input)?;
    Ok(serde_json::to_value(result)?)
}
