mod commands;
mod config;
mod input;
mod output;
mod rates;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::affordability::AffordArgs;
use commands::amortization::{AmortizeArgs, AutoLoanArgs, BreakdownArgs};
use commands::comparison::CompareArgs;
use commands::debt_payoff::{CardPayoffArgs, PayoffMonthsArgs};
use commands::growth::{GoalContributionArgs, GrowArgs, TimeToGoalArgs};
use commands::retirement::{EmployerPlanArgs, IraArgs};
use config::{HfcConfig, LogLevel};

/// Household finance calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "hfc",
    version,
    about = "Household finance calculations with decimal precision",
    long_about = "A CLI for everyday money questions: loan schedules, monthly housing \
                  costs, how much house you can afford, savings growth and goals, \
                  refinancing, credit card payoff and retirement contributions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to an hfc.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed-rate loan payment and amortization schedule
    Amortize(AmortizeArgs),
    /// Monthly housing cost (principal, interest, tax, insurance, HOA, PMI)
    Breakdown(BreakdownArgs),
    /// Vehicle purchase financing
    AutoLoan(AutoLoanArgs),
    /// Maximum affordable home price for a payment or income
    Afford(AffordArgs),
    /// Project savings growth with regular contributions
    Grow(GrowArgs),
    /// Contribution needed to reach a savings goal
    GoalContribution(GoalContributionArgs),
    /// Time needed to reach a savings goal
    TimeToGoal(TimeToGoalArgs),
    /// Compare a current loan against a replacement
    Compare(CompareArgs),
    /// Simulate paying down several credit cards
    CardPayoff(CardPayoffArgs),
    /// Months to clear a single balance at a fixed payment
    PayoffMonths(PayoffMonthsArgs),
    /// Project an employer retirement plan with matching
    EmployerPlan(EmployerPlanArgs),
    /// IRA contribution limit, Roth eligibility and deductibility
    Ira(IraArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let config = HfcConfig::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    init_tracing(level.as_filter_str());
    tracing::debug!(
        periods_per_year = config.periods_per_year,
        fallback_rate = %config.rates.fallback_annual_rate_percent,
        "configuration loaded"
    );

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args, &config),
        Commands::Breakdown(args) => commands::amortization::run_breakdown(args, &config),
        Commands::AutoLoan(args) => commands::amortization::run_auto_loan(args, &config),
        Commands::Afford(args) => commands::affordability::run_afford(args, &config),
        Commands::Grow(args) => commands::growth::run_grow(args, &config),
        Commands::GoalContribution(args) => commands::growth::run_goal_contribution(args, &config),
        Commands::TimeToGoal(args) => commands::growth::run_time_to_goal(args, &config),
        Commands::Compare(args) => commands::comparison::run_compare(args, &config),
        Commands::CardPayoff(args) => commands::debt_payoff::run_card_payoff(args),
        Commands::PayoffMonths(args) => commands::debt_payoff::run_payoff_months(args),
        Commands::EmployerPlan(args) => commands::retirement::run_employer_plan(args),
        Commands::Ira(args) => commands::retirement::run_ira(args),
        Commands::Version => {
            println!("hfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => output::format_output(&cli.output, &value),
        Err(e) => fail(e),
    }
}
