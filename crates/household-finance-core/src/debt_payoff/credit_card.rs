//! Multi-card payoff simulation under a fixed monthly budget.
//!
//! Every month each open card accrues `balance * APR / 12` and receives its
//! minimum payment. Whatever budget remains goes to open cards in strategy
//! order until it runs out.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::debug;

use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::types::*;
use crate::HouseholdFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Failsafe horizon (50 years).
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// Lowest minimum payment a card will ask for.
pub const MINIMUM_PAYMENT_FLOOR: Money = dec!(25);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub name: String,
    pub balance: Money,
    pub apr_percent: Percent,
    /// Flat minimum payment.
    #[serde(default)]
    pub min_payment: Money,
    /// Minimum payment as a percentage of the starting balance.
    #[serde(default)]
    pub min_payment_percent: Percent,
}

impl CreditCard {
    /// Greater of the flat minimum, the percentage minimum and the floor.
    pub fn minimum_payment(&self) -> Money {
        self.min_payment
            .max(self.balance * percent_to_rate(self.min_payment_percent))
            .max(MINIMUM_PAYMENT_FLOOR)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffStrategy {
    /// Extra budget to the highest APR first.
    #[default]
    Avalanche,
    /// Extra budget to the lowest balance first.
    Snowball,
    /// Minimum payments only; the budget is ignored.
    MinimumOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub cards: Vec<CreditCard>,
    #[serde(default)]
    pub monthly_budget: Money,
    /// Ignored by `compare_strategies`.
    #[serde(default)]
    pub strategy: PayoffStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Combined balance across all cards after this month.
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayoff {
    pub name: String,
    /// 1-based position in the order cards were cleared.
    pub order: u32,
    pub month_cleared: u32,
    pub interest_paid: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffResult {
    pub strategy: PayoffStrategy,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub schedule: Vec<PayoffMonth>,
    pub payoff_order: Vec<CardPayoff>,
}

/// Headline figures of one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub strategy: PayoffStrategy,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl From<&PayoffResult> for StrategyOutcome {
    fn from(result: &PayoffResult) -> Self {
        Self {
            strategy: result.strategy,
            months: result.months,
            total_interest: result.total_interest,
            total_paid: result.total_paid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// `None` when minimum payments never clear the cards.
    pub minimum_only: Option<StrategyOutcome>,
    pub avalanche: StrategyOutcome,
    pub snowball: StrategyOutcome,
    /// Lower total interest wins, then fewer months, then avalanche.
    pub best_strategy: PayoffStrategy,
    /// Minimum-only interest less the best strategy's interest.
    pub interest_saved_vs_minimum: Option<Money>,
    pub months_saved_vs_minimum: Option<u32>,
}

struct Account {
    index: usize,
    balance: Money,
    apr: Percent,
    monthly_rate: Rate,
    minimum: Money,
    interest_paid: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

fn strategy_order(strategy: PayoffStrategy, a: &Account, b: &Account) -> Ordering {
    match strategy {
        PayoffStrategy::Avalanche => b
            .apr
            .cmp(&a.apr)
            .then(a.balance.cmp(&b.balance))
            .then(a.index.cmp(&b.index)),
        PayoffStrategy::Snowball => a
            .balance
            .cmp(&b.balance)
            .then(b.apr.cmp(&a.apr))
            .then(a.index.cmp(&b.index)),
        PayoffStrategy::MinimumOnly => a.index.cmp(&b.index),
    }
}

/// Month-by-month simulation. Returns the schedule plus the month each
/// account was cleared, indexed like `accounts`.
fn run_payoff(
    accounts: &mut [Account],
    budget: Money,
    strategy: PayoffStrategy,
) -> HouseholdFinanceResult<(Vec<PayoffMonth>, Vec<Option<u32>>)> {
    let mut schedule = Vec::new();
    let mut cleared: Vec<Option<u32>> = accounts
        .iter()
        .map(|a| (a.balance <= Decimal::ZERO).then_some(0))
        .collect();
    let mut outstanding: Money = accounts.iter().map(|a| a.balance).sum();

    let mut month = 0u32;
    while outstanding > Decimal::ZERO {
        month += 1;
        if month > MAX_PAYOFF_MONTHS {
            let (payment, interest) = schedule
                .last()
                .map_or((Decimal::ZERO, Decimal::ZERO), |m: &PayoffMonth| {
                    (m.payment, m.interest)
                });
            return Err(HouseholdFinanceError::NeverAmortizes {
                period: MAX_PAYOFF_MONTHS,
                payment,
                interest,
            });
        }

        let mut remaining = budget;
        let mut payment = Decimal::ZERO;
        let mut interest = Decimal::ZERO;

        for account in accounts.iter_mut().filter(|a| a.balance > Decimal::ZERO) {
            let accrued = account.balance * account.monthly_rate;
            let due = (account.balance + accrued).min(account.minimum);
            account.balance = account.balance + accrued - due;
            account.interest_paid += accrued;
            interest += accrued;
            payment += due;
            remaining -= due;
        }

        if strategy != PayoffStrategy::MinimumOnly && remaining > Decimal::ZERO {
            let mut order: Vec<usize> = (0..accounts.len())
                .filter(|&i| accounts[i].balance > Decimal::ZERO)
                .collect();
            order.sort_by(|&x, &y| strategy_order(strategy, &accounts[x], &accounts[y]));
            for i in order {
                if remaining <= Decimal::ZERO {
                    break;
                }
                let extra = accounts[i].balance.min(remaining);
                accounts[i].balance -= extra;
                payment += extra;
                remaining -= extra;
            }
        }

        let balance: Money = accounts.iter().map(|a| a.balance.max(Decimal::ZERO)).sum();
        if balance >= outstanding {
            return Err(HouseholdFinanceError::NeverAmortizes {
                period: month,
                payment,
                interest,
            });
        }

        for (slot, account) in cleared.iter_mut().zip(accounts.iter()) {
            if slot.is_none() && account.balance <= Decimal::ZERO {
                *slot = Some(month);
            }
        }

        schedule.push(PayoffMonth {
            month,
            payment,
            principal: payment - interest,
            interest,
            balance,
        });
        outstanding = balance;
    }

    debug!(months = month, ?strategy, "credit card payoff simulated");
    Ok((schedule, cleared))
}

fn validate_cards(cards: &[CreditCard]) -> HouseholdFinanceResult<()> {
    if cards.is_empty() {
        return Err(HouseholdFinanceError::invalid(
            "cards",
            "At least one card is required",
        ));
    }
    for card in cards {
        if card.balance < Decimal::ZERO {
            return Err(HouseholdFinanceError::invalid(
                "balance",
                format!("{}: balance must not be negative", card.name),
            ));
        }
        if card.min_payment < Decimal::ZERO || card.min_payment_percent < Decimal::ZERO {
            return Err(HouseholdFinanceError::invalid(
                "min_payment",
                format!("{}: minimum payment must not be negative", card.name),
            ));
        }
        require_non_negative_rate("apr_percent", card.apr_percent)?;
    }
    Ok(())
}

fn payoff_with(
    input: &PayoffInput,
    strategy: PayoffStrategy,
) -> HouseholdFinanceResult<PayoffResult> {
    let mut accounts: Vec<Account> = input
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| Account {
            index,
            balance: card.balance,
            apr: card.apr_percent,
            monthly_rate: periodic_rate(card.apr_percent, MONTHS_PER_YEAR),
            minimum: card.minimum_payment(),
            interest_paid: Decimal::ZERO,
        })
        .collect();

    let minimums: Money = accounts
        .iter()
        .filter(|a| a.balance > Decimal::ZERO)
        .map(|a| a.minimum)
        .sum();
    let budget = match strategy {
        PayoffStrategy::MinimumOnly => minimums,
        _ if input.monthly_budget < minimums => {
            return Err(HouseholdFinanceError::invalid(
                "monthly_budget",
                format!(
                    "Budget {} is below the combined minimum payments {}",
                    input.monthly_budget, minimums
                ),
            ));
        }
        _ => input.monthly_budget,
    };

    let (schedule, cleared) = run_payoff(&mut accounts, budget, strategy)?;

    let mut payoff_order: Vec<CardPayoff> = cleared
        .iter()
        .zip(accounts.iter())
        .filter_map(|(month, account)| {
            month.map(|m| CardPayoff {
                name: input.cards[account.index].name.clone(),
                order: 0,
                month_cleared: m,
                interest_paid: account.interest_paid,
            })
        })
        .collect();
    payoff_order.sort_by_key(|c| c.month_cleared);
    for (i, card) in payoff_order.iter_mut().enumerate() {
        card.order = i as u32 + 1;
    }

    let total_interest: Money = schedule.iter().map(|m| m.interest).sum();
    let total_paid: Money = schedule.iter().map(|m| m.payment).sum();

    Ok(PayoffResult {
        strategy,
        months: schedule.len() as u32,
        total_interest,
        total_paid,
        schedule,
        payoff_order,
    })
}

/// Pay down a set of cards with the chosen strategy.
pub fn simulate_payoff(
    input: &PayoffInput,
) -> HouseholdFinanceResult<ComputationOutput<PayoffResult>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_cards(&input.cards)?;
    let output = payoff_with(input, input.strategy)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Credit card payoff simulation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Run minimum-only, avalanche and snowball on the same cards and budget.
///
/// The budget must cover the combined minimums. A minimum-only run that
/// never clears the cards is reported as `None` with a warning rather than
/// failing the comparison.
pub fn compare_strategies(
    input: &PayoffInput,
) -> HouseholdFinanceResult<ComputationOutput<StrategyComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cards(&input.cards)?;

    let avalanche = StrategyOutcome::from(&payoff_with(input, PayoffStrategy::Avalanche)?);
    let snowball = StrategyOutcome::from(&payoff_with(input, PayoffStrategy::Snowball)?);
    let minimum_only = match payoff_with(input, PayoffStrategy::MinimumOnly) {
        Ok(result) => Some(StrategyOutcome::from(&result)),
        Err(HouseholdFinanceError::NeverAmortizes { period, .. }) => {
            warnings.push(format!(
                "Minimum payments alone do not clear the cards (stalled at month {period})"
            ));
            None
        }
        Err(e) => return Err(e),
    };

    let best = match avalanche
        .total_interest
        .cmp(&snowball.total_interest)
        .then(avalanche.months.cmp(&snowball.months))
    {
        Ordering::Greater => &snowball,
        _ => &avalanche,
    };
    let interest_saved_vs_minimum = minimum_only
        .as_ref()
        .map(|m| m.total_interest - best.total_interest);
    let months_saved_vs_minimum = minimum_only
        .as_ref()
        .map(|m| m.months.saturating_sub(best.months));

    debug!(
        best = ?best.strategy,
        interest_saved = ?interest_saved_vs_minimum,
        "payoff strategies compared"
    );

    let output = StrategyComparison {
        best_strategy: best.strategy,
        interest_saved_vs_minimum,
        months_saved_vs_minimum,
        minimum_only,
        avalanche,
        snowball,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Credit card payoff strategy comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Months to clear a single balance with a fixed monthly payment.
pub fn months_to_payoff(
    balance: Money,
    apr_percent: Percent,
    monthly_payment: Money,
) -> HouseholdFinanceResult<u32> {
    if balance < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "balance",
            "Balance must not be negative",
        ));
    }
    if monthly_payment <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "monthly_payment",
            "Payment must be positive",
        ));
    }
    require_non_negative_rate("apr_percent", apr_percent)?;

    let mut accounts = [Account {
        index: 0,
        balance,
        apr: apr_percent,
        monthly_rate: periodic_rate(apr_percent, MONTHS_PER_YEAR),
        minimum: monthly_payment,
        interest_paid: Decimal::ZERO,
    }];
    let (schedule, _) = run_payoff(&mut accounts, monthly_payment, PayoffStrategy::MinimumOnly)?;
    Ok(schedule.len() as u32)
}
