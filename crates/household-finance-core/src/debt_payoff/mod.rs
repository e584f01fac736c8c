pub mod credit_card;

pub use credit_card::{
    compare_strategies, months_to_payoff, simulate_payoff, CardPayoff, CreditCard, PayoffInput,
    PayoffMonth, PayoffResult, PayoffStrategy, StrategyComparison, StrategyOutcome,
    MAX_PAYOFF_MONTHS,
};
