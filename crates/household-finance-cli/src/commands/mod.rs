pub mod affordability;
pub mod amortization;
pub mod comparison;
pub mod debt_payoff;
pub mod growth;
pub mod retirement;
