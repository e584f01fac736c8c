pub mod error;
pub mod rate_source;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "growth")]
pub mod growth;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "debt_payoff")]
pub mod debt_payoff;

#[cfg(feature = "retirement")]
pub mod retirement;

pub use error::HouseholdFinanceError;
pub use types::*;

/// Standard result type for all household-finance operations
pub type HouseholdFinanceResult<T> = Result<T, HouseholdFinanceError>;
