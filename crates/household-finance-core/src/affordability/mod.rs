pub mod back_solve;
pub mod dti;

pub use back_solve::{
    solve_affordability_from_income, solve_affordable_price, AffordabilityInput,
    AffordabilityOutput, SolveStatus,
};
pub use dti::{max_payment_from_income, DtiConstraint, IncomeInput, PaymentCeiling};
