pub mod refinance;

pub use refinance::{break_even_periods, compare_loans, BreakEven, ComparisonInput, ComparisonResult};
