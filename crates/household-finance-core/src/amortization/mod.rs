pub mod auto_loan;
pub mod breakdown;
pub mod loan;
pub mod schedule;

pub use breakdown::PaymentBreakdown;
pub use loan::{amortize, compute_periodic_payment, AmortizationInput, AmortizationResult};
pub use schedule::{build_schedule, LumpSumPayment, ScheduleOptions, ScheduleRow};
