//! Current loan vs. replacement loan: per-period savings and payback.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::validate_terms;
use crate::amortization::{amortize, AmortizationInput, AmortizationResult};
use crate::error::HouseholdFinanceError;
use crate::types::*;
use crate::HouseholdFinanceResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub current: LoanTerms,
    pub replacement: LoanTerms,
    /// One-time cost of switching (closing costs, points, fees).
    #[serde(default)]
    pub switching_cost: Money,
}

/// When up-front costs are recovered by per-period savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum BreakEven {
    /// Recovered after `periods` payments (always at least 1).
    Periods { periods: u32 },
    /// The replacement payment is not lower, so savings never accrue.
    NoBreakEven,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current_payment: Money,
    pub new_payment: Money,
    /// `current_payment - new_payment`; positive means savings.
    pub monthly_delta: Money,
    pub break_even: BreakEven,
    pub current_total_interest: Money,
    pub new_total_interest: Money,
    /// `current_total_interest - new_total_interest`.
    pub interest_delta: Money,
    /// Current total paid minus (new total paid + switching cost).
    pub net_lifetime_savings: Money,
}

/// Payback period for `cost` at `delta` saved per period.
pub fn break_even_periods(cost: Money, delta: Money) -> BreakEven {
    if delta <= Decimal::ZERO {
        return BreakEven::NoBreakEven;
    }
    let periods = (cost.max(Decimal::ZERO) / delta)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX)
        .max(1);
    BreakEven::Periods { periods }
}

fn amortize_terms(
    terms: &LoanTerms,
    warnings: &mut Vec<String>,
) -> HouseholdFinanceResult<AmortizationResult> {
    let out = amortize(&AmortizationInput::new(terms.clone()))?;
    warnings.extend(out.warnings);
    Ok(out.result)
}

/// Compare two amortized loans plus a one-time switching cost.
pub fn compare_loans(
    input: &ComparisonInput,
) -> HouseholdFinanceResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(&input.current)?;
    validate_terms(&input.replacement)?;
    if input.current.periods_per_year != input.replacement.periods_per_year {
        return Err(HouseholdFinanceError::invalid(
            "periods_per_year",
            "Both loans must use the same payment frequency",
        ));
    }
    if input.switching_cost < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "switching_cost",
            "Switching cost must not be negative",
        ));
    }

    let current = amortize_terms(&input.current, &mut warnings)?;
    let replacement = amortize_terms(&input.replacement, &mut warnings)?;

    let monthly_delta = current.periodic_payment - replacement.periodic_payment;
    let break_even = break_even_periods(input.switching_cost, monthly_delta);
    if break_even == BreakEven::NoBreakEven {
        warnings.push(
            "New payment is not lower; compare lifetime totals instead of a payback period".into(),
        );
    }

    let output = ComparisonResult {
        current_payment: current.periodic_payment,
        new_payment: replacement.periodic_payment,
        monthly_delta,
        break_even,
        current_total_interest: current.total_interest,
        new_total_interest: replacement.total_interest,
        interest_delta: current.total_interest - replacement.total_interest,
        net_lifetime_savings: current.total_paid
            - (replacement.total_paid + input.switching_cost),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan comparison with break-even on switching cost",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_break_even_rounds_up() {
        assert_eq!(
            break_even_periods(dec!(5000), dec!(150)),
            BreakEven::Periods { periods: 34 }
        );
    }

    #[test]
    fn test_break_even_free_switch_is_one_period() {
        assert_eq!(
            break_even_periods(Decimal::ZERO, dec!(10)),
            BreakEven::Periods { periods: 1 }
        );
    }

    #[test]
    fn test_no_break_even_when_payment_rises() {
        assert_eq!(break_even_periods(dec!(5000), dec!(-1)), BreakEven::NoBreakEven);
        assert_eq!(break_even_periods(dec!(5000), Decimal::ZERO), BreakEven::NoBreakEven);
    }

    #[test]
    fn test_shorter_term_has_no_break_even() {
        let input = ComparisonInput {
            current: LoanTerms::monthly(dec!(300000), dec!(6.5), 300),
            replacement: LoanTerms::monthly(dec!(300000), dec!(5.5), 180),
            switching_cost: dec!(5000),
        };
        let out = compare_loans(&input).unwrap();
        let r = &out.result;
        assert!(r.monthly_delta < Decimal::ZERO);
        assert_eq!(r.break_even, BreakEven::NoBreakEven);
        assert!(r.interest_delta > Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_rate_drop_same_term() {
        let input = ComparisonInput {
            current: LoanTerms::monthly(dec!(200000), dec!(7), 360),
            replacement: LoanTerms::monthly(dec!(200000), dec!(6), 360),
            switching_cost: dec!(4000),
        };
        let r = compare_loans(&input).unwrap().result;
        assert!(r.monthly_delta > Decimal::ZERO);
        assert!(matches!(r.break_even, BreakEven::Periods { periods } if periods >= 1));
        assert!(r.net_lifetime_savings > Decimal::ZERO);
    }

    #[test]
    fn test_mismatched_frequency_rejected() {
        let mut replacement = LoanTerms::monthly(dec!(200000), dec!(6), 360);
        replacement.periods_per_year = 26;
        let input = ComparisonInput {
            current: LoanTerms::monthly(dec!(200000), dec!(7), 360),
            replacement,
            switching_cost: Decimal::ZERO,
        };
        assert!(compare_loans(&input).is_err());
    }
}
