use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use super::schedule::{build_schedule, LumpSumPayment, ScheduleOptions, ScheduleRow};
use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::time_value::level_payment;
use crate::types::*;
use crate::HouseholdFinanceResult;

/// Input for a fixed-rate amortization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub terms: LoanTerms,
    /// Additional principal paid every period on top of the level payment.
    #[serde(default)]
    pub extra_per_period: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lump_sum: Option<LumpSumPayment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
    /// Upfront fee as a percentage of principal, paid at closing.
    #[serde(default)]
    pub origination_fee_percent: Percent,
}

impl AmortizationInput {
    pub fn new(terms: LoanTerms) -> Self {
        Self {
            terms,
            extra_per_period: Decimal::ZERO,
            lump_sum: None,
            first_payment_date: None,
            origination_fee_percent: Decimal::ZERO,
        }
    }
}

/// Output of `amortize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Level payment excluding any extra principal.
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub origination_fee: Money,
    /// Every scheduled payment plus the origination fee.
    pub total_paid: Money,
    pub payoff_periods: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    /// True when the closed-form payment overflowed and `P/n` was used.
    pub overflow_fallback: bool,
    /// Interest avoided compared with the same loan without extra payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_saved: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_saved: Option<u32>,
    pub schedule: Vec<ScheduleRow>,
}

/// Level payment for `principal` over `periods` at per-period `rate`.
///
/// A zero rate is simple division. When the closed form overflows or
/// degenerates the linear `P/n` is returned instead.
pub fn compute_periodic_payment(principal: Money, rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return Decimal::ZERO;
    }
    level_payment(principal, rate, periods).unwrap_or_else(|| {
        warn!(%principal, %rate, periods, "payment formula overflowed, using P/n");
        principal / Decimal::from(periods)
    })
}

pub(crate) fn validate_terms(terms: &LoanTerms) -> HouseholdFinanceResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if terms.term_periods == 0 {
        return Err(HouseholdFinanceError::invalid(
            "term_periods",
            "Term must be at least one period",
        ));
    }
    validate_period_count("term_periods", terms.term_periods, terms.periods_per_year)?;
    require_non_negative_rate("annual_rate_percent", terms.annual_rate_percent)?;
    Ok(())
}

/// Amortize a fixed-rate loan into a full payment schedule.
pub fn amortize(
    input: &AmortizationInput,
) -> HouseholdFinanceResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let terms = &input.terms;

    validate_terms(terms)?;
    if let Some(lump) = &input.lump_sum {
        if lump.period == 0 || lump.period > terms.term_periods {
            return Err(HouseholdFinanceError::invalid(
                "lump_sum.period",
                "Lump sum period must fall within the loan term",
            ));
        }
        if lump.amount < Decimal::ZERO {
            return Err(HouseholdFinanceError::invalid(
                "lump_sum.amount",
                "Lump sum must not be negative",
            ));
        }
    }
    if input.origination_fee_percent < Decimal::ZERO
        || input.origination_fee_percent > Decimal::ONE_HUNDRED
    {
        return Err(HouseholdFinanceError::invalid(
            "origination_fee_percent",
            "Origination fee must be between 0 and 100 percent",
        ));
    }

    let rate = terms.periodic_rate();
    let closed_form = level_payment(terms.principal, rate, terms.term_periods);
    let overflow_fallback = closed_form.is_none();
    if overflow_fallback {
        warnings.push(format!(
            "Payment formula overflowed at {}% over {} periods; using principal / periods",
            terms.annual_rate_percent, terms.term_periods
        ));
    }
    let payment = compute_periodic_payment(terms.principal, rate, terms.term_periods);

    let options = ScheduleOptions {
        extra_per_period: input.extra_per_period,
        lump_sum: input.lump_sum.clone(),
        first_payment_date: input.first_payment_date,
        periods_per_year: terms.periods_per_year,
    };
    let schedule = build_schedule(terms.principal, rate, terms.term_periods, payment, &options)?;

    let (interest_saved, periods_saved) = if options.has_extra_payments() {
        let baseline = build_schedule(
            terms.principal,
            rate,
            terms.term_periods,
            payment,
            &ScheduleOptions {
                periods_per_year: terms.periods_per_year,
                ..ScheduleOptions::default()
            },
        )?;
        (
            Some(baseline.total_interest - schedule.total_interest),
            Some(baseline.payoff_periods() - schedule.payoff_periods()),
        )
    } else {
        (None, None)
    };

    let origination_fee = terms.principal * percent_to_rate(input.origination_fee_percent);
    let total_paid = schedule.total_paid.checked_add(origination_fee).ok_or_else(|| {
        HouseholdFinanceError::NumericOverflow {
            context: "total paid with origination fee".into(),
        }
    })?;

    if input.first_payment_date.is_some() && schedule.payoff_date().is_none() {
        warnings.push(format!(
            "Payment dates are not generated for {} periods per year",
            terms.periods_per_year
        ));
    }

    let output = AmortizationResult {
        periodic_payment: payment,
        total_interest: schedule.total_interest,
        origination_fee,
        total_paid,
        payoff_periods: schedule.payoff_periods(),
        payoff_date: schedule.payoff_date(),
        overflow_fallback,
        interest_saved,
        periods_saved,
        schedule: schedule.rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "term_periods": terms.term_periods,
            "periods_per_year": terms.periods_per_year,
            "extra_per_period": input.extra_per_period.to_string(),
            "origination_fee_percent": input.origination_fee_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mortgage() -> AmortizationInput {
        AmortizationInput::new(LoanTerms::monthly(dec!(200000), dec!(6.0), 360))
    }

    #[test]
    fn test_standard_thirty_year() {
        let out = amortize(&mortgage()).unwrap();
        let res = &out.result;
        assert_eq!(res.periodic_payment.round_dp(2), dec!(1199.10));
        assert!((res.total_interest - dec!(231676.38)).abs() < dec!(1));
        assert_eq!(res.schedule.len(), 360);
        assert_eq!(res.schedule[359].balance, Decimal::ZERO);
        assert!(!res.overflow_fallback);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_zero_rate() {
        let input = AmortizationInput::new(LoanTerms::monthly(dec!(10000), dec!(0), 12));
        let res = amortize(&input).unwrap().result;
        assert_eq!(res.periodic_payment, dec!(10000) / dec!(12));
        assert_eq!(res.periodic_payment.round_dp(2), dec!(833.33));
        assert_eq!(res.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_extra_payment_reports_savings() {
        let mut input = mortgage();
        input.extra_per_period = dec!(200);
        let res = amortize(&input).unwrap().result;
        assert!(res.payoff_periods < 360);
        assert_eq!(res.periods_saved, Some(360 - res.payoff_periods));
        assert!(res.interest_saved.unwrap() > dec!(50000));
        assert_eq!(res.schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_overflow_falls_back_to_linear() {
        assert_eq!(
            compute_periodic_payment(dec!(1200), dec!(50), 120),
            dec!(10)
        );
    }

    #[test]
    fn test_overflowing_terms_never_amortize() {
        // P/n cannot cover 5000% monthly interest
        let input = AmortizationInput::new(LoanTerms::monthly(dec!(1000), dec!(60000), 120));
        assert!(matches!(
            amortize(&input),
            Err(HouseholdFinanceError::NeverAmortizes { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let zero_principal = AmortizationInput::new(LoanTerms::monthly(dec!(0), dec!(5), 12));
        assert!(amortize(&zero_principal).is_err());

        let zero_term = AmortizationInput::new(LoanTerms::monthly(dec!(1000), dec!(5), 0));
        assert!(amortize(&zero_term).is_err());

        let negative_rate = AmortizationInput::new(LoanTerms::monthly(dec!(1000), dec!(-1), 12));
        assert!(amortize(&negative_rate).is_err());
    }

    #[test]
    fn test_term_beyond_horizon_rejected() {
        let input = AmortizationInput::new(LoanTerms::monthly(dec!(1000), dec!(0), u32::MAX));
        assert!(matches!(
            amortize(&input),
            Err(HouseholdFinanceError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_origination_fee_added_to_total_paid() {
        let base = amortize(&mortgage()).unwrap().result;
        assert_eq!(base.origination_fee, Decimal::ZERO);

        let mut input = mortgage();
        input.origination_fee_percent = dec!(1);
        let res = amortize(&input).unwrap().result;
        assert_eq!(res.origination_fee, dec!(2000));
        assert_eq!(res.total_paid, base.total_paid + dec!(2000));
        // The fee is paid upfront, not amortized
        assert_eq!(res.periodic_payment, base.periodic_payment);
        assert_eq!(res.total_interest, base.total_interest);

        input.origination_fee_percent = dec!(-0.5);
        assert!(amortize(&input).is_err());
    }

    #[test]
    fn test_lump_sum_outside_term_rejected() {
        let mut input = mortgage();
        input.lump_sum = Some(LumpSumPayment {
            period: 361,
            amount: dec!(1000),
        });
        assert!(amortize(&input).is_err());
    }
}
