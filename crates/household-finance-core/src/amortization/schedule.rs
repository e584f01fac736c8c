use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HouseholdFinanceError;
use crate::types::{
    default_periods_per_year, period_date, validate_period_count, Money, Rate,
};
use crate::HouseholdFinanceResult;

/// One-off additional principal payment made together with a period's
/// regular payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumPayment {
    /// 1-based period in which the lump sum is paid.
    pub period: u32,
    pub amount: Money,
}

/// A single period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// Optional accelerators and calendar for `build_schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOptions {
    #[serde(default)]
    pub extra_per_period: Money,
    #[serde(default)]
    pub lump_sum: Option<LumpSumPayment>,
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            extra_per_period: Decimal::ZERO,
            lump_sum: None,
            first_payment_date: None,
            periods_per_year: default_periods_per_year(),
        }
    }
}

impl ScheduleOptions {
    pub fn has_extra_payments(&self) -> bool {
        self.extra_per_period > Decimal::ZERO
            || self
                .lump_sum
                .as_ref()
                .is_some_and(|l| l.amount > Decimal::ZERO)
    }
}

/// A completed schedule and its running totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
}

impl Schedule {
    pub fn payoff_periods(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.rows.last().and_then(|r| r.date)
    }
}

/// Build a period-by-period schedule for a caller-supplied payment.
///
/// The last row always clears the remaining balance: its principal is
/// forced to the prior balance and its payment recomputed, so the
/// schedule ends at exactly zero. Extra payments may end it early.
/// A non-final payment that does not exceed the period's interest is
/// reported as `NeverAmortizes`. `periods` may not exceed
/// `MAX_HORIZON_YEARS` at the options' frequency.
pub fn build_schedule(
    principal: Money,
    rate: Rate,
    periods: u32,
    payment: Money,
    options: &ScheduleOptions,
) -> HouseholdFinanceResult<Schedule> {
    if principal <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if periods == 0 {
        return Err(HouseholdFinanceError::invalid(
            "term_periods",
            "Term must be at least one period",
        ));
    }
    validate_period_count("term_periods", periods, options.periods_per_year)?;
    if payment < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "payment",
            "Payment must not be negative",
        ));
    }
    if options.extra_per_period < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "extra_per_period",
            "Extra payment must not be negative",
        ));
    }

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=periods {
        let overflow = |what: &str| HouseholdFinanceError::NumericOverflow {
            context: format!("schedule {what} at period {period}"),
        };
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| overflow("interest"))?;

        let lump_sum = options
            .lump_sum
            .as_ref()
            .filter(|l| l.period == period)
            .map_or(Decimal::ZERO, |l| l.amount);
        let scheduled = payment
            .checked_add(options.extra_per_period)
            .and_then(|s| s.checked_add(lump_sum))
            .ok_or_else(|| overflow("payment"))?;

        let mut principal_paid = scheduled - interest;
        let is_final = period == periods || principal_paid >= balance;

        if !is_final && principal_paid <= Decimal::ZERO {
            return Err(HouseholdFinanceError::NeverAmortizes {
                period,
                payment: scheduled,
                interest,
            });
        }

        let row_payment = if is_final {
            principal_paid = balance;
            balance
                .checked_add(interest)
                .ok_or_else(|| overflow("final payment"))?
        } else {
            scheduled
        };
        balance = if is_final {
            Decimal::ZERO
        } else {
            balance - principal_paid
        };

        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow("total interest"))?;
        total_principal += principal_paid;
        total_paid = total_paid
            .checked_add(row_payment)
            .ok_or_else(|| overflow("total paid"))?;

        let date = options
            .first_payment_date
            .and_then(|start| period_date(start, period - 1, options.periods_per_year));

        rows.push(ScheduleRow {
            period,
            date,
            payment: row_payment,
            principal: principal_paid,
            interest,
            balance,
        });

        if is_final {
            break;
        }
    }

    debug!(
        periods = rows.len(),
        %total_interest,
        "amortization schedule built"
    );

    Ok(Schedule {
        rows,
        total_interest,
        total_principal,
        total_paid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_final_row_clears_balance() {
        let sched = build_schedule(
            dec!(1000),
            dec!(0.01),
            3,
            dec!(340),
            &ScheduleOptions::default(),
        )
        .unwrap();
        assert_eq!(sched.rows.len(), 3);
        let last = sched.rows.last().unwrap();
        assert_eq!(last.balance, Decimal::ZERO);
        assert_eq!(sched.total_principal, dec!(1000));
        // Final payment is recomputed from the remaining balance
        assert_eq!(last.payment, last.principal + last.interest);
    }

    #[test]
    fn test_extra_payment_shortens_term() {
        let opts = ScheduleOptions {
            extra_per_period: dec!(100),
            ..ScheduleOptions::default()
        };
        let sched = build_schedule(dec!(1200), Decimal::ZERO, 12, dec!(100), &opts).unwrap();
        assert_eq!(sched.rows.len(), 6);
        assert_eq!(sched.rows[5].balance, Decimal::ZERO);
    }

    #[test]
    fn test_lump_sum_applied_once() {
        let opts = ScheduleOptions {
            lump_sum: Some(LumpSumPayment {
                period: 2,
                amount: dec!(500),
            }),
            ..ScheduleOptions::default()
        };
        let sched = build_schedule(dec!(1200), Decimal::ZERO, 12, dec!(100), &opts).unwrap();
        assert_eq!(sched.rows[1].payment, dec!(600));
        assert_eq!(sched.rows[1].balance, dec!(500));
        assert_eq!(sched.rows.len(), 7);
    }

    #[test]
    fn test_payment_below_interest_never_amortizes() {
        let err = build_schedule(
            dec!(10000),
            dec!(0.02),
            24,
            dec!(150),
            &ScheduleOptions::default(),
        )
        .unwrap_err();
        match err {
            HouseholdFinanceError::NeverAmortizes { period, .. } => assert_eq!(period, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dates_follow_frequency() {
        let opts = ScheduleOptions {
            first_payment_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..ScheduleOptions::default()
        };
        let sched = build_schedule(dec!(300), Decimal::ZERO, 3, dec!(100), &opts).unwrap();
        assert_eq!(sched.payoff_date(), NaiveDate::from_ymd_opt(2025, 5, 1));
    }

    #[test]
    fn test_term_beyond_horizon_rejected() {
        let err = build_schedule(
            dec!(1000),
            Decimal::ZERO,
            u32::MAX,
            dec!(1),
            &ScheduleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HouseholdFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_interest_overflow_reported() {
        let err = build_schedule(
            Decimal::MAX,
            dec!(2),
            12,
            Decimal::MAX,
            &ScheduleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HouseholdFinanceError::NumericOverflow { .. }));
    }

    #[test]
    fn test_negative_extra_rejected() {
        let opts = ScheduleOptions {
            extra_per_period: dec!(-1),
            ..ScheduleOptions::default()
        };
        assert!(build_schedule(dec!(100), Decimal::ZERO, 2, dec!(50), &opts).is_err());
    }
}
