use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HouseholdFinanceError;
use crate::types::*;
use crate::HouseholdFinanceResult;

/// Housing payment as a share of gross monthly income.
pub const DEFAULT_FRONT_END_RATIO_PERCENT: Percent = dec!(28);

/// Housing plus all other debt as a share of gross monthly income.
pub const DEFAULT_BACK_END_RATIO_PERCENT: Percent = dec!(36);

/// Income side of an affordability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeInput {
    pub annual_income: Money,
    /// Existing monthly debt payments (cards, auto, student loans).
    #[serde(default)]
    pub monthly_debts: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_end_ratio_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_end_ratio_percent: Option<Percent>,
}

/// Which debt-to-income ratio set the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtiConstraint {
    FrontEnd,
    BackEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCeiling {
    pub gross_monthly_income: Money,
    pub front_end_limit: Money,
    pub back_end_limit: Money,
    pub max_monthly_payment: Money,
    pub controlling: DtiConstraint,
}

fn ratio(field: &str, pct: Option<Percent>, default: Percent) -> HouseholdFinanceResult<Rate> {
    let pct = pct.unwrap_or(default);
    if pct <= Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(HouseholdFinanceError::invalid(
            field,
            "Ratio must be in (0, 100] percent",
        ));
    }
    Ok(percent_to_rate(pct))
}

/// Largest total monthly housing payment the income supports.
///
/// `min(income/12 * front, max(0, income/12 * back - debts))`
pub fn max_payment_from_income(input: &IncomeInput) -> HouseholdFinanceResult<PaymentCeiling> {
    if input.annual_income <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "annual_income",
            "Annual income must be positive",
        ));
    }
    if input.monthly_debts < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "monthly_debts",
            "Monthly debts must not be negative",
        ));
    }
    let front = ratio(
        "front_end_ratio_percent",
        input.front_end_ratio_percent,
        DEFAULT_FRONT_END_RATIO_PERCENT,
    )?;
    let back = ratio(
        "back_end_ratio_percent",
        input.back_end_ratio_percent,
        DEFAULT_BACK_END_RATIO_PERCENT,
    )?;

    let gross_monthly_income = input.annual_income / Decimal::from(MONTHS_PER_YEAR);
    let front_end_limit = gross_monthly_income * front;
    let back_end_limit = (gross_monthly_income * back - input.monthly_debts).max(Decimal::ZERO);

    let (max_monthly_payment, controlling) = if front_end_limit <= back_end_limit {
        (front_end_limit, DtiConstraint::FrontEnd)
    } else {
        (back_end_limit, DtiConstraint::BackEnd)
    };

    Ok(PaymentCeiling {
        gross_monthly_income,
        front_end_limit,
        back_end_limit,
        max_monthly_payment,
        controlling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income(debts: Money) -> IncomeInput {
        IncomeInput {
            annual_income: dec!(120000),
            monthly_debts: debts,
            front_end_ratio_percent: None,
            back_end_ratio_percent: None,
        }
    }

    #[test]
    fn test_front_end_controls_without_debts() {
        let c = max_payment_from_income(&income(Decimal::ZERO)).unwrap();
        assert_eq!(c.gross_monthly_income, dec!(10000));
        assert_eq!(c.max_monthly_payment, dec!(2800));
        assert_eq!(c.controlling, DtiConstraint::FrontEnd);
    }

    #[test]
    fn test_back_end_controls_with_debts() {
        let c = max_payment_from_income(&income(dec!(1000))).unwrap();
        assert_eq!(c.back_end_limit, dec!(2600));
        assert_eq!(c.max_monthly_payment, dec!(2600));
        assert_eq!(c.controlling, DtiConstraint::BackEnd);
    }

    #[test]
    fn test_debts_exhaust_back_end() {
        let c = max_payment_from_income(&income(dec!(5000))).unwrap();
        assert_eq!(c.max_monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let mut input = income(Decimal::ZERO);
        input.front_end_ratio_percent = Some(dec!(150));
        assert!(max_payment_from_income(&input).is_err());
    }
}
