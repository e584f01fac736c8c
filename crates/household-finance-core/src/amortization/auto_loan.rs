use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::loan::{amortize, AmortizationInput, AmortizationResult};
use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::types::*;
use crate::HouseholdFinanceResult;

/// Vehicle purchase financed with a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanInput {
    pub vehicle_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    /// Sales tax applied to `price - trade_in`.
    #[serde(default)]
    pub sales_tax_rate_percent: Percent,
    /// Dealer, title and registration fees rolled into the loan.
    #[serde(default)]
    pub fees: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanOutput {
    pub sales_tax: Money,
    pub total_cost: Money,
    pub amount_financed: Money,
    /// `None` when nothing is financed.
    pub loan: Option<AmortizationResult>,
    /// Out-of-pocket plus every scheduled payment.
    pub total_outlay: Money,
}

/// Work out the financed amount for a vehicle and amortize it.
pub fn finance_vehicle(
    input: &AutoLoanInput,
) -> HouseholdFinanceResult<ComputationOutput<AutoLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.vehicle_price <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    if input.down_payment < Decimal::ZERO
        || input.trade_in_value < Decimal::ZERO
        || input.fees < Decimal::ZERO
    {
        return Err(HouseholdFinanceError::invalid(
            "down_payment",
            "Down payment, trade-in and fees must not be negative",
        ));
    }
    if input.term_months == 0 {
        return Err(HouseholdFinanceError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    require_non_negative_rate("sales_tax_rate_percent", input.sales_tax_rate_percent)?;
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;

    let taxable = (input.vehicle_price - input.trade_in_value).max(Decimal::ZERO);
    let sales_tax = taxable * percent_to_rate(input.sales_tax_rate_percent);
    let total_cost = input.vehicle_price + sales_tax + input.fees;
    let upfront = input.down_payment + input.trade_in_value;
    let amount_financed = (total_cost - upfront).max(Decimal::ZERO);

    let loan = if amount_financed > Decimal::ZERO {
        let out = amortize(&AmortizationInput::new(LoanTerms::monthly(
            amount_financed,
            input.annual_rate_percent,
            input.term_months,
        )))?;
        warnings.extend(out.warnings);
        Some(out.result)
    } else {
        warnings.push("Down payment and trade-in cover the full cost; nothing financed".into());
        None
    };

    let out_of_pocket = total_cost.min(upfront);
    let total_outlay = out_of_pocket + loan.as_ref().map_or(Decimal::ZERO, |l| l.total_paid);

    let output = AutoLoanOutput {
        sales_tax,
        total_cost,
        amount_financed,
        loan,
        total_outlay,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Auto loan financing",
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

    fn purchase() -> AutoLoanInput {
        AutoLoanInput {
            vehicle_price: dec!(30000),
            down_payment: dec!(3000),
            trade_in_value: dec!(5000),
            sales_tax_rate_percent: dec!(7),
            fees: dec!(500),
            annual_rate_percent: dec!(5),
            term_months: 60,
        }
    }

    #[test]
    fn test_tax_on_price_net_of_trade_in() {
        let out = finance_vehicle(&purchase()).unwrap().result;
        // (30000 - 5000) * 7% = 1750
        assert_eq!(out.sales_tax, dec!(1750));
        assert_eq!(out.total_cost, dec!(32250));
        assert_eq!(out.amount_financed, dec!(24250));
        let loan = out.loan.unwrap();
        assert_eq!(loan.schedule.len(), 60);
        assert!(loan.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_nothing_financed() {
        let mut input = purchase();
        input.down_payment = dec!(40000);
        let out = finance_vehicle(&input).unwrap();
        assert!(out.result.loan.is_none());
        assert_eq!(out.result.amount_financed, Decimal::ZERO);
        assert_eq!(out.result.total_outlay, dec!(32250));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut input = purchase();
        input.term_months = 0;
        assert!(finance_vehicle(&input).is_err());
    }
}
