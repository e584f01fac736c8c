//! Monthly housing cost (PITI) breakdown for a home purchase.
//!
//! Principal and interest come from the shared level-payment primitive;
//! property tax is a percentage of the purchase price; private mortgage
//! insurance applies while the loan-to-value ratio is above 80%.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::loan::compute_periodic_payment;
use crate::error::HouseholdFinanceError;
use crate::rate_source::require_non_negative_rate;
use crate::types::*;
use crate::HouseholdFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Loan-to-value above which PMI is charged.
pub const PMI_LTV_THRESHOLD: Rate = dec!(0.80);

/// Annual PMI premium as a percentage of the loan when none is supplied.
pub const DEFAULT_PMI_RATE_PERCENT: Percent = dec!(0.5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Components of one month's housing payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_interest: Money,
    pub tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub pmi: Money,
    pub total: Money,
}

impl PaymentBreakdown {
    pub fn new(
        principal_interest: Money,
        tax: Money,
        insurance: Money,
        hoa: Money,
        pmi: Money,
    ) -> Self {
        Self {
            principal_interest,
            tax,
            insurance,
            hoa,
            pmi,
            total: principal_interest + tax + insurance + hoa + pmi,
        }
    }
}

/// Purchase inputs for a PITI breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingCostInput {
    pub home_price: Money,
    pub down_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    pub annual_tax_rate_percent: Percent,
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
    /// Annual PMI rate; `DEFAULT_PMI_RATE_PERCENT` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmi_rate_percent: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingCostOutput {
    pub loan_amount: Money,
    pub loan_to_value: Rate,
    pub pmi_required: bool,
    pub breakdown: PaymentBreakdown,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Monthly property tax on `price` at an annual percentage rate.
pub fn monthly_property_tax(price: Money, annual_tax_rate_percent: Percent) -> Money {
    price * periodic_rate(annual_tax_rate_percent, MONTHS_PER_YEAR)
}

/// Break a home purchase down into its monthly PITI components.
pub fn monthly_payment_breakdown(
    input: &HousingCostInput,
) -> HouseholdFinanceResult<ComputationOutput<HousingCostOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.home_price <= Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "home_price",
            "Home price must be positive",
        ));
    }
    if input.down_payment < Decimal::ZERO || input.down_payment > input.home_price {
        return Err(HouseholdFinanceError::invalid(
            "down_payment",
            "Down payment must be between zero and the home price",
        ));
    }
    if input.term_years == 0 {
        return Err(HouseholdFinanceError::invalid(
            "term_years",
            "Term must be at least one year",
        ));
    }
    require_non_negative_rate("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative_rate("annual_tax_rate_percent", input.annual_tax_rate_percent)?;
    if input.annual_insurance < Decimal::ZERO || input.monthly_hoa < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "annual_insurance",
            "Insurance and HOA must not be negative",
        ));
    }

    let loan_amount = input.home_price - input.down_payment;
    let loan_to_value = loan_amount / input.home_price;
    let term_months = horizon_periods("term_years", input.term_years, MONTHS_PER_YEAR)?;

    let principal_interest = if loan_amount > Decimal::ZERO {
        compute_periodic_payment(
            loan_amount,
            periodic_rate(input.annual_rate_percent, MONTHS_PER_YEAR),
            term_months,
        )
    } else {
        Decimal::ZERO
    };

    let pmi_required = loan_to_value > PMI_LTV_THRESHOLD;
    let pmi = if pmi_required {
        let pmi_rate = input.pmi_rate_percent.unwrap_or(DEFAULT_PMI_RATE_PERCENT);
        loan_amount * periodic_rate(pmi_rate, MONTHS_PER_YEAR)
    } else {
        Decimal::ZERO
    };

    let breakdown = PaymentBreakdown::new(
        principal_interest,
        monthly_property_tax(input.home_price, input.annual_tax_rate_percent),
        input.annual_insurance / Decimal::from(MONTHS_PER_YEAR),
        input.monthly_hoa,
        pmi,
    );

    let output = HousingCostOutput {
        loan_amount,
        loan_to_value,
        pmi_required,
        breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PITI payment breakdown",
        input,
        warnings,
        elapsed,
        output,
    ))
}
