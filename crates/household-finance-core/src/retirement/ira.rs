//! IRA contribution limits and income phase-outs (2024 figures).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HouseholdFinanceError;
use crate::types::*;
use crate::HouseholdFinanceResult;

pub const IRA_CONTRIBUTION_LIMIT: Money = dec!(7000);
pub const IRA_CATCH_UP: Money = dec!(1000);
pub const CATCH_UP_AGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    HeadOfHousehold,
    MarriedFilingSeparately,
}

/// MAGI band over which eligibility falls from full to none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseOutRange {
    pub start: Money,
    pub end: Money,
}

impl PhaseOutRange {
    const fn new(start: Money, end: Money) -> Self {
        Self { start, end }
    }

    /// Share of the full amount still allowed at `magi`, in [0, 1].
    pub fn allowed_fraction(&self, magi: Money) -> Rate {
        if magi <= self.start {
            return Decimal::ONE;
        }
        if magi >= self.end {
            return Decimal::ZERO;
        }
        let width = self.end - self.start;
        (Decimal::ONE - (magi - self.start) / width).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

impl FilingStatus {
    pub fn roth_phase_out(self) -> PhaseOutRange {
        match self {
            FilingStatus::Single => PhaseOutRange::new(dec!(146000), dec!(161000)),
            FilingStatus::MarriedFilingJointly => PhaseOutRange::new(dec!(230000), dec!(240000)),
            FilingStatus::HeadOfHousehold => PhaseOutRange::new(dec!(219000), dec!(234000)),
            FilingStatus::MarriedFilingSeparately => PhaseOutRange::new(dec!(0), dec!(10000)),
        }
    }

    /// Deduction phase-out for filers covered by a workplace plan.
    pub fn traditional_phase_out(self) -> PhaseOutRange {
        match self {
            FilingStatus::Single => PhaseOutRange::new(dec!(77000), dec!(87000)),
            FilingStatus::MarriedFilingJointly => PhaseOutRange::new(dec!(123000), dec!(133000)),
            FilingStatus::HeadOfHousehold => PhaseOutRange::new(dec!(100000), dec!(110000)),
            FilingStatus::MarriedFilingSeparately => PhaseOutRange::new(dec!(0), dec!(10000)),
        }
    }
}

/// Annual IRA limit including the catch-up allowance.
pub fn contribution_limit(age: u32) -> Money {
    if age >= CATCH_UP_AGE {
        IRA_CONTRIBUTION_LIMIT + IRA_CATCH_UP
    } else {
        IRA_CONTRIBUTION_LIMIT
    }
}

fn default_covered() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IraInput {
    pub age: u32,
    pub magi: Money,
    pub filing_status: FilingStatus,
    /// Without workplace coverage traditional contributions are fully deductible.
    #[serde(default = "default_covered")]
    pub covered_by_workplace_plan: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_contribution: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IraEligibility {
    pub contribution_limit: Money,
    pub roth_allowed_fraction: Rate,
    pub max_roth_contribution: Money,
    pub traditional_deductible_fraction: Rate,
    pub max_traditional_deduction: Money,
    /// Desired contribution capped at the limit, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_contribution: Option<Money>,
}

/// Contribution ceiling, Roth eligibility and traditional deductibility.
pub fn ira_eligibility(
    input: &IraInput,
) -> HouseholdFinanceResult<ComputationOutput<IraEligibility>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.magi < Decimal::ZERO {
        return Err(HouseholdFinanceError::invalid(
            "magi",
            "Income must not be negative",
        ));
    }
    if matches!(input.desired_contribution, Some(c) if c < Decimal::ZERO) {
        return Err(HouseholdFinanceError::invalid(
            "desired_contribution",
            "Contribution must not be negative",
        ));
    }

    let limit = contribution_limit(input.age);
    let roth_allowed_fraction = input
        .filing_status
        .roth_phase_out()
        .allowed_fraction(input.magi);
    let traditional_deductible_fraction = if input.covered_by_workplace_plan {
        input
            .filing_status
            .traditional_phase_out()
            .allowed_fraction(input.magi)
    } else {
        Decimal::ONE
    };

    if roth_allowed_fraction.is_zero() {
        warnings.push("Income is above the Roth phase-out range".into());
    }

    let allowed_contribution = input.desired_contribution.map(|c| {
        if c > limit {
            warnings.push(format!("Desired contribution {c} exceeds the {limit} limit"));
        }
        c.min(limit)
    });

    let output = IraEligibility {
        contribution_limit: limit,
        roth_allowed_fraction,
        max_roth_contribution: limit * roth_allowed_fraction,
        traditional_deductible_fraction,
        max_traditional_deduction: limit * traditional_deductible_fraction,
        allowed_contribution,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "IRA limits with linear MAGI phase-out",
        input,
        warnings,
        elapsed,
        output,
    ))
}
