//! Time-value-of-money primitives shared by every calculator.
//!
//! All helpers take a per-period rate as a fraction and a whole number of
//! periods. Growth factors are built by checked multiplication; `None`
//! means the factor overflowed `Decimal`.

use rust_decimal::Decimal;

use crate::types::{Money, Rate};

/// `(1 + rate)^periods`, or `None` if the product overflows.
pub fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    if rate.is_zero() {
        return Some(Decimal::ONE);
    }
    let step = Decimal::ONE.checked_add(rate)?;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.checked_mul(step)?;
    }
    Some(factor)
}

/// Level payment that retires `principal` over `periods` at `rate`.
///
/// `P*r*(1+r)^n / ((1+r)^n - 1)`, or `P/n` when the rate is zero.
/// Returns `None` when the growth factor overflows or the annuity factor
/// degenerates; callers decide the fallback.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> Option<Money> {
    if periods == 0 {
        return None;
    }
    if rate.is_zero() {
        return Some(principal / Decimal::from(periods));
    }
    let factor = compound_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return None;
    }
    principal
        .checked_mul(rate)?
        .checked_mul(factor)?
        .checked_div(denominator)
}

/// Present value of one unit paid at the end of each of `periods` periods.
///
/// `(1 - (1+r)^-n) / r`, or `n` when the rate is zero.
pub fn annuity_pv_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    if rate.is_zero() {
        return Some(Decimal::from(periods));
    }
    let factor = compound_factor(rate, periods)?;
    if factor.is_zero() {
        return None;
    }
    (Decimal::ONE - Decimal::ONE / factor).checked_div(rate)
}

/// Future value of one unit contributed at the start of each period
/// (annuity-due). `((1+r)^n - 1) / r * (1+r)`, or `n` when the rate is zero.
pub fn annuity_due_fv_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    if rate.is_zero() {
        return Some(Decimal::from(periods));
    }
    let factor = compound_factor(rate, periods)?;
    (factor - Decimal::ONE)
        .checked_div(rate)?
        .checked_mul(Decimal::ONE + rate)
}
