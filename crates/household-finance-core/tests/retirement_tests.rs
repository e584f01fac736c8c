#![cfg(feature = "retirement")]

use household_finance_core::retirement::{
    contribution_limit, ira_eligibility, project_employer_plan, EmployerPlanInput, FilingStatus,
    IraInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_plan_without_growth_is_plain_sum() {
    let input = EmployerPlanInput {
        current_age: 40,
        retirement_age: 45,
        annual_salary: dec!(100000),
        current_balance: Decimal::ZERO,
        contribution_rate_percent: dec!(10),
        salary_growth_percent: Decimal::ZERO,
        annual_return_percent: Decimal::ZERO,
        match_cap_percent: dec!(6),
        match_multiplier_percent: dec!(50),
        tax_bracket_percent: dec!(22),
    };
    let r = project_employer_plan(&input).unwrap().result;
    // 5 years of 10000 deferral + 3000 match
    assert_eq!(r.total_employee_contributions, dec!(50000));
    assert_eq!(r.total_employer_match, dec!(15000));
    assert_eq!(r.projected_balance, dec!(65000));
    assert_eq!(r.total_growth, Decimal::ZERO);
    assert_eq!(r.annual_tax_saving, dec!(2200));
    assert_eq!(r.years.last().unwrap().age, 45);
}

#[test]
fn test_salary_growth_raises_contributions() {
    let input = EmployerPlanInput {
        current_age: 25,
        retirement_age: 27,
        annual_salary: dec!(50000),
        current_balance: Decimal::ZERO,
        contribution_rate_percent: dec!(10),
        salary_growth_percent: dec!(10),
        annual_return_percent: Decimal::ZERO,
        match_cap_percent: Decimal::ZERO,
        match_multiplier_percent: dec!(100),
        tax_bracket_percent: Decimal::ZERO,
    };
    let r = project_employer_plan(&input).unwrap().result;
    assert_eq!(r.years[1].salary, dec!(55000));
    assert_eq!(r.years[1].employee_contribution, dec!(5500));
}

#[test]
fn test_joint_filers_use_joint_range() {
    let out = ira_eligibility(&IraInput {
        age: 52,
        magi: dec!(235000),
        filing_status: FilingStatus::MarriedFilingJointly,
        covered_by_workplace_plan: true,
        desired_contribution: Some(dec!(8000)),
    })
    .unwrap()
    .result;
    assert_eq!(out.contribution_limit, contribution_limit(52));
    assert_eq!(out.roth_allowed_fraction, dec!(0.5));
    assert_eq!(out.max_roth_contribution, dec!(4000));
    assert_eq!(out.allowed_contribution, Some(dec!(8000)));
}

#[test]
fn test_separate_filers_phase_out_fast() {
    let out = ira_eligibility(&IraInput {
        age: 35,
        magi: dec!(12000),
        filing_status: FilingStatus::MarriedFilingSeparately,
        covered_by_workplace_plan: true,
        desired_contribution: None,
    })
    .unwrap()
    .result;
    assert_eq!(out.roth_allowed_fraction, Decimal::ZERO);
    assert_eq!(out.traditional_deductible_fraction, Decimal::ZERO);
}
