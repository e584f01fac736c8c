#![cfg(feature = "debt_payoff")]

use household_finance_core::debt_payoff::{
    compare_strategies, months_to_payoff, simulate_payoff, CreditCard, PayoffInput,
    PayoffStrategy, MAX_PAYOFF_MONTHS,
};
use household_finance_core::HouseholdFinanceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cards() -> Vec<CreditCard> {
    vec![
        CreditCard {
            name: "Travel".into(),
            balance: dec!(8000),
            apr_percent: dec!(22.9),
            min_payment: Decimal::ZERO,
            min_payment_percent: dec!(2),
        },
        CreditCard {
            name: "Gas".into(),
            balance: dec!(600),
            apr_percent: dec!(15),
            min_payment: dec!(30),
            min_payment_percent: Decimal::ZERO,
        },
        CreditCard {
            name: "Store".into(),
            balance: dec!(2500),
            apr_percent: dec!(27.5),
            min_payment: dec!(50),
            min_payment_percent: Decimal::ZERO,
        },
    ]
}

fn run(strategy: PayoffStrategy) -> household_finance_core::debt_payoff::PayoffResult {
    simulate_payoff(&PayoffInput {
        cards: cards(),
        monthly_budget: dec!(600),
        strategy,
    })
    .unwrap()
    .result
}

#[test]
fn test_avalanche_clears_highest_rate_first() {
    let r = run(PayoffStrategy::Avalanche);
    assert_eq!(r.payoff_order[0].name, "Store");
    assert_eq!(r.payoff_order.len(), 3);
    assert_eq!(r.schedule.last().unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_snowball_clears_smallest_balance_first() {
    let r = run(PayoffStrategy::Snowball);
    assert_eq!(r.payoff_order[0].name, "Gas");
}

#[test]
fn test_avalanche_interest_not_above_snowball() {
    let a = run(PayoffStrategy::Avalanche);
    let s = run(PayoffStrategy::Snowball);
    assert!(a.total_interest <= s.total_interest);
}

#[test]
fn test_minimum_only_takes_longest() {
    let a = run(PayoffStrategy::Avalanche);
    let m = run(PayoffStrategy::MinimumOnly);
    assert!(m.months > a.months);
    assert!(m.total_interest > a.total_interest);
}

#[test]
fn test_failsafe_reports_never_amortizes() {
    // Pays 0.10 a month above interest: progress, but not within 600 months
    let err = months_to_payoff(dec!(10000), dec!(12), dec!(100.10)).unwrap_err();
    assert!(matches!(
        err,
        HouseholdFinanceError::NeverAmortizes { period, .. } if period == MAX_PAYOFF_MONTHS
    ));
}

#[test]
fn test_months_to_payoff_typical_card() {
    let months = months_to_payoff(dec!(5000), dec!(18), dec!(200)).unwrap();
    // Standard payoff tables give 32 months
    assert_eq!(months, 32);
}

#[test]
fn test_strategy_comparison_reports_savings() {
    let out = compare_strategies(&PayoffInput {
        cards: cards(),
        monthly_budget: dec!(600),
        strategy: PayoffStrategy::MinimumOnly,
    })
    .unwrap();
    let cmp = out.result;
    let minimum = cmp.minimum_only.clone().unwrap();
    let best = match cmp.best_strategy {
        PayoffStrategy::Avalanche => &cmp.avalanche,
        PayoffStrategy::Snowball => &cmp.snowball,
        PayoffStrategy::MinimumOnly => panic!("minimum-only cannot be best"),
    };

    assert_eq!(cmp.avalanche.months, run(PayoffStrategy::Avalanche).months);
    assert_eq!(cmp.snowball.total_interest, run(PayoffStrategy::Snowball).total_interest);
    assert_eq!(minimum.months, run(PayoffStrategy::MinimumOnly).months);
    assert_eq!(
        cmp.interest_saved_vs_minimum.unwrap(),
        minimum.total_interest - best.total_interest
    );
    assert!(cmp.interest_saved_vs_minimum.unwrap() > Decimal::ZERO);
    assert!(cmp.months_saved_vs_minimum.unwrap() > 0);
}

#[test]
fn test_strategy_comparison_from_json_without_strategy() {
    let json = r#"{
        "cards": [
            {"name": "Visa", "balance": "3000", "apr_percent": "19.99", "min_payment": "90"},
            {"name": "Amex", "balance": "1200", "apr_percent": "24.99", "min_payment": "40"}
        ],
        "monthly_budget": "400"
    }"#;
    let input: PayoffInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.strategy, PayoffStrategy::Avalanche);
    let value = serde_json::to_value(compare_strategies(&input).unwrap()).unwrap();
    assert!(value["result"]["interest_saved_vs_minimum"].is_string());
    assert_eq!(value["result"]["avalanche"]["strategy"], "Avalanche");
}
