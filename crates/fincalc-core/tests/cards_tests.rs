use fincalc_core::cards::payoff::{
    self, CardPayoffInput, NeverPaysOffReason, PaymentStrategy, PayoffOutcome, MAX_PAYOFF_MONTHS,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn card(minimum: Decimal, strategy: PaymentStrategy) -> CardPayoffInput {
    CardPayoffInput {
        balance: dec!(50_000),
        annual_rate: dec!(36),
        minimum_payment: minimum,
        fixed_payment: dec!(3_000),
        strategy,
    }
}

#[test]
fn test_minimum_payment_end_to_end() {
    // 3% a month on 50,000 is 1,500 of interest; 1,000 never catches up.
    let result = payoff::calculate_payoff(&card(dec!(1_000), PaymentStrategy::Minimum)).unwrap();
    let out = &result.result;
    assert_eq!(
        out.outcome,
        PayoffOutcome::NeverPaysOff {
            reason: NeverPaysOffReason::PaymentBelowInterest
        }
    );
    assert_eq!(out.outcome.months_to_payoff(), None);
    assert_eq!(out.outcome.total_interest(), None);
}

#[test]
fn test_payment_not_covering_interest_never_pays_off() {
    for minimum in [dec!(100), dec!(1_000), dec!(1_499.99), dec!(1_500)] {
        let result = payoff::calculate_payoff(&card(minimum, PaymentStrategy::Minimum)).unwrap();
        assert!(!result.result.outcome.is_paid_off(), "{minimum}");
    }
}

#[test]
fn test_convergent_strategies_are_bounded() {
    let result = payoff::calculate_payoff(&card(dec!(2_000), PaymentStrategy::Fixed)).unwrap();
    for strategy in &result.result.breakdown {
        let months = strategy.outcome.months_to_payoff().unwrap();
        assert!((1..=MAX_PAYOFF_MONTHS).contains(&months));
    }
}

#[test]
fn test_bigger_payments_cost_less_interest() {
    let result = payoff::calculate_payoff(&card(dec!(2_000), PaymentStrategy::Fixed)).unwrap();
    let interest: Vec<Decimal> = result
        .result
        .breakdown
        .iter()
        .map(|s| s.outcome.total_interest().unwrap())
        .collect();
    // minimum 2,000 > fixed 3,000 > aggressive 5,000
    assert!(interest[0] > interest[1]);
    assert!(interest[1] > interest[2]);
}

#[test]
fn test_schedule_matches_outcome() {
    let result = payoff::calculate_payoff(&card(dec!(2_000), PaymentStrategy::Fixed)).unwrap();
    let out = &result.result;
    let months = out.outcome.months_to_payoff().unwrap();
    assert_eq!(out.schedule.len() as u32, months);
    let interest: Decimal = out.schedule.iter().map(|e| e.interest_portion).sum();
    assert!((interest - out.outcome.total_interest().unwrap()).abs() < dec!(1));
}

#[test]
fn test_strategy_from_json() {
    let input: CardPayoffInput =
        serde_json::from_str(r#"{"balance":"20000","annual_rate":"42","strategy":"aggressive"}"#)
            .unwrap();
    assert_eq!(input.strategy, PaymentStrategy::Aggressive);
    let result = payoff::calculate_payoff(&input).unwrap();
    assert_eq!(result.result.monthly_payment, dec!(2_000));
    assert!(result.result.outcome.is_paid_off());
}
