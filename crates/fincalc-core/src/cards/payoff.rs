use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{
    with_metadata, AmortizationEntry, ComputationOutput, Money, Percent, Rate, MAX_HORIZON_MONTHS,
};
use crate::utils::rounding::{monthly_rate, round_currency};
use crate::utils::validation::{require_non_negative, require_positive};
use crate::FinCalcResult;

/// 50 years. A balance still outstanding after this is treated as never
/// paid off.
pub const MAX_PAYOFF_MONTHS: u32 = MAX_HORIZON_MONTHS;
/// Balance at or below this counts as cleared.
const BALANCE_EPSILON: Money = dec!(0.01);
/// Minimum due when the card statement does not state one.
const DEFAULT_MINIMUM_SHARE: Rate = dec!(0.03);
const AGGRESSIVE_SHARE: Rate = dec!(0.10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStrategy {
    /// Pay the minimum due every month.
    #[default]
    Minimum,
    /// Pay a fixed amount of the cardholder's choosing.
    Fixed,
    /// Pay 10% of the starting balance every month.
    Aggressive,
}

impl PaymentStrategy {
    pub const ALL: [PaymentStrategy; 3] = [
        PaymentStrategy::Minimum,
        PaymentStrategy::Fixed,
        PaymentStrategy::Aggressive,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayoffInput {
    pub balance: Money,
    pub annual_rate: Percent,
    /// Zero means "use 3% of the balance".
    #[serde(default)]
    pub minimum_payment: Money,
    /// Zero means the fixed strategy falls back to the minimum payment.
    #[serde(default)]
    pub fixed_payment: Money,
    #[serde(default)]
    pub strategy: PaymentStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeverPaysOffReason {
    /// The payment does not even cover the month's interest.
    PaymentBelowInterest,
    /// Still owing after `MAX_PAYOFF_MONTHS`.
    IterationCap,
}

/// Result of simulating one payment policy. `NeverPaysOff` is a normal
/// answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffOutcome {
    PaidOff {
        months: u32,
        total_interest: Money,
        total_paid: Money,
    },
    NeverPaysOff {
        reason: NeverPaysOffReason,
    },
}

impl PayoffOutcome {
    /// `None` when the balance is never cleared.
    pub fn months_to_payoff(&self) -> Option<u32> {
        match self {
            PayoffOutcome::PaidOff { months, .. } => Some(*months),
            PayoffOutcome::NeverPaysOff { .. } => None,
        }
    }

    /// `None` when the balance is never cleared.
    pub fn total_interest(&self) -> Option<Money> {
        match self {
            PayoffOutcome::PaidOff { total_interest, .. } => Some(*total_interest),
            PayoffOutcome::NeverPaysOff { .. } => None,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        matches!(self, PayoffOutcome::PaidOff { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: PaymentStrategy,
    pub monthly_payment: Money,
    pub outcome: PayoffOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayoffOutput {
    pub strategy: PaymentStrategy,
    pub monthly_payment: Money,
    pub outcome: PayoffOutcome,
    /// Every strategy, in `PaymentStrategy::ALL` order.
    pub breakdown: Vec<StrategyResult>,
    /// Month-by-month schedule for the selected strategy; empty when it
    /// never pays off.
    pub schedule: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate paying down a card balance under all three payment strategies
/// and report the selected one in detail.
pub fn calculate_payoff(
    input: &CardPayoffInput,
) -> FinCalcResult<ComputationOutput<CardPayoffOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("balance", input.balance)?;
    require_positive("annual_rate", input.annual_rate)?;
    require_non_negative("minimum_payment", input.minimum_payment)?;
    require_non_negative("fixed_payment", input.fixed_payment)?;

    let rate = monthly_rate(input.annual_rate);
    let minimum = if input.minimum_payment > Decimal::ZERO {
        input.minimum_payment
    } else {
        input.balance * DEFAULT_MINIMUM_SHARE
    };

    let minimum_sim = simulate(input.balance, rate, minimum);
    let fixed_sim = if input.fixed_payment > Decimal::ZERO {
        simulate(input.balance, rate, input.fixed_payment)
    } else {
        if input.strategy == PaymentStrategy::Fixed {
            warnings.push("No fixed payment given; fixed strategy uses the minimum payment".into());
        }
        minimum_sim.clone()
    };
    let aggressive_sim = simulate(input.balance, rate, input.balance * AGGRESSIVE_SHARE);

    let breakdown: Vec<StrategyResult> = PaymentStrategy::ALL
        .iter()
        .zip([&minimum_sim, &fixed_sim, &aggressive_sim])
        .map(|(strategy, sim)| StrategyResult {
            strategy: *strategy,
            monthly_payment: round_currency(sim.payment),
            outcome: sim.outcome.clone(),
        })
        .collect();

    let selected = match input.strategy {
        PaymentStrategy::Minimum => minimum_sim,
        PaymentStrategy::Fixed => fixed_sim,
        PaymentStrategy::Aggressive => aggressive_sim,
    };

    if let PayoffOutcome::NeverPaysOff { reason } = &selected.outcome {
        tracing::warn!(strategy = ?input.strategy, ?reason, "card balance never pays off");
        warnings.push(match reason {
            NeverPaysOffReason::PaymentBelowInterest => format!(
                "A payment of {} does not cover the monthly interest of {}; this balance will never be paid off",
                round_currency(selected.payment),
                round_currency(input.balance * rate)
            ),
            NeverPaysOffReason::IterationCap => format!(
                "Balance still outstanding after {MAX_PAYOFF_MONTHS} months; treated as never paid off"
            ),
        });
    }

    let output = CardPayoffOutput {
        strategy: input.strategy,
        monthly_payment: round_currency(selected.payment),
        outcome: selected.outcome,
        breakdown,
        schedule: selected.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": rate.to_string(),
        "default_minimum_share": DEFAULT_MINIMUM_SHARE.to_string(),
        "aggressive_share": AGGRESSIVE_SHARE.to_string(),
        "max_months": MAX_PAYOFF_MONTHS,
    });

    Ok(with_metadata(
        "Credit card payoff: monthly reducing-balance simulation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Simulation {
    payment: Money,
    outcome: PayoffOutcome,
    schedule: Vec<AmortizationEntry>,
}

fn simulate(balance: Money, rate: Rate, payment: Money) -> Simulation {
    let never = |reason: NeverPaysOffReason| Simulation {
        payment,
        outcome: PayoffOutcome::NeverPaysOff { reason },
        schedule: Vec::new(),
    };

    let mut remaining = balance;
    let mut total_interest = Decimal::ZERO;
    let mut schedule = Vec::new();

    for month in 1..=MAX_PAYOFF_MONTHS {
        let interest = remaining * rate;
        let principal = (payment - interest).min(remaining);
        if principal <= Decimal::ZERO {
            return never(NeverPaysOffReason::PaymentBelowInterest);
        }
        remaining -= principal;
        total_interest += interest;

        let cleared = remaining <= BALANCE_EPSILON;
        schedule.push(AmortizationEntry {
            period: month,
            payment: round_currency(principal + interest),
            principal_portion: round_currency(principal),
            interest_portion: round_currency(interest),
            remaining_balance: if cleared { Decimal::ZERO } else { round_currency(remaining) },
        });

        if cleared {
            return Simulation {
                payment,
                outcome: PayoffOutcome::PaidOff {
                    months: month,
                    total_interest: round_currency(total_interest),
                    total_paid: round_currency(balance - remaining + total_interest),
                },
                schedule,
            };
        }
    }

    never(NeverPaysOffReason::IterationCap)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardPayoffInput {
        CardPayoffInput {
            balance: dec!(50_000),
            annual_rate: dec!(36),
            minimum_payment: dec!(1_000),
            fixed_payment: dec!(2_500),
            strategy: PaymentStrategy::Minimum,
        }
    }

    #[test]
    fn test_minimum_below_interest_never_pays_off() {
        let result = calculate_payoff(&card()).unwrap();
        let out = &result.result;
        assert_eq!(
            out.outcome,
            PayoffOutcome::NeverPaysOff {
                reason: NeverPaysOffReason::PaymentBelowInterest
            }
        );
        assert_eq!(out.outcome.months_to_payoff(), None);
        assert!(out.schedule.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_aggressive_pays_off() {
        let input = CardPayoffInput {
            strategy: PaymentStrategy::Aggressive,
            ..card()
        };
        let result = calculate_payoff(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.monthly_payment, dec!(5_000));
        assert_eq!(out.outcome.months_to_payoff(), Some(13));
        assert!((out.outcome.total_interest().unwrap() - dec!(10_337.73)).abs() < dec!(0.01));
        assert_eq!(out.schedule.len(), 13);
        assert_eq!(out.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_covers_all_strategies() {
        let result = calculate_payoff(&card()).unwrap();
        let strategies: Vec<PaymentStrategy> =
            result.result.breakdown.iter().map(|s| s.strategy).collect();
        assert_eq!(strategies, PaymentStrategy::ALL.to_vec());
    }

    #[test]
    fn test_fixed_falls_back_to_minimum() {
        let input = CardPayoffInput {
            fixed_payment: Decimal::ZERO,
            minimum_payment: dec!(2_000),
            strategy: PaymentStrategy::Fixed,
            ..card()
        };
        let result = calculate_payoff(&input).unwrap();
        let breakdown = &result.result.breakdown;
        assert_eq!(breakdown[1].monthly_payment, dec!(2_000));
        assert_eq!(breakdown[1].outcome, breakdown[0].outcome);
    }

    #[test]
    fn test_default_minimum_is_three_percent() {
        let input = CardPayoffInput {
            annual_rate: dec!(24),
            minimum_payment: Decimal::ZERO,
            ..card()
        };
        let result = calculate_payoff(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.monthly_payment, dec!(1_500));
        assert_eq!(out.outcome.months_to_payoff(), Some(56));
    }

    #[test]
    fn test_payment_barely_above_interest_hits_cap() {
        let input = CardPayoffInput {
            balance: dec!(100_000),
            annual_rate: dec!(12),
            minimum_payment: dec!(1_000.50),
            ..card()
        };
        let result = calculate_payoff(&input).unwrap();
        assert_eq!(
            result.result.outcome,
            PayoffOutcome::NeverPaysOff {
                reason: NeverPaysOffReason::IterationCap
            }
        );
    }

    #[test]
    fn test_convergent_months_within_cap() {
        for payment in [dec!(1_600), dec!(2_000), dec!(5_000), dec!(60_000)] {
            let input = CardPayoffInput {
                fixed_payment: payment,
                strategy: PaymentStrategy::Fixed,
                ..card()
            };
            let result = calculate_payoff(&input).unwrap();
            let months = result.result.outcome.months_to_payoff().unwrap();
            assert!((1..=MAX_PAYOFF_MONTHS).contains(&months), "{payment}: {months}");
        }
    }

    #[test]
    fn test_outcome_serialises_with_status_tag() {
        let never = PayoffOutcome::NeverPaysOff {
            reason: NeverPaysOffReason::PaymentBelowInterest,
        };
        let json = serde_json::to_value(&never).unwrap();
        assert_eq!(json["status"], "never_pays_off");
        assert_eq!(json["reason"], "payment_below_interest");
    }

    #[test]
    fn test_rejects_zero_balance() {
        let input = CardPayoffInput {
            balance: Decimal::ZERO,
            ..card()
        };
        assert!(calculate_payoff(&input).is_err());
    }
}
