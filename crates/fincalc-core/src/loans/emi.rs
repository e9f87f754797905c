use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value;
use crate::types::{
    with_metadata, AmortizationEntry, ComputationOutput, Money, Percent, Rate, MAX_HORIZON_MONTHS,
};
use crate::utils::rounding::{monthly_rate, round_currency};
use crate::utils::validation::{require_non_negative, require_positive};
use crate::FinCalcResult;

/// Balance at or below this is treated as repaid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Part-payments made on top of the regular EMI. The EMI stays the same and
/// the tenure shortens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prepayment {
    /// One-off payment.
    #[serde(default)]
    pub lump_sum: Money,
    /// Month (1-based) in which the lump sum is paid.
    #[serde(default = "default_lump_sum_month")]
    pub lump_sum_month: u32,
    /// Paid every month alongside the EMI.
    #[serde(default)]
    pub extra_monthly: Money,
}

fn default_lump_sum_month() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    pub annual_rate: Percent,
    pub tenure_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<Prepayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub emi: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub tenure_months: u32,
    pub schedule: Vec<AmortizationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepayment_savings: Option<PrepaymentSavings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentSavings {
    pub interest_saved: Money,
    pub months_saved: u32,
    pub revised_tenure_months: u32,
    pub revised_total_interest: Money,
    pub revised_schedule: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the equated monthly instalment, the full amortization schedule,
/// and (optionally) the effect of prepayments.
pub fn calculate_emi(input: &EmiInput) -> FinCalcResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    tracing::debug!(
        principal = %input.principal,
        annual_rate = %input.annual_rate,
        tenure_months = input.tenure_months,
        "calculating EMI"
    );

    let rate = monthly_rate(input.annual_rate);
    let emi = time_value::pmt(rate, input.tenure_months, input.principal)?;

    let base = build_schedule(input.principal, rate, emi, input.tenure_months, None);

    let prepayment_savings = match &input.prepayment {
        Some(pre) => {
            if pre.lump_sum >= input.principal {
                warnings.push(format!(
                    "Lump sum of {} clears the loan in month {}",
                    pre.lump_sum, pre.lump_sum_month
                ));
            }
            let revised = build_schedule(input.principal, rate, emi, input.tenure_months, Some(pre));
            let revised_tenure = revised.schedule.len() as u32;
            Some(PrepaymentSavings {
                interest_saved: round_currency(base.total_interest - revised.total_interest),
                months_saved: input.tenure_months.saturating_sub(revised_tenure),
                revised_tenure_months: revised_tenure,
                revised_total_interest: round_currency(revised.total_interest),
                revised_schedule: revised.schedule,
            })
        }
        None => None,
    };

    let output = EmiOutput {
        emi: round_currency(emi),
        total_interest: round_currency(base.total_interest),
        total_payment: round_currency(input.principal + base.total_interest),
        tenure_months: input.tenure_months,
        schedule: base.schedule,
        prepayment_savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": rate.to_string(),
        "prepayment_mode": "reduce_tenure",
    });

    Ok(with_metadata(
        "Reducing-balance EMI: P·i·(1+i)^n / ((1+i)^n − 1)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct Schedule {
    schedule: Vec<AmortizationEntry>,
    total_interest: Money,
}

/// Walk the loan month by month. Never runs past `max_periods`; the last
/// period absorbs whatever residual the level payment leaves behind.
fn build_schedule(
    principal: Money,
    rate: Rate,
    emi: Money,
    max_periods: u32,
    prepayment: Option<&Prepayment>,
) -> Schedule {
    let mut schedule = Vec::new();
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=max_periods {
        if balance <= BALANCE_EPSILON {
            break;
        }
        let interest = balance * rate;
        let extra = match prepayment {
            Some(p) => {
                let lump = if period == p.lump_sum_month { p.lump_sum } else { Decimal::ZERO };
                p.extra_monthly + lump
            }
            None => Decimal::ZERO,
        };

        let mut principal_portion = (emi - interest + extra).min(balance);
        if period == max_periods {
            principal_portion = balance;
        }
        balance -= principal_portion;
        total_interest += interest;

        schedule.push(AmortizationEntry {
            period,
            payment: round_currency(principal_portion + interest),
            principal_portion: round_currency(principal_portion),
            interest_portion: round_currency(interest),
            remaining_balance: if balance <= BALANCE_EPSILON {
                Decimal::ZERO
            } else {
                round_currency(balance)
            },
        });
    }

    Schedule {
        schedule,
        total_interest,
    }
}

fn validate_input(input: &EmiInput) -> FinCalcResult<()> {
    require_positive("principal", input.principal)?;
    require_non_negative("annual_rate", input.annual_rate)?;
    if input.tenure_months == 0 {
        return Err(FinCalcError::invalid("tenure_months", "tenure_months must be > 0"));
    }
    if input.tenure_months > MAX_HORIZON_MONTHS {
        return Err(FinCalcError::invalid(
            "tenure_months",
            format!("tenure_months cannot exceed {MAX_HORIZON_MONTHS}"),
        ));
    }
    if let Some(pre) = &input.prepayment {
        require_non_negative("prepayment.lump_sum", pre.lump_sum)?;
        require_non_negative("prepayment.extra_monthly", pre.extra_monthly)?;
        if pre.lump_sum_month == 0 || pre.lump_sum_month > input.tenure_months {
            return Err(FinCalcError::invalid(
                "prepayment.lump_sum_month",
                format!("lump_sum_month must fall within 1..={}", input.tenure_months),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> EmiInput {
        EmiInput {
            principal: dec!(100_000),
            annual_rate: dec!(12),
            tenure_months: 12,
            prepayment: None,
        }
    }

    #[test]
    fn test_emi_known_answer() {
        let result = calculate_emi(&base_input()).unwrap();
        // 1 lakh at 12% for 12 months = 8884.88
        assert_eq!(result.result.emi, dec!(8884.88));
    }

    #[test]
    fn test_schedule_runs_to_zero() {
        let result = calculate_emi(&base_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.schedule.len(), 12);
        assert_eq!(out.schedule[0].period, 1);
        assert_eq!(out.schedule[0].interest_portion, dec!(1000));
        assert_eq!(out.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_total_interest_matches_schedule() {
        let result = calculate_emi(&base_input()).unwrap();
        let out = &result.result;
        // 8884.88 * 12 - 100000 ≈ 6618.55
        assert!((out.total_interest - dec!(6618.55)).abs() < dec!(0.05));
        assert_eq!(out.total_payment, out.total_interest + dec!(100_000));
    }

    #[test]
    fn test_zero_rate_loan() {
        let input = EmiInput {
            annual_rate: Decimal::ZERO,
            ..base_input()
        };
        let result = calculate_emi(&input).unwrap();
        assert_eq!(result.result.emi, dec!(8333.33));
        assert_eq!(result.result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_lump_sum_prepayment_saves_interest() {
        let input = EmiInput {
            principal: dec!(2_000_000),
            annual_rate: dec!(9),
            tenure_months: 240,
            prepayment: Some(Prepayment {
                lump_sum: dec!(300_000),
                lump_sum_month: 12,
                extra_monthly: Decimal::ZERO,
            }),
        };
        let result = calculate_emi(&input).unwrap();
        let savings = result.result.prepayment_savings.as_ref().unwrap();
        assert!(savings.interest_saved > Decimal::ZERO);
        assert!(savings.months_saved > 0);
        assert_eq!(
            savings.revised_tenure_months + savings.months_saved,
            input.tenure_months
        );
        assert_eq!(
            savings.revised_schedule.last().unwrap().remaining_balance,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_lump_sum_clearing_loan_warns() {
        let input = EmiInput {
            prepayment: Some(Prepayment {
                lump_sum: dec!(150_000),
                lump_sum_month: 3,
                extra_monthly: Decimal::ZERO,
            }),
            ..base_input()
        };
        let result = calculate_emi(&input).unwrap();
        let savings = result.result.prepayment_savings.as_ref().unwrap();
        assert_eq!(savings.revised_tenure_months, 3);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let zero_principal = EmiInput {
            principal: Decimal::ZERO,
            ..base_input()
        };
        assert!(calculate_emi(&zero_principal).is_err());

        let zero_tenure = EmiInput {
            tenure_months: 0,
            ..base_input()
        };
        assert!(calculate_emi(&zero_tenure).is_err());

        let late_lump = EmiInput {
            prepayment: Some(Prepayment {
                lump_sum: dec!(1000),
                lump_sum_month: 13,
                extra_monthly: Decimal::ZERO,
            }),
            ..base_input()
        };
        assert!(calculate_emi(&late_lump).is_err());
    }

    #[test]
    fn test_tenure_beyond_horizon_rejected() {
        for tenure_months in [MAX_HORIZON_MONTHS + 1, u32::MAX] {
            let input = EmiInput {
                annual_rate: Decimal::ZERO,
                tenure_months,
                ..base_input()
            };
            let err = calculate_emi(&input).unwrap_err();
            assert!(matches!(err, FinCalcError::InvalidInput { .. }));
        }
        let longest = EmiInput {
            tenure_months: MAX_HORIZON_MONTHS,
            ..base_input()
        };
        let result = calculate_emi(&longest).unwrap();
        assert_eq!(result.result.schedule.len(), 600);
    }
}
