use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::utils::rounding::{monthly_rate, round_to_unit};
use crate::utils::validation::{require_non_negative, require_positive};
use crate::FinCalcResult;

use super::sip::{annuity_due_fv, total_months};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalInput {
    pub target_amount: Money,
    pub annual_rate: Percent,
    pub years: Years,
    #[serde(default)]
    pub current_savings: Money,
}

/// All amounts are whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalOutput {
    pub required_monthly_saving: Money,
    pub months: u32,
    /// What today's savings grow to by the deadline.
    pub current_savings_future_value: Money,
    pub total_contributions: Money,
    pub interest_earned: Money,
}

/// Monthly saving (paid at the start of each month, same basis as a SIP)
/// needed to reach `target_amount`, after counting growth on existing
/// savings.
pub fn calculate_savings_goal(
    input: &SavingsGoalInput,
) -> FinCalcResult<ComputationOutput<SavingsGoalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("target_amount", input.target_amount)?;
    require_positive("annual_rate", input.annual_rate)?;
    require_positive("years", input.years)?;
    require_non_negative("current_savings", input.current_savings)?;

    let months = total_months(input.years)?;
    let i = monthly_rate(input.annual_rate);

    let grown_savings =
        input.current_savings * time_value::growth_factor(i, Decimal::from(months))?;
    let shortfall = input.target_amount - grown_savings;

    let required = if shortfall <= Decimal::ZERO {
        warnings.push("Current savings already reach the target; no monthly saving needed".into());
        Decimal::ZERO
    } else {
        // FV of one unit per month, annuity-due.
        let unit_fv = annuity_due_fv(Decimal::ONE, i, months)?;
        shortfall / unit_fv
    };

    let total_contributions = required * Decimal::from(months);
    let end_value = grown_savings + annuity_due_fv(required, i, months)?;
    let interest_earned = end_value - input.current_savings - total_contributions;

    let output = SavingsGoalOutput {
        required_monthly_saving: round_to_unit(required),
        months,
        current_savings_future_value: round_to_unit(grown_savings),
        total_contributions: round_to_unit(total_contributions),
        interest_earned: round_to_unit(interest_earned),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": i.to_string(),
        "instalment_timing": "start of month",
    });

    Ok(with_metadata(
        "Savings goal: shortfall / annuity-due FV factor",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investments::sip::{calculate_sip, SipInput};
    use rust_decimal_macros::dec;

    #[test]
    fn test_goal_inverts_sip() {
        // A 5000/month SIP at 12% for 10 years reaches 11,61,695.
        let result = calculate_savings_goal(&SavingsGoalInput {
            target_amount: dec!(1_161_695),
            annual_rate: dec!(12),
            years: dec!(10),
            current_savings: Decimal::ZERO,
        })
        .unwrap();
        assert_eq!(result.result.required_monthly_saving, dec!(5000));
        assert_eq!(result.result.total_contributions, dec!(600_000));
    }

    #[test]
    fn test_goal_round_trips_through_sip() {
        let goal = calculate_savings_goal(&SavingsGoalInput {
            target_amount: dec!(2_500_000),
            annual_rate: dec!(10),
            years: dec!(15),
            current_savings: Decimal::ZERO,
        })
        .unwrap();
        let sip = calculate_sip(&SipInput {
            monthly_amount: goal.result.required_monthly_saving,
            annual_rate: dec!(10),
            years: dec!(15),
            step_up: None,
        })
        .unwrap();
        // Whole-unit rounding of the instalment moves the result by < 1 month's growth.
        assert!((sip.result.maturity_amount - dec!(2_500_000)).abs() < dec!(500));
    }

    fn without_input() -> SavingsGoalInput {
        SavingsGoalInput {
            target_amount: dec!(1_000_000),
            annual_rate: dec!(8),
            years: dec!(5),
            current_savings: Decimal::ZERO,
        }
    }

    #[test]
    fn test_existing_savings_reduce_requirement() {
        let without = calculate_savings_goal(&without_input()).unwrap();
        let with = calculate_savings_goal(&SavingsGoalInput {
            current_savings: dec!(200_000),
            ..without_input()
        })
        .unwrap();
        assert!(with.result.required_monthly_saving < without.result.required_monthly_saving);
        assert!(with.result.current_savings_future_value > dec!(200_000));
    }

    #[test]
    fn test_goal_already_met() {
        let result = calculate_savings_goal(&SavingsGoalInput {
            current_savings: dec!(1_000_000),
            ..without_input()
        })
        .unwrap();
        assert_eq!(result.result.required_monthly_saving, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_goal_rejects_zero_target() {
        assert!(calculate_savings_goal(&SavingsGoalInput {
            target_amount: Decimal::ZERO,
            ..without_input()
        })
        .is_err());
    }
}
