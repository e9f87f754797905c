use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, MAX_HORIZON_YEARS};
use crate::utils::rounding::{monthly_rate, rate_to_percent, round_currency};
use crate::utils::validation::{require_at_most, require_non_negative, require_positive};
use crate::FinCalcResult;

/// Share of the maximum loan a lender would comfortably sanction.
const RECOMMENDED_SHARE: Decimal = dec!(0.8);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Home,
    Car,
    Personal,
}

impl LoanType {
    /// Fixed-obligation-to-income ceiling for the product.
    pub fn foir(self) -> Rate {
        match self {
            LoanType::Home => dec!(0.50),
            LoanType::Car => dec!(0.40),
            LoanType::Personal => dec!(0.30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub existing_emi: Money,
    pub annual_rate: Percent,
    pub tenure_years: u32,
    pub loan_type: LoanType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityOutput {
    pub foir: Rate,
    /// income × FOIR − existing EMI. Negative when current obligations
    /// already exceed the ceiling.
    pub emi_headroom: Money,
    /// `emi_headroom` floored at zero.
    pub max_emi: Money,
    pub max_loan_amount: Money,
    pub recommended_loan_amount: Money,
    pub tenure_months: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Size the largest loan the applicant's income supports under the FOIR
/// ceiling for the chosen loan type.
pub fn calculate_eligibility(
    input: &EligibilityInput,
) -> FinCalcResult<ComputationOutput<EligibilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let foir = input.loan_type.foir();
    let emi_headroom = input.monthly_income * foir - input.existing_emi;
    let max_emi = if emi_headroom < Decimal::ZERO {
        tracing::warn!(
            headroom = %emi_headroom,
            "existing obligations exceed FOIR ceiling"
        );
        warnings.push(format!(
            "Existing EMIs exceed the {}% FOIR ceiling by {}; no new loan is affordable",
            rate_to_percent(foir).normalize(),
            round_currency(-emi_headroom)
        ));
        Decimal::ZERO
    } else {
        emi_headroom
    };

    let tenure_months = input.tenure_years * 12;
    let rate = monthly_rate(input.annual_rate);
    let max_loan = time_value::pv_of_annuity(rate, tenure_months, max_emi)?;
    let max_loan_amount = round_currency(max_loan);

    let output = EligibilityOutput {
        foir,
        emi_headroom: round_currency(emi_headroom),
        max_emi: round_currency(max_emi),
        max_loan_amount,
        recommended_loan_amount: max_loan_amount * RECOMMENDED_SHARE,
        tenure_months,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "foir": foir.to_string(),
        "monthly_rate": rate.to_string(),
        "recommended_share": RECOMMENDED_SHARE.to_string(),
        "negative_headroom": "clamped_to_zero",
    });

    Ok(with_metadata(
        "FOIR affordability with inverted EMI annuity",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &EligibilityInput) -> FinCalcResult<()> {
    require_positive("monthly_income", input.monthly_income)?;
    require_non_negative("existing_emi", input.existing_emi)?;
    require_positive("annual_rate", input.annual_rate)?;
    require_positive("tenure_years", Decimal::from(input.tenure_years))?;
    require_at_most(
        "tenure_years",
        Decimal::from(input.tenure_years),
        Decimal::from(MAX_HORIZON_YEARS),
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn home_loan() -> EligibilityInput {
        EligibilityInput {
            monthly_income: dec!(100_000),
            existing_emi: dec!(10_000),
            annual_rate: dec!(8.5),
            tenure_years: 20,
            loan_type: LoanType::Home,
        }
    }

    #[test]
    fn test_max_emi_from_foir() {
        let result = calculate_eligibility(&home_loan()).unwrap();
        assert_eq!(result.result.max_emi, dec!(40_000));
        assert_eq!(result.result.tenure_months, 240);
    }

    #[test]
    fn test_max_loan_inverts_emi() {
        let result = calculate_eligibility(&home_loan()).unwrap();
        // 40000 × ((1+i)^240 − 1)/(i(1+i)^240), i = 0.085/12 ≈ 46,09,233.59
        assert!((result.result.max_loan_amount - dec!(4_609_233.59)).abs() < dec!(0.05));
    }

    #[test]
    fn test_recommended_is_eighty_percent() {
        let result = calculate_eligibility(&home_loan()).unwrap();
        let out = &result.result;
        assert_eq!(out.recommended_loan_amount, out.max_loan_amount * dec!(0.8));
    }

    #[test]
    fn test_foir_by_loan_type() {
        for (loan_type, expected) in [
            (LoanType::Home, dec!(40_000)),
            (LoanType::Car, dec!(30_000)),
            (LoanType::Personal, dec!(20_000)),
        ] {
            let input = EligibilityInput {
                loan_type,
                ..home_loan()
            };
            let result = calculate_eligibility(&input).unwrap();
            assert_eq!(result.result.max_emi, expected, "{loan_type:?}");
        }
    }

    #[test]
    fn test_negative_headroom_clamped() {
        let input = EligibilityInput {
            existing_emi: dec!(35_000),
            loan_type: LoanType::Personal,
            ..home_loan()
        };
        let result = calculate_eligibility(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.emi_headroom, dec!(-5_000));
        assert_eq!(out.max_emi, Decimal::ZERO);
        assert_eq!(out.max_loan_amount, Decimal::ZERO);
        assert_eq!(out.recommended_loan_amount, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_tenure_beyond_horizon_rejected() {
        for tenure_years in [MAX_HORIZON_YEARS + 1, 400_000_000, u32::MAX] {
            let input = EligibilityInput {
                tenure_years,
                ..home_loan()
            };
            let err = calculate_eligibility(&input).unwrap_err();
            assert!(matches!(err, crate::FinCalcError::InvalidInput { .. }));
        }
        let longest = EligibilityInput {
            tenure_years: MAX_HORIZON_YEARS,
            ..home_loan()
        };
        let result = calculate_eligibility(&longest).unwrap();
        assert_eq!(result.result.tenure_months, 600);
    }

    #[test]
    fn test_invalid_income_rejected() {
        let input = EligibilityInput {
            monthly_income: Decimal::ZERO,
            ..home_loan()
        };
        assert!(calculate_eligibility(&input).is_err());
    }
}
