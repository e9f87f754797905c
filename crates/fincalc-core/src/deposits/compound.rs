use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value;
use crate::types::{
    with_metadata, CompoundFrequency, ComputationOutput, Money, Percent, Years, MAX_HORIZON_YEARS,
};
use crate::utils::rounding::{
    monthly_rate, percent_to_rate, periodic_rate, rate_to_percent, round_currency,
};
use crate::utils::validation::{require_at_most, require_non_negative_opt, require_positive};
use crate::FinCalcResult;

/// Interest up to this amount attracts no tax deduction.
pub const TAX_FREE_INTEREST_THRESHOLD: Money = dec!(40_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the general compound-growth engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundGrowthInput {
    pub principal: Money,
    pub annual_rate: Percent,
    pub years: Years,
    #[serde(default)]
    pub frequency: CompoundFrequency,
    /// Added at the end of every month, compounded monthly regardless of
    /// `frequency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_contribution: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Percent>,
}

/// Fixed deposit: a lump sum with an optional tax rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDepositInput {
    pub principal: Money,
    pub annual_rate: Percent,
    pub years: Years,
    #[serde(default)]
    pub frequency: CompoundFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Percent>,
}

/// Lump-sum investment compounded yearly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub principal: Money,
    pub annual_rate: Percent,
    pub years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundGrowthOutput {
    pub maturity_amount: Money,
    pub total_contributions: Money,
    pub interest_earned: Money,
    /// Simple average of total growth per year, in percent.
    pub effective_annual_rate: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_payable: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_tax_returns: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_tax_maturity: Option<Money>,
    pub yearly_breakdown: Vec<GrowthYear>,
}

/// Balance at the end of a whole year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub contributions_to_date: Money,
    pub interest_to_date: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Closed-form compound growth: `P·(1 + r/n)^(n·t)`, plus the future value of
/// monthly contributions at the monthly rate, plus FD-style tax on interest.
pub fn calculate_compound_growth(
    input: &CompoundGrowthInput,
) -> FinCalcResult<ComputationOutput<CompoundGrowthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    tracing::debug!(
        principal = %input.principal,
        annual_rate = %input.annual_rate,
        years = %input.years,
        frequency = ?input.frequency,
        "calculating compound growth"
    );

    let contribution = input.monthly_contribution.unwrap_or(Decimal::ZERO);
    let final_amount = grown_value(input, contribution, input.years)?;
    let total_contributions = input.principal + contribution * dec!(12) * input.years;
    let interest_earned = final_amount - total_contributions;

    let effective_annual_rate =
        rate_to_percent((final_amount / total_contributions - Decimal::ONE) / input.years);

    let (tax_payable, post_tax_returns, post_tax_maturity) = match input.tax_rate {
        Some(tax_pct) => {
            let tax = if interest_earned > TAX_FREE_INTEREST_THRESHOLD {
                interest_earned * percent_to_rate(tax_pct)
            } else {
                if !tax_pct.is_zero() {
                    warnings.push(format!(
                        "Interest of {} is within the {} tax-free threshold; no tax applied",
                        round_currency(interest_earned),
                        TAX_FREE_INTEREST_THRESHOLD
                    ));
                }
                Decimal::ZERO
            };
            (
                Some(round_currency(tax)),
                Some(round_currency(interest_earned - tax)),
                Some(round_currency(final_amount - tax)),
            )
        }
        None => (None, None, None),
    };

    let whole_years = input.years.trunc().to_u32().unwrap_or(0);
    let mut yearly_breakdown = Vec::new();
    for year in 1..=whole_years {
        let t = Decimal::from(year);
        let balance = grown_value(input, contribution, t)?;
        let contributed = input.principal + contribution * dec!(12) * t;
        yearly_breakdown.push(GrowthYear {
            year,
            contributions_to_date: round_currency(contributed),
            interest_to_date: round_currency(balance - contributed),
            balance: round_currency(balance),
        });
    }

    let output = CompoundGrowthOutput {
        maturity_amount: round_currency(final_amount),
        total_contributions: round_currency(total_contributions),
        interest_earned: round_currency(interest_earned),
        effective_annual_rate: effective_annual_rate.round_dp(4),
        tax_payable,
        post_tax_returns,
        post_tax_maturity,
        yearly_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "periods_per_year": input.frequency.periods_per_year(),
        "contribution_basis": "monthly, end of period",
        "tax_free_interest_threshold": TAX_FREE_INTEREST_THRESHOLD.to_string(),
    });

    Ok(with_metadata(
        "Compound interest A = P(1 + r/n)^(nt) with monthly annuity top-up",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Fixed deposit maturity with optional tax on interest.
pub fn calculate_fixed_deposit(
    input: &FixedDepositInput,
) -> FinCalcResult<ComputationOutput<CompoundGrowthOutput>> {
    calculate_compound_growth(&CompoundGrowthInput {
        principal: input.principal,
        annual_rate: input.annual_rate,
        years: input.years,
        frequency: input.frequency,
        monthly_contribution: None,
        tax_rate: input.tax_rate,
    })
}

/// Lump-sum growth, compounded once a year.
pub fn calculate_lump_sum(
    input: &LumpSumInput,
) -> FinCalcResult<ComputationOutput<CompoundGrowthOutput>> {
    calculate_compound_growth(&CompoundGrowthInput {
        principal: input.principal,
        annual_rate: input.annual_rate,
        years: input.years,
        frequency: CompoundFrequency::Yearly,
        monthly_contribution: None,
        tax_rate: None,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Principal compounded at `frequency` plus contributions compounded
/// monthly, both after `years`.
fn grown_value(input: &CompoundGrowthInput, contribution: Money, years: Years) -> FinCalcResult<Money> {
    let n = input.frequency.periods_per_year();
    let principal_factor =
        time_value::growth_factor(periodic_rate(input.annual_rate, n), Decimal::from(n) * years)?;
    let mut value = input.principal * principal_factor;

    if contribution > Decimal::ZERO {
        let i = monthly_rate(input.annual_rate);
        let months = dec!(12) * years;
        // Rates too small for the decimal scale leave plain contributions.
        if i.is_zero() {
            value += contribution * months;
        } else {
            let factor = time_value::growth_factor(i, months)?;
            value += contribution * (factor - Decimal::ONE) / i;
        }
    }
    Ok(value)
}

fn validate_input(input: &CompoundGrowthInput) -> FinCalcResult<()> {
    require_positive("principal", input.principal)?;
    require_positive("annual_rate", input.annual_rate)?;
    require_positive("years", input.years)?;
    require_at_most("years", input.years, Decimal::from(MAX_HORIZON_YEARS))?;
    require_non_negative_opt("monthly_contribution", input.monthly_contribution)?;
    require_non_negative_opt("tax_rate", input.tax_rate)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FinCalcError;

    fn fd_input() -> CompoundGrowthInput {
        CompoundGrowthInput {
            principal: dec!(100_000),
            annual_rate: dec!(7),
            years: dec!(5),
            frequency: CompoundFrequency::Quarterly,
            monthly_contribution: None,
            tax_rate: None,
        }
    }

    #[test]
    fn test_quarterly_fd_known_answer() {
        let result = calculate_compound_growth(&fd_input()).unwrap();
        // 100000 × 1.0175^20 = 141477.82
        assert_eq!(result.result.maturity_amount, dec!(141477.82));
        assert_eq!(result.result.interest_earned, dec!(41477.82));
        assert!(result.result.tax_payable.is_none());
    }

    #[test]
    fn test_monthly_contribution_uses_monthly_basis() {
        let input = CompoundGrowthInput {
            monthly_contribution: Some(dec!(2000)),
            ..fd_input()
        };
        let result = calculate_compound_growth(&input).unwrap();
        let out = &result.result;
        // 141477.82 + 2000 × ((1 + 0.07/12)^60 − 1)/(0.07/12) = 284663.62
        assert!((out.maturity_amount - dec!(284663.62)).abs() < dec!(0.01));
        assert_eq!(out.total_contributions, dec!(220_000));
        assert!((out.effective_annual_rate - dec!(5.8785)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_tax_above_threshold() {
        let input = CompoundGrowthInput {
            principal: dec!(500_000),
            annual_rate: dec!(7.5),
            years: dec!(3),
            tax_rate: Some(dec!(30)),
            ..fd_input()
        };
        let result = calculate_compound_growth(&input).unwrap();
        let out = &result.result;
        // interest ≈ 124858.19, tax = 30% of that
        assert!((out.tax_payable.unwrap() - dec!(37457.46)).abs() < dec!(0.01));
        assert_eq!(
            out.post_tax_returns.unwrap(),
            out.interest_earned - out.tax_payable.unwrap()
        );
    }

    #[test]
    fn test_tax_below_threshold_is_zero() {
        let input = CompoundGrowthInput {
            principal: dec!(50_000),
            years: dec!(2),
            tax_rate: Some(dec!(30)),
            ..fd_input()
        };
        let result = calculate_compound_growth(&input).unwrap();
        assert_eq!(result.result.tax_payable, Some(Decimal::ZERO));
        assert_eq!(result.result.post_tax_returns, Some(result.result.interest_earned));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_yearly_breakdown_ends_at_maturity() {
        let result = calculate_compound_growth(&fd_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.yearly_breakdown.len(), 5);
        assert_eq!(out.yearly_breakdown.last().unwrap().balance, out.maturity_amount);
    }

    #[test]
    fn test_lump_sum_yearly() {
        let result = calculate_lump_sum(&LumpSumInput {
            principal: dec!(100_000),
            annual_rate: dec!(8),
            years: dec!(10),
        })
        .unwrap();
        assert_eq!(result.result.maturity_amount, dec!(215892.50));
    }

    #[test]
    fn test_rate_below_decimal_scale_with_contribution() {
        // 1e-28 % a year is positive but rounds to a zero monthly rate.
        let input = CompoundGrowthInput {
            annual_rate: Decimal::new(1, 28),
            monthly_contribution: Some(dec!(100)),
            ..fd_input()
        };
        let result = calculate_compound_growth(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.maturity_amount, dec!(106_000));
        assert_eq!(out.interest_earned, Decimal::ZERO);
        assert_eq!(out.yearly_breakdown.len(), 5);
    }

    #[test]
    fn test_years_beyond_horizon_rejected() {
        for years in [dec!(50.01), dec!(4_000_000_000)] {
            let input = CompoundGrowthInput {
                years,
                annual_rate: Decimal::new(1, 28),
                ..fd_input()
            };
            let err = calculate_compound_growth(&input).unwrap_err();
            assert!(matches!(err, FinCalcError::InvalidInput { .. }));
        }
        let longest = CompoundGrowthInput {
            years: Decimal::from(MAX_HORIZON_YEARS),
            ..fd_input()
        };
        let result = calculate_compound_growth(&longest).unwrap();
        assert_eq!(result.result.yearly_breakdown.len(), 50);
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        for input in [
            CompoundGrowthInput { principal: Decimal::ZERO, ..fd_input() },
            CompoundGrowthInput { annual_rate: dec!(-1), ..fd_input() },
            CompoundGrowthInput { years: Decimal::ZERO, ..fd_input() },
        ] {
            let err = calculate_compound_growth(&input).unwrap_err();
            assert!(matches!(err, FinCalcError::InvalidInput { .. }));
        }
    }
}
