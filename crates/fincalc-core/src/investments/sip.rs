use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years, MAX_HORIZON_MONTHS};
use crate::utils::rounding::{monthly_rate, percent_to_rate, round_to_unit};
use crate::utils::validation::{require_non_negative_opt, require_positive};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_amount: Money,
    pub annual_rate: Percent,
    pub years: Years,
    /// Yearly increase in the instalment, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_up: Option<Percent>,
}

/// All amounts are whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipOutput {
    pub maturity_amount: Money,
    pub total_investment: Money,
    pub wealth_gained: Money,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_up_maturity: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_up_investment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_up_benefit: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Future value of a monthly SIP (annuity-due), with an optional yearly
/// step-up projection.
pub fn calculate_sip(input: &SipInput) -> FinCalcResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let months = total_months(input.years)?;
    let i = monthly_rate(input.annual_rate);
    tracing::debug!(
        monthly_amount = %input.monthly_amount,
        months,
        monthly_rate = %i,
        "calculating SIP"
    );

    let maturity = annuity_due_fv(input.monthly_amount, i, months)?;
    let total_investment = input.monthly_amount * Decimal::from(months);

    let step_up = input.step_up.filter(|s| *s > Decimal::ZERO);
    let (step_up_maturity, step_up_investment, step_up_benefit) = match step_up {
        Some(_) if months < 12 => {
            warnings.push(format!(
                "Step-up applies from the second year; a {months}-month SIP has no step-up projection"
            ));
            (None, None, None)
        }
        Some(pct) => {
            let whole_years = months / 12;
            if months % 12 != 0 {
                warnings.push(format!(
                    "Step-up projection covers {whole_years} whole years; the remaining {} months are left out of both sides of the comparison",
                    months % 12
                ));
            }
            let (value, invested) =
                step_up_projection(input.monthly_amount, input.annual_rate, pct, whole_years)?;
            // Benefit is measured against a flat SIP over the same whole years.
            let flat = annuity_due_fv(input.monthly_amount, i, whole_years * 12)?;
            (
                Some(round_to_unit(value)),
                Some(round_to_unit(invested)),
                Some(round_to_unit(value - flat)),
            )
        }
        None => (None, None, None),
    };

    let output = SipOutput {
        maturity_amount: round_to_unit(maturity),
        total_investment: round_to_unit(total_investment),
        wealth_gained: round_to_unit(maturity - total_investment),
        months,
        step_up_maturity,
        step_up_investment,
        step_up_benefit,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": i.to_string(),
        "instalment_timing": "start of month",
        "step_up_compounding": "yearly at the annual rate",
        "rounding": "whole currency units",
    });

    Ok(with_metadata(
        "SIP annuity-due FV = PMT × ((1+i)^m − 1)/i × (1+i)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// 12 × years rounded to the nearest whole month.
pub(crate) fn total_months(years: Years) -> FinCalcResult<u32> {
    let months = (years * dec!(12)).round();
    let months = months
        .to_u32()
        .ok_or_else(|| FinCalcError::Overflow {
            context: format!("{years} years in months"),
        })?;
    if months == 0 {
        return Err(FinCalcError::invalid("years", "duration must be at least one month"));
    }
    if months > MAX_HORIZON_MONTHS {
        return Err(FinCalcError::invalid(
            "years",
            format!("duration cannot exceed {MAX_HORIZON_MONTHS} months"),
        ));
    }
    Ok(months)
}

/// FV of `payment` made at the start of each of `months` periods.
pub(crate) fn annuity_due_fv(payment: Money, i: Decimal, months: u32) -> FinCalcResult<Money> {
    let factor = time_value::annuity_fv_factor(i, months)?;
    Ok(payment * factor * (Decimal::ONE + i))
}

/// Year `y` (0-based) contributes `12 × PMT × (1+s)^y`, grown at the annual
/// rate for the `years − y` years left. Returns (value, amount invested).
fn step_up_projection(
    monthly_amount: Money,
    annual_rate: Percent,
    step_up: Percent,
    years: u32,
) -> FinCalcResult<(Money, Money)> {
    let r = percent_to_rate(annual_rate);
    let s = percent_to_rate(step_up);
    let mut value = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    for y in 0..years {
        let instalment = monthly_amount * time_value::growth_factor(s, Decimal::from(y))?;
        let yearly = instalment * dec!(12);
        invested += yearly;
        value += yearly * time_value::growth_factor(r, Decimal::from(years - y))?;
    }
    Ok((value, invested))
}

fn validate_input(input: &SipInput) -> FinCalcResult<()> {
    require_positive("monthly_amount", input.monthly_amount)?;
    require_positive("annual_rate", input.annual_rate)?;
    require_positive("years", input.years)?;
    require_non_negative_opt("step_up", input.step_up)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
