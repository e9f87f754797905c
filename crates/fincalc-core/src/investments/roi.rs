use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::utils::rounding::rate_to_percent;
use crate::utils::validation::{require_non_negative_opt, require_positive};
use crate::FinCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiInput {
    pub initial_investment: Money,
    pub final_value: Money,
    /// Holding period. Zero or absent skips the annualised figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Years>,
    /// Fees, brokerage, taxes paid on top of the initial investment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_costs: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiOutput {
    pub total_investment: Money,
    pub total_gain: Money,
    pub total_roi: Percent,
    /// CAGR in percent; zero when no holding period was given, or when the
    /// period is so short that annualising leaves the decimal range.
    pub annualized_roi: Percent,
}

/// Total and annualised (CAGR) return on an investment.
pub fn calculate_roi(input: &RoiInput) -> FinCalcResult<ComputationOutput<RoiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("initial_investment", input.initial_investment)?;
    require_positive("final_value", input.final_value)?;
    require_non_negative_opt("years", input.years)?;
    require_non_negative_opt("additional_costs", input.additional_costs)?;

    let total_investment = input.initial_investment + input.additional_costs.unwrap_or(Decimal::ZERO);
    let total_gain = input.final_value - total_investment;
    let total_roi = rate_to_percent(total_gain / total_investment);

    let years = input.years.unwrap_or(Decimal::ZERO);
    let annualized_roi = if years > Decimal::ZERO {
        // (final / invested)^(1/years) − 1
        let growth = input.final_value / total_investment - Decimal::ONE;
        match time_value::growth_factor(growth, Decimal::ONE / years) {
            Ok(factor) => rate_to_percent(factor - Decimal::ONE),
            Err(FinCalcError::Overflow { context }) => {
                tracing::warn!(years = %years, %context, "annualised return out of range");
                warnings.push(format!(
                    "A holding period of {years} years is too short to annualise; annualized_roi is reported as 0"
                ));
                Decimal::ZERO
            }
            Err(e) => return Err(e),
        }
    } else {
        Decimal::ZERO
    };

    let output = RoiOutput {
        total_investment,
        total_gain,
        total_roi: total_roi.round_dp(4),
        annualized_roi: annualized_roi.round_dp(4),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "years": years.to_string(),
        "costs_added_to_investment": true,
    });

    Ok(with_metadata(
        "ROI = gain / invested; CAGR = (final / invested)^(1/years) − 1",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
