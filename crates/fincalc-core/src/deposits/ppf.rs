use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::utils::rounding::{percent_to_rate, round_currency};
use crate::utils::validation::{require_non_negative, require_positive};
use crate::FinCalcResult;

/// Statutory PPF interest rate (7.1% p.a., compounded yearly).
pub const PPF_RATE: Rate = dec!(0.071);
/// Lock-in tenure in years.
pub const PPF_TENURE_YEARS: u32 = 15;
pub const PPF_MIN_DEPOSIT: Money = dec!(500);
pub const PPF_MAX_DEPOSIT: Money = dec!(150_000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfInput {
    pub annual_deposit: Money,
    /// Not used in the projection; only `maturity_age` derives from it.
    pub current_age: u32,
    #[serde(default)]
    pub tax_slab: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfOutput {
    pub maturity_amount: Money,
    pub total_investment: Money,
    pub total_interest: Money,
    pub tax_savings: Money,
    pub maturity_age: u32,
    pub year_by_year: Vec<PpfYear>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfYear {
    pub year: u32,
    pub opening_balance: Money,
    pub deposit: Money,
    pub interest: Money,
    pub closing_balance: Money,
}

/// Project a PPF account over its 15-year lock-in. Deposits are made at the
/// start of each year and the balance is compounded once a year.
pub fn calculate_ppf(input: &PpfInput) -> FinCalcResult<ComputationOutput<PpfOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("annual_deposit", input.annual_deposit)?;
    require_positive("current_age", Decimal::from(input.current_age))?;
    require_non_negative("tax_slab", input.tax_slab)?;

    if input.annual_deposit < PPF_MIN_DEPOSIT {
        warnings.push(format!(
            "Annual deposit below the statutory minimum of {PPF_MIN_DEPOSIT}"
        ));
    }
    if input.annual_deposit > PPF_MAX_DEPOSIT {
        warnings.push(format!(
            "Annual deposit above the statutory maximum of {PPF_MAX_DEPOSIT}; excess earns no PPF interest in practice"
        ));
    }

    let mut balance = Decimal::ZERO;
    let mut year_by_year = Vec::with_capacity(PPF_TENURE_YEARS as usize);
    for year in 1..=PPF_TENURE_YEARS {
        let opening = balance;
        let invested = opening + input.annual_deposit;
        let interest = invested * PPF_RATE;
        balance = invested + interest;
        year_by_year.push(PpfYear {
            year,
            opening_balance: round_currency(opening),
            deposit: input.annual_deposit,
            interest: round_currency(interest),
            closing_balance: round_currency(balance),
        });
    }

    let tenure = Decimal::from(PPF_TENURE_YEARS);
    let total_investment = input.annual_deposit * tenure;
    let tax_savings = input.annual_deposit * percent_to_rate(input.tax_slab) * tenure;

    let output = PpfOutput {
        maturity_amount: round_currency(balance),
        total_investment,
        total_interest: round_currency(balance - total_investment),
        tax_savings: round_currency(tax_savings),
        maturity_age: input.current_age + PPF_TENURE_YEARS,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "rate": PPF_RATE.to_string(),
        "tenure_years": PPF_TENURE_YEARS,
        "deposit_timing": "start of year",
        "deduction": "annual deposit deductible every year at tax_slab",
    });

    Ok(with_metadata(
        "PPF year-by-year accumulation: balance = (balance + deposit) × (1 + rate)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_deposit() -> PpfInput {
        PpfInput {
            annual_deposit: dec!(150_000),
            current_age: 30,
            tax_slab: dec!(30),
        }
    }

    #[test]
    fn test_ppf_maturity_known_answer() {
        let result = calculate_ppf(&max_deposit()).unwrap();
        let out = &result.result;
        // 15 annual deposits of 1.5L at 7.1% ≈ 40,68,209.22
        assert!((out.maturity_amount - dec!(4_068_209.22)).abs() < dec!(0.01));
        assert_eq!(out.total_investment, dec!(2_250_000));
        assert_eq!(out.total_interest, out.maturity_amount - out.total_investment);
    }

    #[test]
    fn test_ppf_tax_savings() {
        let result = calculate_ppf(&max_deposit()).unwrap();
        // 150000 × 30% × 15
        assert_eq!(result.result.tax_savings, dec!(675_000));
    }

    #[test]
    fn test_ppf_age_is_inert() {
        let young = calculate_ppf(&max_deposit()).unwrap();
        let older = calculate_ppf(&PpfInput {
            current_age: 50,
            ..max_deposit()
        })
        .unwrap();
        assert_eq!(young.result.maturity_amount, older.result.maturity_amount);
        assert_eq!(older.result.maturity_age, 65);
    }

    #[test]
    fn test_ppf_year_table() {
        let result = calculate_ppf(&max_deposit()).unwrap();
        let years = &result.result.year_by_year;
        assert_eq!(years.len(), 15);
        assert_eq!(years[0].opening_balance, Decimal::ZERO);
        assert_eq!(years[0].closing_balance, dec!(160_650));
        assert_eq!(years[14].closing_balance, result.result.maturity_amount);
    }

    #[test]
    fn test_ppf_statutory_warnings() {
        let result = calculate_ppf(&PpfInput {
            annual_deposit: dec!(200_000),
            ..max_deposit()
        })
        .unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(calculate_ppf(&max_deposit()).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_ppf_zero_deposit_rejected() {
        let input = PpfInput {
            annual_deposit: Decimal::ZERO,
            ..max_deposit()
        };
        assert!(calculate_ppf(&input).is_err());
    }
}
