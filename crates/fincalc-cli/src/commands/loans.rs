use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::loans::eligibility::{self, EligibilityInput, LoanType};
use fincalc_core::loans::emi::{self, EmiInput, Prepayment};

use crate::input;

/// Arguments for EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub months: Option<u32>,

    /// One-off prepayment amount
    #[arg(long)]
    pub lump_sum: Option<Decimal>,

    /// Month in which the lump sum is paid
    #[arg(long, default_value = "1")]
    pub lump_sum_month: u32,

    /// Extra amount paid every month on top of the EMI
    #[arg(long)]
    pub extra_monthly: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Home,
    Car,
    Personal,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Home => LoanType::Home,
            LoanTypeArg::Car => LoanType::Car,
            LoanTypeArg::Personal => LoanType::Personal,
        }
    }
}

/// Arguments for loan eligibility
#[derive(Args)]
pub struct EligibilityArgs {
    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// EMIs already being paid each month
    #[arg(long)]
    pub existing_emi: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Loan product, which sets the FOIR ceiling
    #[arg(long, value_enum, default_value = "home")]
    pub loan_type: LoanTypeArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let prepayment = if args.lump_sum.is_some() || args.extra_monthly.is_some() {
            Some(Prepayment {
                lump_sum: args.lump_sum.unwrap_or(Decimal::ZERO),
                lump_sum_month: args.lump_sum_month,
                extra_monthly: args.extra_monthly.unwrap_or(Decimal::ZERO),
            })
        } else {
            None
        };
        EmiInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_months: args.months.ok_or("--months is required (or provide --input)")?,
            prepayment,
        }
    };
    let result = emi::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let elig_input: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EligibilityInput {
            monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            existing_emi: args.existing_emi.unwrap_or(Decimal::ZERO),
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_years: args.years.ok_or("--years is required (or provide --input)")?,
            loan_type: args.loan_type.into(),
        }
    };
    let result = eligibility::calculate_eligibility(&elig_input)?;
    Ok(serde_json::to_value(result)?)
}
