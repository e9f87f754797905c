use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use fincalc_core::deposits::compound::{
    self, CompoundGrowthInput, FixedDepositInput, LumpSumInput,
};
use fincalc_core::deposits::ppf::{self, PpfInput};
use fincalc_core::CompoundFrequency;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Yearly,
    Quarterly,
    Monthly,
}

impl From<FrequencyArg> for CompoundFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Yearly => CompoundFrequency::Yearly,
            FrequencyArg::Quarterly => CompoundFrequency::Quarterly,
            FrequencyArg::Monthly => CompoundFrequency::Monthly,
        }
    }
}

/// Arguments for compound interest
#[derive(Args)]
pub struct CompoundArgs {
    /// Starting amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Duration in years (fractions allowed)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Compounding frequency for the principal
    #[arg(long, value_enum, default_value = "yearly")]
    pub frequency: FrequencyArg,

    /// Amount added at the end of every month
    #[arg(long)]
    pub monthly_contribution: Option<Decimal>,

    /// Tax rate on interest in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for fixed deposit maturity
#[derive(Args)]
pub struct FixedDepositArgs {
    /// Deposit amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years (fractions allowed)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Compounding frequency
    #[arg(long, value_enum, default_value = "quarterly")]
    pub frequency: FrequencyArg,

    /// Tax rate on interest in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for lump-sum growth
#[derive(Args)]
pub struct LumpSumArgs {
    /// Amount invested
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for PPF projection
#[derive(Args)]
pub struct PpfArgs {
    /// Yearly deposit
    #[arg(long)]
    pub deposit: Option<Decimal>,

    /// Current age of the account holder
    #[arg(long)]
    pub age: Option<u32>,

    /// Income tax slab in percent
    #[arg(long)]
    pub tax_slab: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: CompoundGrowthInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CompoundGrowthInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            frequency: args.frequency.into(),
            monthly_contribution: args.monthly_contribution,
            tax_rate: args.tax_rate,
        }
    };
    let result = compound::calculate_compound_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fixed_deposit(args: FixedDepositArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fd_input: FixedDepositInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FixedDepositInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            frequency: args.frequency.into(),
            tax_rate: args.tax_rate,
        }
    };
    let result = compound::calculate_fixed_deposit(&fd_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_lump_sum(args: LumpSumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ls_input: LumpSumInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LumpSumInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };
    let result = compound::calculate_lump_sum(&ls_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_ppf(args: PpfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ppf_input: PpfInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PpfInput {
            annual_deposit: args.deposit.unwrap_or(dec!(150_000)),
            current_age: args.age.ok_or("--age is required (or provide --input)")?,
            tax_slab: args.tax_slab.unwrap_or(Decimal::ZERO),
        }
    };
    let result = ppf::calculate_ppf(&ppf_input)?;
    Ok(serde_json::to_value(result)?)
}
