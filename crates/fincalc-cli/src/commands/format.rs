use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use fincalc_core::utils::format::{format_compact_inr, format_inr, format_percent};
use fincalc_core::utils::parse::parse_amount_strict;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatStyle {
    /// ₹12,34,567.89
    Inr,
    /// ₹12.35 L
    Compact,
    /// 7.10%
    Percent,
}

/// Arguments for amount formatting
#[derive(Args)]
pub struct FormatArgs {
    /// Amount as typed (commas and ₹ allowed)
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Display style
    #[arg(long, value_enum, default_value = "inr")]
    pub style: FormatStyle,

    /// Decimal places
    #[arg(long, default_value = "2")]
    pub dp: u32,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amount = parse_amount_strict("amount", &args.amount)?;
    let formatted = match args.style {
        FormatStyle::Inr => format_inr(amount, args.dp),
        FormatStyle::Compact => format_compact_inr(amount),
        FormatStyle::Percent => format_percent(amount, args.dp),
    };
    Ok(json!({
        "amount": amount.to_string(),
        "formatted": formatted,
    }))
}
