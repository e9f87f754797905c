use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::cards::payoff::{self, CardPayoffInput, PaymentStrategy};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Minimum,
    Fixed,
    Aggressive,
}

impl From<StrategyArg> for PaymentStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Minimum => PaymentStrategy::Minimum,
            StrategyArg::Fixed => PaymentStrategy::Fixed,
            StrategyArg::Aggressive => PaymentStrategy::Aggressive,
        }
    }
}

/// Arguments for credit card payoff
#[derive(Args)]
pub struct CreditCardArgs {
    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 36)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Minimum due each month (default: 3% of the balance)
    #[arg(long)]
    pub minimum_payment: Option<Decimal>,

    /// Fixed monthly payment for the fixed strategy
    #[arg(long)]
    pub fixed_payment: Option<Decimal>,

    /// Strategy to report in detail
    #[arg(long, value_enum, default_value = "minimum")]
    pub strategy: StrategyArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_credit_card(args: CreditCardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let card_input: CardPayoffInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CardPayoffInput {
            balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            minimum_payment: args.minimum_payment.unwrap_or(Decimal::ZERO),
            fixed_payment: args.fixed_payment.unwrap_or(Decimal::ZERO),
            strategy: args.strategy.into(),
        }
    };
    let result = payoff::calculate_payoff(&card_input)?;
    Ok(serde_json::to_value(result)?)
}
