use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::investments::roi::{self, RoiInput};
use fincalc_core::investments::savings_goal::{self, SavingsGoalInput};
use fincalc_core::investments::sip::{self, SipInput};

use crate::input;

/// Arguments for SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Monthly instalment
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Yearly increase in the instalment, in percent
    #[arg(long)]
    pub step_up: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for savings goal planning
#[derive(Args)]
pub struct SavingsGoalArgs {
    /// Amount to accumulate
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years until the goal
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Savings already set aside for the goal
    #[arg(long)]
    pub current_savings: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for return on investment
#[derive(Args)]
pub struct RoiArgs {
    /// Amount originally invested
    #[arg(long)]
    pub initial: Option<Decimal>,

    /// Current or exit value
    #[arg(long = "final")]
    pub final_value: Option<Decimal>,

    /// Holding period in years (omit for no annualised figure)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Fees and charges paid on top of the investment
    #[arg(long)]
    pub costs: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SipInput {
            monthly_amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            step_up: args.step_up,
        }
    };
    let result = sip::calculate_sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_savings_goal(args: SavingsGoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: SavingsGoalInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SavingsGoalInput {
            target_amount: args.target.ok_or("--target is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            current_savings: args.current_savings.unwrap_or(Decimal::ZERO),
        }
    };
    let result = savings_goal::calculate_savings_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let roi_input: RoiInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RoiInput {
            initial_investment: args.initial.ok_or("--initial is required (or provide --input)")?,
            final_value: args.final_value.ok_or("--final is required (or provide --input)")?,
            years: args.years,
            additional_costs: args.costs,
        }
    };
    let result = roi::calculate_roi(&roi_input)?;
    Ok(serde_json::to_value(result)?)
}
