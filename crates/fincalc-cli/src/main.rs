mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cards::CreditCardArgs;
use commands::deposits::{CompoundArgs, FixedDepositArgs, LumpSumArgs, PpfArgs};
use commands::format::FormatArgs;
use commands::investments::{RoiArgs, SavingsGoalArgs, SipArgs};
use commands::loans::{EligibilityArgs, EmiArgs};

/// Retail banking and investment calculators
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Retail banking and investment calculators",
    long_about = "A CLI for everyday banking calculations with decimal precision. \
                  Supports loan EMIs and prepayments, fixed deposits, compound interest, \
                  SIPs, savings goals, PPF, credit card payoff, loan eligibility and ROI."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Loan EMI with amortization schedule and prepayment savings
    Emi(EmiArgs),
    /// Compound interest with optional monthly top-up and tax
    Compound(CompoundArgs),
    /// Fixed deposit maturity
    Fd(FixedDepositArgs),
    /// Lump-sum growth compounded yearly
    LumpSum(LumpSumArgs),
    /// Systematic investment plan with optional yearly step-up
    Sip(SipArgs),
    /// Monthly saving needed to reach a target
    SavingsGoal(SavingsGoalArgs),
    /// Public Provident Fund projection
    Ppf(PpfArgs),
    /// Credit card payoff under minimum / fixed / aggressive payments
    CreditCard(CreditCardArgs),
    /// Maximum loan affordable under FOIR limits
    Eligibility(EligibilityArgs),
    /// Total and annualised return on investment
    Roi(RoiArgs),
    /// Render an amount as rupees, compact rupees or a percentage
    Format(FormatArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fincalc_core=debug,fincalc_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fincalc_core=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::Compound(args) => commands::deposits::run_compound(args),
        Commands::Fd(args) => commands::deposits::run_fixed_deposit(args),
        Commands::LumpSum(args) => commands::deposits::run_lump_sum(args),
        Commands::Sip(args) => commands::investments::run_sip(args),
        Commands::SavingsGoal(args) => commands::investments::run_savings_goal(args),
        Commands::Ppf(args) => commands::deposits::run_ppf(args),
        Commands::CreditCard(args) => commands::cards::run_credit_card(args),
        Commands::Eligibility(args) => commands::loans::run_eligibility(args),
        Commands::Roi(args) => commands::investments::run_roi(args),
        Commands::Format(args) => commands::format::run_format(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
