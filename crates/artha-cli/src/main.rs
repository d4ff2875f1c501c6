mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::growth::{ContributionArgs, FutureValueArgs, GoalArgs};
use commands::loans::{EmiArgs, PrepayVsInvestArgs, PrepaymentArgs, TenureArgs};
use commands::planning::{AllocateArgs, BudgetArgs, NetWorthArgs};
use commands::tax::{AdvanceTaxArgs, CompareRegimesArgs, PresumptiveArgs, TaxArgs};

/// Personal-finance calculations
#[derive(Parser)]
#[command(
    name = "artha",
    version,
    about = "Personal-finance calculations with decimal precision",
    long_about = "A CLI for everyday personal-finance math with decimal precision. \
                  Supports loan EMIs and prepayments, slab-based income tax, \
                  advance tax, savings goals, budgets and net worth."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Equated monthly installment with optional amortization schedule
    Emi(EmiArgs),
    /// Months a fixed installment needs to retire a balance
    Tenure(TenureArgs),
    /// Effect of a lump-sum prepayment on a running loan
    Prepayment(PrepaymentArgs),
    /// Prepay the loan or invest the lump sum
    PrepayVsInvest(PrepayVsInvestArgs),
    /// Income tax on a taxable income
    Tax(TaxArgs),
    /// Compare the old and new tax regimes
    CompareRegimes(CompareRegimesArgs),
    /// Tax on presumptive business or professional income
    Presumptive(PresumptiveArgs),
    /// Advance-tax installment schedule
    AdvanceTax(AdvanceTaxArgs),
    /// Future value of a lump sum
    FutureValue(FutureValueArgs),
    /// Monthly deposit needed to reach a target
    Contribution(ContributionArgs),
    /// Plan a savings goal
    Goal(GoalArgs),
    /// Split an amount by percentages
    Allocate(AllocateArgs),
    /// Split a budget across categories
    Budget(BudgetArgs),
    /// Net worth from assets and liabilities
    NetWorth(NetWorthArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::Tenure(args) => commands::loans::run_tenure(args),
        Commands::Prepayment(args) => commands::loans::run_prepayment(args),
        Commands::PrepayVsInvest(args) => commands::loans::run_prepay_vs_invest(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::CompareRegimes(args) => commands::tax::run_compare_regimes(args),
        Commands::Presumptive(args) => commands::tax::run_presumptive(args),
        Commands::AdvanceTax(args) => commands::tax::run_advance_tax(args),
        Commands::FutureValue(args) => commands::growth::run_future_value(args),
        Commands::Contribution(args) => commands::growth::run_contribution(args),
        Commands::Goal(args) => commands::growth::run_goal(args),
        Commands::Allocate(args) => commands::planning::run_allocate(args),
        Commands::Budget(args) => commands::planning::run_budget(args),
        Commands::NetWorth(args) => commands::planning::run_net_worth(args),
        Commands::Version => {
            println!("artha {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
