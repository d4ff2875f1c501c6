use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use artha_core::loans::amortization::{self, EmiInput};
use artha_core::loans::prepayment::{
    self, PrepayVsInvestInput, PrepaymentInput, PrepaymentStrategy,
};
use artha_core::with_metadata;

use crate::input;

/// Arguments for the EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (9 = 9%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: Option<u32>,

    /// Include the month-by-month schedule and yearly summary
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for solving the tenure of a fixed installment
#[derive(Args)]
pub struct TenureArgs {
    /// Monthly installment
    #[arg(long)]
    pub installment: Decimal,

    /// Outstanding principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Decimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    ReduceTenure,
    ReduceInstallment,
}

impl From<StrategyArg> for PrepaymentStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ReduceTenure => PrepaymentStrategy::ReduceTenure,
            StrategyArg::ReduceInstallment => PrepaymentStrategy::ReduceInstallment,
        }
    }
}

/// Arguments for prepayment analysis
#[derive(Args)]
pub struct PrepaymentArgs {
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub tenure_months: Option<u32>,

    /// Installments already paid
    #[arg(long, default_value_t = 0)]
    pub months_elapsed: u32,

    /// Lump sum paid towards principal
    #[arg(long)]
    pub amount: Option<Decimal>,

    #[arg(long, value_enum, default_value = "reduce-tenure")]
    pub strategy: StrategyArg,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the prepay-or-invest comparison
#[derive(Args)]
pub struct PrepayVsInvestArgs {
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual loan rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub tenure_months: Option<u32>,

    #[arg(long, default_value_t = 0)]
    pub months_elapsed: u32,

    #[arg(long)]
    pub lump_sum: Option<Decimal>,

    /// Expected annual return on the investment, in percent
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    /// Tax on investment gains as a decimal (0.10 = 10%)
    #[arg(long, default_value = "0")]
    pub gains_tax_rate: Decimal,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => EmiInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            include_schedule: args.schedule,
        },
    };

    let result = amortization::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_tenure(args: TenureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let exact = amortization::solve_tenure(args.installment, args.principal, args.rate)?;
    let months = amortization::whole_months(exact);

    let result = serde_json::json!({
        "tenure_months": months,
        "tenure_months_exact": exact.round_dp(4),
    });
    let assumptions = serde_json::json!({
        "installment": args.installment,
        "principal": args.principal,
        "annual_rate_percent": args.rate,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Reverse amortization: n = -ln(1 - P*R/I) / ln(1 + R)",
        &assumptions,
        Vec::new(),
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_prepayment(args: PrepaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pp_input: PrepaymentInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => PrepaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            months_elapsed: args.months_elapsed,
            prepayment_amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            strategy: args.strategy.into(),
        },
    };

    let result = prepayment::analyze_prepayment(&pp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_prepay_vs_invest(args: PrepayVsInvestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: PrepayVsInvestInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => PrepayVsInvestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            months_elapsed: args.months_elapsed,
            lump_sum: args
                .lump_sum
                .ok_or("--lump-sum is required (or provide --input)")?,
            expected_return_percent: args
                .expected_return
                .ok_or("--expected-return is required (or provide --input)")?,
            gains_tax_rate: args.gains_tax_rate,
        },
    };

    let result = prepayment::compare_prepay_vs_invest(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
