use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use artha_core::time_value::{self, ContributionTiming};
use artha_core::wealth::goals::{self, GoalInput};
use artha_core::with_metadata;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimingArg {
    /// Deposit at the end of each month
    End,
    /// Deposit at the start of each month
    Beginning,
}

impl From<TimingArg> for ContributionTiming {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::End => ContributionTiming::End,
            TimingArg::Beginning => ContributionTiming::Beginning,
        }
    }
}

/// Arguments for lump-sum growth
#[derive(Args)]
pub struct FutureValueArgs {
    /// Amount invested today
    #[arg(long)]
    pub present_value: Decimal,

    /// Annual return in percent
    #[arg(long)]
    pub rate: Decimal,

    #[arg(long)]
    pub years: u32,
}

/// Arguments for the sinking-fund contribution
#[derive(Args)]
pub struct ContributionArgs {
    /// Amount to accumulate
    #[arg(long)]
    pub target: Decimal,

    /// Annual return in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Number of monthly deposits
    #[arg(long)]
    pub months: u32,
}

/// Arguments for goal planning
#[derive(Args)]
pub struct GoalArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// What the goal would cost today
    #[arg(long)]
    pub current_cost: Option<Decimal>,

    /// Annual inflation in percent
    #[arg(long, default_value = "6")]
    pub inflation: Decimal,

    #[arg(long)]
    pub years: Option<u32>,

    /// Expected annual return in percent
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    #[arg(long, default_value = "0")]
    pub existing_savings: Decimal,

    #[arg(long, value_enum, default_value = "end")]
    pub timing: TimingArg,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_future_value(args: FutureValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let future_value =
        time_value::project_future_value(args.present_value, args.rate, args.years)?;

    let result = serde_json::json!({
        "future_value": future_value.round_dp(2),
        "growth": (future_value - args.present_value).round_dp(2),
    });
    let assumptions = serde_json::json!({
        "present_value": args.present_value,
        "annual_rate_percent": args.rate,
        "years": args.years,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Annual compounding: FV = PV * (1 + r)^years",
        &assumptions,
        Vec::new(),
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_contribution(args: ContributionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    let contribution =
        time_value::required_periodic_contribution(args.target, args.rate, args.months)?;
    if contribution.is_zero() && args.target > Decimal::ZERO {
        warnings.push(
            "Rate or horizon is not positive; no growth-based contribution exists.".to_string(),
        );
    }

    let result = serde_json::json!({
        "monthly_contribution": contribution.round_dp(2),
        "total_contributed": (contribution * Decimal::from(args.months)).round_dp(2),
    });
    let assumptions = serde_json::json!({
        "target": args.target,
        "annual_rate_percent": args.rate,
        "months": args.months,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Sinking fund: C = FV * i / ((1 + i)^n - 1), i = annual% / 1200",
        &assumptions,
        warnings,
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_goal(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: GoalInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => GoalInput {
            name: args.name,
            current_cost: args
                .current_cost
                .ok_or("--current-cost is required (or provide --input)")?,
            inflation_percent: args.inflation,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            expected_return_percent: args
                .expected_return
                .ok_or("--expected-return is required (or provide --input)")?,
            existing_savings: args.existing_savings,
            timing: args.timing.into(),
        },
    };

    let result = goals::plan_goal(&goal_input)?;
    Ok(serde_json::to_value(result)?)
}
