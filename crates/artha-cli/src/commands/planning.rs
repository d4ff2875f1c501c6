use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use artha_core::allocation::budget::{self, BudgetInput, BudgetTemplate};
use artha_core::allocation::split::allocate_by_percentages;
use artha_core::wealth::net_worth::{self, NetWorthInput};
use artha_core::{with_metadata, Money};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TemplateArg {
    /// 50% needs, 30% wants, 20% savings
    FiftyThirtyTwenty,
    Wedding,
}

impl From<TemplateArg> for BudgetTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::FiftyThirtyTwenty => BudgetTemplate::FiftyThirtyTwenty,
            TemplateArg::Wedding => BudgetTemplate::Wedding,
        }
    }
}

/// Arguments for a percentage split
#[derive(Args)]
pub struct AllocateArgs {
    /// Amount to split
    #[arg(long)]
    pub total: Decimal,

    /// Comma-separated whole-number percentages (e.g. 50,30,20)
    #[arg(long, value_delimiter = ',', required = true)]
    pub percentages: Vec<Decimal>,
}

/// Arguments for a budget split
#[derive(Args)]
pub struct BudgetArgs {
    #[arg(long)]
    pub total: Option<Decimal>,

    #[arg(long, value_enum)]
    pub template: Option<TemplateArg>,

    /// Path to JSON or YAML input file with custom categories
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a net worth statement
#[derive(Args)]
pub struct NetWorthArgs {
    /// Path to JSON or YAML file listing assets and liabilities
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_allocate(args: AllocateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let amounts = allocate_by_percentages(args.total, &args.percentages);
    let allocated: Money = amounts.iter().sum();

    let allocations: Vec<Value> = args
        .percentages
        .iter()
        .zip(&amounts)
        .map(|(pct, amount)| serde_json::json!({ "percent": pct, "amount": amount }))
        .collect();

    let mut warnings = Vec::new();
    let covered: Decimal = args.percentages.iter().sum();
    if covered != Decimal::ONE_HUNDRED {
        warnings.push(format!("Percentages sum to {covered}, not 100."));
    }

    let result = serde_json::json!({
        "allocated_total": allocated,
        "allocations": allocations,
    });
    let assumptions = serde_json::json!({
        "total": args.total,
        "percentages": args.percentages,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Proportional split: amount = total * pct / 100, unrounded",
        &assumptions,
        warnings,
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget_input: BudgetInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => BudgetInput {
            total: args.total.ok_or("--total is required (or provide --input)")?,
            template: Some(
                args.template
                    .ok_or("--template is required (or provide --input)")?
                    .into(),
            ),
            categories: Vec::new(),
        },
    };

    let result = budget::split_budget(&budget_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_net_worth(args: NetWorthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let nw_input: NetWorthInput = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for net worth")?;

    let result = net_worth::compute_net_worth(&nw_input)?;
    Ok(serde_json::to_value(result)?)
}
