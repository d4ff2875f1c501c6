use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use artha_core::tax::advance_tax::{self, AdvanceTaxInput};
use artha_core::tax::presumptive::{self, PresumptiveInput, PresumptiveScheme};
use artha_core::tax::regimes::{self, DeductionClaims, Regime, RegimeComparisonInput};
use artha_core::tax::slabs::{self, TaxInput, TaxSchedule};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    New,
    Old,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::New => Regime::New,
            RegimeArg::Old => Regime::Old,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    /// Section 44AD
    Business,
    /// Section 44ADA
    Profession,
}

impl From<SchemeArg> for PresumptiveScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Business => PresumptiveScheme::Business,
            SchemeArg::Profession => PresumptiveScheme::Profession,
        }
    }
}

/// Arguments for slab tax on a taxable income
#[derive(Args)]
pub struct TaxArgs {
    /// Taxable income after deductions
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Built-in regime to apply
    #[arg(long, value_enum, default_value = "new")]
    pub regime: RegimeArg,

    /// Custom slab schedule file (JSON or YAML); overrides --regime
    #[arg(long)]
    pub schedule: Option<String>,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the old-versus-new regime comparison
#[derive(Args)]
pub struct CompareRegimesArgs {
    /// Gross annual income
    #[arg(long)]
    pub gross_income: Option<Decimal>,

    /// Not a salaried taxpayer (no standard deduction)
    #[arg(long)]
    pub not_salaried: bool,

    #[arg(long, default_value = "0")]
    pub section_80c: Decimal,

    #[arg(long, default_value = "0")]
    pub section_80d: Decimal,

    #[arg(long, default_value = "0")]
    pub home_loan_interest: Decimal,

    #[arg(long, default_value = "0")]
    pub hra_exemption: Decimal,

    /// Any other old-regime deductions
    #[arg(long, default_value = "0")]
    pub other_deductions: Decimal,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for presumptive taxation
#[derive(Args)]
pub struct PresumptiveArgs {
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,

    /// Receipts through banking or digital channels
    #[arg(long, default_value = "0")]
    pub digital_receipts: Decimal,

    #[arg(long, default_value = "0")]
    pub cash_receipts: Decimal,

    #[arg(long, value_enum, default_value = "new")]
    pub regime: RegimeArg,

    /// Income declared, when higher than the presumed figure
    #[arg(long)]
    pub declared_income: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the advance-tax schedule
#[derive(Args)]
pub struct AdvanceTaxArgs {
    /// Estimated tax for the year
    #[arg(long)]
    pub liability: Option<Decimal>,

    /// Tax already deducted at source
    #[arg(long, default_value = "0")]
    pub tds: Decimal,

    /// Calendar year the financial year starts in (2024 for FY 2024-25)
    #[arg(long)]
    pub fy_start: Option<i32>,

    /// Taxpayer under a presumptive scheme
    #[arg(long)]
    pub presumptive: bool,

    /// Path to JSON or YAML input file (overrides other args)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: TaxInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => {
            let schedule: Option<TaxSchedule> = args
                .schedule
                .as_deref()
                .map(input::file::read_structured)
                .transpose()?;
            TaxInput {
                taxable_income: args
                    .income
                    .ok_or("--income is required (or provide --input)")?,
                regime: args.regime.into(),
                schedule,
            }
        }
    };

    let result = slabs::calculate_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare_regimes(args: CompareRegimesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: RegimeComparisonInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => RegimeComparisonInput {
            gross_income: args
                .gross_income
                .ok_or("--gross-income is required (or provide --input)")?,
            salaried: !args.not_salaried,
            deductions: DeductionClaims {
                section_80c: args.section_80c,
                section_80d: args.section_80d,
                home_loan_interest: args.home_loan_interest,
                hra_exemption: args.hra_exemption,
                other: args.other_deductions,
            },
        },
    };

    let result = regimes::compare_regimes(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_presumptive(args: PresumptiveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let p_input: PresumptiveInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => PresumptiveInput {
            scheme: args
                .scheme
                .ok_or("--scheme is required (or provide --input)")?
                .into(),
            digital_receipts: args.digital_receipts,
            cash_receipts: args.cash_receipts,
            regime: args.regime.into(),
            declared_income: args.declared_income,
        },
    };

    let result = presumptive::compute_presumptive_tax(&p_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_advance_tax(args: AdvanceTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let at_input: AdvanceTaxInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => AdvanceTaxInput {
            estimated_tax_liability: args
                .liability
                .ok_or("--liability is required (or provide --input)")?,
            tds_deducted: args.tds,
            financial_year_start: args
                .fy_start
                .ok_or("--fy-start is required (or provide --input)")?,
            presumptive: args.presumptive,
        },
    };

    let result = advance_tax::schedule_advance_tax(&at_input)?;
    Ok(serde_json::to_value(result)?)
}
