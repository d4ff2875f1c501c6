//! Advance-tax installment schedule.
//!
//! Statutory percentages are cumulative-to-date: by 15 June 15% of the year's
//! liability must have been paid, by 15 September 45%, and so on. Each
//! installment is the difference between consecutive cumulative amounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::allocation::split::{allocate_by_percentages, increments};
use crate::error::ArthaError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ArthaResult;

/// Cumulative percentage of liability due by each installment date.
pub const CUMULATIVE_PERCENTAGES: [Percent; 4] = [dec!(15), dec!(45), dec!(75), dec!(100)];

/// Net liability below this owes no advance tax.
pub const ADVANCE_TAX_THRESHOLD: Money = dec!(10000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceTaxInput {
    pub estimated_tax_liability: Money,
    /// Tax already deducted at source for the year.
    #[serde(default)]
    pub tds_deducted: Money,
    /// Calendar year in which the financial year starts (2024 for FY 2024-25).
    pub financial_year_start: i32,
    /// Presumptive-scheme taxpayers pay the whole amount by 15 March.
    #[serde(default)]
    pub presumptive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTaxInstallment {
    pub due_date: NaiveDate,
    pub cumulative_percent: Percent,
    pub cumulative_due: Money,
    pub installment_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceTaxOutput {
    pub net_liability: Money,
    pub advance_tax_required: bool,
    pub installments: Vec<AdvanceTaxInstallment>,
}

fn due_date(year: i32, month: u32, day: u32) -> ArthaResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ArthaError::DateError(format!("invalid due date {year}-{month}-{day}")))
}

/// Due dates for a financial year: 15 Jun, 15 Sep, 15 Dec, then 15 Mar of
/// the following calendar year.
pub fn installment_due_dates(financial_year_start: i32) -> ArthaResult<[NaiveDate; 4]> {
    Ok([
        due_date(financial_year_start, 6, 15)?,
        due_date(financial_year_start, 9, 15)?,
        due_date(financial_year_start, 12, 15)?,
        due_date(financial_year_start + 1, 3, 15)?,
    ])
}

/// Build the advance-tax schedule for a year's estimated liability.
pub fn schedule_advance_tax(
    input: &AdvanceTaxInput,
) -> ArthaResult<ComputationOutput<AdvanceTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.estimated_tax_liability < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "estimated_tax_liability".into(),
            reason: "Estimated tax liability cannot be negative".into(),
        });
    }
    if input.tds_deducted < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "tds_deducted".into(),
            reason: "TDS cannot be negative".into(),
        });
    }

    let net_liability = (input.estimated_tax_liability - input.tds_deducted).max(Decimal::ZERO);
    let advance_tax_required = net_liability >= ADVANCE_TAX_THRESHOLD;
    let dates = installment_due_dates(input.financial_year_start)?;

    let installments = if !advance_tax_required {
        warnings.push(format!(
            "Net liability {net_liability} is below {ADVANCE_TAX_THRESHOLD}; no advance tax is due."
        ));
        Vec::new()
    } else if input.presumptive {
        vec![AdvanceTaxInstallment {
            due_date: dates[3],
            cumulative_percent: dec!(100),
            cumulative_due: net_liability,
            installment_amount: net_liability,
        }]
    } else {
        let cumulative = allocate_by_percentages(net_liability, &CUMULATIVE_PERCENTAGES);
        let amounts = increments(&cumulative);
        dates
            .iter()
            .zip(CUMULATIVE_PERCENTAGES)
            .zip(cumulative.iter().zip(amounts))
            .map(|((date, pct), (cum, amount))| AdvanceTaxInstallment {
                due_date: *date,
                cumulative_percent: pct,
                cumulative_due: *cum,
                installment_amount: amount,
            })
            .collect()
    };

    let output = AdvanceTaxOutput {
        net_liability,
        advance_tax_required,
        installments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Advance tax: cumulative 15/45/75/100% of net liability by 15 Jun, \
         15 Sep, 15 Dec and 15 Mar",
        input,
        warnings,
        elapsed,
        output,
    ))
}
