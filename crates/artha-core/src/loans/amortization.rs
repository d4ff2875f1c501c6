//! Equated monthly installment (EMI) math: the forward installment formula,
//! the reverse tenure solver and month-by-month amortization schedules.
//!
//! Non-positive principal, rate or tenure is a defined "no loan" case that
//! yields zeros; only an installment that cannot cover interest is an error.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::time_value::{
    checked_product, checked_quotient, compound_factor, monthly_rate, MONTHS_PER_YEAR,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::ArthaResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fractional tenures are rounded to this many places before taking the
/// ceiling, so 240.0000000001 months still reports as 240.
const TENURE_ROUNDING_DP: u32 = 6;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fixed-rate, fixed-tenure installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a whole-number percentage (9 = 9%).
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
}

/// Outcome of amortizing a loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Yearly roll-up of schedule rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

impl EmiInput {
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            tenure_months: self.tenure_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub monthly_rate: Rate,
    /// Total interest as a fraction of principal; `None` for a degenerate loan.
    pub interest_to_principal: Option<Rate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub yearly_summary: Vec<YearSummary>,
}

// ---------------------------------------------------------------------------
// Formula functions
// ---------------------------------------------------------------------------

fn is_degenerate(principal: Money, rate: Rate, tenure_months: u32) -> bool {
    principal <= Decimal::ZERO || rate <= Decimal::ZERO || tenure_months == 0
}

/// Level installment for a loan: `P × R × (1+R)^n / ((1+R)^n − 1)`.
///
/// The growth ratio is taken first so that a large `(1+R)^n` is never
/// multiplied by the principal directly.
pub fn installment(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> ArthaResult<Money> {
    let r = monthly_rate(annual_rate_percent);
    if is_degenerate(principal, r, tenure_months) {
        return Ok(Decimal::ZERO);
    }

    let factor = compound_factor(r, tenure_months)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = checked_quotient(factor, denom, "installment growth ratio")?;
    let interest = checked_product(principal, r, "first-month interest")?;
    checked_product(interest, ratio, "installment")
}

/// Amortize a loan. Degenerate terms return an all-zero result.
pub fn compute_amortization(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> ArthaResult<AmortizationResult> {
    let emi = installment(principal, annual_rate_percent, tenure_months)?;
    if emi.is_zero() {
        log::debug!(
            "no loan: principal={principal}, rate={annual_rate_percent}%, tenure={tenure_months}"
        );
        return Ok(AmortizationResult::default());
    }

    let total_payment = checked_product(emi, Decimal::from(tenure_months), "total payment")?;
    Ok(AmortizationResult {
        installment: emi,
        total_interest: total_payment - principal,
        total_payment,
    })
}

/// Solve for the number of months a fixed installment needs to retire
/// `principal`: `ln(I / (I − P×R)) / ln(1+R)`.
///
/// Returns fractional months. Fails with [`ArthaError::InvalidSchedule`] when
/// the installment does not exceed the first month's interest.
pub fn solve_tenure(
    installment: Money,
    principal: Money,
    annual_rate_percent: Percent,
) -> ArthaResult<Decimal> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_percent);
    let periodic_interest = principal * r.max(Decimal::ZERO);
    if installment <= periodic_interest {
        log::debug!("installment {installment} never amortizes balance {principal}");
        return Err(ArthaError::InvalidSchedule {
            installment,
            periodic_interest,
        });
    }

    if r <= Decimal::ZERO {
        return Ok(principal / installment);
    }

    let ratio = installment / (installment - periodic_interest);
    let numerator = ratio.checked_ln().ok_or_else(|| ArthaError::Overflow {
        context: format!("ln({ratio}) in tenure solver"),
    })?;
    let denominator = (Decimal::ONE + r)
        .checked_ln()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| ArthaError::Overflow {
            context: format!("ln(1 + {r}) in tenure solver"),
        })?;

    Ok(numerator / denominator)
}

/// Whole installments needed for a fractional tenure (ceiling).
pub fn whole_months(tenure: Decimal) -> u32 {
    tenure
        .round_dp(TENURE_ROUNDING_DP)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Months saved when a loan originally scheduled for `original_tenure_months`
/// now needs `new_tenure` (fractional) months.
pub fn tenure_reduction(original_tenure_months: u32, new_tenure: Decimal) -> u32 {
    original_tenure_months.saturating_sub(whole_months(new_tenure))
}

/// Outstanding balance after `months_paid` level installments.
pub fn outstanding_balance(terms: &LoanTerms, months_paid: u32) -> ArthaResult<Money> {
    let r = monthly_rate(terms.annual_rate_percent);
    if is_degenerate(terms.principal, r, terms.tenure_months) {
        return Ok(terms.principal.max(Decimal::ZERO));
    }
    if months_paid >= terms.tenure_months {
        return Ok(Decimal::ZERO);
    }

    let emi = installment(terms.principal, terms.annual_rate_percent, terms.tenure_months)?;
    let factor = compound_factor(r, months_paid)?;
    let grown = checked_product(terms.principal, factor, "grown principal")?;
    let annuity = checked_quotient(factor - Decimal::ONE, r, "annuity factor")?;
    let paid = checked_product(emi, annuity, "installments paid")?;
    let balance = grown - paid;
    Ok(balance.max(Decimal::ZERO))
}

/// Month-by-month schedule. The final row pays off whatever balance remains,
/// so the last closing balance is exactly zero. Degenerate terms yield an
/// empty schedule.
pub fn amortization_schedule(terms: &LoanTerms) -> ArthaResult<Vec<ScheduleRow>> {
    let emi = installment(terms.principal, terms.annual_rate_percent, terms.tenure_months)?;
    if emi.is_zero() {
        return Ok(Vec::new());
    }

    let r = monthly_rate(terms.annual_rate_percent);
    let mut rows = Vec::with_capacity(terms.tenure_months as usize);
    let mut balance = terms.principal;

    for month in 1..=terms.tenure_months {
        let interest = balance * r;
        let mut principal_part = emi - interest;
        if month == terms.tenure_months || principal_part > balance {
            principal_part = balance;
        }
        let closing = balance - principal_part;

        rows.push(ScheduleRow {
            month,
            opening_balance: balance,
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            closing_balance: closing,
        });

        balance = closing;
        if balance.is_zero() {
            break;
        }
    }

    Ok(rows)
}

/// Roll a monthly schedule up into loan years (months 1-12 are year 1).
pub fn summarize_by_year(rows: &[ScheduleRow]) -> Vec<YearSummary> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(idx, chunk)| YearSummary {
            year: idx as u32 + 1,
            interest_paid: chunk.iter().map(|r| r.interest).sum(),
            principal_paid: chunk.iter().map(|r| r.principal).sum(),
            closing_balance: chunk
                .last()
                .map(|r| r.closing_balance)
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// EMI calculator: installment, totals and (optionally) the full schedule.
pub fn calculate_emi(input: &EmiInput) -> ArthaResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = input.terms();
    let result = compute_amortization(
        terms.principal,
        terms.annual_rate_percent,
        terms.tenure_months,
    )?;

    if result.installment.is_zero() {
        warnings.push(
            "Principal, rate or tenure is not positive; no installment is due.".to_string(),
        );
    }
    if terms.annual_rate_percent > dec!(36) {
        warnings.push(format!(
            "Annual rate of {}% is unusually high for a retail loan.",
            terms.annual_rate_percent
        ));
    }

    let interest_to_principal = if result.installment.is_zero() {
        None
    } else {
        Some(result.total_interest / terms.principal)
    };

    let (schedule, yearly_summary) = if input.include_schedule {
        let rows = amortization_schedule(&terms)?;
        let years = summarize_by_year(&rows);
        (rows, years)
    } else {
        (Vec::new(), Vec::new())
    };

    let output = EmiOutput {
        installment: result.installment,
        total_interest: result.total_interest,
        total_payment: result.total_payment,
        monthly_rate: monthly_rate(terms.annual_rate_percent),
        interest_to_principal,
        schedule,
        yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated monthly installment: P x R x (1+R)^n / ((1+R)^n - 1), R = annual% / 1200",
        &terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
