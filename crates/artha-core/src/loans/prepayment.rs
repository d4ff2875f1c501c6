//! Lump-sum prepayment analysis and the prepay-versus-invest comparison.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::loans::amortization::{
    installment, outstanding_balance, solve_tenure, whole_months, LoanTerms,
};
use crate::time_value::{checked_product, compound_factor, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::ArthaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the lender does with a prepayment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentStrategy {
    /// Keep the installment, finish sooner.
    #[default]
    ReduceTenure,
    /// Keep the end date, pay less each month.
    ReduceInstallment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    /// Installments already paid when the prepayment is made.
    #[serde(default)]
    pub months_elapsed: u32,
    pub prepayment_amount: Money,
    #[serde(default)]
    pub strategy: PrepaymentStrategy,
}

impl PrepaymentInput {
    fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            tenure_months: self.tenure_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    pub original_installment: Money,
    pub outstanding_balance: Money,
    pub new_principal: Money,
    pub new_installment: Money,
    pub remaining_tenure_months: u32,
    pub new_tenure_months: u32,
    pub tenure_reduction_months: u32,
    pub original_remaining_interest: Money,
    pub new_remaining_interest: Money,
    pub interest_saved: Money,
    pub loan_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepayVsInvestInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    #[serde(default)]
    pub months_elapsed: u32,
    pub lump_sum: Money,
    /// Expected annual return on the alternative investment.
    pub expected_return_percent: Percent,
    /// Tax on investment gains as a fraction (0.10 = 10%).
    #[serde(default)]
    pub gains_tax_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepayDecision {
    Prepay,
    Invest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepayVsInvestOutput {
    pub horizon_months: u32,
    pub interest_saved: Money,
    pub tenure_reduction_months: u32,
    pub investment_value: Money,
    pub investment_gain_after_tax: Money,
    pub recommendation: PrepayDecision,
    pub advantage: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Effect of a lump-sum prepayment made after `months_elapsed` installments.
pub fn analyze_prepayment(
    input: &PrepaymentInput,
) -> ArthaResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_prepayment(input)?;
    let output = compute_prepayment(input, &mut warnings)?;

    let methodology = match input.strategy {
        PrepaymentStrategy::ReduceTenure => {
            "Prepayment, reduced tenure: n = ln(I / (I - B x R)) / ln(1 + R)"
        }
        PrepaymentStrategy::ReduceInstallment => {
            "Prepayment, reduced installment: EMI recomputed on the new balance"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

/// Compare prepaying a loan with investing the same lump sum until the loan's
/// original end date.
///
/// Both sides are nominal amounts over the same horizon: the interest no
/// longer paid versus the after-tax gain on the investment.
pub fn compare_prepay_vs_invest(
    input: &PrepayVsInvestInput,
) -> ArthaResult<ComputationOutput<PrepayVsInvestOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.gains_tax_rate < Decimal::ZERO || input.gains_tax_rate > Decimal::ONE {
        return Err(ArthaError::InvalidInput {
            field: "gains_tax_rate".into(),
            reason: "Gains tax rate must be between 0 and 1".into(),
        });
    }

    let prepay_input = PrepaymentInput {
        principal: input.principal,
        annual_rate_percent: input.annual_rate_percent,
        tenure_months: input.tenure_months,
        months_elapsed: input.months_elapsed,
        prepayment_amount: input.lump_sum,
        strategy: PrepaymentStrategy::ReduceTenure,
    };
    validate_prepayment(&prepay_input)?;
    let prepay = compute_prepayment(&prepay_input, &mut warnings)?;

    let horizon_months = prepay.remaining_tenure_months;
    let i = monthly_rate(input.expected_return_percent);
    if i <= Decimal::NEGATIVE_ONE {
        return Err(ArthaError::InvalidInput {
            field: "expected_return_percent".into(),
            reason: "Expected return must be greater than -1200% a year".into(),
        });
    }
    let investment_value = checked_product(
        input.lump_sum,
        compound_factor(i, horizon_months)?,
        "investment value",
    )?;
    let gain = investment_value - input.lump_sum;
    let investment_gain_after_tax = if gain > Decimal::ZERO {
        gain * (Decimal::ONE - input.gains_tax_rate)
    } else {
        gain
    };

    if input.expected_return_percent <= input.annual_rate_percent {
        warnings.push(format!(
            "Expected return {}% does not exceed the loan rate {}%.",
            input.expected_return_percent, input.annual_rate_percent
        ));
    }

    let (recommendation, advantage) = if prepay.interest_saved >= investment_gain_after_tax {
        (
            PrepayDecision::Prepay,
            prepay.interest_saved - investment_gain_after_tax,
        )
    } else {
        (
            PrepayDecision::Invest,
            investment_gain_after_tax - prepay.interest_saved,
        )
    };

    let output = PrepayVsInvestOutput {
        horizon_months,
        interest_saved: prepay.interest_saved,
        tenure_reduction_months: prepay.tenure_reduction_months,
        investment_value,
        investment_gain_after_tax,
        recommendation,
        advantage,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Prepay vs invest: interest saved by reduced tenure against after-tax \
         gain of monthly-compounded investment over the remaining tenure",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn compute_prepayment(
    input: &PrepaymentInput,
    warnings: &mut Vec<String>,
) -> ArthaResult<PrepaymentOutput> {
    let terms = input.terms();
    let emi = installment(terms.principal, terms.annual_rate_percent, terms.tenure_months)?;
    let balance = outstanding_balance(&terms, input.months_elapsed)?;
    let remaining = terms.tenure_months - input.months_elapsed;
    let original_remaining_interest =
        checked_product(emi, Decimal::from(remaining), "remaining payments")? - balance;

    let new_principal = balance - input.prepayment_amount;
    if new_principal <= Decimal::ZERO {
        if new_principal < Decimal::ZERO {
            warnings.push(format!(
                "Prepayment exceeds the outstanding balance by {}.",
                -new_principal
            ));
        }
        return Ok(PrepaymentOutput {
            original_installment: emi,
            outstanding_balance: balance,
            new_principal: Decimal::ZERO,
            new_installment: Decimal::ZERO,
            remaining_tenure_months: remaining,
            new_tenure_months: 0,
            tenure_reduction_months: remaining,
            original_remaining_interest,
            new_remaining_interest: Decimal::ZERO,
            interest_saved: original_remaining_interest,
            loan_closed: true,
        });
    }

    let (new_installment, new_tenure_months, new_remaining_interest) = match input.strategy {
        PrepaymentStrategy::ReduceTenure => {
            let tenure = solve_tenure(emi, new_principal, terms.annual_rate_percent)?;
            let paid = checked_product(emi, tenure, "remaining payments")?;
            (emi, whole_months(tenure), paid - new_principal)
        }
        PrepaymentStrategy::ReduceInstallment => {
            let new_emi = installment(new_principal, terms.annual_rate_percent, remaining)?;
            let paid = checked_product(new_emi, Decimal::from(remaining), "remaining payments")?;
            (new_emi, remaining, paid - new_principal)
        }
    };

    Ok(PrepaymentOutput {
        original_installment: emi,
        outstanding_balance: balance,
        new_principal,
        new_installment,
        remaining_tenure_months: remaining,
        new_tenure_months,
        tenure_reduction_months: remaining.saturating_sub(new_tenure_months),
        original_remaining_interest,
        new_remaining_interest,
        interest_saved: original_remaining_interest - new_remaining_interest,
        loan_closed: false,
    })
}

fn validate_prepayment(input: &PrepaymentInput) -> ArthaResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.annual_rate_percent <= Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate must be positive for prepayment analysis".into(),
        });
    }
    if input.tenure_months == 0 {
        return Err(ArthaError::InvalidInput {
            field: "tenure_months".into(),
            reason: "Tenure must be at least one month".into(),
        });
    }
    if input.months_elapsed >= input.tenure_months {
        return Err(ArthaError::InvalidInput {
            field: "months_elapsed".into(),
            reason: "Months elapsed must be less than the tenure".into(),
        });
    }
    if input.prepayment_amount < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "prepayment_amount".into(),
            reason: "Prepayment amount cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> PrepaymentInput {
        PrepaymentInput {
            principal: dec!(3_000_000),
            annual_rate_percent: dec!(9),
            tenure_months: 240,
            months_elapsed: 0,
            prepayment_amount: dec!(500_000),
            strategy: PrepaymentStrategy::ReduceTenure,
        }
    }

    #[test]
    fn test_reduce_tenure_shortens_loan() {
        let out = analyze_prepayment(&sample_input()).unwrap().result;
        assert_eq!(out.new_installment, out.original_installment);
        assert_eq!(out.new_principal, dec!(2_500_000));
        assert!(out.new_tenure_months < 240);
        assert_eq!(out.tenure_reduction_months, 240 - out.new_tenure_months);
        assert!(out.interest_saved > Decimal::ZERO);
        assert!(!out.loan_closed);
    }

    #[test]
    fn test_reduce_tenure_known_value() {
        // 2.5M at 9% repaid with the 3M loan's ~26,992 EMI: ~158.77 months.
        let out = analyze_prepayment(&sample_input()).unwrap().result;
        assert_eq!(out.new_tenure_months, 159);
        assert_eq!(out.tenure_reduction_months, 81);
    }

    #[test]
    fn test_reduce_installment_keeps_tenure() {
        let mut input = sample_input();
        input.strategy = PrepaymentStrategy::ReduceInstallment;
        let out = analyze_prepayment(&input).unwrap().result;
        assert_eq!(out.new_tenure_months, 240);
        assert_eq!(out.tenure_reduction_months, 0);
        assert!(out.new_installment < out.original_installment);
        assert!(out.interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_reduce_tenure_saves_more_than_reduce_installment() {
        let tenure = analyze_prepayment(&sample_input()).unwrap().result;
        let mut input = sample_input();
        input.strategy = PrepaymentStrategy::ReduceInstallment;
        let emi = analyze_prepayment(&input).unwrap().result;
        assert!(tenure.interest_saved > emi.interest_saved);
    }

    #[test]
    fn test_zero_prepayment_changes_nothing() {
        let mut input = sample_input();
        input.prepayment_amount = Decimal::ZERO;
        let out = analyze_prepayment(&input).unwrap().result;
        assert_eq!(out.new_tenure_months, 240);
        assert!(out.interest_saved.abs() < dec!(1));
    }

    #[test]
    fn test_prepayment_after_elapsed_months() {
        let mut input = sample_input();
        input.months_elapsed = 60;
        let out = analyze_prepayment(&input).unwrap().result;
        assert_eq!(out.remaining_tenure_months, 180);
        assert!(out.outstanding_balance < dec!(3_000_000));
        assert!(out.new_tenure_months < 180);
    }

    #[test]
    fn test_prepayment_closes_loan() {
        let mut input = sample_input();
        input.prepayment_amount = dec!(4_000_000);
        let result = analyze_prepayment(&input).unwrap();
        let out = &result.result;
        assert!(out.loan_closed);
        assert_eq!(out.new_tenure_months, 0);
        assert_eq!(out.interest_saved, out.original_remaining_interest);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_prepayment_validation_elapsed_beyond_tenure() {
        let mut input = sample_input();
        input.months_elapsed = 240;
        match analyze_prepayment(&input).unwrap_err() {
            ArthaError::InvalidInput { field, .. } => assert_eq!(field, "months_elapsed"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_prepayment_validation_zero_rate() {
        let mut input = sample_input();
        input.annual_rate_percent = Decimal::ZERO;
        assert!(analyze_prepayment(&input).is_err());
    }

    fn sample_compare() -> PrepayVsInvestInput {
        PrepayVsInvestInput {
            principal: dec!(3_000_000),
            annual_rate_percent: dec!(9),
            tenure_months: 240,
            months_elapsed: 24,
            lump_sum: dec!(300_000),
            expected_return_percent: dec!(12),
            gains_tax_rate: dec!(0.10),
        }
    }

    #[test]
    fn test_compare_high_return_favours_investing() {
        let out = compare_prepay_vs_invest(&sample_compare()).unwrap();
        assert_eq!(out.result.horizon_months, 216);
        assert_eq!(out.result.recommendation, PrepayDecision::Invest);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_compare_low_return_favours_prepaying() {
        let mut input = sample_compare();
        input.expected_return_percent = dec!(4);
        let out = compare_prepay_vs_invest(&input).unwrap();
        assert_eq!(out.result.recommendation, PrepayDecision::Prepay);
        assert!(out.result.advantage > Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_compare_investment_overflow_reported() {
        // 100% a month over the last 90 months outgrows Decimal once
        // multiplied by the lump sum.
        let mut input = sample_compare();
        input.months_elapsed = 150;
        input.expected_return_percent = dec!(1200);
        let result = compare_prepay_vs_invest(&input);
        assert!(matches!(result, Err(ArthaError::Overflow { .. })));
    }

    #[test]
    fn test_compare_rejects_bad_tax_rate() {
        let mut input = sample_compare();
        input.gains_tax_rate = dec!(1.5);
        assert!(compare_prepay_vs_invest(&input).is_err());
    }
}
