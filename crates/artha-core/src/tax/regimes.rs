//! Built-in Indian income-tax regimes (FY 2023-24) and the old-versus-new
//! regime comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::tax::slabs::{compute_tax, TaxResult, TaxSchedule, TaxSlab};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ArthaResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Health and education cess on base tax.
pub const HEALTH_EDUCATION_CESS: Decimal = dec!(0.04);

pub const STANDARD_DEDUCTION: Money = dec!(50000);

const SECTION_80C_CAP: Money = dec!(150000);
const SECTION_80D_CAP: Money = dec!(100000);
const HOME_LOAN_INTEREST_CAP: Money = dec!(200000);

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    #[default]
    New,
    Old,
}

impl Regime {
    pub fn schedule(&self) -> TaxSchedule {
        match self {
            Regime::New => india_new_regime(),
            Regime::Old => india_old_regime(),
        }
    }
}

/// New regime: 0-3L nil, 5% to 6L, 10% to 9L, 15% to 12L, 20% to 15L, 30%
/// above; full rebate up to ₹7,00,000.
pub fn india_new_regime() -> TaxSchedule {
    TaxSchedule {
        name: "India new regime FY 2023-24".to_string(),
        slabs: vec![
            TaxSlab::bounded(dec!(0), dec!(300000), dec!(0)),
            TaxSlab::bounded(dec!(300000), dec!(600000), dec!(0.05)),
            TaxSlab::bounded(dec!(600000), dec!(900000), dec!(0.10)),
            TaxSlab::bounded(dec!(900000), dec!(1200000), dec!(0.15)),
            TaxSlab::bounded(dec!(1200000), dec!(1500000), dec!(0.20)),
            TaxSlab::unbounded(dec!(1500000), dec!(0.30)),
        ],
        cess_rate: HEALTH_EDUCATION_CESS,
        rebate_threshold: Some(dec!(700000)),
    }
}

/// Old regime (individuals below 60): 0-2.5L nil, 5% to 5L, 20% to 10L, 30%
/// above; full rebate up to ₹5,00,000.
pub fn india_old_regime() -> TaxSchedule {
    TaxSchedule {
        name: "India old regime FY 2023-24".to_string(),
        slabs: vec![
            TaxSlab::bounded(dec!(0), dec!(250000), dec!(0)),
            TaxSlab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
            TaxSlab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
            TaxSlab::unbounded(dec!(1000000), dec!(0.30)),
        ],
        cess_rate: HEALTH_EDUCATION_CESS,
        rebate_threshold: Some(dec!(500000)),
    }
}

// ---------------------------------------------------------------------------
// Regime comparison
// ---------------------------------------------------------------------------

/// Deductions claimed under the old regime. Amounts above statutory caps are
/// trimmed to the cap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeductionClaims {
    #[serde(default)]
    pub section_80c: Money,
    #[serde(default)]
    pub section_80d: Money,
    #[serde(default)]
    pub home_loan_interest: Money,
    #[serde(default)]
    pub hra_exemption: Money,
    #[serde(default)]
    pub other: Money,
}

impl DeductionClaims {
    /// Total allowed after caps.
    pub fn allowed(&self) -> Money {
        self.capped() + self.hra_exemption + self.other
    }

    /// Amount of the capped claims that exceeds their caps.
    pub fn disallowed(&self) -> Money {
        self.section_80c + self.section_80d + self.home_loan_interest - self.capped()
    }

    fn capped(&self) -> Money {
        self.section_80c.min(SECTION_80C_CAP)
            + self.section_80d.min(SECTION_80D_CAP)
            + self.home_loan_interest.min(HOME_LOAN_INTEREST_CAP)
    }

    fn validate(&self) -> ArthaResult<()> {
        let fields = [
            ("section_80c", self.section_80c),
            ("section_80d", self.section_80d),
            ("home_loan_interest", self.home_loan_interest),
            ("hra_exemption", self.hra_exemption),
            ("other", self.other),
        ];
        for (name, value) in fields {
            if value < Decimal::ZERO {
                return Err(ArthaError::InvalidInput {
                    field: format!("deductions.{name}"),
                    reason: "Deduction cannot be negative".into(),
                });
            }
        }
        Ok(())
    }
}

fn default_salaried() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparisonInput {
    pub gross_income: Money,
    /// Salaried taxpayers get the standard deduction under both regimes.
    #[serde(default = "default_salaried")]
    pub salaried: bool,
    #[serde(default)]
    pub deductions: DeductionClaims,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeOutcome {
    pub regime: Regime,
    pub deductions_claimed: Money,
    pub taxable_income: Money,
    pub tax: TaxResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparisonOutput {
    pub old_regime: RegimeOutcome,
    pub new_regime: RegimeOutcome,
    pub recommended: Regime,
    pub savings: Money,
}

/// Compute tax under both regimes and recommend the cheaper one. Ties go to
/// the new regime.
pub fn compare_regimes(
    input: &RegimeComparisonInput,
) -> ArthaResult<ComputationOutput<RegimeComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.gross_income < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "gross_income".into(),
            reason: "Gross income cannot be negative".into(),
        });
    }
    input.deductions.validate()?;

    let standard = if input.salaried {
        STANDARD_DEDUCTION
    } else {
        Decimal::ZERO
    };

    let old_deductions = standard + input.deductions.allowed();
    let disallowed = input.deductions.disallowed();
    if disallowed > Decimal::ZERO {
        warnings.push(format!(
            "{disallowed} of claimed deductions exceed statutory caps and were disallowed."
        ));
    }

    let old_regime = outcome(Regime::Old, input.gross_income, old_deductions)?;
    let new_regime = outcome(Regime::New, input.gross_income, standard)?;

    let (recommended, savings) = if old_regime.tax.total_tax < new_regime.tax.total_tax {
        (
            Regime::Old,
            new_regime.tax.total_tax - old_regime.tax.total_tax,
        )
    } else {
        (
            Regime::New,
            old_regime.tax.total_tax - new_regime.tax.total_tax,
        )
    };

    let output = RegimeComparisonOutput {
        old_regime,
        new_regime,
        recommended,
        savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Old vs new regime: capped deductions under old regime, standard \
         deduction only under new regime, same slab engine for both",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn outcome(regime: Regime, gross_income: Money, deductions: Money) -> ArthaResult<RegimeOutcome> {
    let taxable_income = (gross_income - deductions).max(Decimal::ZERO);
    let tax = compute_tax(taxable_income, &regime.schedule())?;
    Ok(RegimeOutcome {
        regime,
        deductions_claimed: deductions.min(gross_income),
        taxable_income,
        tax,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_schedules_are_valid() {
        india_new_regime().validate().unwrap();
        india_old_regime().validate().unwrap();
    }

    #[test]
    fn test_new_regime_favoured_without_deductions() {
        let input = RegimeComparisonInput {
            gross_income: dec!(1500000),
            salaried: true,
            deductions: DeductionClaims::default(),
        };
        let out = compare_regimes(&input).unwrap().result;
        assert_eq!(out.recommended, Regime::New);
        assert_eq!(out.new_regime.taxable_income, dec!(1450000));
        assert_eq!(out.old_regime.taxable_income, dec!(1450000));
        assert!(out.savings > Decimal::ZERO);
    }

    #[test]
    fn test_old_regime_favoured_with_heavy_deductions() {
        let input = RegimeComparisonInput {
            gross_income: dec!(1200000),
            salaried: true,
            deductions: DeductionClaims {
                section_80c: dec!(150000),
                section_80d: dec!(50000),
                home_loan_interest: dec!(200000),
                hra_exemption: dec!(150000),
                other: Decimal::ZERO,
            },
        };
        let out = compare_regimes(&input).unwrap().result;
        // Old: 12L - 6L deductions = 6L taxable -> 12,500 + 20,000 = 32,500 base
        assert_eq!(out.old_regime.taxable_income, dec!(600000));
        assert_eq!(out.old_regime.tax.base_tax, dec!(32500));
        assert_eq!(out.recommended, Regime::Old);
    }

    #[test]
    fn test_caps_trim_deductions_and_warn() {
        let input = RegimeComparisonInput {
            gross_income: dec!(2000000),
            salaried: false,
            deductions: DeductionClaims {
                section_80c: dec!(300000),
                ..DeductionClaims::default()
            },
        };
        let out = compare_regimes(&input).unwrap();
        assert_eq!(out.result.old_regime.deductions_claimed, dec!(150000));
        assert_eq!(out.result.new_regime.deductions_claimed, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_rebate_applies_to_both_regimes() {
        let input = RegimeComparisonInput {
            gross_income: dec!(500000),
            salaried: true,
            deductions: DeductionClaims::default(),
        };
        let out = compare_regimes(&input).unwrap().result;
        assert_eq!(out.old_regime.tax.total_tax, Decimal::ZERO);
        assert_eq!(out.new_regime.tax.total_tax, Decimal::ZERO);
        assert_eq!(out.recommended, Regime::New);
        assert_eq!(out.savings, Decimal::ZERO);
    }

    #[test]
    fn test_negative_deduction_rejected() {
        let input = RegimeComparisonInput {
            gross_income: dec!(900000),
            salaried: true,
            deductions: DeductionClaims {
                other: dec!(-1),
                ..DeductionClaims::default()
            },
        };
        match compare_regimes(&input).unwrap_err() {
            ArthaError::InvalidInput { field, .. } => assert_eq!(field, "deductions.other"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
