//! Presumptive taxation for small businesses (section 44AD) and professionals
//! (section 44ADA). Gross receipts are turned into a presumed income, which
//! then goes through the ordinary slab engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::tax::regimes::Regime;
use crate::tax::slabs::{compute_tax, TaxResult};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::ArthaResult;

const BUSINESS_DIGITAL_PERCENT: Percent = dec!(6);
const BUSINESS_CASH_PERCENT: Percent = dec!(8);
const PROFESSION_PERCENT: Percent = dec!(50);

/// Cash share at or below which the higher turnover limits apply.
const LOW_CASH_SHARE: Rate = dec!(0.05);

const BUSINESS_LIMIT: Money = dec!(20000000);
const BUSINESS_LIMIT_LOW_CASH: Money = dec!(30000000);
const PROFESSION_LIMIT: Money = dec!(5000000);
const PROFESSION_LIMIT_LOW_CASH: Money = dec!(7500000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresumptiveScheme {
    /// Section 44AD: 6% of digital receipts, 8% of cash receipts.
    Business,
    /// Section 44ADA: 50% of gross receipts.
    Profession,
}

impl PresumptiveScheme {
    fn turnover_limit(&self, cash_share: Rate) -> Money {
        let low_cash = cash_share <= LOW_CASH_SHARE;
        match (self, low_cash) {
            (PresumptiveScheme::Business, true) => BUSINESS_LIMIT_LOW_CASH,
            (PresumptiveScheme::Business, false) => BUSINESS_LIMIT,
            (PresumptiveScheme::Profession, true) => PROFESSION_LIMIT_LOW_CASH,
            (PresumptiveScheme::Profession, false) => PROFESSION_LIMIT,
        }
    }
}

/// Presumed taxable income: a fixed percentage of gross receipts.
pub fn presumptive_income(gross_receipts: Money, presumptive_percent: Percent) -> Money {
    (gross_receipts * presumptive_percent / dec!(100)).max(Decimal::ZERO)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresumptiveInput {
    pub scheme: PresumptiveScheme,
    #[serde(default)]
    pub digital_receipts: Money,
    #[serde(default)]
    pub cash_receipts: Money,
    #[serde(default)]
    pub regime: Regime,
    /// Income actually declared, when higher than the presumed figure.
    #[serde(default)]
    pub declared_income: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresumptiveOutput {
    pub gross_receipts: Money,
    pub cash_share: Rate,
    pub presumed_income: Money,
    pub taxable_income: Money,
    pub turnover_limit: Money,
    pub within_limit: bool,
    pub tax: TaxResult,
}

/// Tax on presumptive income under the chosen regime.
pub fn compute_presumptive_tax(
    input: &PresumptiveInput,
) -> ArthaResult<ComputationOutput<PresumptiveOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_presumptive(input)?;

    let gross_receipts = input.digital_receipts + input.cash_receipts;
    let cash_share = if gross_receipts > Decimal::ZERO {
        input.cash_receipts / gross_receipts
    } else {
        Decimal::ZERO
    };

    let presumed_income = match input.scheme {
        PresumptiveScheme::Business => {
            presumptive_income(input.digital_receipts, BUSINESS_DIGITAL_PERCENT)
                + presumptive_income(input.cash_receipts, BUSINESS_CASH_PERCENT)
        }
        PresumptiveScheme::Profession => presumptive_income(gross_receipts, PROFESSION_PERCENT),
    };

    let taxable_income = match input.declared_income {
        Some(declared) if declared >= presumed_income => declared,
        Some(declared) => {
            warnings.push(format!(
                "Declared income {declared} is below the presumptive {presumed_income}; \
                 books of account and an audit would be required. Presumptive income used."
            ));
            presumed_income
        }
        None => presumed_income,
    };

    let turnover_limit = input.scheme.turnover_limit(cash_share);
    let within_limit = gross_receipts <= turnover_limit;
    if !within_limit {
        warnings.push(format!(
            "Gross receipts {gross_receipts} exceed the {turnover_limit} limit for this scheme."
        ));
    }

    let tax = compute_tax(taxable_income, &input.regime.schedule())?;

    let output = PresumptiveOutput {
        gross_receipts,
        cash_share,
        presumed_income,
        taxable_income,
        turnover_limit,
        within_limit,
        tax,
    };

    let methodology = match input.scheme {
        PresumptiveScheme::Business => {
            "Presumptive business income (44AD): 6% of digital + 8% of cash receipts, \
             taxed on the regime's slabs"
        }
        PresumptiveScheme::Profession => {
            "Presumptive professional income (44ADA): 50% of gross receipts, \
             taxed on the regime's slabs"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

fn validate_presumptive(input: &PresumptiveInput) -> ArthaResult<()> {
    if input.digital_receipts < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "digital_receipts".into(),
            reason: "Receipts cannot be negative".into(),
        });
    }
    if input.cash_receipts < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "cash_receipts".into(),
            reason: "Receipts cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn business(digital: Money, cash: Money) -> PresumptiveInput {
        PresumptiveInput {
            scheme: PresumptiveScheme::Business,
            digital_receipts: digital,
            cash_receipts: cash,
            regime: Regime::New,
            declared_income: None,
        }
    }

    #[test]
    fn test_presumptive_income_percentage() {
        assert_eq!(presumptive_income(dec!(5000000), dec!(8)), dec!(400000));
        assert_eq!(presumptive_income(dec!(-10), dec!(8)), Decimal::ZERO);
    }

    #[test]
    fn test_business_mixed_receipts() {
        // 6% of 1 crore + 8% of 20 lakh = 6,00,000 + 1,60,000
        let out = compute_presumptive_tax(&business(dec!(10000000), dec!(2000000)))
            .unwrap()
            .result;
        assert_eq!(out.presumed_income, dec!(760000));
        assert_eq!(out.taxable_income, dec!(760000));
        assert!(out.tax.total_tax > Decimal::ZERO);
        assert!(out.within_limit);
    }

    #[test]
    fn test_profession_half_of_receipts() {
        let input = PresumptiveInput {
            scheme: PresumptiveScheme::Profession,
            digital_receipts: dec!(1200000),
            cash_receipts: Decimal::ZERO,
            regime: Regime::New,
            declared_income: None,
        };
        let out = compute_presumptive_tax(&input).unwrap().result;
        assert_eq!(out.presumed_income, dec!(600000));
        // Within the new-regime rebate.
        assert_eq!(out.tax.total_tax, Decimal::ZERO);
        assert_eq!(out.turnover_limit, dec!(7500000));
    }

    #[test]
    fn test_higher_declared_income_used() {
        let mut input = business(dec!(5000000), Decimal::ZERO);
        input.declared_income = Some(dec!(900000));
        let out = compute_presumptive_tax(&input).unwrap();
        assert_eq!(out.result.taxable_income, dec!(900000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_lower_declared_income_warns() {
        let mut input = business(dec!(5000000), Decimal::ZERO);
        input.declared_income = Some(dec!(100000));
        let out = compute_presumptive_tax(&input).unwrap();
        assert_eq!(out.result.taxable_income, dec!(300000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_turnover_limit_exceeded_warns() {
        // 50% cash: the 2 crore limit applies.
        let out = compute_presumptive_tax(&business(dec!(12500000), dec!(12500000))).unwrap();
        assert!(!out.result.within_limit);
        assert_eq!(out.result.turnover_limit, dec!(20000000));
        assert!(out.warnings.iter().any(|w| w.contains("limit")));
    }

    #[test]
    fn test_negative_receipts_rejected() {
        assert!(compute_presumptive_tax(&business(dec!(-1), Decimal::ZERO)).is_err());
    }
}
