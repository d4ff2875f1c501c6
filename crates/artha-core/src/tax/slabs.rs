//! Tiered marginal tax: slab schedules, cess and the full-rebate cliff.
//!
//! A schedule is plain data and every computation takes it explicitly, so any
//! number of regimes can be evaluated side by side. Slabs may arrive in any
//! order; they are sorted by lower bound and checked for gaps and overlaps
//! before use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::tax::regimes::Regime;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ArthaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One marginal bracket. `upper_bound` of `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower_bound: Money,
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// Marginal rate as a fraction (0.05 = 5%).
    pub rate: Rate,
}

impl TaxSlab {
    pub fn bounded(lower_bound: Money, upper_bound: Money, rate: Rate) -> Self {
        TaxSlab {
            lower_bound,
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(lower_bound: Money, rate: Rate) -> Self {
        TaxSlab {
            lower_bound,
            upper_bound: None,
            rate,
        }
    }

    /// Portion of `income` that falls inside this slab.
    pub fn amount_in_slab(&self, income: Money) -> Money {
        if income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let above = income - self.lower_bound;
        match self.upper_bound {
            Some(upper) => above.min(upper - self.lower_bound),
            None => above,
        }
    }
}

/// Ordered slabs plus cess and an optional full-rebate threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    pub name: String,
    pub slabs: Vec<TaxSlab>,
    /// Surcharge on base tax as a fraction (0.04 = 4%).
    #[serde(default)]
    pub cess_rate: Rate,
    /// Income at or below this level owes nothing.
    #[serde(default)]
    pub rebate_threshold: Option<Money>,
}

impl TaxSchedule {
    /// Build a schedule, sorting the slabs and validating them.
    pub fn new(
        name: impl Into<String>,
        mut slabs: Vec<TaxSlab>,
        cess_rate: Rate,
        rebate_threshold: Option<Money>,
    ) -> ArthaResult<Self> {
        slabs.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        let schedule = TaxSchedule {
            name: name.into(),
            slabs,
            cess_rate,
            rebate_threshold,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Slabs sorted by lower bound.
    pub fn sorted_slabs(&self) -> Vec<TaxSlab> {
        let mut slabs = self.slabs.clone();
        slabs.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        slabs
    }

    /// Check that slabs are contiguous, non-overlapping and ascending once
    /// sorted, with only the last one unbounded.
    pub fn validate(&self) -> ArthaResult<()> {
        if self.slabs.is_empty() {
            return Err(ArthaError::InvalidTaxSchedule(format!(
                "'{}' has no slabs",
                self.name
            )));
        }
        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(ArthaError::InvalidTaxSchedule(format!(
                "cess rate {} must be between 0 and 1",
                self.cess_rate
            )));
        }
        if let Some(threshold) = self.rebate_threshold {
            if threshold < Decimal::ZERO {
                return Err(ArthaError::InvalidTaxSchedule(
                    "rebate threshold cannot be negative".into(),
                ));
            }
        }

        let slabs = self.sorted_slabs();
        if slabs[0].lower_bound < Decimal::ZERO {
            return Err(ArthaError::InvalidTaxSchedule(
                "first slab starts below zero".into(),
            ));
        }

        for (idx, slab) in slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(ArthaError::InvalidTaxSchedule(format!(
                    "slab starting at {} has rate {} outside 0..=1",
                    slab.lower_bound, slab.rate
                )));
            }
            let is_last = idx + 1 == slabs.len();
            match slab.upper_bound {
                Some(upper) if upper <= slab.lower_bound => {
                    return Err(ArthaError::InvalidTaxSchedule(format!(
                        "slab {}..{} is empty or inverted",
                        slab.lower_bound, upper
                    )));
                }
                Some(upper) if !is_last => {
                    let next = slabs[idx + 1].lower_bound;
                    if next != upper {
                        return Err(ArthaError::InvalidTaxSchedule(format!(
                            "slab ending at {upper} is followed by one starting at {next}"
                        )));
                    }
                }
                None if !is_last => {
                    return Err(ArthaError::InvalidTaxSchedule(format!(
                        "unbounded slab starting at {} is not the last slab",
                        slab.lower_bound
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Tax attributed to one slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabTax {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    pub amount_in_slab: Money,
    pub tax: Money,
}

/// Output of applying a schedule to an income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub taxable_income: Money,
    pub base_tax: Money,
    pub cess: Money,
    pub total_tax: Money,
    pub rebate_applied: bool,
    /// Slab tax forgiven by the rebate; zero when no rebate applies.
    pub rebate: Money,
    /// `total_tax / taxable_income`; `None` for non-positive income.
    pub effective_rate: Option<Rate>,
    pub slab_breakdown: Vec<SlabTax>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInput {
    pub taxable_income: Money,
    #[serde(default)]
    pub regime: Regime,
    /// Custom schedule; overrides `regime` when present.
    #[serde(default)]
    pub schedule: Option<TaxSchedule>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Apply `schedule` to `taxable_income`.
///
/// Income at or below the rebate threshold owes nothing. Otherwise each slab
/// contributes `min(width, income − lower) × rate`, and cess is levied on the
/// summed base tax.
pub fn compute_tax(taxable_income: Money, schedule: &TaxSchedule) -> ArthaResult<TaxResult> {
    schedule.validate()?;

    let slab_breakdown: Vec<SlabTax> = schedule
        .sorted_slabs()
        .into_iter()
        .map(|slab| {
            let amount = slab.amount_in_slab(taxable_income);
            SlabTax {
                lower_bound: slab.lower_bound,
                upper_bound: slab.upper_bound,
                rate: slab.rate,
                amount_in_slab: amount,
                tax: amount * slab.rate,
            }
        })
        .collect();
    let slab_tax: Money = slab_breakdown.iter().map(|s| s.tax).sum();

    let rebate_applied = schedule
        .rebate_threshold
        .is_some_and(|threshold| taxable_income <= threshold);

    let (base_tax, rebate) = if rebate_applied {
        log::debug!(
            "'{}': income {taxable_income} within rebate threshold, {slab_tax} forgiven",
            schedule.name
        );
        (Decimal::ZERO, slab_tax)
    } else {
        (slab_tax, Decimal::ZERO)
    };

    let cess = if base_tax > Decimal::ZERO {
        base_tax * schedule.cess_rate
    } else {
        Decimal::ZERO
    };
    let total_tax = base_tax
        .checked_add(cess)
        .ok_or_else(|| ArthaError::Overflow {
            context: format!("tax plus cess on {taxable_income}"),
        })?;

    let effective_rate = if taxable_income > Decimal::ZERO {
        Some(total_tax / taxable_income)
    } else {
        None
    };

    Ok(TaxResult {
        taxable_income,
        base_tax,
        cess,
        total_tax,
        rebate_applied,
        rebate,
        effective_rate,
        slab_breakdown,
    })
}

/// Tax calculator for a taxable income under a built-in or custom schedule.
pub fn calculate_tax(input: &TaxInput) -> ArthaResult<ComputationOutput<TaxResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = match &input.schedule {
        Some(custom) => custom.clone(),
        None => input.regime.schedule(),
    };

    if input.taxable_income < Decimal::ZERO {
        warnings.push("Negative taxable income treated as nil income.".to_string());
    }

    let result = compute_tax(input.taxable_income, &schedule)?;
    if result.rebate_applied && result.rebate > Decimal::ZERO {
        warnings.push(format!(
            "Full rebate applied: income within the {} threshold.",
            schedule.name
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tiered marginal tax: sum of slab amount x rate, plus cess on base tax; \
         nil tax at or below the rebate threshold",
        &serde_json::json!({
            "taxable_income": input.taxable_income.to_string(),
            "schedule": schedule.name,
            "cess_rate": schedule.cess_rate.to_string(),
            "rebate_threshold": schedule.rebate_threshold.map(|t| t.to_string()),
            "num_slabs": schedule.slabs.len(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
