//! Budget splits across named categories, from a preset template or an
//! explicit list.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::allocation::split::try_allocate_by_percentages;
use crate::error::ArthaError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ArthaResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    pub percent: Percent,
}

impl BudgetCategory {
    fn new(name: &str, percent: Percent) -> Self {
        BudgetCategory {
            name: name.to_string(),
            percent,
        }
    }
}

/// Preset category splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTemplate {
    /// Needs / wants / savings.
    FiftyThirtyTwenty,
    Wedding,
}

impl BudgetTemplate {
    pub fn categories(&self) -> Vec<BudgetCategory> {
        match self {
            BudgetTemplate::FiftyThirtyTwenty => vec![
                BudgetCategory::new("Needs", dec!(50)),
                BudgetCategory::new("Wants", dec!(30)),
                BudgetCategory::new("Savings", dec!(20)),
            ],
            BudgetTemplate::Wedding => vec![
                BudgetCategory::new("Venue", dec!(20)),
                BudgetCategory::new("Catering", dec!(30)),
                BudgetCategory::new("Attire and jewellery", dec!(15)),
                BudgetCategory::new("Decor", dec!(10)),
                BudgetCategory::new("Photography", dec!(8)),
                BudgetCategory::new("Invitations and gifts", dec!(7)),
                BudgetCategory::new("Entertainment", dec!(5)),
                BudgetCategory::new("Contingency", dec!(5)),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetInput {
    pub total: Money,
    #[serde(default)]
    pub template: Option<BudgetTemplate>,
    /// Explicit categories; these win over `template` when both are given.
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    pub name: String,
    pub percent: Percent,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOutput {
    pub lines: Vec<BudgetLine>,
    pub allocated_percent: Percent,
    pub allocated_amount: Money,
    /// Negative when the categories are over-allocated.
    pub unallocated_amount: Money,
}

/// Split a budget across named categories.
pub fn split_budget(input: &BudgetInput) -> ArthaResult<ComputationOutput<BudgetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.total < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "total".into(),
            reason: "Budget total cannot be negative".into(),
        });
    }

    let categories = if !input.categories.is_empty() {
        if input.template.is_some() {
            warnings.push("Explicit categories given; template ignored.".to_string());
        }
        input.categories.clone()
    } else if let Some(template) = input.template {
        template.categories()
    } else {
        return Err(ArthaError::InvalidInput {
            field: "categories".into(),
            reason: "Provide categories or a template".into(),
        });
    };

    if let Some(bad) = categories.iter().find(|c| c.percent < Decimal::ZERO) {
        return Err(ArthaError::InvalidInput {
            field: format!("categories.{}", bad.name),
            reason: "Category percentage cannot be negative".into(),
        });
    }

    let percentages: Vec<Percent> = categories.iter().map(|c| c.percent).collect();
    let amounts = try_allocate_by_percentages(input.total, &percentages)?;

    let allocated_percent = checked_sum(&percentages, "allocated percentage")?;
    let allocated_amount = checked_sum(&amounts, "allocated amount")?;

    if allocated_percent > dec!(100) {
        warnings.push(format!(
            "Categories are over-allocated at {allocated_percent}% of the total."
        ));
    } else if allocated_percent < dec!(100) {
        warnings.push(format!("Categories cover only {allocated_percent}% of the total."));
    }

    let lines = categories
        .into_iter()
        .zip(amounts)
        .map(|(c, amount)| BudgetLine {
            name: c.name,
            percent: c.percent,
            amount,
        })
        .collect();

    let output = BudgetOutput {
        lines,
        allocated_percent,
        allocated_amount,
        unallocated_amount: input.total - allocated_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Proportional budget split: amount = total x percent / 100",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn checked_sum(values: &[Decimal], context: &str) -> ArthaResult<Decimal> {
    values.iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v).ok_or_else(|| ArthaError::Overflow {
            context: context.to_string(),
        })
    })
}
