//! Net worth statement with per-category totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::ArthaError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ArthaResult;

const UNCATEGORISED: &str = "Uncategorised";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthInput {
    #[serde(default)]
    pub assets: Vec<BalanceItem>,
    #[serde(default)]
    pub liabilities: Vec<BalanceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthOutput {
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub net_worth: Money,
    /// Liabilities over assets; `None` when there are no assets.
    pub debt_to_asset_ratio: Option<Rate>,
    pub asset_breakdown: Vec<CategoryTotal>,
    pub liability_breakdown: Vec<CategoryTotal>,
}

/// Net worth statement: assets less liabilities, with category totals.
pub fn compute_net_worth(input: &NetWorthInput) -> ArthaResult<ComputationOutput<NetWorthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_items("assets", &input.assets)?;
    validate_items("liabilities", &input.liabilities)?;

    let total_assets = checked_total("assets", &input.assets)?;
    let total_liabilities = checked_total("liabilities", &input.liabilities)?;
    let net_worth = total_assets - total_liabilities;

    let debt_to_asset_ratio = if total_assets > Decimal::ZERO {
        Some(
            total_liabilities
                .checked_div(total_assets)
                .ok_or_else(|| ArthaError::Overflow {
                    context: "debt-to-asset ratio".into(),
                })?,
        )
    } else {
        None
    };

    if net_worth < Decimal::ZERO {
        warnings.push("Liabilities exceed assets; net worth is negative.".to_string());
    }

    let output = NetWorthOutput {
        total_assets,
        total_liabilities,
        net_worth,
        debt_to_asset_ratio,
        asset_breakdown: by_category(&input.assets),
        liability_breakdown: by_category(&input.liabilities),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net worth: sum of assets less sum of liabilities",
        &serde_json::json!({
            "num_assets": input.assets.len(),
            "num_liabilities": input.liabilities.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_items(field: &str, items: &[BalanceItem]) -> ArthaResult<()> {
    if let Some(bad) = items.iter().find(|i| i.amount < Decimal::ZERO) {
        return Err(ArthaError::InvalidInput {
            field: format!("{field}.{}", bad.name),
            reason: "Amounts must be entered as positive values".into(),
        });
    }
    Ok(())
}

fn checked_total(field: &str, items: &[BalanceItem]) -> ArthaResult<Money> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.amount)
            .ok_or_else(|| ArthaError::Overflow {
                context: format!("total {field}"),
            })
    })
}

// Category totals never exceed the checked grand total.
fn by_category(items: &[BalanceItem]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for item in items {
        let key = item.category.as_deref().unwrap_or(UNCATEGORISED);
        *totals.entry(key).or_insert(Decimal::ZERO) += item.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}
