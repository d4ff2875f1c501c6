//! Savings-goal planning: inflate a cost, grow what is already saved and
//! size the monthly deposit for the rest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ArthaError;
use crate::time_value::{
    accumulate_contributions, checked_product, monthly_rate, project_future_value,
    required_periodic_contribution, ContributionTiming, MONTHS_PER_YEAR,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ArthaResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalInput {
    #[serde(default)]
    pub name: Option<String>,
    /// What the goal would cost today.
    pub current_cost: Money,
    pub inflation_percent: Percent,
    pub years: u32,
    pub expected_return_percent: Percent,
    #[serde(default)]
    pub existing_savings: Money,
    #[serde(default)]
    pub timing: ContributionTiming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalOutput {
    pub future_cost: Money,
    pub savings_future_value: Money,
    pub shortfall: Money,
    pub months: u32,
    pub monthly_contribution: Money,
    pub total_contributed: Money,
    pub projected_corpus: Money,
}

/// Plan a savings goal: inflate today's cost, grow existing savings, and find
/// the monthly deposit that closes the gap.
pub fn plan_goal(input: &GoalInput) -> ArthaResult<ComputationOutput<GoalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_goal(input)?;

    let months = input
        .years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| ArthaError::InvalidInput {
            field: "years".into(),
            reason: "Goal horizon is too long to count in months".into(),
        })?;
    let future_cost =
        project_future_value(input.current_cost, input.inflation_percent, input.years)?;
    let savings_future_value = project_future_value(
        input.existing_savings,
        input.expected_return_percent,
        input.years,
    )?;
    let shortfall = (future_cost - savings_future_value).max(Decimal::ZERO);

    let i = monthly_rate(input.expected_return_percent);
    let monthly_contribution = if shortfall.is_zero() {
        Decimal::ZERO
    } else if i <= Decimal::ZERO {
        warnings.push(
            "Expected return is not positive; shortfall spread evenly without growth."
                .to_string(),
        );
        shortfall / Decimal::from(months)
    } else {
        let end_of_period =
            required_periodic_contribution(shortfall, input.expected_return_percent, months)?;
        match input.timing {
            ContributionTiming::End => end_of_period,
            ContributionTiming::Beginning => end_of_period / (Decimal::ONE + i),
        }
    };

    if input.expected_return_percent < input.inflation_percent {
        warnings.push(format!(
            "Expected return {}% is below inflation {}%; real value of savings shrinks.",
            input.expected_return_percent, input.inflation_percent
        ));
    }

    let contributions_value = accumulate_contributions(
        monthly_contribution,
        input.expected_return_percent,
        months,
        input.timing,
    )?;

    let output = GoalOutput {
        future_cost,
        savings_future_value,
        shortfall,
        months,
        monthly_contribution,
        total_contributed: checked_product(
            monthly_contribution,
            Decimal::from(months),
            "total contributed",
        )?,
        projected_corpus: savings_future_value + contributions_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Goal planning: inflated cost less grown savings, closed by a monthly \
         sinking-fund contribution",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_goal(input: &GoalInput) -> ArthaResult<()> {
    if input.current_cost < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "current_cost".into(),
            reason: "Goal cost cannot be negative".into(),
        });
    }
    if input.existing_savings < Decimal::ZERO {
        return Err(ArthaError::InvalidInput {
            field: "existing_savings".into(),
            reason: "Existing savings cannot be negative".into(),
        });
    }
    if input.years == 0 {
        return Err(ArthaError::InvalidInput {
            field: "years".into(),
            reason: "Goal horizon must be at least 1 year".into(),
        });
    }
    Ok(())
}
