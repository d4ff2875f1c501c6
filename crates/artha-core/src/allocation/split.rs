//! Proportional splits of a total by whole-number percentages.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ArthaError;
use crate::types::{Money, Percent};
use crate::ArthaResult;

/// Split `total` into one amount per percentage, `total × pct / 100`, in input
/// order. No rounding is applied; display formatting belongs to the caller.
///
/// Percentages are taken as given. Cumulative schedules such as advance-tax
/// milestones (15/45/75/100) come back cumulative; see [`increments`] to turn
/// them into per-period amounts.
///
/// # Panics
///
/// When `total × pct` leaves the `Decimal` range. Money amounts with
/// percentages up to 100 never do; use [`try_allocate_by_percentages`] for
/// unvetted input.
pub fn allocate_by_percentages(total: Money, percentages: &[Percent]) -> Vec<Money> {
    percentages
        .iter()
        .map(|pct| total * *pct / dec!(100))
        .collect()
}

/// [`allocate_by_percentages`] that reports overflow as an error.
pub fn try_allocate_by_percentages(
    total: Money,
    percentages: &[Percent],
) -> ArthaResult<Vec<Money>> {
    percentages
        .iter()
        .map(|pct| {
            total
                .checked_mul(*pct)
                .map(|share| share / dec!(100))
                .ok_or_else(|| ArthaError::Overflow {
                    context: format!("{pct}% of {total}"),
                })
        })
        .collect()
}

/// Differences between consecutive cumulative amounts; the first element is
/// kept as-is.
pub fn increments(cumulative: &[Money]) -> Vec<Money> {
    let mut previous = Decimal::ZERO;
    cumulative
        .iter()
        .map(|amount| {
            let step = *amount - previous;
            previous = *amount;
            step
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumulative_advance_tax_percentages() {
        let out = allocate_by_percentages(dec!(100000), &[dec!(15), dec!(45), dec!(75), dec!(100)]);
        assert_eq!(out, vec![dec!(15000), dec!(45000), dec!(75000), dec!(100000)]);
    }

    #[test]
    fn test_allocation_sums_to_total() {
        let total = dec!(123456.78);
        let out = allocate_by_percentages(total, &[dec!(50), dec!(30), dec!(20)]);
        let sum: Decimal = out.iter().sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn test_allocation_thirds_within_tolerance() {
        let third = dec!(100) / dec!(3);
        let out = allocate_by_percentages(dec!(1000), &[third, third, third]);
        let sum: Decimal = out.iter().sum();
        assert!((sum - dec!(1000)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_checked_allocation_matches_plain() {
        let pcts = [dec!(50), dec!(30), dec!(20)];
        assert_eq!(
            try_allocate_by_percentages(dec!(98765.43), &pcts).unwrap(),
            allocate_by_percentages(dec!(98765.43), &pcts)
        );
    }

    #[test]
    fn test_checked_allocation_overflow_reported() {
        let result = try_allocate_by_percentages(Decimal::MAX, &[dec!(150)]);
        assert!(matches!(result, Err(ArthaError::Overflow { .. })));
    }

    #[test]
    fn test_empty_percentages() {
        assert!(allocate_by_percentages(dec!(500), &[]).is_empty());
    }

    #[test]
    fn test_increments_from_cumulative() {
        let steps = increments(&[dec!(15000), dec!(45000), dec!(75000), dec!(100000)]);
        assert_eq!(steps, vec![dec!(15000), dec!(30000), dec!(30000), dec!(25000)]);
    }
}
