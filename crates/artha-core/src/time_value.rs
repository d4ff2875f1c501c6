use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ArthaError;
use crate::types::{Money, Percent, Rate};
use crate::ArthaResult;

pub const MONTHS_PER_YEAR: u32 = 12;

const HUNDRED: Decimal = dec!(100);

/// When a recurring contribution lands within its period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTiming {
    /// Ordinary annuity: deposit at the end of each period.
    #[default]
    End,
    /// Annuity due: deposit at the start of each period (SIP convention).
    Beginning,
}

/// Convert a whole-number annual percentage into a periodic decimal rate.
///
/// `periodic_rate(9, 12)` is `0.0075`. Zero periods per year yields zero.
pub fn periodic_rate(annual_rate_percent: Percent, periods_per_year: u32) -> Rate {
    if periods_per_year == 0 {
        return Decimal::ZERO;
    }
    annual_rate_percent / HUNDRED / Decimal::from(periods_per_year)
}

/// Monthly periodic rate `R = annual% / 100 / 12`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    periodic_rate(annual_rate_percent, MONTHS_PER_YEAR)
}

/// `(1 + rate)^periods`, reporting overflow instead of panicking.
pub fn compound_factor(rate: Rate, periods: u32) -> ArthaResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| ArthaError::Overflow {
            context: format!("compound factor (1 + {rate})^{periods}"),
        })
}

/// `a × b`, reporting overflow instead of panicking.
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> ArthaResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| ArthaError::Overflow {
        context: context.to_string(),
    })
}

/// `a / b`, reporting overflow (or a zero divisor) instead of panicking.
pub fn checked_quotient(a: Decimal, b: Decimal, context: &str) -> ArthaResult<Decimal> {
    a.checked_div(b).ok_or_else(|| ArthaError::Overflow {
        context: context.to_string(),
    })
}

fn validate_annual_rate(annual_rate_percent: Percent) -> ArthaResult<Rate> {
    let rate = annual_rate_percent / HUNDRED;
    if rate <= dec!(-1) {
        return Err(ArthaError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate must be greater than -100%".into(),
        });
    }
    Ok(rate)
}

/// Future value of a lump sum under annual compounding:
/// `present_value × (1 + rate)^years`.
pub fn project_future_value(
    present_value: Money,
    annual_rate_percent: Percent,
    years: u32,
) -> ArthaResult<Money> {
    let rate = validate_annual_rate(annual_rate_percent)?;
    checked_product(
        present_value,
        compound_factor(rate, years)?,
        "future value of a lump sum",
    )
}

/// Present value of a future amount discounted at an annual rate.
pub fn present_value(
    future_value: Money,
    annual_rate_percent: Percent,
    years: u32,
) -> ArthaResult<Money> {
    let rate = validate_annual_rate(annual_rate_percent)?;
    let factor = compound_factor(rate, years)?;
    checked_quotient(future_value, factor, "present value discount")
}

/// Monthly sinking-fund deposit that grows to `target_future_value` after
/// `periods_total` months: `target × i / ((1 + i)^n − 1)`.
///
/// A non-positive periodic rate, zero periods or a non-positive target all
/// yield a zero contribution.
pub fn required_periodic_contribution(
    target_future_value: Money,
    annual_rate_percent: Percent,
    periods_total: u32,
) -> ArthaResult<Money> {
    let i = monthly_rate(annual_rate_percent);
    if i <= Decimal::ZERO || periods_total == 0 || target_future_value <= Decimal::ZERO {
        log::debug!(
            "degenerate sinking-fund input (i={i}, n={periods_total}, target={target_future_value})"
        );
        return Ok(Decimal::ZERO);
    }

    let growth = compound_factor(i, periods_total)? - Decimal::ONE;
    if growth.is_zero() {
        return Ok(Decimal::ZERO);
    }
    checked_product(
        target_future_value,
        checked_quotient(i, growth, "sinking-fund factor")?,
        "sinking-fund contribution",
    )
}

/// Value after `periods_total` monthly deposits of `contribution`, compounded
/// monthly. This is the forward direction of [`required_periodic_contribution`].
pub fn accumulate_contributions(
    contribution: Money,
    annual_rate_percent: Percent,
    periods_total: u32,
    timing: ContributionTiming,
) -> ArthaResult<Money> {
    if periods_total == 0 {
        return Ok(Decimal::ZERO);
    }
    let i = monthly_rate(annual_rate_percent);
    if i <= dec!(-1) {
        return Err(ArthaError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Monthly rate must be greater than -100%".into(),
        });
    }
    if i.is_zero() {
        return checked_product(
            contribution,
            Decimal::from(periods_total),
            "sum of contributions",
        );
    }

    let annuity_factor = checked_quotient(
        compound_factor(i, periods_total)? - Decimal::ONE,
        i,
        "annuity factor",
    )?;
    let value = checked_product(contribution, annuity_factor, "accumulated contributions")?;
    match timing {
        ContributionTiming::End => Ok(value),
        ContributionTiming::Beginning => {
            checked_product(value, Decimal::ONE + i, "accumulated contributions")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        assert_eq!(monthly_rate(dec!(9)), dec!(0.0075));
        assert_eq!(periodic_rate(dec!(8), 4), dec!(0.02));
        assert_eq!(periodic_rate(dec!(8), 0), Decimal::ZERO);
    }

    #[test]
    fn test_future_value_basic() {
        // 100,000 at 10% for 2 years = 121,000
        let fv = project_future_value(dec!(100000), dec!(10), 2).unwrap();
        assert_eq!(fv, dec!(121000));
    }

    #[test]
    fn test_future_value_zero_years_is_identity() {
        let fv = project_future_value(dec!(5000), dec!(12), 0).unwrap();
        assert_eq!(fv, dec!(5000));
    }

    #[test]
    fn test_future_value_rejects_total_loss_rate() {
        assert!(project_future_value(dec!(100), dec!(-100), 3).is_err());
    }

    #[test]
    fn test_present_value_inverts_future_value() {
        let pv = present_value(dec!(121000), dec!(10), 2).unwrap();
        assert!((pv - dec!(100000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_contribution_zero_rate_is_zero() {
        let c = required_periodic_contribution(dec!(1000000), Decimal::ZERO, 120).unwrap();
        assert_eq!(c, Decimal::ZERO);
    }

    #[test]
    fn test_contribution_zero_periods_is_zero() {
        let c = required_periodic_contribution(dec!(1000000), dec!(12), 0).unwrap();
        assert_eq!(c, Decimal::ZERO);
    }

    #[test]
    fn test_contribution_reaches_target() {
        let target = dec!(1000000);
        let c = required_periodic_contribution(target, dec!(12), 120).unwrap();
        // 1% monthly for 120 months: annuity factor ~230.04
        assert!((c - dec!(4347.09)).abs() < dec!(0.5), "got {c}");
        let fv = accumulate_contributions(c, dec!(12), 120, ContributionTiming::End).unwrap();
        assert!((fv - target).abs() < dec!(0.000001));
    }

    #[test]
    fn test_accumulate_zero_rate_is_plain_sum() {
        let fv =
            accumulate_contributions(dec!(500), Decimal::ZERO, 24, ContributionTiming::End)
                .unwrap();
        assert_eq!(fv, dec!(12000));
    }

    #[test]
    fn test_accumulate_beginning_exceeds_end() {
        let end = accumulate_contributions(dec!(1000), dec!(12), 12, ContributionTiming::End)
            .unwrap();
        let due =
            accumulate_contributions(dec!(1000), dec!(12), 12, ContributionTiming::Beginning)
                .unwrap();
        assert_eq!(due, end * dec!(1.01));
    }

    #[test]
    fn test_future_value_overflow_reported() {
        // 2^80 fits in a Decimal; multiplied by ten million it does not.
        let result = project_future_value(dec!(10_000_000), dec!(100), 80);
        assert!(matches!(result, Err(ArthaError::Overflow { .. })));
    }

    #[test]
    fn test_accumulate_overflow_reported() {
        let result = accumulate_contributions(
            dec!(10_000_000_000_000_000_000),
            dec!(1200),
            90,
            ContributionTiming::End,
        );
        assert!(matches!(result, Err(ArthaError::Overflow { .. })));
    }

    #[test]
    fn test_compound_factor_overflow_reported() {
        let result = compound_factor(dec!(1000), 1000);
        assert!(matches!(result, Err(ArthaError::Overflow { .. })));
    }
}
