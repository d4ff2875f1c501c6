use artha_core::allocation::split::allocate_by_percentages;
use artha_core::loans::amortization::{
    compute_amortization, installment, solve_tenure, tenure_reduction, AmortizationResult,
};
use artha_core::tax::regimes::{india_new_regime, india_old_regime};
use artha_core::tax::slabs::{compute_tax, TaxSchedule, TaxSlab};
use artha_core::time_value::{
    accumulate_contributions, project_future_value, required_periodic_contribution,
    ContributionTiming,
};
use artha_core::ArthaError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_degenerate_loans_are_all_zero() {
    let zero = AmortizationResult::default();
    for (p, r, n) in [
        (Decimal::ZERO, dec!(9), 240u32),
        (dec!(3_000_000), Decimal::ZERO, 240),
        (dec!(3_000_000), dec!(9), 0),
        (Decimal::ZERO, Decimal::ZERO, 0),
    ] {
        assert_eq!(compute_amortization(p, r, n).unwrap(), zero);
    }
}

#[test]
fn test_twenty_year_loan_at_nine_percent() {
    let r = compute_amortization(dec!(3_000_000), dec!(9), 240).unwrap();
    assert!(
        (r.installment - dec!(26992)).abs() <= dec!(1),
        "installment {}",
        r.installment
    );
    assert_eq!(r.total_interest, r.installment * dec!(240) - dec!(3_000_000));
}

#[test]
fn test_reverse_tenure_round_trip_across_loans() {
    for (p, rate, n) in [
        (dec!(3_000_000), dec!(9), 240u32),
        (dec!(500_000), dec!(11.5), 60),
        (dec!(75_000), dec!(16), 12),
        (dec!(10_000_000), dec!(8.35), 360),
    ] {
        let emi = installment(p, rate, n).unwrap();
        let tenure = solve_tenure(emi, p, rate).unwrap();
        assert!(
            (tenure - Decimal::from(n)).abs() <= Decimal::ONE,
            "{p} at {rate}% for {n}: solved {tenure}"
        );
        assert!(tenure_reduction(n, tenure) <= 1);
    }
}

#[test]
fn test_unpayable_installment_is_invalid_schedule() {
    // 2,000,000 at 9% accrues 15,000 in the first month.
    let err = solve_tenure(dec!(14_999), dec!(2_000_000), dec!(9)).unwrap_err();
    assert!(matches!(err, ArthaError::InvalidSchedule { .. }));
    assert!(err.to_string().contains("cannot cover"));
}

#[test]
fn test_extreme_loans_never_panic() {
    // A compound factor near 1.2e27 still yields a sane installment.
    let steep = compute_amortization(dec!(1000), dec!(1200), 90).unwrap();
    assert!(steep.installment >= dec!(1000) && steep.installment < dec!(1000.01));

    let principal = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    assert!(matches!(
        compute_amortization(principal, dec!(12), 1200),
        Err(ArthaError::Overflow { .. })
    ));
}

// ===========================================================================
// Tax
// ===========================================================================

#[test]
fn test_tax_is_monotonic_in_income() {
    for schedule in [india_new_regime(), india_old_regime()] {
        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;
        while income <= dec!(3_000_000) {
            let tax = compute_tax(income, &schedule).unwrap().total_tax;
            assert!(
                tax >= previous,
                "{}: tax fell from {previous} to {tax} at {income}",
                schedule.name
            );
            previous = tax;
            income += dec!(12_500);
        }
    }
}

#[test]
fn test_new_regime_rebate_cliff() {
    let schedule = india_new_regime();
    assert_eq!(
        compute_tax(dec!(700000), &schedule).unwrap().total_tax,
        Decimal::ZERO
    );
    assert!(compute_tax(dec!(700001), &schedule).unwrap().total_tax > Decimal::ZERO);
}

#[test]
fn test_base_tax_independent_of_slab_order() {
    let slabs = vec![
        TaxSlab::bounded(dec!(0), dec!(250000), dec!(0)),
        TaxSlab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
        TaxSlab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
        TaxSlab::unbounded(dec!(1000000), dec!(0.30)),
    ];
    let mut scrambled = slabs.clone();
    scrambled.swap(0, 3);
    scrambled.swap(1, 2);

    let ordered = TaxSchedule::new("ordered", slabs, dec!(0.04), None).unwrap();
    let raw = TaxSchedule {
        name: "scrambled".into(),
        slabs: scrambled,
        cess_rate: dec!(0.04),
        rebate_threshold: None,
    };

    let income = dec!(1_340_000);
    let a = compute_tax(income, &ordered).unwrap();
    let b = compute_tax(income, &raw).unwrap();
    let expected: Decimal = a.slab_breakdown.iter().map(|s| s.amount_in_slab * s.rate).sum();
    assert_eq!(a.base_tax, expected);
    assert_eq!(a.base_tax, b.base_tax);
    assert_eq!(a.slab_breakdown, b.slab_breakdown);
}

#[test]
fn test_presumptive_income_uses_same_engine() {
    // 8% of 40 lakh gross receipts, taxed like any other income.
    let presumed = artha_core::tax::presumptive::presumptive_income(dec!(4_000_000), dec!(8));
    let direct = compute_tax(dec!(320000), &india_old_regime()).unwrap();
    let via = compute_tax(presumed, &india_old_regime()).unwrap();
    assert_eq!(direct, via);
}

#[test]
fn test_regimes_evaluated_concurrently() {
    let new_regime = india_new_regime();
    let old_regime = india_old_regime();
    let incomes: Vec<Decimal> = (1..=40).map(|k| Decimal::from(k * 50_000)).collect();

    let (new_taxes, old_taxes) = std::thread::scope(|s| {
        let n = s.spawn(|| {
            incomes
                .iter()
                .map(|i| compute_tax(*i, &new_regime).unwrap().total_tax)
                .collect::<Vec<_>>()
        });
        let o = s.spawn(|| {
            incomes
                .iter()
                .map(|i| compute_tax(*i, &old_regime).unwrap().total_tax)
                .collect::<Vec<_>>()
        });
        (n.join().unwrap(), o.join().unwrap())
    });

    for (idx, income) in incomes.iter().enumerate() {
        assert_eq!(
            new_taxes[idx],
            compute_tax(*income, &new_regime).unwrap().total_tax
        );
        assert_eq!(
            old_taxes[idx],
            compute_tax(*income, &old_regime).unwrap().total_tax
        );
    }
}

// ===========================================================================
// Allocation and growth
// ===========================================================================

#[test]
fn test_cumulative_advance_tax_allocation() {
    assert_eq!(
        allocate_by_percentages(dec!(100000), &[dec!(15), dec!(45), dec!(75), dec!(100)]),
        vec![dec!(15000), dec!(45000), dec!(75000), dec!(100000)]
    );
}

#[test]
fn test_sinking_fund_reaches_target() {
    for (target, rate, months) in [
        (dec!(1_000_000), dec!(12), 120u32),
        (dec!(250_000), dec!(7.1), 36),
        (dec!(5_000_000), dec!(10), 300),
    ] {
        let c = required_periodic_contribution(target, rate, months).unwrap();
        let fv = accumulate_contributions(c, rate, months, ContributionTiming::End).unwrap();
        assert!(
            (fv - target).abs() < dec!(0.0001),
            "target {target}, reached {fv}"
        );
    }
}

#[test]
fn test_lump_sum_overflow_is_an_error() {
    assert!(matches!(
        project_future_value(dec!(10_000_000), dec!(100), 80),
        Err(ArthaError::Overflow { .. })
    ));
}

#[test]
fn test_sinking_fund_degenerate_inputs() {
    assert_eq!(
        required_periodic_contribution(dec!(100000), Decimal::ZERO, 12).unwrap(),
        Decimal::ZERO
    );
    assert_eq!(
        required_periodic_contribution(dec!(100000), dec!(8), 0).unwrap(),
        Decimal::ZERO
    );
}
