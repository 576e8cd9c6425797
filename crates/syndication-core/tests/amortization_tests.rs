use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use syndication_core::financing::amortization::{
    amortization_schedule, annual_debt_service, interest_portion, monthly_payment,
    remaining_principal,
};

// ===========================================================================
// Reference loan: $412,500 at 7% over 25 years
// ===========================================================================

#[test]
fn test_reference_payment_and_first_interest() {
    let payment = monthly_payment(dec!(412500), dec!(7), 25);
    assert!(
        (payment - dec!(2915.46)).abs() < dec!(0.01),
        "Expected ~2,915.46, got {payment}"
    );
    let interest = interest_portion(dec!(412500), dec!(7), 25, 1);
    assert!((interest - dec!(2406.25)).abs() < dec!(0.01));
}

#[test]
fn test_annual_debt_service_is_twelve_payments() {
    let annual = annual_debt_service(dec!(412500), dec!(7), 25);
    assert_eq!(annual, monthly_payment(dec!(412500), dec!(7), 25) * dec!(12));
    assert!((annual - dec!(34985.57)).abs() < dec!(0.01));
}

#[test]
fn test_schedule_reconciles_with_remaining_principal() {
    let principal = dec!(412500);
    let schedule = amortization_schedule(principal, dec!(7), 25, 120);
    assert_eq!(schedule.len(), 120);

    let principal_paid: Decimal = schedule.iter().map(|row| row.principal).sum();
    let interest_paid: Decimal = schedule.iter().map(|row| row.interest).sum();
    let payments = monthly_payment(principal, dec!(7), 25) * dec!(120);
    let remaining = remaining_principal(principal, dec!(7), 25, 120);
    assert!(
        (principal_paid - (principal - remaining)).abs() < dec!(0.01),
        "paid {principal_paid}, balance reduction {}",
        principal - remaining
    );
    assert!(
        (interest_paid + principal_paid - payments).abs() < dec!(0.01),
        "interest {interest_paid} + principal {principal_paid} != payments {payments}"
    );
    // Interest alone is whatever the payments did not take off the balance
    assert!(
        (interest_paid - (payments - (principal - remaining))).abs() < dec!(0.01),
        "interest {interest_paid}, expected {}",
        payments - (principal - remaining)
    );
    assert_eq!(schedule[119].balance, remaining);
}

#[test]
fn test_zero_rate_schedule_is_straight_line() {
    let schedule = amortization_schedule(dec!(120000), Decimal::ZERO, 10, 12);
    for row in &schedule {
        assert_eq!(row.payment, dec!(1000));
        assert_eq!(row.interest, Decimal::ZERO);
        assert_eq!(row.principal, dec!(1000));
    }
    assert_eq!(schedule[11].balance, dec!(108000));
}

#[test]
fn test_degenerate_loan_has_empty_schedule() {
    assert!(amortization_schedule(Decimal::ZERO, dec!(7), 25, 12).is_empty());
    assert!(amortization_schedule(dec!(100000), dec!(7), 0, 12).is_empty());
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_zero_rate_payment_is_principal_over_months(
        principal in 1_000u64..5_000_000,
        term in 1u32..40,
    ) {
        let p = Decimal::from(principal);
        prop_assert_eq!(
            monthly_payment(p, Decimal::ZERO, term),
            p / Decimal::from(term * 12)
        );
    }

    #[test]
    fn prop_remaining_principal_never_negative(
        principal in 1_000u64..5_000_000,
        rate_bps in 0u32..2_000,
        term in 1u32..40,
        payments in 0u32..600,
    ) {
        let balance = remaining_principal(
            Decimal::from(principal),
            Decimal::new(i64::from(rate_bps), 2),
            term,
            payments,
        );
        prop_assert!(balance >= Decimal::ZERO);
        prop_assert!(balance <= Decimal::from(principal));
    }

    #[test]
    fn prop_no_payments_means_zero_balance(
        principal in 1_000u64..5_000_000,
        rate_bps in 0u32..2_000,
        term in 1u32..40,
    ) {
        let balance = remaining_principal(
            Decimal::from(principal),
            Decimal::new(i64::from(rate_bps), 2),
            term,
            0,
        );
        prop_assert_eq!(balance, Decimal::ZERO);
    }
}
