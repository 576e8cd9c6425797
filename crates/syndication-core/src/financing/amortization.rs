use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate into the monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(12) / Decimal::ONE_HUNDRED
}

/// (1 + r)^n, or `None` when the result overflows 128-bit decimal range.
fn compound(rate: Rate, periods: u32) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powi(i64::from(periods))
}

/// Fixed monthly payment on a fully amortizing loan: P * r(1+r)^n / ((1+r)^n - 1).
///
/// Degenerate inputs never fail: a non-positive principal or a zero term
/// yields 0, and a zero rate falls back to straight-line repayment.
pub fn monthly_payment(principal: Money, annual_rate_pct: Percent, term_years: u32) -> Money {
    if principal <= Decimal::ZERO || term_years == 0 {
        return Decimal::ZERO;
    }

    let num_payments = term_years * MONTHS_PER_YEAR;
    let r = monthly_rate(annual_rate_pct);
    if r.is_zero() {
        return principal / Decimal::from(num_payments);
    }

    let interest_only = principal.saturating_mul(r);
    match compound(r, num_payments) {
        Some(factor) if factor != Decimal::ONE => factor
            .checked_div(factor - Decimal::ONE)
            .and_then(|annuity| interest_only.checked_mul(annuity))
            .unwrap_or(interest_only),
        // Extremely long horizons: the payment converges to interest-only.
        _ => interest_only,
    }
}

/// Annual debt service: twelve scheduled monthly payments.
pub fn annual_debt_service(principal: Money, annual_rate_pct: Percent, term_years: u32) -> Money {
    monthly_payment(principal, annual_rate_pct, term_years)
        .saturating_mul(Decimal::from(MONTHS_PER_YEAR))
}

/// Interest component of the payment due in `period` (1-indexed).
///
/// The balance outstanding before `period` comes from the closed-form
/// geometric amortization identity
/// `P * ((1+r)^n - (1+r)^(k-1)) / ((1+r)^n - 1)`.
/// When the identity leaves decimal range the interest is taken on the
/// original principal.
pub fn interest_portion(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    period: u32,
) -> Money {
    if principal <= Decimal::ZERO || term_years == 0 || period < 1 {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate_pct);
    if r.is_zero() {
        return Decimal::ZERO;
    }

    let balance = if period == 1 {
        principal
    } else {
        let num_payments = term_years * MONTHS_PER_YEAR;
        match (compound(r, num_payments), compound(r, period - 1)) {
            (Some(full), Some(elapsed)) if full != Decimal::ONE => (full - elapsed)
                .checked_div(full - Decimal::ONE)
                .and_then(|outstanding| principal.checked_mul(outstanding))
                .unwrap_or(principal),
            _ => principal,
        }
    };

    balance
        .checked_mul(r)
        .unwrap_or_else(|| principal.saturating_mul(r))
}

/// Future value of a loan balance after `num_periods` level payments:
/// `PV(1+r)^n - PMT((1+r)^n - 1)/r`, or `PV - PMT*n` at a zero rate.
///
/// The result is floored at zero; a remaining balance is never reported
/// as negative even when the payments overshoot the schedule.
pub fn future_value(
    periodic_rate: Rate,
    num_periods: u32,
    periodic_payment: Money,
    present_value: Money,
) -> Money {
    let fv = if periodic_rate.is_zero() {
        present_value.saturating_sub(periodic_payment.saturating_mul(Decimal::from(num_periods)))
    } else {
        // Rearranged as (PV - PMT/r)(1+r)^n + PMT/r so a long amortizing
        // schedule stays in range.
        compound(periodic_rate, num_periods)
            .and_then(|factor| {
                let perpetuity = periodic_payment.checked_div(periodic_rate)?;
                present_value
                    .checked_sub(perpetuity)?
                    .checked_mul(factor)?
                    .checked_add(perpetuity)
            })
            .unwrap_or(Decimal::MAX)
    };

    fv.max(Decimal::ZERO)
}

/// Principal still outstanding after `payments_made` scheduled monthly payments.
pub fn remaining_principal(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    payments_made: u32,
) -> Money {
    if principal <= Decimal::ZERO || term_years == 0 || payments_made == 0 {
        return Decimal::ZERO;
    }

    let payment = monthly_payment(principal, annual_rate_pct, term_years);
    future_value(
        monthly_rate(annual_rate_pct),
        payments_made,
        payment,
        principal,
    )
}

/// A single month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Month-by-month schedule for the first `months` payments (capped at the term).
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    months: u32,
) -> Vec<AmortizationRow> {
    if principal <= Decimal::ZERO || term_years == 0 {
        return Vec::new();
    }

    let payment = monthly_payment(principal, annual_rate_pct, term_years);
    let horizon = months.min(term_years * MONTHS_PER_YEAR);

    (1..=horizon)
        .map(|period| {
            let interest = interest_portion(principal, annual_rate_pct, term_years, period);
            AmortizationRow {
                period,
                payment,
                interest,
                principal: payment - interest,
                balance: remaining_principal(principal, annual_rate_pct, term_years, period),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment_reference_loan() {
        // 75% of $550k at 7% over 25 years
        let payment = monthly_payment(dec!(412500), dec!(7), 25);
        assert!(
            (payment - dec!(2915.46)).abs() < dec!(0.01),
            "Expected ~2915.46, got {payment}"
        );
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(monthly_payment(dec!(360000), Decimal::ZERO, 30), dec!(1000));
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(7), 25), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(-5), dec!(7), 25), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(1000), dec!(7), 0), Decimal::ZERO);
        assert_eq!(interest_portion(dec!(1000), dec!(7), 25, 0), Decimal::ZERO);
        assert_eq!(interest_portion(dec!(1000), Decimal::ZERO, 25, 3), Decimal::ZERO);
    }

    #[test]
    fn test_first_period_interest_uses_full_principal() {
        let interest = interest_portion(dec!(412500), dec!(7), 25, 1);
        assert!((interest - dec!(2406.25)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_interest_declines_over_time() {
        let early = interest_portion(dec!(412500), dec!(7), 25, 2);
        let late = interest_portion(dec!(412500), dec!(7), 25, 200);
        assert!(early > late);
        assert!(early < interest_portion(dec!(412500), dec!(7), 25, 1));
    }

    #[test]
    fn test_interest_past_the_term_stays_in_range() {
        let interest = interest_portion(dec!(1000000), dec!(20), 279, 3000);
        let full = interest_portion(dec!(1000000), dec!(20), 279, 1);
        assert!(interest >= Decimal::ZERO);
        assert!(interest <= full);
    }

    #[test]
    fn test_extreme_terms_do_not_overflow() {
        let payment = monthly_payment(dec!(1000000000000000000000), dec!(20), 2000);
        assert!(payment > Decimal::ZERO);
        // The payment degrades to interest-only, so nothing amortizes
        let balance = remaining_principal(dec!(1000000000000000000000), dec!(20), 2000, 600);
        assert!((balance - dec!(1000000000000000000000)).abs() < dec!(1));
    }

    #[test]
    fn test_future_value_zero_rate_branch() {
        assert_eq!(future_value(Decimal::ZERO, 10, dec!(100), dec!(1500)), dec!(500));
        // Overpayment is floored at zero
        assert_eq!(future_value(Decimal::ZERO, 20, dec!(100), dec!(1500)), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_principal_after_ten_years() {
        let balance = remaining_principal(dec!(412500), dec!(7), 25, 120);
        assert!(
            (balance - dec!(324362.76)).abs() < dec!(0.05),
            "Expected ~324,362.76, got {balance}"
        );
    }

    #[test]
    fn test_remaining_principal_fully_paid() {
        let balance = remaining_principal(dec!(100000), dec!(5), 10, 120);
        assert!(balance < dec!(0.0001));
        assert!(balance >= Decimal::ZERO);
        // Beyond the term the balance stays at zero
        assert_eq!(remaining_principal(dec!(100000), dec!(5), 10, 180), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_principal_no_payments() {
        assert_eq!(remaining_principal(dec!(412500), dec!(7), 25, 0), Decimal::ZERO);
    }

    #[test]
    fn test_schedule_is_capped_at_term() {
        let schedule = amortization_schedule(dec!(12000), dec!(6), 1, 24);
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].period, 1);
        assert!(schedule[11].balance < dec!(0.0001));
    }

    #[test]
    fn test_schedule_rows_balance() {
        let schedule = amortization_schedule(dec!(200000), dec!(6), 30, 3);
        for row in &schedule {
            assert_eq!(row.interest + row.principal, row.payment);
        }
        assert!(schedule[2].balance < schedule[0].balance);
    }
}
