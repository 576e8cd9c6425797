use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::error::SyndicationError;
use crate::types::{Money, Percent, Rate};
use crate::SyndicationResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// Starting point for the Newton-Raphson iteration.
pub const DEFAULT_IRR_GUESS: Rate = dec!(0.10);

/// Net Present Value of a series of cash flows
pub fn npv(rate: Rate, cash_flows: &[Money]) -> SyndicationResult<Money> {
    let (value, _) = npv_and_derivative(rate, cash_flows).ok_or_else(|| {
        SyndicationError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100% and keep factors in range".into(),
        }
    })?;
    Ok(value)
}

/// NPV(r) = sum CF_t / (1+r)^t and dNPV/dr = sum -t * CF_t / (1+r)^(t+1).
///
/// Returns `None` when 1 + r is not positive or an intermediate value
/// leaves the 128-bit decimal range.
fn npv_and_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        npv = npv.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let weighted = Decimal::from(t as i64).checked_mul(*cf)?;
            let denom = discount.checked_mul(one_plus_r)?;
            dnpv = dnpv.checked_sub(weighted.checked_div(denom)?)?;
        }
    }

    Some((npv, dnpv))
}

/// Internal Rate of Return using Newton-Raphson.
///
/// Stops as soon as |NPV| falls below the tolerance. A vanishing derivative,
/// an iterate at or below -100%, or an exhausted iteration budget is a
/// [`SyndicationError::ConvergenceFailure`]; no guessed rate is returned.
pub fn irr(cash_flows: &[Money], guess: Rate) -> SyndicationResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(SyndicationError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = guess;
    let mut last_npv = Decimal::ZERO;

    for i in 0..MAX_IRR_ITERATIONS {
        let Some((npv_val, dnpv)) = npv_and_derivative(rate, cash_flows) else {
            return Err(SyndicationError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: last_npv,
            });
        };
        last_npv = npv_val;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.abs() < CONVERGENCE_THRESHOLD {
            return Err(SyndicationError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        rate -= npv_val / dnpv;
    }

    Err(SyndicationError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: last_npv,
    })
}

/// Annualized project IRR in percent.
///
/// The series is `[-|initial_investment|, cash_flows...]`, so the sign of
/// the investment argument does not matter.
pub fn project_irr(initial_investment: Money, cash_flows: &[Money]) -> SyndicationResult<Percent> {
    let mut series = Vec::with_capacity(cash_flows.len() + 1);
    series.push(-initial_investment.abs());
    series.extend_from_slice(cash_flows);

    match irr(&series, DEFAULT_IRR_GUESS) {
        Ok(rate) => Ok(rate * Decimal::ONE_HUNDRED),
        Err(e) => {
            warn!(error = %e, "project IRR undefined");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(1.0));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        assert_eq!(npv(dec!(0.0), &cfs).unwrap(), dec!(50));
    }

    #[test]
    fn test_npv_rejects_rate_below_minus_one() {
        assert!(npv(dec!(-1.5), &[dec!(-100), dec!(110)]).is_err());
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, DEFAULT_IRR_GUESS).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_single_period() {
        let result = irr(&[dec!(-100), dec!(110)], DEFAULT_IRR_GUESS).unwrap();
        assert!((result - dec!(0.10)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_irr_requires_two_flows() {
        assert!(matches!(
            irr(&[dec!(-100)], DEFAULT_IRR_GUESS),
            Err(SyndicationError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_irr_without_sign_change_fails() {
        // All inflows: NPV never crosses zero
        let result = irr(&[dec!(100), dec!(100), dec!(100)], DEFAULT_IRR_GUESS);
        assert!(matches!(
            result,
            Err(SyndicationError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_project_irr_is_percent() {
        let pct = project_irr(dec!(1000), &[dec!(400), dec!(400), dec!(400)]).unwrap();
        assert!((pct - dec!(9.7)).abs() < dec!(0.1));
        // Sign of the initial investment is ignored
        let same = project_irr(dec!(-1000), &[dec!(400), dec!(400), dec!(400)]).unwrap();
        assert_eq!(pct, same);
    }
}
