use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::project_irr;
use crate::types::{Money, Multiple, Percent};

/// Project-level returns from holding and selling the property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitReturns {
    pub exit_price: Option<Money>,
    /// Annualised IRR in percent; `None` when undefined
    pub project_irr: Option<Percent>,
    pub total_cash_returned: Option<Money>,
    pub cash_on_cash: Option<Multiple>,
}

/// Total cash returned over cash invested. Undefined with nothing invested.
pub fn cash_on_cash(total_cash_returned: Money, total_cash_invested: Money) -> Option<Multiple> {
    if total_cash_invested.is_zero() {
        return None;
    }
    Some(total_cash_returned / total_cash_invested)
}

/// IRR and cash-on-cash for distributable cash flows followed by a sale.
///
/// The exit price is appended as its own final period after the yearly
/// flows. Without an exit price both metrics are undefined.
pub fn exit_returns(
    adjusted_cash_flows: &[Money],
    exit_price: Option<Money>,
    initial_investment: Money,
    warnings: &mut Vec<String>,
) -> ExitReturns {
    let Some(price) = exit_price else {
        warnings.push("Exit price undefined; IRR and cash-on-cash not computed".into());
        return ExitReturns {
            exit_price: None,
            project_irr: None,
            total_cash_returned: None,
            cash_on_cash: None,
        };
    };

    let mut flows = adjusted_cash_flows.to_vec();
    flows.push(price);

    let irr = match project_irr(initial_investment, &flows) {
        Ok(pct) => Some(pct),
        Err(e) => {
            warnings.push(format!("IRR calculation warning: {e}"));
            None
        }
    };

    let total_returned: Money = adjusted_cash_flows.iter().copied().sum::<Decimal>() + price;

    ExitReturns {
        exit_price: Some(price),
        project_irr: irr,
        total_cash_returned: Some(total_returned),
        cash_on_cash: cash_on_cash(total_returned, initial_investment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_on_cash() {
        assert_eq!(cash_on_cash(dec!(500), dec!(200)), Some(dec!(2.5)));
        assert_eq!(cash_on_cash(dec!(500), Decimal::ZERO), None);
    }

    #[test]
    fn test_exit_returns_appends_sale() {
        let mut warnings = Vec::new();
        // Invest 100, nothing for a year, then sell for 121 => 10%
        let result = exit_returns(&[Decimal::ZERO], Some(dec!(121)), dec!(100), &mut warnings);
        let irr = result.project_irr.unwrap();
        assert!((irr - dec!(10)).abs() < dec!(0.001), "got {irr}");
        assert_eq!(result.cash_on_cash, Some(dec!(1.21)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_exit_price() {
        let mut warnings = Vec::new();
        let result = exit_returns(&[dec!(10)], None, dec!(100), &mut warnings);
        assert!(result.project_irr.is_none());
        assert!(result.cash_on_cash.is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_zero_investment_has_undefined_multiple() {
        let mut warnings = Vec::new();
        let result = exit_returns(&[dec!(10)], Some(dec!(100)), Decimal::ZERO, &mut warnings);
        assert!(result.cash_on_cash.is_none());
        // Series [0, 10, 100] has no sign change
        assert!(result.project_irr.is_none());
        assert_eq!(warnings.len(), 1);
    }
}
