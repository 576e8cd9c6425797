use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::cash_flow::noi;
use super::prices::price_in_year;
use crate::financing::amortization::{interest_portion, monthly_payment, monthly_rate};
use crate::financing::{resolve_financing, Scenario};
use crate::types::{Money, Percent, PROJECTION_YEARS};

/// Qualitative reading of a debt service coverage ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DscrBand {
    /// Below 1.0: income does not cover debt
    Insufficient,
    /// 1.0 to 1.25: may not meet lender requirements
    BelowLenderMinimum,
    /// 1.25 to 1.5
    Acceptable,
    /// 1.5 and above
    Strong,
}

impl DscrBand {
    pub fn classify(dscr: Decimal) -> Self {
        if dscr < Decimal::ONE {
            DscrBand::Insufficient
        } else if dscr < dec!(1.25) {
            DscrBand::BelowLenderMinimum
        } else if dscr < dec!(1.5) {
            DscrBand::Acceptable
        } else {
            DscrBand::Strong
        }
    }
}

/// Loan parameters and coverage for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtServiceSummary {
    pub loan_amount: Money,
    /// Monthly interest rate, in percent
    pub monthly_rate_pct: Percent,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub first_month_interest: Money,
    pub annual_debt_service: Money,
    pub projected_income_y1: Money,
    pub target_income_y10: Money,
    pub annual_costs: Money,
    pub dscr: Option<Decimal>,
    pub dscr_band: Option<DscrBand>,
}

/// Debt Service Coverage Ratio = NOI / annual debt service.
///
/// `None` when there is no debt service to cover.
pub fn dscr(noi: Money, annual_debt_service: Money) -> Option<Decimal> {
    if annual_debt_service.is_zero() {
        return None;
    }
    Some(noi / annual_debt_service)
}

/// Summarise debt service and year-1 coverage for a scenario.
pub fn debt_service_summary(
    scenario: &Scenario,
    prices: &[Money],
    total_area: Decimal,
    annual_operating_cost: Money,
    project_cost: Money,
) -> DebtServiceSummary {
    let loan_amount = resolve_financing(project_cost, scenario).loan_amount;

    let (payment, first_interest) =
        if scenario.financing_type.carries_debt_service() && loan_amount > Decimal::ZERO {
            (
                monthly_payment(loan_amount, scenario.rate, scenario.term),
                interest_portion(loan_amount, scenario.rate, scenario.term, 1),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
    let annual = payment * dec!(12);

    let projected_income_y1 = price_in_year(prices, 1) * total_area;
    let target_income_y10 = price_in_year(prices, PROJECTION_YEARS) * total_area;
    let ratio = dscr(noi(projected_income_y1, annual_operating_cost), annual);

    DebtServiceSummary {
        loan_amount,
        monthly_rate_pct: monthly_rate(scenario.rate) * Decimal::ONE_HUNDRED,
        term_months: scenario.term * 12,
        monthly_payment: payment,
        first_month_interest: first_interest,
        annual_debt_service: annual,
        projected_income_y1,
        target_income_y10,
        annual_costs: annual_operating_cost,
        dscr: ratio,
        dscr_band: ratio.map(DscrBand::classify),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::FinancingType;
    use crate::projection::prices::price_projection;

    #[test]
    fn test_dscr_undefined_without_debt() {
        assert_eq!(dscr(dec!(50000), Decimal::ZERO), None);
        assert_eq!(dscr(dec!(50000), dec!(25000)), Some(dec!(2)));
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(DscrBand::classify(dec!(0.99)), DscrBand::Insufficient);
        assert_eq!(DscrBand::classify(dec!(1.0)), DscrBand::BelowLenderMinimum);
        assert_eq!(DscrBand::classify(dec!(1.25)), DscrBand::Acceptable);
        assert_eq!(DscrBand::classify(dec!(1.5)), DscrBand::Strong);
    }

    #[test]
    fn test_reference_loan_summary() {
        let prices = price_projection(dec!(35), dec!(3), 10);
        let summary = debt_service_summary(
            &Scenario::default(),
            &prices,
            dec!(1500),
            Decimal::ZERO,
            dec!(550000),
        );
        assert_eq!(summary.loan_amount, dec!(412500));
        assert_eq!(summary.term_months, 300);
        assert!((summary.first_month_interest - dec!(2406.25)).abs() < dec!(0.0001));
        // 52,500 / 34,985.57 ≈ 1.5006
        let ratio = summary.dscr.unwrap();
        assert!((ratio - dec!(1.5006)).abs() < dec!(0.001));
        assert_eq!(summary.dscr_band, Some(DscrBand::Strong));
    }

    #[test]
    fn test_cash_summary_has_no_ratio() {
        let prices = price_projection(dec!(35), dec!(3), 10);
        let scenario = Scenario {
            financing_type: FinancingType::Cash,
            ..Scenario::default()
        };
        let summary =
            debt_service_summary(&scenario, &prices, dec!(1500), Decimal::ZERO, dec!(550000));
        assert_eq!(summary.annual_debt_service, Decimal::ZERO);
        assert!(summary.dscr.is_none());
        assert!(summary.dscr_band.is_none());
    }

    #[test]
    fn test_hybrid_summary_has_no_payment() {
        let prices = price_projection(dec!(35), dec!(3), 10);
        let scenario = Scenario {
            financing_type: FinancingType::Hybrid,
            ..Scenario::default()
        };
        let summary =
            debt_service_summary(&scenario, &prices, dec!(1500), Decimal::ZERO, dec!(550000));
        assert!(summary.loan_amount > Decimal::ZERO);
        assert_eq!(summary.monthly_payment, Decimal::ZERO);
        assert_eq!(summary.first_month_interest, Decimal::ZERO);
    }
}
