use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prices::price_in_year;
use crate::assumptions::Assumptions;
use crate::financing::amortization::annual_debt_service;
use crate::financing::{resolve_financing, Scenario};
use crate::types::{Money, Percent, Rate, PROJECTION_YEARS};

/// How each year's cash flow is haircut and split between GP and LP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowSplits {
    pub adjusted_fraction: Rate,
    pub gp_fraction: Rate,
    pub lp_fraction: Rate,
}

impl Default for CashFlowSplits {
    fn default() -> Self {
        Self {
            adjusted_fraction: dec!(0.85),
            gp_fraction: dec!(0.20),
            lp_fraction: dec!(0.80),
        }
    }
}

impl From<&Assumptions> for CashFlowSplits {
    fn from(a: &Assumptions) -> Self {
        Self {
            adjusted_fraction: a.adjusted_fraction,
            gp_fraction: a.gp_fraction,
            lp_fraction: a.lp_fraction,
        }
    }
}

/// One projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRow {
    pub year: u32,
    /// Escalation applied going into this year (0 in year 1)
    pub escalator_pct: Percent,
    pub price_per: Money,
    pub gross_income: Money,
    /// Gross income less operating cost and debt service
    pub cash_flow: Money,
    /// Distributable share of cash flow
    pub adjusted: Money,
    pub gp_amount: Money,
    pub lp_amount: Money,
    /// LP amount over adjusted raise, in percent
    pub lp_cash_on_cash_pct: Percent,
}

/// Net Operating Income = gross income - operating costs.
pub fn noi(gross_income: Money, operating_cost: Money) -> Money {
    gross_income - operating_cost
}

/// Annual debt service for a scenario. Only `Loan` financing pays debt service.
pub fn scenario_debt_service(project_cost: Money, scenario: &Scenario) -> Money {
    if !scenario.financing_type.carries_debt_service() {
        return Decimal::ZERO;
    }
    let loan = resolve_financing(project_cost, scenario).loan_amount;
    annual_debt_service(loan, scenario.rate, scenario.term)
}

/// Build the ten-year cash-flow table for one scenario.
pub fn project_cash_flows(
    scenario: &Scenario,
    prices: &[Money],
    total_area: Decimal,
    annual_operating_cost: Money,
    project_cost: Money,
    splits: &CashFlowSplits,
) -> Vec<CashFlowRow> {
    let debt_service = scenario_debt_service(project_cost, scenario);
    debug!(
        scenario = scenario.id,
        financing = %scenario.financing_type,
        %debt_service,
        "projecting cash flows"
    );

    (1..=PROJECTION_YEARS)
        .map(|year| {
            let price_per = price_in_year(prices, year);
            let prior = price_in_year(prices, year - 1);
            let escalator_pct = if year == 1 || prior.is_zero() {
                Decimal::ZERO
            } else {
                (price_per / prior - Decimal::ONE) * Decimal::ONE_HUNDRED
            };

            let gross_income = price_per * total_area;
            let cash_flow = gross_income - annual_operating_cost - debt_service;
            let adjusted = cash_flow * splits.adjusted_fraction;
            let gp_amount = adjusted * splits.gp_fraction;
            let lp_amount = adjusted * splits.lp_fraction;
            let lp_cash_on_cash_pct = if scenario.adjusted_raise > Decimal::ZERO {
                lp_amount / scenario.adjusted_raise * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };

            CashFlowRow {
                year,
                escalator_pct,
                price_per,
                gross_income,
                cash_flow,
                adjusted,
                gp_amount,
                lp_amount,
                lp_cash_on_cash_pct,
            }
        })
        .collect()
}

/// Sum of annual cash flow over the projection.
pub fn total_cash_flow(rows: &[CashFlowRow]) -> Money {
    rows.iter().map(|r| r.cash_flow).sum()
}

/// Mean annual cash flow, zero for an empty table.
pub fn average_cash_flow(rows: &[CashFlowRow]) -> Money {
    if rows.is_empty() {
        return Decimal::ZERO;
    }
    total_cash_flow(rows) / Decimal::from(rows.len() as u64)
}

/// Sum of distributable (adjusted) cash flow over the projection.
pub fn total_adjusted(rows: &[CashFlowRow]) -> Money {
    rows.iter().map(|r| r.adjusted).sum()
}
