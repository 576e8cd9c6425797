use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scenario::Scenario;
use crate::types::{pct_to_rate, Money};

/// Capital structure derived for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingMetrics {
    pub loan_amount: Money,
    pub down_payment: Money,
    /// Down payment plus additional startup costs
    pub raise_amount: Money,
    /// Adjusted raise minus required raise; positive means surplus reserves
    pub reserve_cash_delta: Money,
}

/// Split the project cost into debt and equity for a scenario.
///
/// The loan and down-payment percentages are applied independently; nothing
/// here checks that they add up to 100.
pub fn resolve_financing(project_cost: Money, scenario: &Scenario) -> FinancingMetrics {
    let loan_amount = project_cost * pct_to_rate(scenario.loan_percent);
    let down_payment = project_cost * pct_to_rate(scenario.down_payment_percent);
    let raise_amount = down_payment + scenario.additional_startup;
    let reserve_cash_delta = scenario.adjusted_raise - raise_amount;

    debug!(
        scenario = scenario.id,
        %loan_amount,
        %raise_amount,
        "resolved financing"
    );

    FinancingMetrics {
        loan_amount,
        down_payment,
        raise_amount,
        reserve_cash_delta,
    }
}
