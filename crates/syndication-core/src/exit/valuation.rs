use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::financing::amortization::remaining_principal;
use crate::financing::{resolve_financing, Scenario};
use crate::types::{pct_to_rate, Money, Percent};

/// Cap-rate shift used for the informational sensitivity rows.
pub const CAP_RATE_SENSITIVITY: Percent = dec!(0.5);

/// Which exit case a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitCase {
    Base,
    CapRateUp,
    CapRateDown,
}

/// Exit value at a single cap rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitValueRow {
    pub case: ExitCase,
    pub cap_rate_pct: Percent,
    /// `None` when the cap rate is not positive
    pub value: Option<Money>,
}

/// Sale of the property at the end of the hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitValuation {
    pub noi_year_10: Money,
    pub remaining_principal: Money,
    /// Base, cap + 0.5 and cap - 0.5, in that order
    pub exit_values: Vec<ExitValueRow>,
    pub exit_price: Option<Money>,
    /// Base exit price less outstanding principal
    pub net_equity: Option<Money>,
}

/// Capitalise year-10 NOI into a sale price. Undefined at a zero cap rate.
pub fn exit_price(noi_year_10: Money, exit_cap_rate_pct: Percent) -> Option<Money> {
    if exit_cap_rate_pct.is_zero() {
        return None;
    }
    Some(noi_year_10 / pct_to_rate(exit_cap_rate_pct))
}

fn sensitivity_row(case: ExitCase, noi_year_10: Money, cap_rate_pct: Percent) -> ExitValueRow {
    let value = if cap_rate_pct > Decimal::ZERO {
        exit_price(noi_year_10, cap_rate_pct)
    } else {
        None
    };
    ExitValueRow {
        case,
        cap_rate_pct,
        value,
    }
}

/// Loan balance outstanding at exit. Only `Loan` scenarios carry one.
pub fn balance_at_exit(project_cost: Money, scenario: &Scenario, payments_made: u32) -> Money {
    if !scenario.financing_type.carries_debt_service() {
        return Decimal::ZERO;
    }
    let loan = resolve_financing(project_cost, scenario).loan_amount;
    remaining_principal(loan, scenario.rate, scenario.term, payments_made)
}

/// Value the exit and derive net equity for a scenario.
///
/// The cap-rate sensitivity rows are informational; only the base price
/// feeds net equity.
pub fn exit_valuation(
    scenario: &Scenario,
    noi_year_10: Money,
    exit_cap_rate_pct: Percent,
    project_cost: Money,
    payments_made: u32,
) -> ExitValuation {
    let remaining = balance_at_exit(project_cost, scenario, payments_made);
    let base = exit_price(noi_year_10, exit_cap_rate_pct);

    let exit_values = vec![
        ExitValueRow {
            case: ExitCase::Base,
            cap_rate_pct: exit_cap_rate_pct,
            value: base,
        },
        sensitivity_row(
            ExitCase::CapRateUp,
            noi_year_10,
            exit_cap_rate_pct + CAP_RATE_SENSITIVITY,
        ),
        sensitivity_row(
            ExitCase::CapRateDown,
            noi_year_10,
            exit_cap_rate_pct - CAP_RATE_SENSITIVITY,
        ),
    ];

    let net_equity = base.map(|price| price - remaining);
    debug!(
        scenario = scenario.id,
        %remaining,
        exit_price = ?base,
        "valued exit"
    );

    ExitValuation {
        noi_year_10,
        remaining_principal: remaining,
        exit_values,
        exit_price: base,
        net_equity,
    }
}
