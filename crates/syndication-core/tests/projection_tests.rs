use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use syndication_core::financing::{FinancingType, Scenario};
use syndication_core::projection::cash_flow::{average_cash_flow, total_adjusted, total_cash_flow};
use syndication_core::projection::{
    debt_service_summary, price_projection, project_cash_flows, rent_projection, CashFlowSplits,
    DscrBand,
};
use syndication_core::time_value::{irr, project_irr, DEFAULT_IRR_GUESS};

fn default_prices() -> Vec<Decimal> {
    price_projection(dec!(35), dec!(3), 10)
}

// ===========================================================================
// Price projection
// ===========================================================================

#[test]
fn test_year_ten_price() {
    let prices = default_prices();
    assert_eq!(prices.len(), 10);
    assert_eq!(prices[0], dec!(35));
    // 35 * 1.03^9 ≈ 45.667
    assert!((prices[9] - dec!(45.67)).abs() < dec!(0.01));
}

#[test]
fn test_flat_escalator_is_constant() {
    let prices = price_projection(dec!(35), Decimal::ZERO, 10);
    assert!(prices.iter().all(|p| *p == dec!(35)));
}

#[test]
fn test_rent_projection_scales_by_area() {
    let rents = rent_projection(dec!(35), dec!(1500), dec!(3), 10);
    assert_eq!(rents[0], dec!(52500));
    assert_eq!(rents[9], default_prices()[9] * dec!(1500));
}

// ===========================================================================
// Cash-flow table
// ===========================================================================

#[test]
fn test_default_loan_cash_flows() {
    let rows = project_cash_flows(
        &Scenario::default(),
        &default_prices(),
        dec!(1500),
        Decimal::ZERO,
        dec!(550000),
        &CashFlowSplits::default(),
    );
    assert_eq!(rows.len(), 10);

    let y1 = &rows[0];
    assert_eq!(y1.year, 1);
    assert_eq!(y1.escalator_pct, Decimal::ZERO);
    assert_eq!(y1.gross_income, dec!(52500));
    // 52,500 less ~34,985.57 of debt service
    assert!((y1.cash_flow - dec!(17514.43)).abs() < dec!(0.01));
    assert_eq!(y1.adjusted, y1.cash_flow * dec!(0.85));
    assert!((y1.gp_amount + y1.lp_amount - y1.adjusted).abs() < dec!(0.000001));
    assert_eq!(y1.lp_cash_on_cash_pct, y1.lp_amount / dec!(175000) * dec!(100));

    assert!((rows[1].escalator_pct - dec!(3)).abs() < dec!(0.0000001));
    assert_eq!(total_cash_flow(&rows), rows.iter().map(|r| r.cash_flow).sum::<Decimal>());
    assert_eq!(average_cash_flow(&rows), total_cash_flow(&rows) / dec!(10));
    assert!((total_adjusted(&rows) - total_cash_flow(&rows) * dec!(0.85)).abs() < dec!(0.000001));
}

#[test]
fn test_cash_and_hybrid_match() {
    let prices = default_prices();
    let splits = CashFlowSplits::default();
    let cash = Scenario {
        financing_type: FinancingType::Cash,
        ..Scenario::default()
    };
    let hybrid = Scenario {
        financing_type: FinancingType::Hybrid,
        ..Scenario::default()
    };
    let cash_rows = project_cash_flows(&cash, &prices, dec!(1500), dec!(4000), dec!(550000), &splits);
    let hybrid_rows =
        project_cash_flows(&hybrid, &prices, dec!(1500), dec!(4000), dec!(550000), &splits);
    assert_eq!(cash_rows, hybrid_rows);
    assert_eq!(cash_rows[0].cash_flow, dec!(48500));
}

// ===========================================================================
// Debt service coverage
// ===========================================================================

#[test]
fn test_reference_dscr_is_strong() {
    let summary = debt_service_summary(
        &Scenario::default(),
        &default_prices(),
        dec!(1500),
        Decimal::ZERO,
        dec!(550000),
    );
    let dscr = summary.dscr.unwrap();
    // 52,500 / 34,985.57 ≈ 1.5006
    assert!((dscr - dec!(1.5006)).abs() < dec!(0.0001));
    assert_eq!(summary.dscr_band, Some(DscrBand::Strong));
    assert_eq!(summary.term_months, 300);
}

#[test]
fn test_operating_costs_push_dscr_down_a_band() {
    let summary = debt_service_summary(
        &Scenario::default(),
        &default_prices(),
        dec!(1500),
        dec!(10000),
        dec!(550000),
    );
    // (52,500 - 10,000) / 34,985.57 ≈ 1.2148
    assert_eq!(summary.dscr_band, Some(DscrBand::BelowLenderMinimum));
}

// ===========================================================================
// IRR round trips
// ===========================================================================

#[test]
fn test_irr_round_trip_par_bond() {
    // 10% coupon bought at par yields exactly 10%
    let rate = irr(&[dec!(-1000), dec!(100), dec!(100), dec!(1100)], DEFAULT_IRR_GUESS).unwrap();
    assert!((rate - dec!(0.10)).abs() < dec!(0.0001));

    let pct = project_irr(dec!(1000), &[dec!(100), dec!(100), dec!(1100)]).unwrap();
    assert!((pct - dec!(10)).abs() < dec!(0.01));
}

#[test]
fn test_irr_round_trip_growth() {
    // 1,000 growing to 1,000 * 1.12^5 with nothing in between
    let terminal = dec!(1000) * dec!(1.7623416832);
    let pct = project_irr(
        dec!(1000),
        &[Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, terminal],
    )
    .unwrap();
    assert!((pct - dec!(12)).abs() < dec!(0.01), "got {pct}");
}

proptest! {
    #[test]
    fn prop_price_projection_strictly_increasing(
        base in 1u32..500,
        escalator_bps in 1u32..1_500,
    ) {
        let prices = price_projection(
            Decimal::from(base),
            Decimal::new(i64::from(escalator_bps), 2),
            10,
        );
        prop_assert_eq!(prices.len(), 10);
        for pair in prices.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
    }
}
