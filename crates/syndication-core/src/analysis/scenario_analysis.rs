use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::assumptions::AnalysisContext;
use crate::exit::{exit_returns, exit_valuation, ExitReturns, ExitValuation};
use crate::financing::scenario::financing_warnings;
use crate::financing::{resolve_financing, FinancingMetrics, Scenario};
use crate::projection::cash_flow::{average_cash_flow, total_adjusted, total_cash_flow};
use crate::projection::prices::price_in_year;
use crate::projection::{
    debt_service_summary, noi, price_projection, project_cash_flows, CashFlowRow, CashFlowSplits,
    DebtServiceSummary,
};
use crate::types::*;
use crate::waterfall::{distribute, WaterfallResult};
use crate::SyndicationResult;

/// Everything derived for one scenario under a shared context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub scenario: Scenario,
    pub financing: FinancingMetrics,
    /// Rent per square foot, years 1..=10
    pub price_projection: Vec<Money>,
    pub cash_flows: Vec<CashFlowRow>,
    pub total_cash_flow: Money,
    pub average_cash_flow: Money,
    pub total_adjusted: Money,
    pub debt_service: DebtServiceSummary,
    pub exit: ExitValuation,
    pub returns: ExitReturns,
    pub waterfall: WaterfallResult,
}

/// Run the full pipeline for a scenario without the output envelope.
///
/// Scenario-specific advisory messages are appended to `warnings`, each
/// prefixed with the scenario id. Context-wide warnings are left to the
/// caller so they are reported once per batch.
pub(crate) fn evaluate(
    ctx: &AnalysisContext,
    scenario: &Scenario,
    warnings: &mut Vec<String>,
) -> ScenarioAnalysis {
    let project = &ctx.project;
    let a = &ctx.assumptions;
    let operating_cost = project.annual_operating_cost();

    debug!(scenario = scenario.id, project = %project.name, "analyzing scenario");
    warnings.extend(financing_warnings(scenario));

    let financing = resolve_financing(project.cost, scenario);
    let prices = price_projection(a.price_per, a.escalator_pct, PROJECTION_YEARS);
    let splits = CashFlowSplits::from(a);
    let cash_flows = project_cash_flows(
        scenario,
        &prices,
        project.total_area,
        operating_cost,
        project.cost,
        &splits,
    );
    let debt_service = debt_service_summary(
        scenario,
        &prices,
        project.total_area,
        operating_cost,
        project.cost,
    );

    let noi_year_10 = noi(
        price_in_year(&prices, PROJECTION_YEARS) * project.total_area,
        operating_cost,
    );
    let exit = exit_valuation(
        scenario,
        noi_year_10,
        a.exit_cap_rate_pct,
        project.cost,
        a.payments_made,
    );

    let adjusted: Vec<Money> = cash_flows.iter().map(|row| row.adjusted).collect();
    let mut return_warnings = Vec::new();
    let returns = exit_returns(
        &adjusted,
        exit.exit_price,
        scenario.adjusted_raise,
        &mut return_warnings,
    );
    warnings.extend(
        return_warnings
            .into_iter()
            .map(|w| format!("Scenario {}: {w}", scenario.id)),
    );

    let total_adj = total_adjusted(&cash_flows);
    let net_equity = exit.net_equity.unwrap_or_else(|| {
        warnings.push(format!(
            "Scenario {}: net equity undefined; waterfall distributes cash flows only",
            scenario.id
        ));
        Decimal::ZERO
    });
    let waterfall = distribute(
        total_adj + net_equity,
        scenario.adjusted_raise,
        a.waterfall_gp_pct,
        a.waterfall_lp_pct,
        a.hurdle_rate_pct,
        a.years_held,
    );

    ScenarioAnalysis {
        scenario: scenario.clone(),
        financing,
        price_projection: prices,
        total_cash_flow: total_cash_flow(&cash_flows),
        average_cash_flow: average_cash_flow(&cash_flows),
        total_adjusted: total_adj,
        cash_flows,
        debt_service,
        exit,
        returns,
        waterfall,
    }
}

/// Analyze a single financing scenario end to end.
///
/// Financing, cash-flow projection, debt service, exit valuation, returns
/// and the GP/LP waterfall, with every advisory warning collected in the
/// envelope.
pub fn analyze_scenario(
    ctx: &AnalysisContext,
    scenario: &Scenario,
) -> SyndicationResult<ComputationOutput<ScenarioAnalysis>> {
    let start = Instant::now();
    let mut warnings = ctx.assumptions.warnings();

    let analysis = evaluate(ctx, scenario, &mut warnings);
    if !warnings.is_empty() {
        warn!(scenario = scenario.id, count = warnings.len(), "scenario carries warnings");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Syndication underwriting: 10-year projection, cap-rate exit, hurdle waterfall",
        &serde_json::json!({ "context": ctx, "scenario": scenario }),
        warnings,
        elapsed,
        analysis,
    ))
}
