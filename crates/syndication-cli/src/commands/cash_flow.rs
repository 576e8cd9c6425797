use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use syndication_core::projection::cash_flow::{average_cash_flow, total_adjusted, total_cash_flow};
use syndication_core::projection::{
    debt_service_summary, price_projection, project_cash_flows, CashFlowRow, CashFlowSplits,
};
use syndication_core::{with_metadata, Money, PROJECTION_YEARS};

use super::{ScenarioFlags, ScenarioRequest};

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowOutput {
    pub cash_flows: Vec<CashFlowRow>,
    pub total_cash_flow: Money,
    pub average_cash_flow: Money,
    pub total_adjusted: Money,
}

/// Arguments for the 10-year cash-flow projection
#[derive(Args)]
pub struct CashFlowArgs {
    #[command(flatten)]
    pub scenario: ScenarioFlags,
}

fn prices(req: &ScenarioRequest) -> Vec<Money> {
    let a = &req.context.assumptions;
    price_projection(a.price_per, a.escalator_pct, PROJECTION_YEARS)
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let req = args.scenario.resolve()?;
    let project = &req.context.project;

    let rows = project_cash_flows(
        &req.scenario,
        &prices(&req),
        project.total_area,
        project.annual_operating_cost(),
        project.cost,
        &CashFlowSplits::from(&req.context.assumptions),
    );
    let output = CashFlowOutput {
        total_cash_flow: total_cash_flow(&rows),
        average_cash_flow: average_cash_flow(&rows),
        total_adjusted: total_adjusted(&rows),
        cash_flows: rows,
    };

    let result = with_metadata(
        "10-year projection: escalated rent less operating cost and debt service",
        &req,
        req.warnings(),
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

/// Arguments for debt service and DSCR
#[derive(Args)]
pub struct DebtServiceArgs {
    #[command(flatten)]
    pub scenario: ScenarioFlags,
}

pub fn run_debt_service(args: DebtServiceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let req = args.scenario.resolve()?;
    let project = &req.context.project;

    let summary = debt_service_summary(
        &req.scenario,
        &prices(&req),
        project.total_area,
        project.annual_operating_cost(),
        project.cost,
    );

    let result = with_metadata(
        "Debt service coverage: year-1 NOI over annual debt service",
        &req,
        req.warnings(),
        start.elapsed().as_micros() as u64,
        summary,
    );
    Ok(serde_json::to_value(result)?)
}
