use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use syndication_core::exit::{exit_returns, exit_valuation, ExitReturns, ExitValuation};
use syndication_core::projection::{noi, price_projection, project_cash_flows, CashFlowSplits};
use syndication_core::time_value::{irr, DEFAULT_IRR_GUESS};
use syndication_core::{with_metadata, Money, Percent, Rate, PROJECTION_YEARS};

use super::ScenarioFlags;
use crate::input;

#[derive(Debug, Clone, Serialize)]
pub struct ExitOutput {
    pub valuation: ExitValuation,
    pub returns: ExitReturns,
}

/// Arguments for exit valuation and returns
#[derive(Args)]
pub struct ExitArgs {
    #[command(flatten)]
    pub scenario: ScenarioFlags,
}

pub fn run_exit(args: ExitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let req = args.scenario.resolve()?;
    let project = &req.context.project;
    let a = &req.context.assumptions;
    let operating_cost = project.annual_operating_cost();

    let prices = price_projection(a.price_per, a.escalator_pct, PROJECTION_YEARS);
    let rows = project_cash_flows(
        &req.scenario,
        &prices,
        project.total_area,
        operating_cost,
        project.cost,
        &CashFlowSplits::from(a),
    );
    let year_10_income = prices.last().copied().unwrap_or(Decimal::ZERO) * project.total_area;
    let valuation = exit_valuation(
        &req.scenario,
        noi(year_10_income, operating_cost),
        a.exit_cap_rate_pct,
        project.cost,
        a.payments_made,
    );

    let mut warnings = req.warnings();
    let adjusted: Vec<Money> = rows.iter().map(|r| r.adjusted).collect();
    let returns = exit_returns(
        &adjusted,
        valuation.exit_price,
        req.scenario.adjusted_raise,
        &mut warnings,
    );

    let result = with_metadata(
        "Direct capitalisation of year-10 NOI; IRR over adjusted cash flows plus sale",
        &req,
        warnings,
        start.elapsed().as_micros() as u64,
        ExitOutput { valuation, returns },
    );
    Ok(serde_json::to_value(result)?)
}

/// An investment and the cash flows it returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrInput {
    /// Amount invested at t=0; its sign is ignored
    pub initial_investment: Money,
    pub cash_flows: Vec<Money>,
    #[serde(default = "default_guess")]
    pub guess: Rate,
}

fn default_guess() -> Rate {
    DEFAULT_IRR_GUESS
}

#[derive(Debug, Clone, Serialize)]
pub struct IrrOutput {
    pub irr: Rate,
    pub irr_pct: Percent,
}

/// Arguments for an IRR calculation
#[derive(Args)]
pub struct IrrArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested at t=0
    #[arg(long, allow_hyphen_values = true)]
    pub initial: Option<Decimal>,

    /// Periodic cash flows after the investment (comma-separated, e.g. "100,100,1100")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<Decimal>>,

    /// Starting rate for Newton-Raphson, as a decimal
    #[arg(long)]
    pub guess: Option<Decimal>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let irr_input: IrrInput = match input::load(args.input.as_deref())? {
        Some(doc) => doc,
        None => IrrInput {
            initial_investment: args
                .initial
                .ok_or("--initial is required (or provide --input)")?,
            cash_flows: args
                .cash_flows
                .ok_or("--cash-flows is required (or provide --input)")?,
            guess: args.guess.unwrap_or(DEFAULT_IRR_GUESS),
        },
    };

    let mut series = Vec::with_capacity(irr_input.cash_flows.len() + 1);
    series.push(-irr_input.initial_investment.abs());
    series.extend_from_slice(&irr_input.cash_flows);
    let rate = irr(&series, irr_input.guess)?;

    let result = with_metadata(
        "Newton-Raphson IRR (tolerance 1e-6, max 100 iterations)",
        &irr_input,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        IrrOutput {
            irr: rate,
            irr_pct: rate * Decimal::ONE_HUNDRED,
        },
    );
    Ok(serde_json::to_value(result)?)
}
