use clap::Args;
use serde_json::Value;
use std::time::Instant;

use syndication_core::financing::resolve_financing;
use syndication_core::financing::scenario::financing_warnings;
use syndication_core::with_metadata;

use super::ScenarioFlags;

/// Arguments for the financing structure of one scenario
#[derive(Args)]
pub struct FinancingArgs {
    #[command(flatten)]
    pub scenario: ScenarioFlags,
}

pub fn run_financing(args: FinancingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let req = args.scenario.resolve()?;

    let metrics = resolve_financing(req.context.project.cost, &req.scenario);
    let result = with_metadata(
        "Capital stack: loan and down payment as shares of project cost",
        &req,
        financing_warnings(&req.scenario),
        start.elapsed().as_micros() as u64,
        metrics,
    );
    Ok(serde_json::to_value(result)?)
}
