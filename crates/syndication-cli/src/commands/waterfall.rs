use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use syndication_core::waterfall::{calculate_waterfall, WaterfallInput};

use crate::input;

/// Arguments for a GP/LP waterfall distribution
#[derive(Args)]
pub struct WaterfallArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total proceeds to distribute
    #[arg(long, allow_hyphen_values = true)]
    pub proceeds: Option<Decimal>,

    /// LP capital invested
    #[arg(long)]
    pub invested: Option<Decimal>,

    /// GP share in percent
    #[arg(long)]
    pub gp_pct: Option<Decimal>,

    /// LP share in percent
    #[arg(long)]
    pub lp_pct: Option<Decimal>,

    /// Preferred return hurdle in percent per year
    #[arg(long)]
    pub hurdle: Option<Decimal>,

    /// Years the capital is held
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_waterfall(args: WaterfallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let wf_input: WaterfallInput = match input::load(args.input.as_deref())? {
        Some(doc) => doc,
        None => {
            let defaults = WaterfallInput::default();
            WaterfallInput {
                total_proceeds: args
                    .proceeds
                    .ok_or("--proceeds is required (or provide --input)")?,
                invested_capital: args.invested.unwrap_or(defaults.invested_capital),
                gp_pct: args.gp_pct.unwrap_or(defaults.gp_pct),
                lp_pct: args.lp_pct.unwrap_or(defaults.lp_pct),
                hurdle_rate_pct: args.hurdle.unwrap_or(defaults.hurdle_rate_pct),
                years_held: args.years.unwrap_or(defaults.years_held),
            }
        }
    };
    let result = calculate_waterfall(&wf_input)?;
    Ok(serde_json::to_value(result)?)
}
