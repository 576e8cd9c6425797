pub mod amortization;
pub mod analysis;
pub mod cash_flow;
pub mod exit;
pub mod financing;
pub mod waterfall;

use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use syndication_core::financing::scenario::financing_warnings;
use syndication_core::financing::{FinancingType, Scenario};
use syndication_core::AnalysisContext;

/// A context plus the one scenario to evaluate against it.
///
/// `project` and `assumptions` sit at the top level of the document next
/// to `scenario`; any of the three may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRequest {
    #[serde(flatten)]
    pub context: AnalysisContext,
    pub scenario: Scenario,
}

impl ScenarioRequest {
    /// Advisory warnings for the assumptions and the scenario's capital stack.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.context.assumptions.warnings();
        warnings.extend(financing_warnings(&self.scenario));
        warnings
    }
}

/// Flags shared by every single-scenario command, used when no document is given.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioFlags {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Financing type: loan, cash or hybrid
    #[arg(long, value_parser = parse_financing_type)]
    pub financing_type: Option<FinancingType>,

    /// Annual interest rate in percent (e.g. 7 for 7%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// Loan share of project cost, in percent
    #[arg(long)]
    pub loan_percent: Option<Decimal>,

    /// Down payment share of project cost, in percent
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Startup costs on top of the down payment
    #[arg(long)]
    pub additional_startup: Option<Decimal>,

    /// Capital actually raised from LPs
    #[arg(long)]
    pub adjusted_raise: Option<Decimal>,

    /// Project purchase cost
    #[arg(long)]
    pub project_cost: Option<Decimal>,

    /// Leasable area in square feet
    #[arg(long)]
    pub total_area: Option<Decimal>,

    /// Year-1 rent per square foot
    #[arg(long)]
    pub price_per: Option<Decimal>,

    /// Annual rent escalation in percent
    #[arg(long)]
    pub escalator: Option<Decimal>,

    /// Exit cap rate in percent
    #[arg(long)]
    pub exit_cap_rate: Option<Decimal>,
}

pub fn parse_financing_type(s: &str) -> Result<FinancingType, String> {
    match s.to_ascii_lowercase().as_str() {
        "loan" => Ok(FinancingType::Loan),
        "cash" => Ok(FinancingType::Cash),
        "hybrid" => Ok(FinancingType::Hybrid),
        other => Err(format!("unknown financing type '{other}' (expected loan, cash or hybrid)")),
    }
}

impl ScenarioFlags {
    /// Defaults overlaid with whichever flags were given.
    fn to_request(&self) -> ScenarioRequest {
        let mut req = ScenarioRequest::default();
        req.scenario.id = 1;

        let s = &mut req.scenario;
        if let Some(v) = self.financing_type {
            s.financing_type = v;
        }
        if let Some(v) = self.rate {
            s.rate = v;
        }
        if let Some(v) = self.term {
            s.term = v;
        }
        if let Some(v) = self.loan_percent {
            s.loan_percent = v;
        }
        if let Some(v) = self.down_payment_percent {
            s.down_payment_percent = v;
        }
        if let Some(v) = self.additional_startup {
            s.additional_startup = v;
        }
        if let Some(v) = self.adjusted_raise {
            s.adjusted_raise = v;
        }

        let ctx = &mut req.context;
        if let Some(v) = self.project_cost {
            ctx.project.cost = v;
        }
        if let Some(v) = self.total_area {
            ctx.project.total_area = v;
        }
        if let Some(v) = self.price_per {
            ctx.assumptions.price_per = v;
        }
        if let Some(v) = self.escalator {
            ctx.assumptions.escalator_pct = v;
        }
        if let Some(v) = self.exit_cap_rate {
            ctx.assumptions.exit_cap_rate_pct = v;
        }
        req
    }

    /// Resolve the request: `--input` file, then piped stdin, then flags.
    pub fn resolve(&self) -> Result<ScenarioRequest, Box<dyn std::error::Error>> {
        match crate::input::load(self.input.as_deref())? {
            Some(req) => Ok(req),
            None => Ok(self.to_request()),
        }
    }
}
