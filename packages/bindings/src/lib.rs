use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use syndication_core::financing::scenario::financing_warnings;
use syndication_core::financing::Scenario;
use syndication_core::{AnalysisContext, PROJECTION_YEARS};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

/// `{project, assumptions, scenario}`, each optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScenarioRequest {
    #[serde(flatten)]
    context: AnalysisContext,
    scenario: Scenario,
}

/// `{project, assumptions, scenarios: [...]}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompareRequest {
    #[serde(flatten)]
    context: AnalysisContext,
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct LoanRequest {
    principal: Decimal,
    annual_rate_pct: Decimal,
    term_years: u32,
    #[serde(default)]
    months: u32,
}

#[derive(Debug, Deserialize)]
struct IrrRequest {
    initial_investment: Decimal,
    cash_flows: Vec<Decimal>,
}

#[derive(Serialize)]
struct LoanSummary {
    monthly_payment: Decimal,
    annual_debt_service: Decimal,
    schedule: Vec<syndication_core::financing::amortization::AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    use syndication_core::financing::amortization::{
        amortization_schedule, annual_debt_service, monthly_payment,
    };

    let req: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    to_json(&LoanSummary {
        monthly_payment: monthly_payment(req.principal, req.annual_rate_pct, req.term_years),
        annual_debt_service: annual_debt_service(
            req.principal,
            req.annual_rate_pct,
            req.term_years,
        ),
        schedule: amortization_schedule(
            req.principal,
            req.annual_rate_pct,
            req.term_years,
            req.months,
        ),
    })
}

#[napi]
pub fn resolve_financing(input_json: String) -> NapiResult<String> {
    let req: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let metrics =
        syndication_core::financing::resolve_financing(req.context.project.cost, &req.scenario);
    to_json(&serde_json::json!({
        "result": metrics,
        "warnings": financing_warnings(&req.scenario),
    }))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flows(input_json: String) -> NapiResult<String> {
    use syndication_core::projection::{price_projection, CashFlowSplits};

    let req: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let a = &req.context.assumptions;
    let project = &req.context.project;
    let prices = price_projection(a.price_per, a.escalator_pct, PROJECTION_YEARS);
    let rows = syndication_core::projection::project_cash_flows(
        &req.scenario,
        &prices,
        project.total_area,
        project.annual_operating_cost(),
        project.cost,
        &CashFlowSplits::from(a),
    );
    to_json(&rows)
}

#[napi]
pub fn debt_service_summary(input_json: String) -> NapiResult<String> {
    use syndication_core::projection::price_projection;

    let req: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let a = &req.context.assumptions;
    let project = &req.context.project;
    let prices = price_projection(a.price_per, a.escalator_pct, PROJECTION_YEARS);
    let summary = syndication_core::projection::debt_service_summary(
        &req.scenario,
        &prices,
        project.total_area,
        project.annual_operating_cost(),
        project.cost,
    );
    to_json(&summary)
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

#[napi]
pub fn project_irr(input_json: String) -> NapiResult<String> {
    let req: IrrRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let pct = syndication_core::time_value::project_irr(req.initial_investment, &req.cash_flows)
        .map_err(to_napi_error)?;
    to_json(&serde_json::json!({ "irr_pct": pct }))
}

#[napi]
pub fn distribute_waterfall(input_json: String) -> NapiResult<String> {
    let input: syndication_core::waterfall::WaterfallInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        syndication_core::waterfall::calculate_waterfall(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_scenario(input_json: String) -> NapiResult<String> {
    let req: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = syndication_core::analysis::analyze_scenario(&req.context, &req.scenario)
        .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let req: CompareRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = syndication_core::analysis::compare_scenarios(&req.context, &req.scenarios)
        .map_err(to_napi_error)?;
    to_json(&output)
}
