use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::scenario_analysis::{evaluate, ScenarioAnalysis};
use crate::assumptions::AnalysisContext;
use crate::error::SyndicationError;
use crate::financing::scenario::MAX_SCENARIOS;
use crate::financing::Scenario;
use crate::types::*;
use crate::SyndicationResult;

/// Section headings of the side-by-side export, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonSection {
    #[serde(rename = "Project Details")]
    ProjectDetails,
    #[serde(rename = "Financing Details")]
    FinancingDetails,
    #[serde(rename = "Year 1 Performance")]
    Year1Performance,
    #[serde(rename = "10-Year Performance")]
    TenYearPerformance,
    #[serde(rename = "Exit & Returns")]
    ExitAndReturns,
    #[serde(rename = "Waterfall Distribution")]
    WaterfallDistribution,
}

impl fmt::Display for ComparisonSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComparisonSection::ProjectDetails => "Project Details",
            ComparisonSection::FinancingDetails => "Financing Details",
            ComparisonSection::Year1Performance => "Year 1 Performance",
            ComparisonSection::TenYearPerformance => "10-Year Performance",
            ComparisonSection::ExitAndReturns => "Exit & Returns",
            ComparisonSection::WaterfallDistribution => "Waterfall Distribution",
        };
        f.write_str(label)
    }
}

/// A typed cell of the comparison table. Formatting is left to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Money(Money),
    Percent(Percent),
    Multiple(Multiple),
    Ratio(Decimal),
    Count(u32),
    Text(String),
    NotAvailable,
}

impl MetricValue {
    fn money(value: Option<Money>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Money)
    }

    fn percent(value: Option<Percent>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Percent)
    }

    fn multiple(value: Option<Multiple>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Multiple)
    }

    fn ratio(value: Option<Decimal>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Ratio)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Money(v) => write!(f, "{:.2}", v),
            MetricValue::Percent(v) => write!(f, "{:.2}%", v),
            MetricValue::Multiple(v) => write!(f, "{:.2}x", v),
            MetricValue::Ratio(v) => write!(f, "{:.3}", v),
            MetricValue::Count(v) => write!(f, "{v}"),
            MetricValue::Text(v) => f.write_str(v),
            MetricValue::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// One metric across every compared scenario, in scenario order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub section: ComparisonSection,
    pub metric: String,
    pub values: Vec<MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_ids: Vec<u32>,
    pub analyses: Vec<ScenarioAnalysis>,
    pub rows: Vec<ComparisonRow>,
}

fn row<F>(
    section: ComparisonSection,
    metric: &str,
    analyses: &[ScenarioAnalysis],
    value: F,
) -> ComparisonRow
where
    F: Fn(&ScenarioAnalysis) -> MetricValue,
{
    ComparisonRow {
        section,
        metric: metric.to_string(),
        values: analyses.iter().map(value).collect(),
    }
}

/// Flatten analyses into the section/metric rows of the comparison export.
pub fn comparison_rows(ctx: &AnalysisContext, analyses: &[ScenarioAnalysis]) -> Vec<ComparisonRow> {
    use ComparisonSection::*;

    let year1 = |a: &ScenarioAnalysis| a.cash_flows.first().cloned();

    vec![
        // --- Project Details ---
        row(ProjectDetails, "Project Name", analyses, |_| {
            MetricValue::Text(ctx.project.name.clone())
        }),
        row(ProjectDetails, "Asset Class", analyses, |_| {
            MetricValue::Text(ctx.project.asset_class.to_string())
        }),
        row(ProjectDetails, "Project Cost", analyses, |_| {
            MetricValue::Money(ctx.project.cost)
        }),
        // --- Financing Details ---
        row(FinancingDetails, "Type", analyses, |a| {
            MetricValue::Text(a.scenario.financing_type.to_string())
        }),
        row(FinancingDetails, "Loan Amount", analyses, |a| {
            MetricValue::Money(a.financing.loan_amount)
        }),
        row(FinancingDetails, "Down Payment", analyses, |a| {
            MetricValue::Money(a.financing.down_payment)
        }),
        row(FinancingDetails, "Raise", analyses, |a| {
            MetricValue::Money(a.financing.raise_amount)
        }),
        row(FinancingDetails, "Reserve Cash", analyses, |a| {
            MetricValue::Money(a.financing.reserve_cash_delta)
        }),
        row(FinancingDetails, "Rate", analyses, |a| {
            MetricValue::Percent(a.scenario.rate)
        }),
        row(FinancingDetails, "Term", analyses, |a| {
            MetricValue::Count(a.scenario.term)
        }),
        row(FinancingDetails, "Loan %", analyses, |a| {
            MetricValue::Percent(a.scenario.loan_percent)
        }),
        row(FinancingDetails, "Down Payment %", analyses, |a| {
            MetricValue::Percent(a.scenario.down_payment_percent)
        }),
        row(FinancingDetails, "Adjusted Raise", analyses, |a| {
            MetricValue::Money(a.scenario.adjusted_raise)
        }),
        // --- Year 1 Performance ---
        row(Year1Performance, "Gross Income", analyses, |a| {
            MetricValue::Money(a.debt_service.projected_income_y1)
        }),
        row(Year1Performance, "NOI", analyses, |a| {
            MetricValue::Money(a.debt_service.projected_income_y1 - a.debt_service.annual_costs)
        }),
        row(Year1Performance, "DSCR", analyses, |a| {
            MetricValue::ratio(a.debt_service.dscr)
        }),
        row(Year1Performance, "Debt Service", analyses, |a| {
            MetricValue::Money(a.debt_service.annual_debt_service)
        }),
        row(Year1Performance, "LP Cash-on-Cash", analyses, |a| {
            MetricValue::percent(year1(a).map(|r| r.lp_cash_on_cash_pct))
        }),
        // --- 10-Year Performance ---
        row(TenYearPerformance, "Total Cash Flow", analyses, |a| {
            MetricValue::Money(a.total_cash_flow)
        }),
        row(TenYearPerformance, "Avg Annual Cash Flow", analyses, |a| {
            MetricValue::Money(a.average_cash_flow)
        }),
        row(TenYearPerformance, "Total Adjusted Cash Flow", analyses, |a| {
            MetricValue::Money(a.total_adjusted)
        }),
        // --- Exit & Returns ---
        row(ExitAndReturns, "Exit Price", analyses, |a| {
            MetricValue::money(a.exit.exit_price)
        }),
        row(ExitAndReturns, "Remaining Principal", analyses, |a| {
            MetricValue::Money(a.exit.remaining_principal)
        }),
        row(ExitAndReturns, "Net Equity", analyses, |a| {
            MetricValue::money(a.exit.net_equity)
        }),
        row(ExitAndReturns, "Project IRR", analyses, |a| {
            MetricValue::percent(a.returns.project_irr)
        }),
        row(ExitAndReturns, "Cash On Cash", analyses, |a| {
            MetricValue::multiple(a.returns.cash_on_cash)
        }),
        // --- Waterfall Distribution ---
        row(WaterfallDistribution, "Left To Distribute", analyses, |a| {
            MetricValue::Money(a.waterfall.left_to_distribute)
        }),
        row(WaterfallDistribution, "GP Return", analyses, |a| {
            MetricValue::Money(a.waterfall.gp_total)
        }),
        row(WaterfallDistribution, "LP Return", analyses, |a| {
            MetricValue::Money(a.waterfall.lp_total)
        }),
        row(WaterfallDistribution, "LP Multiple", analyses, |a| {
            MetricValue::multiple(a.waterfall.lp_multiple)
        }),
    ]
}

/// Evaluate one to three scenarios against the same context and build the
/// side-by-side comparison.
pub fn compare_scenarios(
    ctx: &AnalysisContext,
    scenarios: &[Scenario],
) -> SyndicationResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();

    if scenarios.is_empty() || scenarios.len() > MAX_SCENARIOS {
        return Err(SyndicationError::InvalidInput {
            field: "scenarios".into(),
            reason: format!(
                "Between 1 and {MAX_SCENARIOS} scenarios required, got {}",
                scenarios.len()
            ),
        });
    }

    debug!(count = scenarios.len(), "comparing scenarios");
    let mut warnings = ctx.assumptions.warnings();

    #[cfg(feature = "parallel")]
    let evaluated: Vec<(ScenarioAnalysis, Vec<String>)> = scenarios
        .par_iter()
        .map(|s| {
            let mut w = Vec::new();
            (evaluate(ctx, s, &mut w), w)
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let evaluated: Vec<(ScenarioAnalysis, Vec<String>)> = scenarios
        .iter()
        .map(|s| {
            let mut w = Vec::new();
            (evaluate(ctx, s, &mut w), w)
        })
        .collect();

    let mut analyses = Vec::with_capacity(evaluated.len());
    for (analysis, scenario_warnings) in evaluated {
        warnings.extend(scenario_warnings);
        analyses.push(analysis);
    }
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "comparison carries warnings");
    }

    let rows = comparison_rows(ctx, &analyses);
    let comparison = ScenarioComparison {
        scenario_ids: scenarios.iter().map(|s| s.id).collect(),
        analyses,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Side-by-side scenario comparison",
        &serde_json::json!({ "context": ctx, "scenarios": scenarios }),
        warnings,
        elapsed,
        comparison,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::FinancingType;

    fn scenarios() -> Vec<Scenario> {
        vec![
            Scenario {
                id: 1,
                ..Scenario::default()
            },
            Scenario {
                id: 2,
                financing_type: FinancingType::Cash,
                ..Scenario::default()
            },
        ]
    }

    #[test]
    fn test_rejects_empty_and_oversized_batches() {
        let ctx = AnalysisContext::default();
        assert!(compare_scenarios(&ctx, &[]).is_err());
        let four = vec![Scenario::default(); 4];
        assert!(matches!(
            compare_scenarios(&ctx, &four),
            Err(SyndicationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rows_have_one_value_per_scenario() {
        let ctx = AnalysisContext::default();
        let output = compare_scenarios(&ctx, &scenarios()).unwrap();
        assert_eq!(output.result.scenario_ids, vec![1, 2]);
        for row in &output.result.rows {
            assert_eq!(row.values.len(), 2, "metric {}", row.metric);
        }
    }

    #[test]
    fn test_sections_in_display_order() {
        let ctx = AnalysisContext::default();
        let output = compare_scenarios(&ctx, &scenarios()).unwrap();
        let mut sections: Vec<ComparisonSection> = Vec::new();
        for row in &output.result.rows {
            if sections.last() != Some(&row.section) {
                sections.push(row.section);
            }
        }
        assert_eq!(
            sections,
            vec![
                ComparisonSection::ProjectDetails,
                ComparisonSection::FinancingDetails,
                ComparisonSection::Year1Performance,
                ComparisonSection::TenYearPerformance,
                ComparisonSection::ExitAndReturns,
                ComparisonSection::WaterfallDistribution,
            ]
        );
    }

    #[test]
    fn test_cash_scenario_dscr_not_available() {
        let ctx = AnalysisContext::default();
        let output = compare_scenarios(&ctx, &scenarios()).unwrap();
        let dscr = output
            .result
            .rows
            .iter()
            .find(|r| r.metric == "DSCR")
            .unwrap();
        assert!(matches!(dscr.values[0], MetricValue::Ratio(_)));
        assert_eq!(dscr.values[1], MetricValue::NotAvailable);
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Multiple(Decimal::new(245, 2)).to_string(), "2.45x");
        assert_eq!(MetricValue::NotAvailable.to_string(), "N/A");
        assert_eq!(ComparisonSection::ExitAndReturns.to_string(), "Exit & Returns");
    }
}
