use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use syndication_core::analysis::{analyze_scenario, compare_scenarios};
use syndication_core::financing::{Scenario, ScenarioBook};
use syndication_core::AnalysisContext;

use super::ScenarioFlags;
use crate::input;

/// Arguments for the full single-scenario pipeline
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub scenario: ScenarioFlags,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = args.scenario.resolve()?;
    let result = analyze_scenario(&req.context, &req.scenario)?;
    Ok(serde_json::to_value(result)?)
}

/// A context plus the scenarios to compare.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareRequest {
    #[serde(flatten)]
    pub context: AnalysisContext,
    pub scenarios: Vec<Scenario>,
}

/// Arguments for a side-by-side comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML input file with up to three scenarios
    #[arg(long)]
    pub input: Option<String>,
}

/// Number scenarios 1..=n in document order, rejecting more than three.
fn into_book(scenarios: Vec<Scenario>) -> Result<ScenarioBook, Box<dyn std::error::Error>> {
    let mut book = ScenarioBook::new();
    for scenario in scenarios {
        book.add_scenario(scenario)?;
    }
    Ok(book)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req: CompareRequest = input::load(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for compare")?;
    let book = into_book(req.scenarios)?;
    let result = compare_scenarios(&req.context, book.scenarios())?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_renumbers_scenarios() {
        let scenarios = vec![
            Scenario {
                id: 40,
                ..Scenario::default()
            },
            Scenario {
                id: 40,
                ..Scenario::default()
            },
        ];
        let book = into_book(scenarios).unwrap();
        let ids: Vec<u32> = book.scenarios().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_more_than_three_scenarios_rejected() {
        assert!(into_book(vec![Scenario::default(); 4]).is_err());
    }
}
