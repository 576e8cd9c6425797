pub mod comparison;
pub mod scenario_analysis;

pub use comparison::{
    compare_scenarios, ComparisonRow, ComparisonSection, MetricValue, ScenarioComparison,
};
pub use scenario_analysis::{analyze_scenario, ScenarioAnalysis};
