pub mod amortization;
pub mod resolver;
pub mod scenario;

pub use resolver::{resolve_financing, FinancingMetrics};
pub use scenario::{FinancingType, Scenario, ScenarioBook};
