use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Fractions expressed as decimals (0.85 = 85%).
pub type Rate = Decimal;

/// Rates expressed as percentages (7.0 = 7%). Loan rates, cap rates,
/// escalators and hurdles are all entered this way.
pub type Percent = Decimal;

/// Multiples (e.g., 2.4x LP multiple)
pub type Multiple = Decimal;

/// Number of years in the projection horizon.
pub const PROJECTION_YEARS: u32 = 10;

/// Convert a percentage into a decimal fraction.
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / Decimal::ONE_HUNDRED
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
