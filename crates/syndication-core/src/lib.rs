//! Underwriting engine for real-estate syndications.
//!
//! Loan amortization, a ten-year cash-flow projection, exit valuation,
//! an IRR solver and a hurdle-based GP/LP waterfall, all in 128-bit
//! decimal arithmetic.

pub mod assumptions;
pub mod error;
pub mod exit;
pub mod financing;
pub mod project;
pub mod projection;
pub mod time_value;
pub mod types;

#[cfg(feature = "waterfall")]
pub mod waterfall;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use assumptions::{AnalysisContext, Assumptions};
pub use error::SyndicationError;
pub use project::{AssetClass, OperatingCosts, Project};
pub use types::*;

/// Standard result type for all syndication operations
pub type SyndicationResult<T> = Result<T, SyndicationError>;
