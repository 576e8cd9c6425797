pub mod cash_flow;
pub mod debt_service;
pub mod prices;

pub use cash_flow::{noi, project_cash_flows, CashFlowRow, CashFlowSplits};
pub use debt_service::{debt_service_summary, dscr, DebtServiceSummary, DscrBand};
pub use prices::{price_projection, rent_projection};
