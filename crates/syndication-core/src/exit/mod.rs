pub mod returns;
pub mod valuation;

pub use returns::{cash_on_cash, exit_returns, ExitReturns};
pub use valuation::{exit_price, exit_valuation, ExitCase, ExitValuation, ExitValueRow};
