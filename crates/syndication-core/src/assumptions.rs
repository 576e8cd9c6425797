use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::project::Project;
use crate::types::{Money, Percent, Rate};

/// Global underwriting parameters applied to every scenario.
///
/// Every field has a default, so a partial JSON or YAML document is a
/// complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Year-1 rent per square foot
    pub price_per: Money,
    /// Annual escalation of `price_per`, in percent
    pub escalator_pct: Percent,
    /// Fraction of cash flow treated as distributable
    pub adjusted_fraction: Rate,
    /// GP share of distributable cash flow
    pub gp_fraction: Rate,
    /// LP share of distributable cash flow
    pub lp_fraction: Rate,
    pub exit_cap_rate_pct: Percent,
    pub years_held: u32,
    /// Monthly payments made by exit
    pub payments_made: u32,
    pub waterfall_gp_pct: Percent,
    pub waterfall_lp_pct: Percent,
    pub hurdle_rate_pct: Percent,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            price_per: dec!(35.0),
            escalator_pct: dec!(3.0),
            adjusted_fraction: dec!(0.85),
            gp_fraction: dec!(0.20),
            lp_fraction: dec!(0.80),
            exit_cap_rate_pct: dec!(6.50),
            years_held: 10,
            payments_made: 120,
            waterfall_gp_pct: dec!(20.0),
            waterfall_lp_pct: dec!(80.0),
            hurdle_rate_pct: dec!(8.0),
        }
    }
}

impl Assumptions {
    /// Advisory warnings about inconsistent splits. Never blocking.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let split_total = self.gp_fraction + self.lp_fraction;
        if (split_total - Decimal::ONE).abs() > dec!(0.0001) {
            warnings.push(format!(
                "Cash-flow GP ({}) + LP ({}) fractions sum to {}, expected 1",
                self.gp_fraction, self.lp_fraction, split_total
            ));
        }
        let waterfall_total = self.waterfall_gp_pct + self.waterfall_lp_pct;
        if (waterfall_total - Decimal::ONE_HUNDRED).abs() > dec!(0.01) {
            warnings.push(format!(
                "Waterfall GP % ({}) + LP % ({}) ≠ 100%",
                self.waterfall_gp_pct, self.waterfall_lp_pct
            ));
        }
        if self.exit_cap_rate_pct.is_zero() {
            warnings.push("Exit cap rate is 0%; exit price is undefined".into());
        }
        warnings
    }
}

/// Immutable inputs shared by a batch of scenario evaluations.
///
/// Re-derive the context whenever the project or assumptions change; every
/// calculation receives it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisContext {
    pub project: Project,
    pub assumptions: Assumptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        assert!(Assumptions::default().warnings().is_empty());
    }

    #[test]
    fn test_split_warnings() {
        let a = Assumptions {
            waterfall_gp_pct: dec!(30),
            exit_cap_rate_pct: Decimal::ZERO,
            ..Assumptions::default()
        };
        let warnings = a.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Waterfall"));
    }
}
