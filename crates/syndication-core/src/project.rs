use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Money;

/// Property type being acquired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Retail,
    Office,
    Industrial,
    Multifamily,
    #[default]
    MixedUse,
    Other(String),
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Retail => f.write_str("Retail"),
            AssetClass::Office => f.write_str("Office"),
            AssetClass::Industrial => f.write_str("Industrial"),
            AssetClass::Multifamily => f.write_str("Multifamily"),
            AssetClass::MixedUse => f.write_str("Mixed-Use"),
            AssetClass::Other(name) => f.write_str(name),
        }
    }
}

/// Annual operating cost components, in dollars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingCosts {
    pub hoa_fee: Money,
    pub cam_fee: Money,
    pub property_taxes: Money,
    pub insurance: Money,
    pub misc: Money,
    pub other: Money,
}

impl OperatingCosts {
    /// Aggregate annual operating cost: the sum of all six components.
    pub fn annual_operating_cost(&self) -> Money {
        self.hoa_fee + self.cam_fee + self.property_taxes + self.insurance + self.misc + self.other
    }
}

/// Project details shared by every scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub cost: Money,
    /// Leasable area in square feet
    pub total_area: Decimal,
    pub anticipated_start: NaiveDate,
    pub asset_class: AssetClass,
    pub operating_costs: OperatingCosts,
}

impl Project {
    pub fn annual_operating_cost(&self) -> Money {
        self.operating_costs.annual_operating_cost()
    }
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "620 Glen Iris Unit 101".into(),
            cost: dec!(550000),
            total_area: dec!(1500),
            anticipated_start: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default(),
            asset_class: AssetClass::MixedUse,
            operating_costs: OperatingCosts::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_cost_sums_components() {
        let costs = OperatingCosts {
            hoa_fee: dec!(1200),
            cam_fee: dec!(800),
            property_taxes: dec!(6500),
            insurance: dec!(2100),
            misc: dec!(300),
            other: dec!(100),
        };
        assert_eq!(costs.annual_operating_cost(), dec!(11000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let project: Project =
            serde_json::from_str(r#"{"cost": "800000", "operating_costs": {"insurance": "1500"}}"#)
                .unwrap();
        assert_eq!(project.cost, dec!(800000));
        assert_eq!(project.total_area, dec!(1500));
        assert_eq!(project.annual_operating_cost(), dec!(1500));
        assert_eq!(project.asset_class, AssetClass::MixedUse);
    }
}
