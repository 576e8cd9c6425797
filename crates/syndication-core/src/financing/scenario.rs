use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SyndicationError;
use crate::types::{Money, Percent};
use crate::SyndicationResult;

/// Maximum number of scenarios that can be compared side by side.
pub const MAX_SCENARIOS: usize = 3;

/// How the acquisition is financed.
///
/// Only `Loan` carries debt service. `Hybrid` is treated like `Cash` for
/// debt service purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancingType {
    #[default]
    Loan,
    Cash,
    Hybrid,
}

impl FinancingType {
    pub fn carries_debt_service(self) -> bool {
        match self {
            FinancingType::Loan => true,
            FinancingType::Cash | FinancingType::Hybrid => false,
        }
    }
}

impl fmt::Display for FinancingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinancingType::Loan => write!(f, "Loan"),
            FinancingType::Cash => write!(f, "Cash"),
            FinancingType::Hybrid => write!(f, "Hybrid"),
        }
    }
}

/// A single financing scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub id: u32,
    pub financing_type: FinancingType,
    /// Annual interest rate in percent
    pub rate: Percent,
    /// Loan term in years
    pub term: u32,
    /// Share of project cost financed by debt, in percent
    pub loan_percent: Percent,
    /// Share of project cost paid in cash at close, in percent
    pub down_payment_percent: Percent,
    /// Startup costs on top of the down payment
    pub additional_startup: Money,
    /// Capital actually raised from LPs
    pub adjusted_raise: Money,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            id: 0,
            financing_type: FinancingType::Loan,
            rate: dec!(7.0),
            term: 25,
            loan_percent: dec!(75.0),
            down_payment_percent: dec!(25.0),
            additional_startup: dec!(5000),
            adjusted_raise: dec!(175000),
        }
    }
}

/// Transient collection of up to [`MAX_SCENARIOS`] scenarios.
///
/// Ids come from a counter that only moves forward, so an id is never
/// handed out twice even after its scenario is removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioBook {
    scenarios: Vec<Scenario>,
    counter: u32,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario with default terms and return its id.
    pub fn add(&mut self) -> SyndicationResult<u32> {
        self.add_scenario(Scenario::default())
    }

    /// Add a scenario, overwriting its id with the next counter value.
    pub fn add_scenario(&mut self, mut scenario: Scenario) -> SyndicationResult<u32> {
        if self.scenarios.len() >= MAX_SCENARIOS {
            return Err(SyndicationError::InvalidInput {
                field: "scenarios".into(),
                reason: format!("At most {MAX_SCENARIOS} scenarios can be compared"),
            });
        }
        self.counter += 1;
        scenario.id = self.counter;
        self.scenarios.push(scenario);
        Ok(self.counter)
    }

    /// Remove a scenario. The last remaining scenario cannot be removed.
    pub fn remove(&mut self, id: u32) -> SyndicationResult<Scenario> {
        let idx = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or(SyndicationError::ScenarioNotFound(id))?;
        if self.scenarios.len() == 1 {
            return Err(SyndicationError::InvalidInput {
                field: "scenarios".into(),
                reason: "At least one scenario must remain".into(),
            });
        }
        Ok(self.scenarios.remove(idx))
    }

    pub fn get(&self, id: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.id == id)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Sum of loan and down-payment percentages, which should be 100.
pub fn capital_stack_pct(scenario: &Scenario) -> Percent {
    scenario.loan_percent + scenario.down_payment_percent
}

/// Advisory warnings for a scenario. These never block computation.
pub fn financing_warnings(scenario: &Scenario) -> Vec<String> {
    let mut warnings = Vec::new();
    let stack = capital_stack_pct(scenario);
    if (stack - Decimal::ONE_HUNDRED).abs() > dec!(0.01) {
        warnings.push(format!(
            "Scenario {}: loan % ({}) + down payment % ({}) = {}%, expected 100%",
            scenario.id, scenario.loan_percent, scenario.down_payment_percent, stack
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_assigns_increasing_ids() {
        let mut book = ScenarioBook::new();
        assert_eq!(book.add().unwrap(), 1);
        assert_eq!(book.add().unwrap(), 2);
        book.remove(2).unwrap();
        // Removed ids are not reused
        assert_eq!(book.add().unwrap(), 3);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_book_caps_at_three() {
        let mut book = ScenarioBook::new();
        for _ in 0..MAX_SCENARIOS {
            book.add().unwrap();
        }
        assert!(book.add().is_err());
        assert_eq!(book.len(), MAX_SCENARIOS);
    }

    #[test]
    fn test_last_scenario_cannot_be_removed() {
        let mut book = ScenarioBook::new();
        let id = book.add().unwrap();
        assert!(book.remove(id).is_err());
        assert!(matches!(
            book.remove(99),
            Err(SyndicationError::ScenarioNotFound(99))
        ));
    }

    #[test]
    fn test_in_place_mutation() {
        let mut book = ScenarioBook::new();
        let id = book.add().unwrap();
        if let Some(s) = book.get_mut(id) {
            s.financing_type = FinancingType::Cash;
            s.rate = dec!(6.5);
        }
        let s = book.get(id).unwrap();
        assert_eq!(s.financing_type, FinancingType::Cash);
        assert_eq!(s.rate, dec!(6.5));
    }

    #[test]
    fn test_capital_stack_warning() {
        let mut scenario = Scenario::default();
        assert!(financing_warnings(&scenario).is_empty());
        scenario.loan_percent = dec!(80);
        let warnings = financing_warnings(&scenario);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("105"));
    }

    #[test]
    fn test_only_loan_carries_debt_service() {
        assert!(FinancingType::Loan.carries_debt_service());
        assert!(!FinancingType::Cash.carries_debt_service());
        assert!(!FinancingType::Hybrid.carries_debt_service());
    }
}
