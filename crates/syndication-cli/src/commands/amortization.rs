use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use syndication_core::financing::amortization::{
    amortization_schedule, annual_debt_service, monthly_payment, remaining_principal,
    AmortizationRow,
};
use syndication_core::{with_metadata, Money, Percent};

use crate::input;

/// Loan terms for an amortization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    /// Months of schedule to print
    pub months: u32,
}

impl Default for AmortizationInput {
    fn default() -> Self {
        Self {
            principal: dec!(412500),
            annual_rate_pct: dec!(7),
            term_years: 25,
            months: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    /// Balance after the last scheduled month shown
    pub remaining_principal: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// Arguments for loan amortization
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// Months of schedule to include
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let am_input: AmortizationInput = match input::load(args.input.as_deref())? {
        Some(doc) => doc,
        None => {
            let defaults = AmortizationInput::default();
            AmortizationInput {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_pct: args.rate.unwrap_or(defaults.annual_rate_pct),
                term_years: args.term.unwrap_or(defaults.term_years),
                months: args.months.unwrap_or(defaults.months),
            }
        }
    };

    let mut warnings = Vec::new();
    if am_input.principal <= Decimal::ZERO || am_input.term_years == 0 {
        warnings.push("Principal and term must be positive; payment is zero".to_string());
    }

    let schedule = amortization_schedule(
        am_input.principal,
        am_input.annual_rate_pct,
        am_input.term_years,
        am_input.months,
    );
    let output = AmortizationOutput {
        monthly_payment: monthly_payment(
            am_input.principal,
            am_input.annual_rate_pct,
            am_input.term_years,
        ),
        annual_debt_service: annual_debt_service(
            am_input.principal,
            am_input.annual_rate_pct,
            am_input.term_years,
        ),
        remaining_principal: remaining_principal(
            am_input.principal,
            am_input.annual_rate_pct,
            am_input.term_years,
            schedule.len() as u32,
        ),
        schedule,
    };

    let result = with_metadata(
        "Fixed-rate amortization (monthly compounding)",
        &am_input,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}
