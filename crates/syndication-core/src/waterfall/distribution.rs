use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::types::*;
use crate::SyndicationResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Input for a GP/LP hurdle waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallInput {
    /// Proceeds available for distribution (cash flows plus exit equity)
    pub total_proceeds: Money,
    /// LP capital the hurdle accrues on
    pub invested_capital: Money,
    /// GP share, in percent
    pub gp_pct: Percent,
    /// LP share, in percent
    pub lp_pct: Percent,
    /// Compounded preferred return owed to LPs, in percent per year
    pub hurdle_rate_pct: Percent,
    pub years_held: u32,
}

impl Default for WaterfallInput {
    fn default() -> Self {
        Self {
            total_proceeds: Decimal::ZERO,
            invested_capital: dec!(175000),
            gp_pct: dec!(20),
            lp_pct: dec!(80),
            hurdle_rate_pct: dec!(8),
            years_held: 10,
        }
    }
}

/// Named waterfall tiers, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    Hurdle,
    Tier1,
    Tier2,
    Tier3,
}

/// Profit tiers after the hurdle with their labelled return percent.
///
/// The return percent is a label only; tiers are not capped at it.
pub const PROFIT_TIERS: [(TierName, Percent); 3] = [
    (TierName::Tier1, dec!(8)),
    (TierName::Tier2, dec!(15)),
    (TierName::Tier3, dec!(50)),
];

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Result for a single waterfall tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallTierResult {
    pub tier: TierName,
    pub return_pct: Percent,
    /// Balance this tier distributed from
    pub amount: Money,
    pub to_gp: Money,
    pub to_lp: Money,
}

/// Full waterfall distribution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallResult {
    pub left_to_distribute: Money,
    pub invested_capital: Money,
    /// LP preferred return target, excluding return of capital
    pub hurdle_target: Money,
    /// Hurdle, tier1, tier2, tier3
    pub tiers: Vec<WaterfallTierResult>,
    pub gp_total: Money,
    pub lp_total: Money,
    pub total_distributed: Money,
    pub left_over: Money,
    /// (invested + LP total) / invested; `None` with no invested capital
    pub lp_multiple: Option<Multiple>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// LP preferred return compounded over the hold: C * ((1 + h)^years - 1).
///
/// Saturates at the decimal bounds when the compounding leaves range, so a
/// runaway hurdle simply absorbs all proceeds.
pub fn hurdle_target(invested_capital: Money, hurdle_rate_pct: Percent, years_held: u32) -> Money {
    let growth = (Decimal::ONE + pct_to_rate(hurdle_rate_pct))
        .checked_powi(i64::from(years_held))
        .unwrap_or(Decimal::MAX);
    invested_capital.saturating_mul(growth.saturating_sub(Decimal::ONE))
}

/// Split one tier's balance between GP and LP.
///
/// The GP share is `(remaining / gp%) * lp%`. When that share is undefined
/// or larger than the balance, the balance is split pro rata instead.
fn split_tier(remaining: Money, gp_pct: Percent, lp_pct: Percent) -> (Money, Money) {
    let gp_rate = pct_to_rate(gp_pct);
    let lp_rate = pct_to_rate(lp_pct);

    let share = remaining
        .checked_div(gp_rate)
        .and_then(|scaled| scaled.checked_mul(lp_rate))
        .filter(|gp_share| *gp_share <= remaining)
        .and_then(|gp_share| Some((gp_share, remaining.checked_sub(gp_share)?)));
    share.unwrap_or_else(|| {
        (
            remaining.saturating_mul(gp_rate),
            remaining.saturating_mul(lp_rate),
        )
    })
}

/// Distribute proceeds through the hurdle and the three profit tiers.
///
/// Single greedy pass: the hurdle pays LPs their compounded preferred
/// return (or everything, if proceeds fall short), then each profit tier
/// distributes the entire remaining balance. In practice tier1 therefore
/// absorbs everything left and tier2/tier3 report zero.
pub fn distribute(
    total_proceeds: Money,
    invested_capital: Money,
    gp_pct: Percent,
    lp_pct: Percent,
    hurdle_rate_pct: Percent,
    years_held: u32,
) -> WaterfallResult {
    let mut remaining = total_proceeds;
    let mut tiers: Vec<WaterfallTierResult> = Vec::with_capacity(1 + PROFIT_TIERS.len());
    let mut gp_total = Decimal::ZERO;
    let mut lp_total = Decimal::ZERO;

    // --- Hurdle ---
    let target = hurdle_target(invested_capital, hurdle_rate_pct, years_held);
    let mut hurdle_paid = remaining.min(target);
    // A saturated negative target would push the balance out of range
    if remaining.checked_sub(hurdle_paid).is_none() {
        hurdle_paid = remaining;
    }
    tiers.push(WaterfallTierResult {
        tier: TierName::Hurdle,
        return_pct: hurdle_rate_pct,
        amount: hurdle_paid,
        to_gp: Decimal::ZERO,
        to_lp: hurdle_paid,
    });
    lp_total += hurdle_paid;
    remaining -= hurdle_paid;

    // --- Profit tiers ---
    for (tier, return_pct) in PROFIT_TIERS {
        if remaining <= Decimal::ZERO {
            tiers.push(WaterfallTierResult {
                tier,
                return_pct,
                amount: Decimal::ZERO,
                to_gp: Decimal::ZERO,
                to_lp: Decimal::ZERO,
            });
            continue;
        }

        let (to_gp, to_lp) = split_tier(remaining, gp_pct, lp_pct);
        tiers.push(WaterfallTierResult {
            tier,
            return_pct,
            amount: remaining,
            to_gp,
            to_lp,
        });
        gp_total = gp_total.saturating_add(to_gp);
        lp_total = lp_total.saturating_add(to_lp);
        remaining = remaining.saturating_sub(to_gp.saturating_add(to_lp));
    }

    let lp_multiple = if invested_capital > Decimal::ZERO {
        invested_capital
            .checked_add(lp_total)
            .and_then(|returned| returned.checked_div(invested_capital))
    } else {
        None
    };

    debug!(%total_proceeds, %target, %gp_total, %lp_total, "distributed waterfall");

    WaterfallResult {
        left_to_distribute: total_proceeds,
        invested_capital,
        hurdle_target: target,
        tiers,
        gp_total,
        lp_total,
        total_distributed: total_proceeds.saturating_sub(remaining),
        left_over: remaining,
        lp_multiple,
    }
}

/// Advisory warnings for waterfall inputs. Never blocking.
pub fn waterfall_warnings(input: &WaterfallInput) -> Vec<String> {
    let mut warnings = Vec::new();
    let split_gap = input.gp_pct.saturating_add(input.lp_pct).saturating_sub(Decimal::ONE_HUNDRED);
    if split_gap.abs() > dec!(0.01) {
        warnings.push(format!(
            "GP % ({}) + LP % ({}) ≠ 100%",
            input.gp_pct, input.lp_pct
        ));
    }
    if input.total_proceeds < Decimal::ZERO {
        warnings.push("Proceeds are negative; LPs absorb the shortfall in the hurdle tier".into());
    }
    if input.invested_capital <= Decimal::ZERO {
        warnings.push("No invested capital; LP multiple is undefined".into());
    }
    warnings
}

/// Run the waterfall and wrap it in the standard output envelope.
pub fn calculate_waterfall(
    input: &WaterfallInput,
) -> SyndicationResult<ComputationOutput<WaterfallResult>> {
    let start = Instant::now();
    let warnings = waterfall_warnings(input);

    let output = distribute(
        input.total_proceeds,
        input.invested_capital,
        input.gp_pct,
        input.lp_pct,
        input.hurdle_rate_pct,
        input.years_held,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "GP/LP Hurdle Waterfall (single pass)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
