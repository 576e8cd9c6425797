use rust_decimal::Decimal;

use crate::types::{pct_to_rate, Money, Percent};

/// Escalate a base unit price for `years` periods.
///
/// Period 1 is the base price; each later period is the prior one times
/// `1 + escalator/100`.
pub fn price_projection(base_price: Money, escalator_pct: Percent, years: u32) -> Vec<Money> {
    let step = Decimal::ONE + pct_to_rate(escalator_pct);
    let mut prices = Vec::with_capacity(years as usize);
    let mut current = base_price;
    for _ in 0..years {
        prices.push(current);
        current *= step;
    }
    prices
}

/// Gross rent per year: escalated unit price times leasable area.
pub fn rent_projection(
    base_price: Money,
    total_area: Decimal,
    escalator_pct: Percent,
    years: u32,
) -> Vec<Money> {
    price_projection(base_price, escalator_pct, years)
        .into_iter()
        .map(|price| price * total_area)
        .collect()
}

/// Price for a 1-indexed year, or zero when the year is outside the projection.
pub fn price_in_year(prices: &[Money], year: u32) -> Money {
    year.checked_sub(1)
        .and_then(|idx| prices.get(idx as usize))
        .copied()
        .unwrap_or(Decimal::ZERO)
}
