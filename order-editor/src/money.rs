//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done using `Decimal` internally, then
//! converted to `f64` for storage/serialization.

use rust_decimal::prelude::*;
use shared::order::OrderSnapshot;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per line (€1,000,000)
pub const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line value with precise decimal arithmetic: quantity × unit_price.
pub fn line_value(quantity: i32, unit_price: f64) -> f64 {
    to_f64(Decimal::from(quantity) * to_decimal(unit_price))
}

/// Recalculate line values and the order total.
///
/// Pure and total: returns a new snapshot and never mutates the input.
/// Every line gets `line_value = quantity × unit_price`; the order
/// total is the sum of line values in sequence order, so totals are
/// reproducible for a given line sequence. An empty line sequence
/// yields a total of 0.
pub fn recalculate_totals(snapshot: &OrderSnapshot) -> OrderSnapshot {
    let mut updated = snapshot.clone();
    let mut total = Decimal::ZERO;

    for line in &mut updated.lines {
        let value = (Decimal::from(line.quantity) * to_decimal(line.unit_price))
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        line.line_value = value.to_f64().unwrap_or_default();
        total += value;
    }

    updated.order_total = to_f64(total);
    updated
}
