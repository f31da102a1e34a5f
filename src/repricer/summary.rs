//! Aggregate statistics over a reconciled price sheet.
//!
//! Pure functions of their input: summarizing the same row set twice yields
//! identical output, and an empty row set yields all-zero figures rather than
//! NaN averages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repricer::{columns, parse_f64, round2};
use crate::table::Table;

/// Aggregate figures reported alongside the updated price sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_items: usize,
    /// Mean of strictly positive market prices; 0 when none exist.
    pub avg_market_price: f64,
    /// Mean store price; 0 for an empty row set.
    pub avg_store_price: f64,
    pub total_value: f64,
    pub price_changes: PriceChanges,
}

/// Three-way classification of store-price movement. The counts always sum to
/// `total_items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChanges {
    pub increased: usize,
    pub decreased: usize,
    pub unchanged: usize,
}

/// The numeric fields of one reconciled row that the summary depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowStats {
    pub market_price: f64,
    pub store_price: f64,
    pub diff: f64,
}

impl RowStats {
    /// Extract stats from a JSON object row (the `/api/summary` input shape).
    /// Values may be JSON numbers or strings; anything else counts as 0.
    pub fn from_json(row: &serde_json::Map<String, Value>) -> Self {
        Self {
            market_price: json_f64(row.get(columns::MARKET_PRICE)),
            store_price: json_f64(row.get(columns::STORE_PRICE)),
            diff: json_f64(row.get(columns::DIFF)),
        }
    }
}

fn json_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_f64(Some(s), 0.0),
        _ => 0.0,
    }
}

/// Summarize a set of reconciled rows.
pub fn summarize<I>(rows: I) -> Summary
where
    I: IntoIterator<Item = RowStats>,
{
    let mut total_items = 0usize;
    let mut market_sum = 0.0;
    let mut market_count = 0usize;
    let mut store_sum = 0.0;
    let mut changes = PriceChanges::default();

    for row in rows {
        total_items += 1;
        if row.market_price > 0.0 {
            market_sum += row.market_price;
            market_count += 1;
        }
        store_sum += row.store_price;

        if row.diff > 0.0 {
            changes.increased += 1;
        } else if row.diff < 0.0 {
            changes.decreased += 1;
        } else {
            changes.unchanged += 1;
        }
    }

    let avg_market_price = if market_count > 0 {
        round2(market_sum / market_count as f64)
    } else {
        0.0
    };
    // Documented fallback: an empty sheet reports 0, never NaN.
    let avg_store_price = if total_items > 0 {
        round2(store_sum / total_items as f64)
    } else {
        0.0
    };

    Summary {
        total_items,
        avg_market_price,
        avg_store_price,
        total_value: round2(store_sum),
        price_changes: changes,
    }
}

/// Summarize a reconciled table produced by the [`Reconciler`].
///
/// [`Reconciler`]: crate::repricer::reconciler::Reconciler
pub fn summarize_table(table: &Table) -> Summary {
    summarize(table.rows().map(|row| RowStats {
        market_price: parse_f64(row.get(columns::MARKET_PRICE), 0.0),
        store_price: parse_f64(row.get(columns::STORE_PRICE), 0.0),
        diff: parse_f64(row.get(columns::DIFF), 0.0),
    }))
}
