//! Snapshot reconciliation.
//!
//! Joins the previous pricing snapshot against the current market snapshot on
//! `TCGplayer Id` and derives a new store price per current row. The batch is
//! atomic: any row-level fault discards the entire output.

use std::collections::HashMap;

use tracing::debug;

use crate::config::PricingConfig;
use crate::error::AppError;
use crate::repricer::{
    columns,
    multiplier::{next_multiplier, Trend},
    parse_f64, parse_qty, round2,
};
use crate::table::{RowView, Table};

/// Columns appended to each current row, in output order.
const DERIVED_COLUMNS: &[&str] = &[
    columns::OLD_MULTIPLIER,
    columns::BASE_PRICE,
    columns::MULTIPLIER,
    columns::STORE_PRICE,
    columns::OLD_STORE_PRICE,
    columns::DIFF,
];

pub struct Reconciler {
    pricing: PricingConfig,
}

impl Reconciler {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Reconcile the two snapshots into an enriched price sheet.
    ///
    /// Current rows are kept when their condition is not "Unopened" and their
    /// market price parses to a strictly positive number; everything else is
    /// dropped silently. Output rows preserve the filtered current order.
    pub fn reconcile(&self, previous: &Table, current: &Table) -> Result<Table, AppError> {
        let index = build_previous_index(previous);

        let mut out = Table::new(current.columns().to_vec());
        let derived: Vec<usize> = DERIVED_COLUMNS
            .iter()
            .map(|name| out.ensure_column(name))
            .collect();
        let width = out.columns().len();

        let mut rows = Vec::new();
        for row in current.rows().filter(|row| is_eligible(row)) {
            rows.push(self.transform(row, &index, &derived, width)?);
        }

        debug!(
            previous_rows = previous.len(),
            current_rows = current.len(),
            reconciled_rows = rows.len(),
            "reconciled snapshots"
        );

        for values in rows {
            out.push_row(values);
        }
        Ok(out)
    }

    /// Derive the enriched cells for one eligible current row.
    fn transform(
        &self,
        row: RowView<'_>,
        index: &HashMap<&str, RowView<'_>>,
        derived: &[usize],
        width: usize,
    ) -> Result<Vec<String>, AppError> {
        let pricing = &self.pricing;

        let market = parse_f64(row.get(columns::MARKET_PRICE), 0.0);
        let low = parse_f64(row.get(columns::LOW_PRICE), 0.0);

        let base = if market > 0.0 && low > 0.0 {
            market.min(low)
        } else if low > 0.0 {
            low
        } else if market > 0.0 {
            market
        } else {
            pricing.fallback_base_price
        };

        // Unmatched identifiers behave like an all-empty previous row.
        let prev = row
            .get(columns::TCGPLAYER_ID)
            .and_then(|id| index.get(id))
            .copied();
        let old_qty = parse_qty(prev.and_then(|p| p.get(columns::OLD_QTY)));
        let new_qty = parse_qty(row.get(columns::TOTAL_QUANTITY));
        let old_multiplier = parse_f64(
            prev.and_then(|p| p.get(columns::OLD_MULTIPLIER)),
            pricing.default_multiplier,
        );

        let trend = Trend {
            old_qty,
            new_qty,
            old_multiplier,
        };
        let multiplier = next_multiplier(&trend, pricing);

        let raw_price = if market > 0.0 {
            market
        } else {
            base * multiplier
        };

        // Floor the price at the quantity bump: max(raw_price, bump) in cents.
        let bump = pricing.bump_for_qty(new_qty);
        let store_price = round2(raw_price + (bump - raw_price).max(0.0));

        let old_store_price = parse_f64(prev.and_then(|p| p.get(columns::OLD_STORE_PRICE)), 0.0);
        let diff = round2(store_price - old_store_price);

        if !store_price.is_finite() || !diff.is_finite() {
            let id = row.get(columns::TCGPLAYER_ID).unwrap_or("<unknown>");
            return Err(AppError::Computation(format!(
                "derived a non-finite store price for item {}",
                id
            )));
        }

        let mut values = row.values().to_vec();
        values.resize(width, String::new());
        for (idx, value) in derived.iter().zip([
            fmt2(old_multiplier),
            fmt2(round2(base)),
            fmt2(multiplier),
            fmt2(store_price),
            fmt2(old_store_price),
            fmt2(diff),
        ]) {
            values[*idx] = value;
        }
        Ok(values)
    }
}

/// Previous rows keyed by identifier. Rows without an identifier are skipped;
/// a duplicate identifier overwrites the earlier entry (last occurrence wins).
fn build_previous_index(previous: &Table) -> HashMap<&str, RowView<'_>> {
    let mut index = HashMap::new();
    for row in previous.rows() {
        match row.get(columns::TCGPLAYER_ID) {
            Some(id) if !id.is_empty() => {
                index.insert(id, row);
            }
            _ => {}
        }
    }
    index
}

fn is_eligible(row: &RowView<'_>) -> bool {
    if row.get(columns::CONDITION) == Some("Unopened") {
        return false;
    }
    parse_f64(row.get(columns::MARKET_PRICE), 0.0) > 0.0
}

fn fmt2(value: f64) -> String {
    format!("{:.2}", value)
}
