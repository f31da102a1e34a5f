//! Snapshot repricing: reconciliation of a previous pricing snapshot against a
//! current market snapshot, plus aggregate statistics over the result.

pub mod multiplier;
pub mod reconciler;
pub mod summary;

/// Column names shared by the TCGplayer snapshot exports and the enriched
/// output sheet.
pub mod columns {
    pub const TCGPLAYER_ID: &str = "TCGplayer Id";
    pub const CONDITION: &str = "Condition";
    pub const MARKET_PRICE: &str = "TCG Market Price";
    pub const LOW_PRICE: &str = "TCG Low Price";
    pub const TOTAL_QUANTITY: &str = "Total Quantity";
    pub const OLD_QTY: &str = "Old Qty";
    pub const OLD_MULTIPLIER: &str = "Old Multiplier";
    pub const OLD_STORE_PRICE: &str = "Old My Store Price";
    pub const BASE_PRICE: &str = "Base Price";
    pub const MULTIPLIER: &str = "Multiplier";
    pub const STORE_PRICE: &str = "My Store Price";
    pub const DIFF: &str = "Diff";
}

/// Parse an optional cell as `f64`, falling back to `default` on absence,
/// empty text, or parse failure. All numeric fields in both snapshots go
/// through here so default handling is identical everywhere.
pub fn parse_f64(value: Option<&str>, default: f64) -> f64 {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.parse().unwrap_or(default),
        _ => default,
    }
}

/// Parse an optional cell as a quantity. Quantities are whole numbers in the
/// exports, but fractional text still parses (truncated) rather than being
/// rejected.
pub fn parse_qty(value: Option<&str>) -> i64 {
    parse_f64(value, 0.0) as i64
}

/// Round to two decimals: scale by 100, round to the nearest integer, scale
/// back. Used for every currency and multiplier value in the sheet.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
