//! Summary-only endpoint: recompute the aggregate statistics for a row set
//! that was already processed, without re-running the reconciliation.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::repricer::summary::{summarize, RowStats, Summary};

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: Summary,
}

/// Handle `POST /api/summary`.
///
/// The body is validated by hand rather than deserialized into a typed
/// request, so a mis-shaped `processed_data` yields the same 400 error JSON
/// as a missing one instead of the extractor's default rejection. Row values
/// may be JSON numbers or strings; non-object rows count as all-zero.
pub async fn summarize_rows(
    Json(request): Json<Value>,
) -> Result<Json<SummaryResponse>, AppError> {
    let rows = match request.get("processed_data") {
        Some(Value::Array(rows)) => rows,
        _ => {
            return Err(AppError::InputMissing(
                "processed_data is required and must be an array of rows".to_string(),
            ))
        }
    };

    let summary = summarize(rows.iter().map(|row| match row {
        Value::Object(map) => RowStats::from_json(map),
        _ => RowStats::default(),
    }));

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}
