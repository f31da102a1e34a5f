//! Upload-and-reprice endpoint: accepts the previous and current snapshot as
//! multipart CSV uploads, runs the reconciliation pipeline, and returns the
//! summary plus a base64-encoded updated sheet for download.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::repricer::reconciler::Reconciler;
use crate::repricer::summary::{summarize_table, Summary};
use crate::table::Table;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

const PREVIOUS_PART: &str = "previous_file";
const CURRENT_PART: &str = "current_file";

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub summary: Summary,
    /// Base64-encoded updated price sheet, ready for download.
    pub csv_data: String,
    pub filename: String,
}

/// Handle `POST /api/process`.
pub async fn process_snapshots(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let start = Instant::now();
    let limit = state.config.limits.max_upload_bytes;

    let mut previous_text: Option<String> = None;
    let mut current_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = match field.name() {
            Some(PREVIOUS_PART) => PREVIOUS_PART,
            Some(CURRENT_PART) => CURRENT_PART,
            // Unknown parts are ignored, not rejected.
            _ => continue,
        };

        let data = field.bytes().await?;
        if data.len() > limit {
            return Err(AppError::InputTooLarge {
                name: name.to_string(),
                size: data.len(),
                limit,
            });
        }

        // Exports are UTF-8 (sometimes with a BOM); anything else is decoded
        // lossily rather than rejected.
        let text = String::from_utf8_lossy(&data).into_owned();
        match name {
            PREVIOUS_PART => previous_text = Some(text),
            _ => current_text = Some(text),
        }
    }

    let previous_text = previous_text
        .ok_or_else(|| AppError::InputMissing(format!("{} upload is required", PREVIOUS_PART)))?;
    let current_text = current_text
        .ok_or_else(|| AppError::InputMissing(format!("{} upload is required", CURRENT_PART)))?;

    let previous = Table::decode(&previous_text);
    let current = Table::decode(&current_text);

    let sheet = Reconciler::new(state.config.pricing.clone()).reconcile(&previous, &current)?;
    let summary = summarize_table(&sheet);

    let csv_data = BASE64.encode(sheet.encode().as_bytes());
    let filename = format!("updated_pricing_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

    info!(
        previous_rows = previous.len(),
        current_rows = current.len(),
        reconciled_rows = summary.total_items,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "processed snapshot pair"
    );

    Ok(Json(ProcessResponse {
        success: true,
        summary,
        csv_data,
        filename,
    }))
}
