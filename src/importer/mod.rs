//! Bulk import: replay a static JSON snapshot as individual create calls
//! against the downstream product service.

mod serial;
mod source;

pub use serial::{assign_serial, MonotonicSerials, SerialSource, SerialStrategy};
pub use source::load_source;

use std::path::Path;
use std::time::Instant;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::downstream::DownstreamClient;
use crate::error::{AppError, AppResult};
use crate::models::{FieldError, ImportResult, ImportSummary, ProductPayload, SubmitOutcome};

/// Load `path` and import every record in it.
///
/// Fails only before the batch starts (missing, malformed, or empty source).
/// Once records are being submitted every failure is captured per record.
pub async fn import_all(
    downstream: &DownstreamClient,
    serials: &dyn SerialSource,
    path: &Path,
) -> AppResult<ImportSummary> {
    let records = load_source(path).await?;
    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No products found in {}",
            source::display_name(path)
        )));
    }
    Ok(run_batch(downstream, serials, records).await)
}

/// Submit `records` one at a time, in order.
pub async fn run_batch(
    downstream: &DownstreamClient,
    serials: &dyn SerialSource,
    records: Vec<Value>,
) -> ImportSummary {
    let start = Instant::now();
    let mut summary = ImportSummary::new(Uuid::new_v4(), Utc::now());

    info!(batch_id = %summary.batch_id, count = records.len(), "Starting bulk import");

    for (position, raw) in records.into_iter().enumerate() {
        let result = import_one(downstream, serials, position, raw).await;
        if !result.result.success {
            warn!(
                batch_id = %summary.batch_id,
                position,
                product = result.product_name.as_deref().unwrap_or("<unnamed>"),
                status = ?result.result.status_code,
                error = result.result.error.as_deref().unwrap_or_default(),
                "Record not imported"
            );
        }
        summary.push(result);
    }

    summary.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    info!(
        batch_id = %summary.batch_id,
        total = summary.total_products,
        succeeded = summary.successful_insertions,
        failed = summary.failed_insertions,
        elapsed_ms = summary.elapsed_ms,
        "Bulk import complete"
    );

    summary
}

async fn import_one(
    downstream: &DownstreamClient,
    serials: &dyn SerialSource,
    position: usize,
    raw: Value,
) -> ImportResult {
    let unprocessable = StatusCode::UNPROCESSABLE_ENTITY.as_u16();

    let Value::Object(mut fields) = raw else {
        return ImportResult {
            product_name: None,
            sl_no: None,
            result: SubmitOutcome::rejected(
                unprocessable,
                format!("record at position {} is not a JSON object", position),
            ),
        };
    };

    let sl_no = assign_serial(&mut fields, position, serials);
    let product_name = fields
        .get("product_name")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let checked = match serde_json::from_value::<ProductPayload>(Value::Object(fields)) {
        Ok(payload) => payload.validate(),
        Err(err) => Err(vec![FieldError::new("body", err.to_string())]),
    };

    let result = match checked {
        Ok(record) => downstream.submit(&record).await,
        Err(errors) => SubmitOutcome::rejected(unprocessable, FieldError::join(&errors)),
    };

    ImportResult {
        product_name,
        sl_no: Some(sl_no),
        result,
    }
}
