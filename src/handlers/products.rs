use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;

use crate::{
    downstream::Forwarded,
    error::{AppError, AppResult},
    models::{FieldError, ProductPayload},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Forwarded> {
    let start = Instant::now();
    let forwarded = state.downstream.list_products().await?;

    info!(
        status = forwarded.status.as_u16(),
        bytes = forwarded.body.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Listed products"
    );

    Ok(forwarded)
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> AppResult<Forwarded> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::Validation(vec![FieldError::new("body", rejection.body_text())]))?;
    let record = payload.validate().map_err(AppError::Validation)?;

    let start = Instant::now();
    let forwarded = state.downstream.create_product(&record).await?;

    info!(
        sl_no = record.serial_number,
        name = %record.name,
        status = forwarded.status.as_u16(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Forwarded product creation"
    );

    Ok(forwarded)
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Forwarded> {
    let forwarded = state.downstream.get_product(&id).await?;
    info!(id = %id, status = forwarded.status.as_u16(), "Fetched product");
    Ok(forwarded)
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Forwarded> {
    let forwarded = state.downstream.delete_product(&id).await?;
    info!(id = %id, status = forwarded.status.as_u16(), "Deleted product");
    Ok(forwarded)
}
