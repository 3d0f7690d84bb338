use axum::{extract::State, http::StatusCode, Json};

use crate::{error::AppResult, importer, models::ImportSummary, AppState};

// ── POST /insert-all-products ─────────────────────────────────────────────────

pub async fn insert_all_products(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ImportSummary>)> {
    let summary = importer::import_all(
        &state.downstream,
        state.serials.as_ref(),
        state.products_file.as_path(),
    )
    .await?;

    Ok((StatusCode::OK, Json(summary)))
}
