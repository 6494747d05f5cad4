use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::stats::{chart_series, compute_stats, ChartSeries, HistoryStats};
use crate::models::history::HistoryRecord;
use crate::state::AppState;

/// GET /api/v1/history
pub async fn handle_list(State(state): State<AppState>) -> Json<Vec<HistoryRecord>> {
    Json(state.history.list())
}

/// GET /api/v1/history/stats
pub async fn handle_stats(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(compute_stats(&state.history.list()))
}

/// GET /api/v1/history/chart
pub async fn handle_chart(State(state): State<AppState>) -> Json<ChartSeries> {
    Json(chart_series(&state.history.list()))
}

/// GET /api/v1/history/export
/// The serialized blob as a downloadable JSON document.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let exported = state
        .history
        .export()
        .ok_or_else(|| AppError::Storage("History export failed".to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"interview-history.json\"",
            ),
        ],
        exported,
    ))
}

/// POST /api/v1/history/import
/// Body is a previously exported blob; replaces the stored list.
pub async fn handle_import(
    State(state): State<AppState>,
    body: String,
) -> Result<StatusCode, AppError> {
    if state.history.import(&body) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Validation(
            "Import payload is not a valid history export".to_string(),
        ))
    }
}

/// GET /api/v1/history/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryRecord>, AppError> {
    state
        .history
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("History record {id} not found")))
}

/// DELETE /api/v1/history/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.history.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("History record {id} not found")))
    }
}

/// DELETE /api/v1/history
pub async fn handle_clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    if state.history.clear() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Storage("History clear failed".to_string()))
    }
}
