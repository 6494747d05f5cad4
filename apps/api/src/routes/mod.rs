pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::history::handlers as history;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview session API
        .route("/api/v1/interview/start", post(interview::handle_start))
        .route("/api/v1/interview", get(interview::handle_get_session))
        .route("/api/v1/interview/answer", post(interview::handle_answer))
        .route("/api/v1/interview/next", post(interview::handle_advance))
        .route("/api/v1/interview/report", get(interview::handle_report))
        .route("/api/v1/interview/explain", post(interview::handle_explain))
        // History API
        .route(
            "/api/v1/history",
            get(history::handle_list).delete(history::handle_clear),
        )
        .route("/api/v1/history/stats", get(history::handle_stats))
        .route("/api/v1/history/chart", get(history::handle_chart))
        .route("/api/v1/history/export", get(history::handle_export))
        .route("/api/v1/history/import", post(history::handle_import))
        .route(
            "/api/v1/history/:id",
            get(history::handle_get).delete(history::handle_delete),
        )
        .with_state(state)
}
