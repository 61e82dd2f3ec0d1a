pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::assist::handlers as assist;
use crate::extraction::handlers as extraction;
use crate::session::handlers as session;
use crate::state::AppState;

/// Allowance for multipart framing on top of the document itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless
        .route("/api/v1/industries", get(analysis::handle_list_industries))
        .route("/api/v1/match", post(analysis::handle_match))
        .route("/api/v1/documents/extract", post(extraction::handle_extract))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_session_stats).delete(session::handle_clear_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(session::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/analysis",
            post(analysis::handle_analyze).get(analysis::handle_last_analysis),
        )
        .route("/api/v1/sessions/:id/history", get(session::handle_history))
        // Assist
        .route(
            "/api/v1/sessions/:id/interview-prep",
            post(assist::handle_interview_prep),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter",
            post(assist::handle_cover_letter),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
