//! Axum route handlers for session lifecycle and résumé upload.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::handlers::read_upload;
use crate::extraction::{build_resume_document, DocumentFormat};
use crate::models::ResumeSections;
use crate::session::{HistoryRecord, SessionStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub session: SessionStats,
    pub format: DocumentFormat,
    pub word_count: usize,
    pub sections: ResumeSections,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub history: Vec<HistoryRecord>,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionStats>) {
    let stats = state.sessions.create().await;
    (StatusCode::CREATED, Json(stats))
}

/// GET /api/v1/sessions/:id
pub async fn handle_session_stats(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStats>, AppError> {
    state
        .sessions
        .stats(session_id)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(session_id))
}

/// DELETE /api/v1/sessions/:id
///
/// Clears the session and everything cached in it.
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id).await {
        info!("Session {session_id} cleared");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(session_id))
    }
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload (field `file`). The extracted résumé replaces any previous one.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    if state.sessions.stats(session_id).await.is_none() {
        return Err(session_not_found(session_id));
    }

    let document = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let resume = build_resume_document(&document.text);
    let word_count = resume.word_count;
    let sections = resume.sections.clone();

    let session = state
        .sessions
        .attach_resume(session_id, resume)
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(UploadResumeResponse {
        session,
        format: document.format,
        word_count,
        sections,
    }))
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state
        .sessions
        .history(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(HistoryResponse {
        session_id,
        history,
    }))
}
