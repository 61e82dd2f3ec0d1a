//! Axum route handlers for the assist modules.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::assist::cover_letter::{write_cover_letter, CoverLetter, CoverLetterRequest};
use crate::assist::interview::{prepare_interview, InterviewPrep};
use crate::assist::AssistContext;
use crate::errors::AppError;
use crate::session::CachedAnalysis;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InterviewPrepResponse {
    pub session_id: Uuid,
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub prep: InterviewPrep,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub session_id: Uuid,
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub letter: CoverLetter,
}

/// The session's last analysis; assist modules build on it.
async fn last_analysis(state: &AppState, session_id: Uuid) -> Result<CachedAnalysis, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    session.last_analysis.ok_or_else(|| {
        AppError::Input("Run an analysis in this session before using this feature.".to_string())
    })
}

/// POST /api/v1/sessions/:id/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<InterviewPrepResponse>, AppError> {
    let cached = last_analysis(&state, session_id).await?;
    let ctx = AssistContext::from_cached(&cached);

    let prep = prepare_interview(state.llm.as_ref(), &state.config.retry, &ctx).await;

    Ok(Json(InterviewPrepResponse {
        session_id,
        analysis_id: cached.report.result.id,
        prep,
    }))
}

/// POST /api/v1/sessions/:id/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let cached = last_analysis(&state, session_id).await?;
    let ctx = AssistContext::from_cached(&cached);

    let letter = write_cover_letter(state.llm.as_ref(), &state.config.retry, &ctx, &request).await;

    Ok(Json(CoverLetterResponse {
        session_id,
        analysis_id: cached.report.result.id,
        letter,
    }))
}
