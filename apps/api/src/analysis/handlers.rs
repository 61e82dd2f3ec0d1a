//! Axum route handlers for matching and analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::pipeline::{analyze_in_session, AnalysisResponse, AnalyzeRequest};
use crate::errors::AppError;
use crate::extraction::{build_resume_document, clean_text};
use crate::matching::{
    analyze_content, derive_job_description, match_documents, suggest_keyword_improvements,
    ContentSignals, IndustryProfile, KeywordSuggestion, MatchStats,
};
use crate::models::JobDescription;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_text: String,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_stats: MatchStats,
    pub job: JobDescription,
    pub signals: ContentSignals,
    pub keyword_suggestions: Vec<KeywordSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct IndustriesResponse {
    pub industries: Vec<IndustryProfile>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/industries
pub async fn handle_list_industries(State(state): State<AppState>) -> Json<IndustriesResponse> {
    Json(IndustriesResponse {
        industries: state.industries.profiles().to_vec(),
    })
}

/// POST /api/v1/match
///
/// Stateless heuristic match. No AI call; an empty job description yields
/// zero ratios rather than an error.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let resume = build_resume_document(&clean_text(&request.resume_text));
    let job_text = clean_text(&request.job_text);
    let profile = state.industries.resolve(request.industry.as_deref());

    let match_stats = match_documents(&resume.raw_text, &job_text, profile);
    let keyword_suggestions = suggest_keyword_improvements(&match_stats.missing_keywords);

    Ok(Json(MatchResponse {
        job: derive_job_description(&job_text, profile),
        signals: analyze_content(&resume),
        keyword_suggestions,
        match_stats,
    }))
}

/// POST /api/v1/sessions/:id/analysis
///
/// Full analysis. Identical inputs are served from the session cache unless
/// `force` is set.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let response = analyze_in_session(&state, session_id, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/analysis
pub async fn handle_last_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let report = state
        .sessions
        .last_analysis(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?
        .ok_or_else(|| {
            AppError::NotFound(format!("No analysis has been run in session {session_id}"))
        })?;

    Ok(Json(AnalysisResponse {
        session_id,
        cached: true,
        report,
    }))
}
