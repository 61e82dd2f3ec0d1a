//! Analysis pipeline: orchestrates one compatibility analysis.
//!
//! Flow: resolve résumé → derive job fields → match → content signals →
//!       AI assessment (or heuristic fallback) → aggregate → roadmap →
//!       cache in the session.
//!
//! The session lock is never held across the AI call.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::aggregate::{aggregate, DashboardScores};
use crate::analysis::client::{analyze, AnalysisRequest, AnalysisResult};
use crate::analysis::roadmap::{build_roadmap, RoadmapItem};
use crate::errors::AppError;
use crate::extraction::{build_resume_document, clean_text};
use crate::matching::{analyze_content, derive_job_description, match_documents, IndustryProfile};
use crate::models::{ExperienceLevel, ResumeDocument};
use crate::session::{AnalysisKey, CachedAnalysis};
use crate::state::AppState;

/// Request body for POST /api/v1/sessions/:id/analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub job_text: String,
    /// Overrides the résumé stored in the session.
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Recompute even when an identical analysis is cached.
    #[serde(default)]
    pub force: bool,
}

/// Analysis result plus the derived dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub scores: DashboardScores,
    pub roadmap: Vec<RoadmapItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub session_id: Uuid,
    /// True when served from the session cache without recomputation.
    pub cached: bool,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Runs matcher, AI assessment, aggregation and roadmap for one pair.
pub async fn run_analysis(
    state: &AppState,
    resume: &ResumeDocument,
    job_text: &str,
    profile: &IndustryProfile,
    level: ExperienceLevel,
) -> AnalysisReport {
    let job = derive_job_description(job_text, profile);
    let match_stats = match_documents(&resume.raw_text, &job.raw_text, profile);
    let signals = analyze_content(resume);

    let request = AnalysisRequest {
        resume,
        job,
        profile,
        level,
        match_stats,
        signals,
    };
    let result = analyze(state.llm.as_ref(), &state.config.retry, request).await;

    let scores = aggregate(&result.match_stats, &result, &state.config.weights);
    let roadmap = build_roadmap(&scores, &result);

    AnalysisReport {
        result,
        scores,
        roadmap,
    }
}

/// Full session-scoped analysis with caching of the last result.
pub async fn analyze_in_session(
    state: &AppState,
    session_id: Uuid,
    request: AnalyzeRequest,
) -> Result<AnalysisResponse, AppError> {
    let job_text = clean_text(&request.job_text);
    if job_text.is_empty() {
        return Err(AppError::Input("job_text cannot be empty".to_string()));
    }

    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let resume = match request.resume_text.as_deref() {
        Some(text) => {
            let cleaned = clean_text(text);
            if cleaned.is_empty() {
                return Err(AppError::Input("resume_text cannot be empty".to_string()));
            }
            build_resume_document(&cleaned)
        }
        None => session.resume.clone().ok_or_else(|| {
            AppError::Input(
                "No résumé in this session. Upload one or pass resume_text.".to_string(),
            )
        })?,
    };

    let profile = state.industries.resolve(request.industry.as_deref());
    let key = AnalysisKey {
        resume_text: resume.raw_text.clone(),
        job_text: job_text.clone(),
        industry: profile.name.clone(),
        level: request.experience_level,
    };

    if !request.force {
        if let Some(cached) = session.last_analysis.as_ref().filter(|c| c.key == key) {
            debug!("Serving cached analysis {} for session {session_id}", cached.report.result.id);
            return Ok(AnalysisResponse {
                session_id,
                cached: true,
                report: cached.report.clone(),
            });
        }
    }

    let report = run_analysis(state, &resume, &job_text, profile, request.experience_level).await;

    info!(
        "Session {session_id}: match={} ats={} limited={}",
        report.scores.match_score, report.scores.ats_score, report.scores.limited_analysis
    );

    let stored = state
        .sessions
        .record_analysis(
            session_id,
            CachedAnalysis {
                key,
                report: report.clone(),
            },
            request.force,
        )
        .await;
    if !stored {
        debug!("Session {session_id} ended during analysis; result not cached");
    }

    Ok(AnalysisResponse {
        session_id,
        cached: false,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{FixedProvider, ScriptedProvider};
    use crate::llm_client::CompletionProvider;
    use crate::state::test_state;
    use std::sync::Arc;

    const RESUME: &str = "jane@example.com\nExperience\n- Built Rust services on AWS\n\
        - Reduced latency by 40%\nEducation\nB.Sc.\nSkills\nRust, AWS, Python";
    const JOB: &str = "Backend engineer. Rust, AWS, Kubernetes, Python.";
    const PAYLOAD: &str = r#"{"relevance_score": 75, "ats_compatibility": 85}"#;

    fn request(force: bool) -> AnalyzeRequest {
        AnalyzeRequest {
            job_text: JOB.to_string(),
            resume_text: Some(RESUME.to_string()),
            industry: Some("technology".to_string()),
            experience_level: ExperienceLevel::Mid,
            force,
        }
    }

    async fn state_with(provider: Arc<dyn CompletionProvider>) -> (AppState, Uuid) {
        let state = test_state(provider);
        let session = state.sessions.create().await;
        (state, session.id)
    }

    #[tokio::test]
    async fn test_identical_request_served_from_cache() {
        let provider = Arc::new(ScriptedProvider::always_ok(PAYLOAD));
        let (state, id) = state_with(provider.clone()).await;

        let first = analyze_in_session(&state, id, request(false)).await.unwrap();
        let second = analyze_in_session(&state, id, request(false)).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.report.result.id, second.report.result.id);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_recomputes_and_counts_rescore() {
        let (state, id) = state_with(Arc::new(FixedProvider(PAYLOAD))).await;

        let first = analyze_in_session(&state, id, request(false)).await.unwrap();
        let forced = analyze_in_session(&state, id, request(true)).await.unwrap();

        assert!(!forced.cached);
        assert_ne!(first.report.result.id, forced.report.result.id);
        // Heuristic fields are deterministic across runs.
        assert_eq!(first.report.result.match_stats, forced.report.result.match_stats);

        let stats = state.sessions.stats(id).await.unwrap();
        assert_eq!(stats.rescore_count, 1);
        assert_eq!(stats.analyses_run, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_ai_answer_caps_ats() {
        let (state, id) = state_with(Arc::new(FixedProvider("{not json"))).await;
        let response = analyze_in_session(&state, id, request(false)).await.unwrap();

        assert!(response.report.scores.limited_analysis);
        assert!(response.report.scores.ats_score <= 60.0);
        assert!(response.report.result.degraded_reason.is_some());
    }

    #[tokio::test]
    async fn test_missing_resume_is_input_error() {
        let (state, id) = state_with(Arc::new(FixedProvider(PAYLOAD))).await;
        let mut req = request(false);
        req.resume_text = None;
        let err = analyze_in_session(&state, id, req).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[tokio::test]
    async fn test_blank_job_is_input_error() {
        let (state, id) = state_with(Arc::new(FixedProvider(PAYLOAD))).await;
        let mut req = request(false);
        req.job_text = "   ".to_string();
        let err = analyze_in_session(&state, id, req).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (state, _) = state_with(Arc::new(FixedProvider(PAYLOAD))).await;
        let err = analyze_in_session(&state, Uuid::new_v4(), request(false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stored_resume_used_when_no_override() {
        let (state, id) = state_with(Arc::new(FixedProvider(PAYLOAD))).await;
        state
            .sessions
            .attach_resume(id, build_resume_document(RESUME))
            .await;
        let mut req = request(false);
        req.resume_text = None;
        let response = analyze_in_session(&state, id, req).await.unwrap();
        assert!(response.report.result.match_stats.keyword_overlap_ratio > 0.0);
    }
}
