//! AI Analysis Client: builds the compatibility prompt, calls the completion
//! provider and normalises the answer into an `AnalysisResult`.
//!
//! `analyze` never fails. When the provider keeps failing (transport errors,
//! error statuses, unparseable or incomplete payloads) the result is built from
//! the deterministic matcher output alone and flagged `HeuristicOnly`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::aggregate::{FALLBACK_ATS_CEILING, FALLBACK_ATS_FLOOR};
use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_ROLE};
use crate::llm_client::prompts::{clip_document, fill_template, system_prompt, EVIDENCE_INSTRUCTION};
use crate::llm_client::{call_json_with_retry, CompletionProvider, LlmError, RetryPolicy};
use crate::matching::{
    suggest_keyword_improvements, ContentSignals, IndustryProfile, KeywordSuggestion, MatchStats,
};
use crate::models::{ExperienceLevel, JobDescription, ResumeDocument};

/// How many industry terms are listed in the prompt.
const PROMPT_INDUSTRY_TERMS: usize = 15;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// AI assessment succeeded.
    Full,
    /// AI assessment failed; AI fields are heuristic placeholders.
    HeuristicOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtsFriendliness {
    High,
    Medium,
    Low,
}

impl AtsFriendliness {
    fn parse(raw: Option<&str>, ats_score: f64) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("high") => AtsFriendliness::High,
            Some("medium") | Some("moderate") => AtsFriendliness::Medium,
            Some("low") => AtsFriendliness::Low,
            _ => Self::from_score(ats_score),
        }
    }

    fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            AtsFriendliness::High
        } else if score >= 50.0 {
            AtsFriendliness::Medium
        } else {
            AtsFriendliness::Low
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsBreakdown {
    pub technical: f64,
    pub soft: f64,
    pub industry_knowledge: f64,
    pub experience_relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRewrite {
    pub original: String,
    pub improved: String,
    #[serde(default)]
    pub reason: String,
}

/// AI-derived part of an analysis. Every score is in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub relevance_score: f64,
    pub ats_compatibility: f64,
    pub ats_friendliness: AtsFriendliness,
    pub skills_breakdown: SkillsBreakdown,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
    pub suggested_rewrites: Vec<SuggestedRewrite>,
    pub tone_notes: Vec<String>,
}

/// Payload as the model returns it. The two headline scores are required;
/// everything else defaults when absent.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    relevance_score: f64,
    ats_compatibility: f64,
    #[serde(default)]
    ats_friendliness: Option<String>,
    #[serde(default)]
    skills_breakdown: Option<RawSkillsBreakdown>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    suggested_rewrites: Vec<SuggestedRewrite>,
    #[serde(default)]
    tone_notes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSkillsBreakdown {
    technical: Option<f64>,
    soft: Option<f64>,
    industry_knowledge: Option<f64>,
    experience_relevance: Option<f64>,
}

/// Complete result of one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub mode: AnalysisMode,
    pub degraded_reason: Option<String>,
    pub match_stats: MatchStats,
    pub ai: AiAssessment,
    pub signals: ContentSignals,
    pub keyword_suggestions: Vec<KeywordSuggestion>,
    pub job: JobDescription,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        self.mode == AnalysisMode::HeuristicOnly
    }
}

/// Everything one analysis call needs. The deterministic parts are computed
/// by the caller beforehand.
pub struct AnalysisRequest<'a> {
    pub resume: &'a ResumeDocument,
    pub job: JobDescription,
    pub profile: &'a IndustryProfile,
    pub level: ExperienceLevel,
    pub match_stats: MatchStats,
    pub signals: ContentSignals,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalisation
// ────────────────────────────────────────────────────────────────────────────

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl From<RawAssessment> for AiAssessment {
    fn from(raw: RawAssessment) -> Self {
        let relevance_score = clamp_score(raw.relevance_score);
        let ats_compatibility = clamp_score(raw.ats_compatibility);
        let skills = raw.skills_breakdown.unwrap_or_default();

        AiAssessment {
            relevance_score,
            ats_compatibility,
            ats_friendliness: AtsFriendliness::parse(
                raw.ats_friendliness.as_deref(),
                ats_compatibility,
            ),
            skills_breakdown: SkillsBreakdown {
                technical: clamp_score(skills.technical.unwrap_or(relevance_score)),
                soft: clamp_score(skills.soft.unwrap_or(relevance_score)),
                industry_knowledge: clamp_score(skills.industry_knowledge.unwrap_or(relevance_score)),
                experience_relevance: clamp_score(
                    skills.experience_relevance.unwrap_or(relevance_score),
                ),
            },
            strengths: non_blank(raw.strengths),
            recommendations: non_blank(raw.recommendations),
            suggested_rewrites: raw
                .suggested_rewrites
                .into_iter()
                .filter(|r| !r.original.trim().is_empty() && !r.improved.trim().is_empty())
                .collect(),
            tone_notes: non_blank(raw.tone_notes),
        }
    }
}

impl AiAssessment {
    /// Neutral AI fields derived only from the deterministic heuristics.
    pub fn heuristic_placeholder(stats: &MatchStats, signals: &ContentSignals) -> Self {
        let overlap = stats.keyword_overlap_ratio * 100.0;
        let ats_compatibility =
            clamp_score(signals.structure_score).clamp(FALLBACK_ATS_FLOOR, FALLBACK_ATS_CEILING);

        let mut strengths = Vec::new();
        if stats.keyword_overlap_ratio >= 0.6 {
            strengths.push("Strong keyword alignment with the job description".to_string());
        }
        if !stats.industry.matched_technical.is_empty() {
            let listed: Vec<&str> = stats
                .industry
                .matched_technical
                .iter()
                .take(5)
                .map(String::as_str)
                .collect();
            strengths.push(format!("Relevant {} skills: {}", stats.industry.industry, listed.join(", ")));
        }
        if signals.quantification.quantified_achievements > 0 {
            strengths.push("Achievements are backed by numbers".to_string());
        }

        let mut recommendations = Vec::new();
        if !stats.missing_keywords.is_empty() {
            let listed: Vec<&str> = stats
                .missing_keywords
                .iter()
                .take(5)
                .map(String::as_str)
                .collect();
            recommendations.push(format!(
                "Work these job keywords into your résumé where they are true: {}",
                listed.join(", ")
            ));
        }
        if signals.quantification.score < 50.0 {
            recommendations.push("Quantify achievements with metrics (%, $, time saved)".to_string());
        }
        if signals.structure_score < 70.0 {
            recommendations.push(
                "Use standard section headings (Experience, Education, Skills) and bullet points"
                    .to_string(),
            );
        }

        AiAssessment {
            relevance_score: clamp_score(overlap),
            ats_compatibility,
            ats_friendliness: AtsFriendliness::from_score(ats_compatibility),
            skills_breakdown: SkillsBreakdown {
                technical: clamp_score(stats.skills_coverage_ratio * 100.0),
                soft: clamp_score(signals.tone.confidence_score),
                industry_knowledge: clamp_score(stats.industry.industry_score),
                experience_relevance: clamp_score(
                    stats.required_skills_coverage.unwrap_or(stats.keyword_overlap_ratio) * 100.0,
                ),
            },
            strengths,
            recommendations,
            suggested_rewrites: vec![],
            tone_notes: signals.notes.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Runs the AI assessment for one résumé/job pair and assembles the result.
/// Provider failures are absorbed into a `HeuristicOnly` result.
pub async fn analyze(
    provider: &dyn CompletionProvider,
    policy: &RetryPolicy,
    request: AnalysisRequest<'_>,
) -> AnalysisResult {
    let prompt = build_analysis_prompt(&request);
    let system = system_prompt(ANALYSIS_ROLE);

    let outcome = call_json_with_retry::<RawAssessment>(provider, &prompt, &system, policy).await;

    let (mode, degraded_reason, ai) = match outcome {
        Ok(raw) => (AnalysisMode::Full, None, AiAssessment::from(raw)),
        Err(e) => {
            warn!("AI analysis unavailable, using heuristic-only result: {e}");
            (
                AnalysisMode::HeuristicOnly,
                Some(degraded_reason(&e)),
                AiAssessment::heuristic_placeholder(&request.match_stats, &request.signals),
            )
        }
    };

    let keyword_suggestions = suggest_keyword_improvements(&request.match_stats.missing_keywords);

    let result = AnalysisResult {
        id: Uuid::new_v4(),
        mode,
        degraded_reason,
        match_stats: request.match_stats,
        ai,
        signals: request.signals,
        keyword_suggestions,
        job: request.job,
        created_at: Utc::now(),
    };

    info!(
        "Analysis {} complete: mode={:?}, overlap={:.2}",
        result.id, result.mode, result.match_stats.keyword_overlap_ratio
    );

    result
}

fn build_analysis_prompt(request: &AnalysisRequest<'_>) -> String {
    let industry_keywords: Vec<&str> = request
        .profile
        .technical
        .iter()
        .chain(request.profile.trending.iter())
        .take(PROMPT_INDUSTRY_TERMS)
        .map(String::as_str)
        .collect();

    let focus_areas = request.level.focus_areas().join(", ");
    let keyword_weight = format!("{:.1}", request.level.keyword_weight());
    let industry_keywords = industry_keywords.join(", ");

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("evidence_instruction", EVIDENCE_INSTRUCTION),
            ("industry", request.profile.name.as_str()),
            ("experience_level", request.level.label()),
            ("focus_areas", focus_areas.as_str()),
            ("keyword_weight", keyword_weight.as_str()),
            ("industry_keywords", industry_keywords.as_str()),
            ("resume_text", clip_document(&request.resume.raw_text)),
            ("job_text", clip_document(&request.job.raw_text)),
        ],
    )
}

/// User-facing explanation of why the analysis is limited.
fn degraded_reason(error: &LlmError) -> String {
    let reason = match error {
        LlmError::Auth { .. } => "the AI service rejected the configured credentials",
        LlmError::RateLimited(_) => "the AI service rate limit was reached",
        LlmError::Http(_) => "the AI service could not be reached in time",
        LlmError::Api { .. } => "the AI service returned an error",
        LlmError::Parse(_) | LlmError::EmptyContent => "the AI service returned an unreadable answer",
    };
    format!("Limited analysis: {reason}. Scores are based on keyword heuristics only.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::build_resume_document;
    use crate::llm_client::testing::{FixedProvider, ScriptedProvider};
    use crate::matching::{analyze_content, derive_job_description, match_documents, IndustryCatalog};

    const RESUME: &str = "jane@example.com\nExperience\n- Led a Rust and Python platform team\n\
        - Reduced AWS costs by 30%\nEducation\nB.Sc. Computer Science\nSkills\nRust, Python, AWS, Docker";
    const JOB: &str = "Senior backend engineer. Required: Rust, Python, Kubernetes, AWS. 6+ years.";

    const GOOD_PAYLOAD: &str = r#"{
        "relevance_score": 82,
        "ats_compatibility": 140,
        "ats_friendliness": "high",
        "skills_breakdown": {"technical": 90, "soft": -5},
        "strengths": ["Rust platform leadership", "  "],
        "recommendations": ["Mention Kubernetes experience"],
        "suggested_rewrites": [{"original": "Led a team", "improved": "Led a 6-person team", "reason": "scope"}],
        "tone_notes": ["Confident"]
    }"#;

    async fn run(provider: &dyn CompletionProvider) -> AnalysisResult {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(Some("Technology"));
        let resume = build_resume_document(RESUME);
        let request = AnalysisRequest {
            resume: &resume,
            job: derive_job_description(JOB, profile),
            profile,
            level: ExperienceLevel::Senior,
            match_stats: match_documents(RESUME, JOB, profile),
            signals: analyze_content(&resume),
        };
        analyze(provider, &RetryPolicy::default(), request).await
    }

    #[tokio::test]
    async fn test_full_mode_normalises_payload() {
        let provider = FixedProvider(GOOD_PAYLOAD);
        let result = run(&provider).await;

        assert_eq!(result.mode, AnalysisMode::Full);
        assert!(result.degraded_reason.is_none());
        assert_eq!(result.ai.relevance_score, 82.0);
        assert_eq!(result.ai.ats_compatibility, 100.0);
        assert_eq!(result.ai.ats_friendliness, AtsFriendliness::High);
        assert_eq!(result.ai.skills_breakdown.technical, 90.0);
        assert_eq!(result.ai.skills_breakdown.soft, 0.0);
        // Missing sub-scores fall back to relevance.
        assert_eq!(result.ai.skills_breakdown.industry_knowledge, 82.0);
        assert_eq!(result.ai.strengths, vec!["Rust platform leadership".to_string()]);
        assert_eq!(result.ai.suggested_rewrites.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_falls_back_to_heuristics() {
        let provider = ScriptedProvider::new(vec![], || Ok("I cannot help with that.".to_string()));
        let result = run(&provider).await;

        assert_eq!(provider.calls(), 3);
        assert_eq!(result.mode, AnalysisMode::HeuristicOnly);
        assert!(result.is_degraded());
        assert!(result.degraded_reason.as_deref().unwrap().contains("unreadable"));
        assert!(result.ai.ats_compatibility <= FALLBACK_ATS_CEILING);
        assert!(result.ai.ats_compatibility >= FALLBACK_ATS_FLOOR);
        assert!(!result.ai.tone_notes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_required_score_is_malformed() {
        let provider = FixedProvider(r#"{"relevance_score": 70}"#);
        let result = run(&provider).await;
        assert_eq!(result.mode, AnalysisMode::HeuristicOnly);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_when_retry_succeeds() {
        let provider = ScriptedProvider::new(
            vec![
                Err(LlmError::RateLimited("slow down".to_string())),
                Ok(GOOD_PAYLOAD.to_string()),
            ],
            || Ok(String::new()),
        );
        let result = run(&provider).await;
        assert_eq!(provider.calls(), 2);
        assert_eq!(result.mode, AnalysisMode::Full);
    }

    #[tokio::test]
    async fn test_auth_failure_degrades_without_retry() {
        let provider = ScriptedProvider::new(vec![], || {
            Err(LlmError::Auth {
                status: 401,
                message: "invalid x-api-key".to_string(),
            })
        });
        let result = run(&provider).await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(result.mode, AnalysisMode::HeuristicOnly);
        assert!(result.degraded_reason.as_deref().unwrap().contains("credentials"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_heuristic_fields_identical_across_runs() {
        let first = run(&FixedProvider(GOOD_PAYLOAD)).await;
        let second = run(&ScriptedProvider::always_failing()).await;
        assert_eq!(first.match_stats, second.match_stats);
        assert_eq!(first.signals, second.signals);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_placeholder_is_fully_populated() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(None);
        let resume = build_resume_document("");
        let stats = match_documents("", "", profile);
        let signals = analyze_content(&resume);

        let ai = AiAssessment::heuristic_placeholder(&stats, &signals);
        assert_eq!(ai.relevance_score, 0.0);
        assert_eq!(ai.ats_compatibility, FALLBACK_ATS_FLOOR);
        assert_eq!(ai.ats_friendliness, AtsFriendliness::Low);
        assert!(!ai.recommendations.is_empty());
    }

    #[test]
    fn test_prompt_embeds_context() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(Some("finance"));
        let resume = build_resume_document(RESUME);
        let request = AnalysisRequest {
            resume: &resume,
            job: derive_job_description(JOB, profile),
            profile,
            level: ExperienceLevel::Entry,
            match_stats: match_documents(RESUME, JOB, profile),
            signals: analyze_content(&resume),
        };
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains("Industry: Finance"));
        assert!(prompt.contains("Entry Level"));
        assert!(prompt.contains("Keyword weight for this level: 0.7"));
        assert!(prompt.contains("Reduced AWS costs"));
        assert!(!prompt.contains("{job_text}"));
    }

    #[test]
    fn test_placeholder_text_in_documents_is_kept_verbatim() {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(None);
        let resume = build_resume_document("Templating work: wrote {job_text} and {industry} macros");
        let job_text = "Senior Rust engineer";
        let request = AnalysisRequest {
            resume: &resume,
            job: derive_job_description(job_text, profile),
            profile,
            level: ExperienceLevel::Senior,
            match_stats: match_documents(&resume.raw_text, job_text, profile),
            signals: analyze_content(&resume),
        };
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains("wrote {job_text} and {industry} macros"));
        assert!(prompt.contains("Keyword weight for this level: 0.9"));
        assert_eq!(prompt.matches("Senior Rust engineer").count(), 1);
    }
}
