//! Assist modules: interview preparation and cover letters.
//!
//! Both follow the analysis contract: build a prompt from the session's last
//! analysis, call the completion provider, and fall back to a deterministic
//! answer flagged `degraded` when the provider fails.

pub mod cover_letter;
pub mod handlers;
pub mod interview;
pub mod prompts;

use crate::analysis::client::AnalysisResult;
use crate::models::ExperienceLevel;
use crate::session::CachedAnalysis;

/// Inputs shared by the assist modules, borrowed from a cached analysis.
pub struct AssistContext<'a> {
    pub resume_text: &'a str,
    pub industry: &'a str,
    pub level: ExperienceLevel,
    pub match_score: f64,
    pub result: &'a AnalysisResult,
}

impl<'a> AssistContext<'a> {
    pub fn from_cached(cached: &'a CachedAnalysis) -> Self {
        Self {
            resume_text: &cached.key.resume_text,
            industry: &cached.key.industry,
            level: cached.key.level,
            match_score: cached.report.scores.match_score,
            result: &cached.report.result,
        }
    }

    /// Job skills the résumé covers, most relevant first.
    pub fn matched_skills(&self) -> Vec<&'a str> {
        let stats = &self.result.match_stats;
        let mut skills: Vec<&'a str> = self
            .result
            .job
            .required_skills
            .iter()
            .filter(|s| {
                stats.matched_keywords.contains(*s) || stats.industry.matched_technical.contains(*s)
            })
            .map(String::as_str)
            .collect();
        if skills.is_empty() {
            skills = stats.matched_keywords.iter().map(String::as_str).collect();
        }
        skills
    }

    /// Job skills the résumé lacks, most relevant first.
    pub fn missing_skills(&self) -> Vec<&'a str> {
        let stats = &self.result.match_stats;
        let mut skills: Vec<&'a str> = self
            .result
            .job
            .required_skills
            .iter()
            .filter(|s| stats.missing_keywords.contains(*s))
            .map(String::as_str)
            .collect();
        if skills.is_empty() {
            skills = stats.missing_keywords.iter().map(String::as_str).collect();
        }
        skills
    }
}
