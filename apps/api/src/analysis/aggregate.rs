//! Score Aggregator: combines matcher statistics with the AI assessment into
//! the dashboard metrics. Pure transformation, no I/O.

use serde::{Deserialize, Serialize};

use crate::analysis::client::{AnalysisMode, AnalysisResult};
use crate::matching::MatchStats;

/// Bounds on the ATS score when the AI assessment is unavailable, so a
/// heuristic-only result never reports high confidence.
pub const FALLBACK_ATS_FLOOR: f64 = 20.0;
pub const FALLBACK_ATS_CEILING: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the keyword overlap in the match score.
    pub keyword: f64,
    /// Weight of the AI relevance score in the match score.
    pub ai: f64,
    /// Share of the ATS score taken from the AI estimate in full mode.
    pub ats_ai_share: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            ai: 0.6,
            ats_ai_share: 0.8,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("keyword", self.keyword),
            ("ai", self.ai),
            ("ats_ai_share", self.ats_ai_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("weight '{name}' must be within [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewLikelihood {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPrediction {
    pub overall_competitiveness: f64,
    pub success_probability: u8,
    pub interview_likelihood: InterviewLikelihood,
    pub key_success_factors: Vec<String>,
    pub main_barriers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardScores {
    pub match_score: f64,
    pub ats_score: f64,
    pub skills_coverage: f64,
    pub required_skills_coverage: Option<f64>,
    pub keyword_score: f64,
    pub industry_score: f64,
    pub market_positioning: String,
    pub success: SuccessPrediction,
    /// True when the AI assessment was unavailable.
    pub limited_analysis: bool,
}

/// Combines heuristic and AI scores. All outputs are in [0, 100].
///
/// match_score = w_keyword · overlap · 100 + w_ai · relevance
/// ats_score   = share · ai_ats + (1 − share) · structure        (full mode)
///             = structure clamped to [FALLBACK_ATS_FLOOR, FALLBACK_ATS_CEILING] (heuristic-only)
pub fn aggregate(
    match_stats: &MatchStats,
    result: &AnalysisResult,
    weights: &ScoreWeights,
) -> DashboardScores {
    let keyword_score = pct(match_stats.keyword_overlap_ratio);
    let match_score =
        clamp(weights.keyword * keyword_score + weights.ai * result.ai.relevance_score);

    let structure = clamp(result.signals.structure_score);
    let ats_score = match result.mode {
        AnalysisMode::Full => clamp(
            weights.ats_ai_share * result.ai.ats_compatibility
                + (1.0 - weights.ats_ai_share) * structure,
        ),
        AnalysisMode::HeuristicOnly => structure.clamp(FALLBACK_ATS_FLOOR, FALLBACK_ATS_CEILING),
    };

    let skills_coverage = pct(match_stats.skills_coverage_ratio);
    let success = predict_success(match_score, ats_score, skills_coverage, match_stats, result);

    DashboardScores {
        match_score: round1(match_score),
        ats_score: round1(ats_score),
        skills_coverage: round1(skills_coverage),
        required_skills_coverage: match_stats.required_skills_coverage.map(|r| round1(pct(r))),
        keyword_score: round1(keyword_score),
        industry_score: round1(clamp(match_stats.industry.industry_score)),
        market_positioning: market_positioning(match_score).to_string(),
        success,
        limited_analysis: result.is_degraded(),
    }
}

fn predict_success(
    match_score: f64,
    ats_score: f64,
    skills_coverage: f64,
    match_stats: &MatchStats,
    result: &AnalysisResult,
) -> SuccessPrediction {
    let overall = clamp(0.4 * match_score + 0.3 * ats_score + 0.3 * skills_coverage);

    let (success_probability, interview_likelihood) = if overall >= 80.0 {
        (85, InterviewLikelihood::VeryHigh)
    } else if overall >= 70.0 {
        (70, InterviewLikelihood::High)
    } else if overall >= 60.0 {
        (55, InterviewLikelihood::Moderate)
    } else {
        (30, InterviewLikelihood::Low)
    };

    let mut factors = Vec::new();
    if match_score > 75.0 {
        factors.push("Strong keyword alignment".to_string());
    }
    if ats_score > 80.0 {
        factors.push("Excellent ATS compatibility".to_string());
    }
    if result.ai.skills_breakdown.technical > 80.0 {
        factors.push("Strong technical skill match".to_string());
    }

    let mut barriers = Vec::new();
    if match_score < 60.0 {
        barriers.push("Low keyword match rate".to_string());
    }
    if ats_score < 70.0 {
        barriers.push("ATS compatibility issues".to_string());
    }
    if match_stats.missing_keywords.len() > 5 {
        barriers.push("Missing critical keywords".to_string());
    }

    SuccessPrediction {
        overall_competitiveness: round1(overall),
        success_probability,
        interview_likelihood,
        key_success_factors: factors,
        main_barriers: barriers,
    }
}

fn market_positioning(match_score: f64) -> &'static str {
    if match_score > 80.0 {
        "Top 25%"
    } else if match_score > 60.0 {
        "Top 50%"
    } else {
        "Needs Improvement"
    }
}

fn pct(ratio: f64) -> f64 {
    clamp(ratio * 100.0)
}

fn clamp(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::client::AiAssessment;
    use crate::extraction::build_resume_document;
    use crate::matching::{
        analyze_content, derive_job_description, match_documents, IndustryCatalog,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn result_with(mode: AnalysisMode, relevance: f64, ats: f64) -> AnalysisResult {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(None);
        let resume_text = "Experience\n- Built Rust services on AWS\nSkills\nRust, AWS, Python";
        let job_text = "Backend engineer: Rust, AWS, Python, Kubernetes";
        let resume = build_resume_document(resume_text);
        let stats = match_documents(resume_text, job_text, profile);
        let signals = analyze_content(&resume);

        let mut ai = AiAssessment::heuristic_placeholder(&stats, &signals);
        ai.relevance_score = relevance;
        ai.ats_compatibility = ats;

        AnalysisResult {
            id: Uuid::new_v4(),
            mode,
            degraded_reason: None,
            job: derive_job_description(job_text, profile),
            match_stats: stats,
            ai,
            signals,
            keyword_suggestions: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_weights_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_weights_rejected() {
        let weights = ScoreWeights {
            keyword: -0.1,
            ..ScoreWeights::default()
        };
        assert!(weights.validate().is_err());

        let weights = ScoreWeights {
            ai: f64::NAN,
            ..ScoreWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_match_score_is_weighted_sum() {
        let mut result = result_with(AnalysisMode::Full, 50.0, 90.0);
        result.match_stats.keyword_overlap_ratio = 0.5;
        let stats = result.match_stats.clone();
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        // 0.4 * 50 + 0.6 * 50
        assert_eq!(scores.match_score, 50.0);
        assert_eq!(scores.keyword_score, 50.0);
        assert!(!scores.limited_analysis);
    }

    #[test]
    fn test_scores_clamped_to_100() {
        let mut result = result_with(AnalysisMode::Full, 100.0, 100.0);
        result.match_stats.keyword_overlap_ratio = 1.0;
        result.signals.structure_score = 100.0;
        let stats = result.match_stats.clone();
        let weights = ScoreWeights {
            keyword: 1.0,
            ai: 1.0,
            ats_ai_share: 0.8,
        };
        let scores = aggregate(&stats, &result, &weights);
        assert_eq!(scores.match_score, 100.0);
        assert_eq!(scores.ats_score, 100.0);
    }

    #[test]
    fn test_full_mode_ats_blends_ai_and_structure() {
        let mut result = result_with(AnalysisMode::Full, 70.0, 90.0);
        result.signals.structure_score = 40.0;
        let stats = result.match_stats.clone();
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        // 0.8 * 90 + 0.2 * 40
        assert_eq!(scores.ats_score, 80.0);
    }

    #[test]
    fn test_heuristic_only_ats_is_capped() {
        let mut result = result_with(AnalysisMode::HeuristicOnly, 95.0, 95.0);
        result.signals.structure_score = 100.0;
        let stats = result.match_stats.clone();
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        assert_eq!(scores.ats_score, FALLBACK_ATS_CEILING);
        assert!(scores.limited_analysis);

        result.signals.structure_score = 0.0;
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        assert_eq!(scores.ats_score, FALLBACK_ATS_FLOOR);
    }

    #[test]
    fn test_success_bands() {
        let mut result = result_with(AnalysisMode::Full, 100.0, 100.0);
        result.match_stats.keyword_overlap_ratio = 1.0;
        result.match_stats.skills_coverage_ratio = 1.0;
        result.signals.structure_score = 100.0;
        let stats = result.match_stats.clone();
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        assert_eq!(scores.success.success_probability, 85);
        assert_eq!(scores.success.interview_likelihood, InterviewLikelihood::VeryHigh);
        assert!(scores.success.main_barriers.is_empty());
        assert_eq!(scores.market_positioning, "Top 25%");

        let mut result = result_with(AnalysisMode::Full, 0.0, 0.0);
        result.match_stats.keyword_overlap_ratio = 0.0;
        result.match_stats.skills_coverage_ratio = 0.0;
        let stats = result.match_stats.clone();
        let scores = aggregate(&stats, &result, &ScoreWeights::default());
        assert_eq!(scores.success.success_probability, 30);
        assert_eq!(scores.success.interview_likelihood, InterviewLikelihood::Low);
        assert!(scores.success.main_barriers.contains(&"Low keyword match rate".to_string()));
    }

    #[test]
    fn test_interview_likelihood_wire_name() {
        let json = serde_json::to_string(&InterviewLikelihood::VeryHigh).unwrap();
        assert_eq!(json, r#""Very High""#);
    }
}
