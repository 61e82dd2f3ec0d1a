//! Keyword/Industry Matcher: deterministic overlap statistics between a
//! résumé, a job description and an industry profile.
//!
//! Algorithm:
//! 1. Tokenize both texts (lower-cased, stop words removed) into sets R and J.
//! 2. keyword_overlap_ratio = |R ∩ J| / |J|   (0 when J is empty)
//! 3. skills_coverage_ratio = |profile.technical found in résumé| / |profile.technical|
//! 4. required_skills_coverage = share of the job's vocabulary skills the résumé mentions
//!
//! No error conditions and no side effects: identical inputs always yield
//! identical `MatchStats`.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::matching::industry::IndustryProfile;
use crate::matching::job_fields::skill_terms_in;
use crate::matching::tokenize::{tokenize, TokenizedText};

/// Upper bound on each keyword list in `MatchStats`.
pub const KEYWORD_LIST_CAP: usize = 50;

/// Industry keyword coverage of the résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryCoverage {
    pub industry: String,
    pub matched_technical: Vec<String>,
    pub missing_technical: Vec<String>,
    pub matched_business: Vec<String>,
    pub matched_tools: Vec<String>,
    pub trending_found: Vec<String>,
    pub trending_missing: Vec<String>,
    /// Share of all profile terms present in the résumé, 0 – 100.
    pub industry_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    /// 0.0 – 1.0
    pub keyword_overlap_ratio: f64,
    /// 0.0 – 1.0
    pub skills_coverage_ratio: f64,
    /// 0.0 – 1.0; `None` when the job names no vocabulary skills.
    pub required_skills_coverage: Option<f64>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub additional_keywords: Vec<String>,
    pub industry: IndustryCoverage,
    pub resume_token_count: usize,
    pub job_token_count: usize,
}

pub fn match_documents(resume_text: &str, job_text: &str, profile: &IndustryProfile) -> MatchStats {
    let resume = tokenize(resume_text);
    let job = tokenize(job_text);

    let matched: Vec<String> = job.tokens.intersection(&resume.tokens).cloned().collect();
    let missing: Vec<String> = job.tokens.difference(&resume.tokens).cloned().collect();
    let additional: Vec<String> = resume.tokens.difference(&job.tokens).cloned().collect();

    let keyword_overlap_ratio = ratio(matched.len(), job.tokens.len());

    let (matched_technical, missing_technical) = partition_terms(&profile.technical, &resume);
    let skills_coverage_ratio = ratio(matched_technical.len(), profile.technical.len());

    let required = skill_terms_in(&job, profile);
    let required_skills_coverage = (!required.is_empty()).then(|| {
        let covered = required.iter().filter(|s| resume.contains_term(s)).count();
        ratio(covered, required.len())
    });

    let (matched_business, _) = partition_terms(&profile.business, &resume);
    let (matched_tools, _) = partition_terms(&profile.tools, &resume);
    let (trending_found, trending_missing) = partition_terms(&profile.trending, &resume);

    let total_terms = profile.all_terms().count();
    let found_terms = matched_technical.len()
        + matched_business.len()
        + matched_tools.len()
        + trending_found.len();

    MatchStats {
        keyword_overlap_ratio,
        skills_coverage_ratio,
        required_skills_coverage,
        matched_keywords: rank_by_frequency(matched, &job),
        missing_keywords: rank_by_frequency(missing, &job),
        additional_keywords: rank_by_frequency(additional, &resume),
        industry: IndustryCoverage {
            industry: profile.name.clone(),
            matched_technical,
            missing_technical,
            matched_business,
            matched_tools,
            trending_found,
            trending_missing,
            industry_score: ratio(found_terms, total_terms) * 100.0,
        },
        resume_token_count: resume.tokens.len(),
        job_token_count: job.tokens.len(),
    }
}

/// `part / whole`, clamped to [0, 1]; 0 when `whole` is 0.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).clamp(0.0, 1.0)
    }
}

fn partition_terms(terms: &[String], text: &TokenizedText) -> (Vec<String>, Vec<String>) {
    terms.iter().cloned().partition(|t| text.contains_term(t))
}

/// Most frequent first, ties alphabetical, capped at `KEYWORD_LIST_CAP`.
fn rank_by_frequency(mut keywords: Vec<String>, source: &TokenizedText) -> Vec<String> {
    keywords.sort_by_key(|k| (Reverse(source.frequency(k)), k.clone()));
    keywords.truncate(KEYWORD_LIST_CAP);
    keywords
}
