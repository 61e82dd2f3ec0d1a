//! Keyword improvement suggestions for missing job keywords.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::job_fields::in_taxonomy;

/// Only the first this-many missing keywords are categorised.
const SUGGESTION_LIMIT: usize = 15;

const SOFT_SKILL_TERMS: &[&str] = &[
    "leadership", "communication", "teamwork", "collaboration", "problem-solving",
    "analytical", "creative", "innovative", "organized", "detail-oriented", "strategic",
    "mentoring", "ownership", "adaptability", "stakeholder",
];

const TECH_SUFFIXES: &[&str] = &["js", "py", "db", "sql", "api", "sdk", "ide", "ops"];

static TECH_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[a-z]+\.js$",
        r"^[a-z]+\+\+$",
        r"^[a-z]+#$",
        r"^\d+[a-z]+$",
        r"^[a-z]+\d+$",
        r"^[a-z]+/[a-z]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid technical-term regex"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    TechnicalSkills,
    SoftSkills,
    OtherTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestion {
    pub category: SuggestionCategory,
    pub keywords: Vec<String>,
    pub suggestion: String,
}

/// Groups missing keywords by kind and attaches a remediation sentence.
pub fn suggest_keyword_improvements(missing: &[String]) -> Vec<KeywordSuggestion> {
    let mut technical = Vec::new();
    let mut soft = Vec::new();
    let mut other = Vec::new();

    for keyword in missing.iter().take(SUGGESTION_LIMIT) {
        if is_technical_term(keyword) {
            technical.push(keyword.clone());
        } else if SOFT_SKILL_TERMS.contains(&keyword.as_str()) {
            soft.push(keyword.clone());
        } else {
            other.push(keyword.clone());
        }
    }

    let mut suggestions = Vec::new();

    if !technical.is_empty() {
        suggestions.push(KeywordSuggestion {
            category: SuggestionCategory::TechnicalSkills,
            suggestion: format!(
                "Add these technical skills to your skills section: {}. If you have used them, \
                 cite a specific project or achievement that shows your proficiency.",
                technical.join(", ")
            ),
            keywords: technical,
        });
    }

    if !soft.is_empty() {
        suggestions.push(KeywordSuggestion {
            category: SuggestionCategory::SoftSkills,
            suggestion: format!(
                "Show these qualities in your experience bullets: {}. Use action verbs and \
                 concrete examples rather than listing them.",
                soft.join(", ")
            ),
            keywords: soft,
        });
    }

    if !other.is_empty() {
        suggestions.push(KeywordSuggestion {
            category: SuggestionCategory::OtherTerms,
            suggestion: format!(
                "Consider including these terms where they are accurate: {}. Keep them \
                 natural within your experience and qualifications.",
                other.join(", ")
            ),
            keywords: other,
        });
    }

    suggestions
}

pub fn is_technical_term(term: &str) -> bool {
    in_taxonomy(term)
        || TECH_SHAPES.iter().any(|re| re.is_match(term))
        || TECH_SUFFIXES
            .iter()
            .any(|suffix| term.len() > suffix.len() && term.ends_with(suffix))
}
