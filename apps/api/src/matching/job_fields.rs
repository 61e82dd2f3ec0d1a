//! Job-description field derivation: required skills, seniority, key phrases.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::matching::industry::IndustryProfile;
use crate::matching::tokenize::{tokenize, TokenizedText};
use crate::models::{JobDescription, Seniority};

/// General skill taxonomy, independent of the selected industry.
pub const SKILL_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "programming_languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "golang", "rust",
            "swift", "kotlin", "php", "scala", "perl",
        ],
    ),
    (
        "frameworks_libraries",
        &[
            "react", "angular", "vue", "django", "flask", "spring", "express", "rails",
            "laravel", ".net", "tensorflow", "pytorch", "keras",
        ],
    ),
    (
        "databases",
        &[
            "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra", "oracle",
            "sql server", "dynamodb", "sqlite",
        ],
    ),
    (
        "cloud_platforms",
        &[
            "aws", "amazon web services", "azure", "google cloud", "gcp", "heroku",
            "digitalocean",
        ],
    ),
    (
        "tools_technologies",
        &[
            "docker", "kubernetes", "jenkins", "git", "github", "gitlab", "jira", "confluence",
            "terraform", "ansible", "nginx",
        ],
    ),
    (
        "methodologies",
        &[
            "agile", "scrum", "kanban", "waterfall", "devops", "ci/cd", "tdd", "bdd",
            "microservices", "rest", "graphql",
        ],
    ),
];

/// Conventional spelling of vocabulary terms whose display form is not plain
/// capitalisation.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"), ("typescript", "TypeScript"), ("c++", "C++"), ("c#", "C#"),
    ("golang", "Go"), ("php", "PHP"), (".net", ".NET"), ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"), ("mysql", "MySQL"), ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"), ("sql server", "SQL Server"), ("dynamodb", "DynamoDB"),
    ("sqlite", "SQLite"), ("aws", "AWS"), ("gcp", "GCP"), ("digitalocean", "DigitalOcean"),
    ("github", "GitHub"), ("gitlab", "GitLab"), ("jira", "Jira"), ("devops", "DevOps"),
    ("ci/cd", "CI/CD"), ("tdd", "TDD"), ("bdd", "BDD"), ("rest", "REST"),
    ("graphql", "GraphQL"), ("sql", "SQL"), ("nosql", "NoSQL"), ("node.js", "Node.js"),
    ("api", "API"), ("apis", "APIs"), ("ai", "AI"), ("ml", "ML"), ("seo", "SEO"),
    ("sem", "SEM"), ("crm", "CRM"), ("ehr", "EHR"), ("emr", "EMR"), ("hipaa", "HIPAA"),
    ("kpi", "KPI"), ("roi", "ROI"), ("r", "R"), ("html", "HTML"), ("css", "CSS"),
    ("nlp", "NLP"), ("etl", "ETL"), ("hubspot", "HubSpot"), ("tableau", "Tableau"),
];

/// Human-facing spelling of a lower-cased vocabulary term, e.g. `aws` → `AWS`.
/// Terms outside the table get each word capitalised.
pub fn display_name(term: &str) -> String {
    if let Some((_, shown)) = DISPLAY_NAMES.iter().find(|(key, _)| *key == term) {
        return shown.to_string();
    }
    term.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static YEARS_REQUIRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:-\s*\d{1,2}\s*)?(?:years?|yrs?)\b")
        .expect("Invalid years regex")
});

static KEY_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:machine|deep)\s+learning\b",
        r"\bdata\s+(?:science|analysis|engineering|analytics)\b",
        r"\b(?:software|web|mobile|full[\s-]?stack)\s+(?:development|developer|engineering|engineer)\b",
        r"\b(?:project|product|program)\s+(?:management|manager)\b",
        r"\bbusiness\s+(?:analysis|analyst|intelligence)\b",
        r"\bversion\s+(?:control|management)\b",
        r"\bcontinuous\s+(?:integration|deployment|delivery)\b",
        r"\bdistributed\s+systems\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid key phrase regex"))
    .collect()
});

/// Seniority cues, most senior first. The first match wins.
const SENIORITY_CUES: &[(Seniority, &[&str])] = &[
    (
        Seniority::Executive,
        &[
            "chief", "vp", "vice president", "director", "head of", "executive",
        ],
    ),
    (
        Seniority::Senior,
        &["senior", "sr", "staff", "principal", "lead"],
    ),
    (
        Seniority::Mid,
        &["mid-level", "mid level", "intermediate"],
    ),
    (
        Seniority::Entry,
        &[
            "junior", "jr", "entry level", "entry-level", "graduate", "intern", "internship",
            "trainee",
        ],
    ),
];

/// Derives the structured fields of a job description.
pub fn derive_job_description(job_text: &str, profile: &IndustryProfile) -> JobDescription {
    let tokenized = tokenize(job_text);
    JobDescription {
        raw_text: job_text.to_string(),
        required_skills: skill_terms_in(&tokenized, profile),
        seniority: detect_seniority(job_text),
        key_phrases: key_phrases(job_text),
    }
}

/// Skill vocabulary terms (taxonomy plus the profile's technical and tool
/// lists) present in the text, sorted and deduplicated.
pub fn skill_terms_in(text: &TokenizedText, profile: &IndustryProfile) -> Vec<String> {
    let taxonomy = SKILL_TAXONOMY
        .iter()
        .flat_map(|(_, terms)| terms.iter().map(|t| t.to_string()));
    let from_profile = profile.technical.iter().chain(&profile.tools).cloned();

    taxonomy
        .chain(from_profile)
        .filter(|term| text.contains_term(term))
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Whether a term belongs to the general skill taxonomy.
pub fn in_taxonomy(term: &str) -> bool {
    SKILL_TAXONOMY
        .iter()
        .any(|(_, terms)| terms.contains(&term))
}

/// Seniority from the title line first, then "N+ years" statements, then
/// cues anywhere in the text.
pub fn detect_seniority(job_text: &str) -> Seniority {
    let title = job_text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");

    if let Some(level) = seniority_from_cues(title) {
        return level;
    }
    if let Some(level) = seniority_from_years(job_text) {
        return level;
    }
    seniority_from_cues(job_text).unwrap_or(Seniority::Unknown)
}

fn seniority_from_cues(text: &str) -> Option<Seniority> {
    let tokenized = tokenize(text);
    SENIORITY_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| tokenized.contains_term(cue)))
        .map(|(level, _)| *level)
}

fn seniority_from_years(text: &str) -> Option<Seniority> {
    let years = YEARS_REQUIRED
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max()?;

    Some(match years {
        0..=2 => Seniority::Entry,
        3..=5 => Seniority::Mid,
        6..=9 => Seniority::Senior,
        _ => Seniority::Executive,
    })
}

fn key_phrases(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    KEY_PHRASES
        .iter()
        .flat_map(|re| re.find_iter(&lowered).map(|m| normalize_space(m.as_str())))
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

fn normalize_space(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::industry::IndustryCatalog;

    const STARTUP_JD: &str = "Senior Rust Engineer - Core Infrastructure\n\
        We move fast. You will build distributed systems on AWS with Docker and Kubernetes.\n\
        Requirements: 5+ years Rust, PostgreSQL, CI/CD. Machine learning a plus.";

    fn technology() -> IndustryProfile {
        IndustryCatalog::builtin().resolve(Some("Technology")).clone()
    }

    #[test]
    fn test_required_skills_from_taxonomy_and_profile() {
        let jd = derive_job_description(STARTUP_JD, &technology());
        for skill in ["rust", "aws", "docker", "kubernetes", "postgresql", "ci/cd", "distributed systems"] {
            assert!(
                jd.required_skills.contains(&skill.to_string()),
                "missing {skill}: {:?}",
                jd.required_skills
            );
        }
        assert!(!jd.required_skills.contains(&"java".to_string()));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("aws"), "AWS");
        assert_eq!(display_name("postgresql"), "PostgreSQL");
        assert_eq!(display_name("rust"), "Rust");
        assert_eq!(display_name("distributed systems"), "Distributed Systems");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_title_cue_wins_over_years() {
        assert_eq!(detect_seniority(STARTUP_JD), Seniority::Senior);
    }

    #[test]
    fn test_years_band_when_title_is_neutral() {
        let jd = "Software Engineer\nRequired: 3-5 years of backend development.";
        assert_eq!(detect_seniority(jd), Seniority::Mid);
        let jd = "Software Engineer\nAt least 12 yrs building payments systems.";
        assert_eq!(detect_seniority(jd), Seniority::Executive);
    }

    #[test]
    fn test_entry_level_cue() {
        assert_eq!(
            detect_seniority("Graduate Data Analyst\nGreat place to start."),
            Seniority::Entry
        );
    }

    #[test]
    fn test_unknown_when_no_cues() {
        assert_eq!(detect_seniority("Data Analyst\nWe value curiosity."), Seniority::Unknown);
    }

    #[test]
    fn test_key_phrases() {
        let jd = derive_job_description(STARTUP_JD, &technology());
        assert_eq!(
            jd.key_phrases,
            vec!["distributed systems".to_string(), "machine learning".to_string()]
        );
    }

    #[test]
    fn test_empty_job_has_no_derived_fields() {
        let jd = derive_job_description("", &technology());
        assert!(jd.required_skills.is_empty());
        assert!(jd.key_phrases.is_empty());
        assert_eq!(jd.seniority, Seniority::Unknown);
    }

    #[test]
    fn test_in_taxonomy() {
        assert!(in_taxonomy("kubernetes"));
        assert!(!in_taxonomy("basket weaving"));
    }
}
