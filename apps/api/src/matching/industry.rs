//! Industry Profiles: static keyword taxonomy used for domain-specific matching.
//!
//! The catalog is built once at startup and shared read-only through `AppState`.

use serde::Serialize;
use tracing::debug;

/// Categorised keyword lists for one industry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryProfile {
    pub name: String,
    pub technical: Vec<String>,
    pub business: Vec<String>,
    pub tools: Vec<String>,
    pub trending: Vec<String>,
}

impl IndustryProfile {
    pub fn new(
        name: &str,
        technical: &[&str],
        business: &[&str],
        tools: &[&str],
        trending: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            technical: owned(technical),
            business: owned(business),
            tools: owned(tools),
            trending: owned(trending),
        }
    }

    /// Every term in the profile, category order preserved.
    pub fn all_terms(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(&self.business)
            .chain(&self.tools)
            .chain(&self.trending)
    }
}

/// Read-only set of industry profiles. The first profile is the fallback.
#[derive(Debug, Clone)]
pub struct IndustryCatalog {
    profiles: Vec<IndustryProfile>,
}

impl IndustryCatalog {
    pub fn builtin() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }

    /// Case-insensitive lookup; unknown names resolve to the fallback profile.
    pub fn resolve(&self, name: Option<&str>) -> &IndustryProfile {
        let requested = name.map(str::trim).filter(|n| !n.is_empty());
        match requested {
            Some(n) => self
                .profiles
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(n))
                .unwrap_or_else(|| {
                    debug!("Unknown industry '{n}', using {}", self.profiles[0].name);
                    &self.profiles[0]
                }),
            None => &self.profiles[0],
        }
    }

    pub fn profiles(&self) -> &[IndustryProfile] {
        &self.profiles
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

fn builtin_profiles() -> Vec<IndustryProfile> {
    vec![
        IndustryProfile::new(
            "Technology",
            &[
                "python", "java", "javascript", "typescript", "rust", "react", "angular", "vue",
                "node.js", "django", "flask", "spring", "api", "rest", "graphql",
                "microservices", "sql", "distributed systems",
            ],
            &[
                "problem-solving", "analytical thinking", "innovation", "collaboration",
                "leadership", "mentoring", "communication",
            ],
            &[
                "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "git", "terraform",
                "jira", "ci/cd",
            ],
            &[
                "ai", "machine learning", "cloud native", "containerization", "serverless",
                "devops", "llm",
            ],
        ),
        IndustryProfile::new(
            "Healthcare",
            &[
                "hipaa", "clinical", "medical", "patient care", "ehr", "emr", "nursing",
                "pharmacy", "radiology", "triage",
            ],
            &[
                "empathy", "communication", "attention to detail", "critical thinking",
                "teamwork",
            ],
            &["epic", "cerner", "meditech", "icd-10", "cpt"],
            &[
                "telemedicine", "digital health", "ai in healthcare", "precision medicine",
            ],
        ),
        IndustryProfile::new(
            "Finance",
            &[
                "financial modeling", "risk management", "audit", "compliance", "sox", "gaap",
                "ifrs", "valuation", "forecasting", "sql",
            ],
            &[
                "analytical", "detail-oriented", "integrity", "communication",
                "strategic thinking",
            ],
            &["excel", "bloomberg", "reuters", "sap", "quickbooks", "tableau"],
            &[
                "fintech", "cryptocurrency", "blockchain", "algorithmic trading",
                "robo-advisory",
            ],
        ),
        IndustryProfile::new(
            "Marketing",
            &[
                "seo", "sem", "ppc", "content marketing", "email marketing", "social media",
                "copywriting", "brand strategy",
            ],
            &[
                "creativity", "storytelling", "data-driven", "customer-focused", "adaptability",
            ],
            &[
                "google analytics", "hubspot", "salesforce", "mailchimp", "facebook ads",
                "hootsuite", "crm",
            ],
            &[
                "growth hacking", "influencer marketing", "marketing analytics",
                "personalization", "omnichannel",
            ],
        ),
        IndustryProfile::new(
            "Data Science",
            &[
                "python", "r", "sql", "statistics", "machine learning", "deep learning",
                "tensorflow", "pytorch", "pandas", "numpy", "scikit-learn",
            ],
            &[
                "analytical thinking", "problem-solving", "communication", "business acumen",
                "curiosity",
            ],
            &["tableau", "power bi", "jupyter", "spark", "airflow", "databricks"],
            &[
                "mlops", "automated ml", "explainable ai", "edge computing",
                "federated learning",
            ],
        ),
    ]
}
