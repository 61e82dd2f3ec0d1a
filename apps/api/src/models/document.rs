use serde::{Deserialize, Serialize};

/// Best-effort section slices of a résumé. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub contact: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub projects: Option<String>,
    pub certifications: Option<String>,
}

impl ResumeSections {
    /// Number of sections that were found.
    pub fn present_count(&self) -> usize {
        [
            &self.contact,
            &self.summary,
            &self.experience,
            &self.education,
            &self.skills,
            &self.projects,
            &self.certifications,
        ]
        .iter()
        .filter(|s| s.is_some())
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub raw_text: String,
    pub sections: ResumeSections,
    pub word_count: usize,
}

/// Seniority implied by a job description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    Entry,
    Mid,
    Senior,
    Executive,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub raw_text: String,
    pub required_skills: Vec<String>,
    pub seniority: Seniority,
    pub key_phrases: Vec<String>,
}

/// Candidate experience level chosen by the user. Shapes the AI prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level (0-2 years)",
            ExperienceLevel::Mid => "Mid Level (3-5 years)",
            ExperienceLevel::Senior => "Senior Level (6-10 years)",
            ExperienceLevel::Executive => "Executive (10+ years)",
        }
    }

    pub fn focus_areas(&self) -> &'static [&'static str] {
        match self {
            ExperienceLevel::Entry => &[
                "education",
                "projects",
                "internships",
                "certifications",
                "learning",
            ],
            ExperienceLevel::Mid => &[
                "achievements",
                "project leadership",
                "skill development",
                "results",
            ],
            ExperienceLevel::Senior => &[
                "leadership",
                "mentoring",
                "strategic impact",
                "innovation",
            ],
            ExperienceLevel::Executive => &[
                "vision",
                "transformation",
                "p&l responsibility",
                "board interaction",
            ],
        }
    }

    /// How heavily the reviewer should weigh exact keyword alignment.
    pub fn keyword_weight(&self) -> f64 {
        match self {
            ExperienceLevel::Entry => 0.7,
            ExperienceLevel::Mid => 0.8,
            ExperienceLevel::Senior => 0.9,
            ExperienceLevel::Executive => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seniority_serde_snake_case() {
        let json = serde_json::to_string(&Seniority::Executive).unwrap();
        assert_eq!(json, r#""executive""#);
        let parsed: Seniority = serde_json::from_str(r#""unknown""#).unwrap();
        assert_eq!(parsed, Seniority::Unknown);
    }

    #[test]
    fn test_experience_level_default_is_mid() {
        assert_eq!(ExperienceLevel::default(), ExperienceLevel::Mid);
    }

    #[test]
    fn test_keyword_weight_increases_with_level() {
        assert!(ExperienceLevel::Entry.keyword_weight() < ExperienceLevel::Senior.keyword_weight());
        assert!((ExperienceLevel::Executive.keyword_weight() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_present_count() {
        let sections = ResumeSections {
            experience: Some("Engineer at Acme".to_string()),
            skills: Some("Rust, SQL".to_string()),
            ..Default::default()
        };
        assert_eq!(sections.present_count(), 2);
    }
}
