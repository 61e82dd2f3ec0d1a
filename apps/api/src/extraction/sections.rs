//! Best-effort slicing of résumé text into named sections by heading lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ResumeDocument, ResumeSections};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9.-]+").expect("Invalid email regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("Invalid phone regex"));

static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://|www\.|linkedin\.com/|github\.com/)").expect("Invalid URL regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

const HEADINGS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about me",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "education and training",
            "academic qualifications",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core competencies",
            "competencies",
            "skills & abilities",
            "skills and abilities",
            "technologies",
        ],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "key projects", "selected projects"],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certificates",
            "licenses & certifications",
            "licenses and certifications",
        ],
    ),
];

/// Builds a `ResumeDocument`, slicing sections where headings are recognised.
pub fn build_resume_document(text: &str) -> ResumeDocument {
    ResumeDocument {
        raw_text: text.to_string(),
        sections: slice_sections(text),
        word_count: text.split_whitespace().count(),
    }
}

/// True when the text carries an e-mail address, phone number or profile URL.
pub fn has_contact_details(text: &str) -> bool {
    EMAIL.is_match(text) || PHONE.is_match(text) || PROFILE_URL.is_match(text)
}

fn slice_sections(text: &str) -> ResumeSections {
    let mut preamble: Vec<&str> = Vec::new();
    let mut bodies: Vec<(SectionKind, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some((kind, inline)) = match_heading(line) {
            // A repeated heading reopens the earlier slice.
            let mut lines = match bodies.iter().position(|(k, _)| *k == kind) {
                Some(idx) => bodies.remove(idx).1,
                None => Vec::new(),
            };
            if !inline.is_empty() {
                lines.push(inline);
            }
            bodies.push((kind, lines));
            continue;
        }

        match bodies.last_mut() {
            Some((_, lines)) => lines.push(line),
            None => preamble.push(line),
        }
    }

    let mut sections = ResumeSections::default();

    let preamble = join_nonempty(&preamble);
    if let Some(text) = preamble {
        if has_contact_details(&text) {
            sections.contact = Some(text);
        }
    }

    for (kind, lines) in bodies {
        let body = join_nonempty(&lines);
        let slot = match kind {
            SectionKind::Summary => &mut sections.summary,
            SectionKind::Experience => &mut sections.experience,
            SectionKind::Education => &mut sections.education,
            SectionKind::Skills => &mut sections.skills,
            SectionKind::Projects => &mut sections.projects,
            SectionKind::Certifications => &mut sections.certifications,
        };
        *slot = body;
    }

    sections
}

/// Recognises a heading line, returning any content that follows a colon
/// on the same line (`Skills: Rust, SQL`).
fn match_heading(line: &str) -> Option<(SectionKind, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 60 {
        return None;
    }

    let (head, inline) = match trimmed.split_once(':') {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    let normalized = head
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
        .to_lowercase();
    if normalized.split_whitespace().count() > 4 {
        return None;
    }

    HEADINGS
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(kind, _)| (*kind, inline))
}

fn join_nonempty(lines: &[&str]) -> Option<String> {
    let joined = lines.join("\n").trim().to_string();
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\njane.doe@example.com | +1 (555) 123-4567\n\nPROFESSIONAL SUMMARY\nBackend engineer focused on distributed systems.\n\nExperience\nAcme Corp - Senior Engineer\n- Reduced p99 latency by 40%\n\nEducation:\nB.Sc. Computer Science\n\nSkills: Rust, Python, PostgreSQL, Docker";

    #[test]
    fn test_slices_common_sections() {
        let doc = build_resume_document(RESUME);
        let s = &doc.sections;
        assert!(s.contact.as_deref().unwrap().contains("jane.doe@example.com"));
        assert_eq!(
            s.summary.as_deref(),
            Some("Backend engineer focused on distributed systems.")
        );
        assert!(s.experience.as_deref().unwrap().contains("Acme Corp"));
        assert_eq!(s.education.as_deref(), Some("B.Sc. Computer Science"));
        assert_eq!(s.skills.as_deref(), Some("Rust, Python, PostgreSQL, Docker"));
        assert!(s.projects.is_none());
    }

    #[test]
    fn test_word_count() {
        let doc = build_resume_document("one two  three\nfour");
        assert_eq!(doc.word_count, 4);
    }

    #[test]
    fn test_no_headings_yields_no_sections() {
        let doc = build_resume_document("Just a paragraph about my career in sales.");
        assert_eq!(doc.sections, ResumeSections::default());
    }

    #[test]
    fn test_preamble_without_contact_is_not_contact() {
        let doc = build_resume_document("Jane Doe\nExperience\nAcme");
        assert!(doc.sections.contact.is_none());
        assert_eq!(doc.sections.experience.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_long_sentence_mentioning_skills_is_not_heading() {
        assert!(match_heading("My skills include leading teams of engineers across regions").is_none());
    }

    #[test]
    fn test_contact_detection() {
        assert!(has_contact_details("reach me at linkedin.com/in/jdoe"));
        assert!(has_contact_details("Phone: 555-123-4567"));
        assert!(!has_contact_details("No contact info here"));
    }
}
