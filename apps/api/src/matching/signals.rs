//! Content signals: deterministic tone, readability, quantification and
//! structure heuristics over a résumé. These stand in for the AI's tone notes
//! in heuristic-only mode and feed the fallback ATS estimate.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::has_contact_details;
use crate::matching::tokenize::tokenize;
use crate::models::ResumeDocument;

const STRONG_PHRASES: &[&str] = &[
    "achieved", "accomplished", "delivered", "exceeded", "improved", "increased", "led",
    "managed", "developed", "created", "innovated", "optimized", "streamlined", "transformed",
    "pioneered", "launched", "implemented", "reduced", "built", "designed",
];

const WEAK_PHRASES: &[&str] = &[
    "responsible for", "duties included", "worked on", "helped with", "participated in",
    "assisted with", "involved in", "contributed to",
];

const METRIC_VERBS: &[&str] = &[
    "increased", "decreased", "improved", "reduced", "saved", "generated", "achieved", "grew",
    "cut",
];

static METRIC_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\b\d+(?:,\d{3})*(?:\.\d+)?(?:%|\s?(?:k|m|x|million|billion)\b)?")
        .expect("Invalid metric regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTone {
    Confident,
    Moderate,
    Passive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSignals {
    pub confidence_score: f64,
    pub action_orientation: f64,
    pub strong_indicators: usize,
    pub weak_indicators: usize,
    pub weak_phrases_found: Vec<String>,
    pub overall_tone: OverallTone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub score: f64,
    pub avg_words_per_sentence: f64,
    pub avg_chars_per_word: f64,
    pub total_words: usize,
    pub total_sentences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantification {
    pub score: f64,
    pub numbers_found: usize,
    pub quantified_achievements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSignals {
    pub tone: ToneSignals,
    pub readability: Readability,
    pub quantification: Quantification,
    /// Heuristic ATS parseability, 0 – 100.
    pub structure_score: f64,
    pub notes: Vec<String>,
}

pub fn analyze_content(resume: &ResumeDocument) -> ContentSignals {
    let tone = analyze_tone(&resume.raw_text);
    let readability = analyze_readability(&resume.raw_text);
    let quantification = analyze_quantification(&resume.raw_text);
    let structure_score = structure_score(resume);

    let notes = build_notes(resume, &tone, &readability, &quantification);

    ContentSignals {
        tone,
        readability,
        quantification,
        structure_score,
        notes,
    }
}

fn analyze_tone(text: &str) -> ToneSignals {
    let tokenized = tokenize(text);
    let strong = STRONG_PHRASES
        .iter()
        .filter(|p| tokenized.contains_term(p))
        .count();
    let weak_phrases_found: Vec<String> = WEAK_PHRASES
        .iter()
        .filter(|p| tokenized.contains_term(p))
        .map(|p| p.to_string())
        .collect();
    let weak = weak_phrases_found.len();

    let confidence_score = ((strong as f64 - weak as f64) * 10.0 + 60.0).clamp(0.0, 100.0);
    let action_orientation = (strong as f64 / weak.max(1) as f64 * 20.0).min(100.0);
    let overall_tone = match strong.cmp(&weak) {
        std::cmp::Ordering::Greater => OverallTone::Confident,
        std::cmp::Ordering::Equal => OverallTone::Moderate,
        std::cmp::Ordering::Less => OverallTone::Passive,
    };

    ToneSignals {
        confidence_score,
        action_orientation,
        strong_indicators: strong,
        weak_indicators: weak,
        weak_phrases_found,
        overall_tone,
    }
}

fn analyze_readability(text: &str) -> Readability {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total_sentences = sentences(text).count();
    let total_words = words.len();

    let avg_words_per_sentence = total_words as f64 / total_sentences.max(1) as f64;
    let avg_chars_per_word =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / total_words.max(1) as f64;

    let score = if total_words == 0 {
        0.0
    } else {
        (100.0 - (avg_words_per_sentence - 15.0) * 2.0 - (avg_chars_per_word - 5.0) * 3.0)
            .clamp(0.0, 100.0)
    };

    Readability {
        score,
        avg_words_per_sentence: round1(avg_words_per_sentence),
        avg_chars_per_word: round1(avg_chars_per_word),
        total_words,
        total_sentences,
    }
}

fn analyze_quantification(text: &str) -> Quantification {
    let numbers_found = METRIC_NUMBER.find_iter(text).count();
    let quantified_achievements = sentences(text)
        .filter(|s| {
            let lowered = s.to_lowercase();
            METRIC_VERBS.iter().any(|v| lowered.contains(v)) && METRIC_NUMBER.is_match(s)
        })
        .count();

    Quantification {
        score: (numbers_found as f64 * 10.0).min(100.0),
        numbers_found,
        quantified_achievements,
    }
}

/// Heuristic ATS parseability from document structure.
fn structure_score(resume: &ResumeDocument) -> f64 {
    let s = &resume.sections;
    let mut score = 0.0;

    if s.contact.is_some() || has_contact_details(&resume.raw_text) {
        score += 20.0;
    }
    if s.experience.is_some() {
        score += 20.0;
    }
    if s.education.is_some() {
        score += 15.0;
    }
    if s.skills.is_some() {
        score += 15.0;
    }

    score += match resume.word_count {
        200..=1200 => 15.0,
        100..=199 | 1201..=2000 => 8.0,
        _ => 0.0,
    };

    let bullet_lines = resume
        .raw_text
        .lines()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with("- ") || t.starts_with("* ") || t.starts_with("• ")
        })
        .count();
    if bullet_lines >= 3 {
        score += 15.0;
    }

    score
}

fn build_notes(
    resume: &ResumeDocument,
    tone: &ToneSignals,
    readability: &Readability,
    quantification: &Quantification,
) -> Vec<String> {
    let mut notes = Vec::new();

    notes.push(match tone.overall_tone {
        OverallTone::Confident => {
            "Tone is confident: action verbs outnumber passive phrasing.".to_string()
        }
        OverallTone::Moderate => {
            "Tone is neutral: add stronger action verbs to lead each bullet.".to_string()
        }
        OverallTone::Passive => "Tone reads as passive: lead bullets with what you achieved."
            .to_string(),
    });

    if !tone.weak_phrases_found.is_empty() {
        notes.push(format!(
            "Replace duty-style phrasing ({}) with outcome-focused verbs.",
            tone.weak_phrases_found.join(", ")
        ));
    }

    if readability.avg_words_per_sentence > 25.0 {
        notes.push(format!(
            "Sentences average {:.0} words; aim for under 20 so recruiters can scan them.",
            readability.avg_words_per_sentence
        ));
    }

    if quantification.quantified_achievements == 0 {
        notes.push("No quantified achievements found; add metrics (%, $, time saved).".to_string());
    }

    let s = &resume.sections;
    let missing: Vec<&str> = [
        ("experience", s.experience.is_none()),
        ("education", s.education.is_none()),
        ("skills", s.skills.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect();
    if !missing.is_empty() {
        notes.push(format!(
            "No clearly headed {} section found; ATS parsers rely on standard headings.",
            missing.join("/")
        ));
    }

    notes
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| s.split_whitespace().next().is_some())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::build_resume_document;

    const STRONG_RESUME: &str = "jane@example.com\n\nExperience\n\
        - Led migration of billing to Rust, reduced costs by 30%\n\
        - Built ingestion pipeline processing 2M events per day\n\
        - Improved deploy frequency from weekly to daily\n\
        Education\nB.Sc. Computer Science\nSkills\nRust, Python, AWS";

    const WEAK_RESUME: &str = "Responsible for reports. Worked on the website. Helped with onboarding. \
        Participated in meetings.";

    #[test]
    fn test_confident_tone() {
        let signals = analyze_content(&build_resume_document(STRONG_RESUME));
        assert_eq!(signals.tone.overall_tone, OverallTone::Confident);
        assert!(signals.tone.confidence_score > 60.0);
        assert!(signals.tone.weak_phrases_found.is_empty());
    }

    #[test]
    fn test_passive_tone() {
        let signals = analyze_content(&build_resume_document(WEAK_RESUME));
        assert_eq!(signals.tone.overall_tone, OverallTone::Passive);
        assert_eq!(signals.tone.weak_indicators, 4);
        assert!(signals.tone.confidence_score < 60.0);
        assert!(signals.notes.iter().any(|n| n.contains("responsible for")));
    }

    #[test]
    fn test_quantified_achievements_counted() {
        let signals = analyze_content(&build_resume_document(STRONG_RESUME));
        assert!(signals.quantification.numbers_found >= 2);
        assert!(signals.quantification.quantified_achievements >= 1);
    }

    #[test]
    fn test_structure_score_rewards_sections() {
        let strong = analyze_content(&build_resume_document(STRONG_RESUME));
        let weak = analyze_content(&build_resume_document(WEAK_RESUME));
        assert!(strong.structure_score > weak.structure_score);
        assert!(strong.structure_score <= 100.0);
        assert_eq!(weak.structure_score, 0.0);
    }

    #[test]
    fn test_empty_resume_scores_are_bounded() {
        let signals = analyze_content(&build_resume_document(""));
        assert_eq!(signals.readability.score, 0.0);
        assert_eq!(signals.quantification.score, 0.0);
        assert_eq!(signals.structure_score, 0.0);
        assert!(!signals.notes.is_empty());
    }

    #[test]
    fn test_readability_in_range() {
        let signals = analyze_content(&build_resume_document(STRONG_RESUME));
        assert!((0.0..=100.0).contains(&signals.readability.score));
    }
}
