//! Cover letter drafting from the résumé, the job and the last analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assist::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_ROLE};
use crate::assist::AssistContext;
use crate::llm_client::prompts::{clip_document, fill_template, system_prompt, EVIDENCE_INSTRUCTION};
use crate::llm_client::{call_json_with_retry, CompletionProvider, RetryPolicy};
use crate::matching::display_name;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Concise,
}

impl CoverLetterTone {
    fn describe(&self) -> &'static str {
        match self {
            CoverLetterTone::Professional => "professional and formal",
            CoverLetterTone::Enthusiastic => "warm, energetic and engaging",
            CoverLetterTone::Concise => "direct and brief",
        }
    }

    fn length(&self) -> &'static str {
        match self {
            CoverLetterTone::Concise => "under 200 words, 3 short paragraphs",
            _ => "250 to 400 words, 3 or 4 paragraphs",
        }
    }
}

/// Request body for POST /api/v1/sessions/:id/cover-letter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub tone: CoverLetterTone,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub hiring_manager: Option<String>,
}

impl CoverLetterRequest {
    fn company(&self) -> &str {
        non_empty(self.company_name.as_deref()).unwrap_or("your company")
    }

    fn role(&self) -> &str {
        non_empty(self.role_title.as_deref()).unwrap_or("this role")
    }

    fn greeting_name(&self) -> &str {
        non_empty(self.hiring_manager.as_deref()).unwrap_or("Hiring Manager")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetter {
    /// True when the letter comes from the template fallback.
    pub degraded: bool,
    pub tone: CoverLetterTone,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

impl CoverLetter {
    fn new(degraded: bool, tone: CoverLetterTone, paragraphs: Vec<String>) -> Self {
        let word_count = paragraphs.iter().map(|p| p.split_whitespace().count()).sum();
        Self {
            degraded,
            tone,
            paragraphs,
            word_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCoverLetter {
    paragraphs: Vec<String>,
}

pub async fn write_cover_letter(
    provider: &dyn CompletionProvider,
    policy: &RetryPolicy,
    ctx: &AssistContext<'_>,
    request: &CoverLetterRequest,
) -> CoverLetter {
    let prompt = build_cover_letter_prompt(ctx, request);
    let system = system_prompt(COVER_LETTER_ROLE);

    match call_json_with_retry::<RawCoverLetter>(provider, &prompt, &system, policy).await {
        Ok(raw) => {
            let paragraphs: Vec<String> = raw
                .paragraphs
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if paragraphs.is_empty() {
                warn!("Cover letter answer was empty, using template");
                return template_letter(ctx, request);
            }
            CoverLetter::new(false, request.tone, paragraphs)
        }
        Err(e) => {
            warn!("Cover letter generation unavailable, using template: {e}");
            template_letter(ctx, request)
        }
    }
}

fn build_cover_letter_prompt(ctx: &AssistContext<'_>, request: &CoverLetterRequest) -> String {
    let matched = ctx.matched_skills();
    let matched: Vec<&str> = matched.into_iter().take(10).collect();
    let matched = matched.join(", ");
    let strengths = ctx.result.ai.strengths.join("; ");

    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("evidence_instruction", EVIDENCE_INSTRUCTION),
            ("company", request.company()),
            ("role", request.role()),
            ("greeting_name", request.greeting_name()),
            ("industry", ctx.industry),
            ("experience_level", ctx.level.label()),
            ("tone", request.tone.describe()),
            ("length", request.tone.length()),
            ("strengths", strengths.as_str()),
            ("matched_keywords", matched.as_str()),
            ("resume_text", clip_document(ctx.resume_text)),
            ("job_text", clip_document(&ctx.result.job.raw_text)),
        ],
    )
}

/// Template letter citing the skills the résumé shares with the job.
pub fn template_letter(ctx: &AssistContext<'_>, request: &CoverLetterRequest) -> CoverLetter {
    let skills: Vec<String> = ctx
        .matched_skills()
        .into_iter()
        .take(5)
        .map(display_name)
        .collect();
    let company = request.company();
    let role = request.role();

    let skills_sentence = match skills.as_slice() {
        [] => "My background lines up with the core requirements of the position.".to_string(),
        [only] => format!("My hands-on experience with {only} matches a core requirement of the position."),
        [init @ .., last] => format!(
            "My hands-on experience with {} and {last} matches the core requirements of the position.",
            init.join(", ")
        ),
    };

    let opening = match request.tone {
        CoverLetterTone::Enthusiastic => format!(
            "I was excited to see the opening for {role} at {company}, and I would love to bring my {} experience to your team.",
            ctx.industry.to_lowercase()
        ),
        _ => format!("I am writing to apply for {role} at {company}."),
    };

    let mut paragraphs = vec![format!("Dear {},", request.greeting_name()), opening];

    if request.tone == CoverLetterTone::Concise {
        paragraphs.push(skills_sentence);
    } else {
        let mut body = skills_sentence;
        if let Some(strength) = ctx.result.ai.strengths.first() {
            body.push_str(&format!(" In particular, I bring {}.", lowercase_first(strength)));
        }
        paragraphs.push(body);
        paragraphs.push(format!(
            "I would welcome the chance to discuss how I can contribute to {company}'s goals."
        ));
    }

    paragraphs.push(match request.tone {
        CoverLetterTone::Enthusiastic => "Thank you so much for your consideration!".to_string(),
        _ => "Thank you for your consideration.".to_string(),
    });
    paragraphs.push("Sincerely,".to_string());

    CoverLetter::new(true, request.tone, paragraphs)
}

fn lowercase_first(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches('.');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::tests::cached_analysis;
    use crate::llm_client::testing::{FixedProvider, ScriptedProvider};

    fn request(tone: CoverLetterTone) -> CoverLetterRequest {
        CoverLetterRequest {
            tone,
            company_name: Some("Acme".to_string()),
            role_title: Some("Backend Engineer".to_string()),
            hiring_manager: None,
        }
    }

    #[tokio::test]
    async fn test_ai_letter_used() {
        let cached = cached_analysis();
        let ctx = AssistContext::from_cached(&cached);
        let provider = FixedProvider(
            r#"{"paragraphs": ["Dear Hiring Manager,", " ", "I build Rust services."]}"#,
        );

        let letter = write_cover_letter(
            &provider,
            &RetryPolicy::default(),
            &ctx,
            &request(CoverLetterTone::Professional),
        )
        .await;
        assert!(!letter.degraded);
        assert_eq!(letter.paragraphs.len(), 2);
        assert_eq!(letter.word_count, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_uses_template_citing_skills() {
        let cached = cached_analysis();
        let ctx = AssistContext::from_cached(&cached);
        let provider = ScriptedProvider::always_failing();

        let letter = write_cover_letter(
            &provider,
            &RetryPolicy::default(),
            &ctx,
            &request(CoverLetterTone::Professional),
        )
        .await;
        assert!(letter.degraded);
        assert_eq!(letter.paragraphs[0], "Dear Hiring Manager,");
        assert!(letter.paragraphs[1].contains("Backend Engineer at Acme"));
        assert!(letter.paragraphs.iter().any(|p| p.contains("Rust")));
        assert!(letter.paragraphs.iter().any(|p| p.contains("AWS")));
        assert!(!letter.paragraphs.iter().any(|p| p.contains("aws")));
    }

    #[test]
    fn test_concise_template_is_shorter() {
        let cached = cached_analysis();
        let ctx = AssistContext::from_cached(&cached);
        let concise = template_letter(&ctx, &request(CoverLetterTone::Concise));
        let professional = template_letter(&ctx, &request(CoverLetterTone::Professional));
        assert!(concise.paragraphs.len() < professional.paragraphs.len());
        assert_eq!(concise.tone, CoverLetterTone::Concise);
    }

    #[test]
    fn test_defaults_when_request_is_blank() {
        let cached = cached_analysis();
        let ctx = AssistContext::from_cached(&cached);
        let letter = template_letter(&ctx, &CoverLetterRequest::default());
        assert!(letter.paragraphs[1].contains("this role at your company"));
    }

    #[test]
    fn test_lowercase_first() {
        assert_eq!(lowercase_first("Strong Rust skills."), "strong Rust skills");
        assert_eq!(lowercase_first(""), "");
    }
}
