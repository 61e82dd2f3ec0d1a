//! Interview preparation: likely questions with answer tips, tailored to the
//! gaps and strengths found by the last analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assist::prompts::{INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_ROLE};
use crate::assist::AssistContext;
use crate::llm_client::prompts::{clip_document, fill_template, system_prompt, EVIDENCE_INSTRUCTION};
use crate::llm_client::{call_json_with_retry, CompletionProvider, RetryPolicy};
use crate::matching::display_name;
use crate::models::{ExperienceLevel, Seniority};

const MAX_QUESTIONS: usize = 15;

/// Model answers spell categories loosely ("Behavioral", "weakness-focused"),
/// so parsing is lenient and unknown labels become `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum QuestionCategory {
    Behavioral,
    Technical,
    Situational,
    WeaknessFocused,
    StrengthShowcase,
    Other,
}

impl From<String> for QuestionCategory {
    fn from(label: String) -> Self {
        match normalize_label(&label).as_str() {
            "behavioral" | "behavioural" => QuestionCategory::Behavioral,
            "technical" => QuestionCategory::Technical,
            "situational" => QuestionCategory::Situational,
            "weakness_focused" | "weakness" => QuestionCategory::WeaknessFocused,
            "strength_showcase" | "strength" => QuestionCategory::StrengthShowcase,
            _ => QuestionCategory::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        match normalize_label(&label).as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub category: QuestionCategory,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub answer_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewPrep {
    /// True when the questions come from the deterministic fallback.
    pub degraded: bool,
    pub questions: Vec<InterviewQuestion>,
    pub talking_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawInterviewPrep {
    questions: Vec<InterviewQuestion>,
    #[serde(default)]
    talking_points: Vec<String>,
}

/// Generates interview questions. Provider failures or an empty question list
/// yield the deterministic fallback.
pub async fn prepare_interview(
    provider: &dyn CompletionProvider,
    policy: &RetryPolicy,
    ctx: &AssistContext<'_>,
) -> InterviewPrep {
    let prompt = build_interview_prompt(ctx);
    let system = system_prompt(INTERVIEW_ROLE);

    match call_json_with_retry::<RawInterviewPrep>(provider, &prompt, &system, policy).await {
        Ok(raw) => {
            let questions: Vec<InterviewQuestion> = raw
                .questions
                .into_iter()
                .filter(|q| !q.question.trim().is_empty())
                .take(MAX_QUESTIONS)
                .collect();
            if questions.is_empty() {
                warn!("Interview prep answer had no questions, using fallback");
                return fallback_prep(ctx);
            }
            InterviewPrep {
                degraded: false,
                questions,
                talking_points: raw.talking_points,
            }
        }
        Err(e) => {
            warn!("Interview prep unavailable, using fallback: {e}");
            fallback_prep(ctx)
        }
    }
}

fn build_interview_prompt(ctx: &AssistContext<'_>) -> String {
    let stats = &ctx.result.match_stats;
    let strengths = ctx.result.ai.strengths.join("; ");
    let matched = head(&stats.matched_keywords, 15);
    let missing = head(&stats.missing_keywords, 15);
    let match_score = format!("{:.0}", ctx.match_score);

    fill_template(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("evidence_instruction", EVIDENCE_INSTRUCTION),
            ("industry", ctx.industry),
            ("experience_level", ctx.level.label()),
            ("strengths", strengths.as_str()),
            ("matched_keywords", matched.as_str()),
            ("missing_keywords", missing.as_str()),
            ("match_score", match_score.as_str()),
            ("job_text", clip_document(&ctx.result.job.raw_text)),
        ],
    )
}

fn head(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Questions derived from matched and missing skills plus the role's seniority.
pub fn fallback_prep(ctx: &AssistContext<'_>) -> InterviewPrep {
    let matched: Vec<String> = ctx.matched_skills().into_iter().map(display_name).collect();
    let missing: Vec<String> = ctx.missing_skills().into_iter().map(display_name).collect();
    let mut questions = vec![InterviewQuestion {
        question: "Tell me about a challenging project you worked on and how you overcame obstacles."
            .to_string(),
        category: QuestionCategory::Behavioral,
        difficulty: Difficulty::Medium,
        rationale: "Asked in nearly every interview to probe problem-solving.".to_string(),
        answer_tips: tips(&["the specific challenge", "the actions you took", "the measurable result"]),
    }];

    for skill in matched.iter().take(3) {
        questions.push(InterviewQuestion {
            question: format!(
                "Walk me through a project where you used {skill}. What trade-offs did you make?"
            ),
            category: QuestionCategory::Technical,
            difficulty: Difficulty::Medium,
            rationale: format!("The job asks for {skill} and your résumé claims it."),
            answer_tips: tips(&["project context", "your personal contribution", "what you would do differently"]),
        });
    }

    for skill in missing.iter().take(2) {
        questions.push(InterviewQuestion {
            question: format!(
                "This role relies on {skill}. How would you get productive with it quickly?"
            ),
            category: QuestionCategory::WeaknessFocused,
            difficulty: Difficulty::Hard,
            rationale: format!("{skill} appears in the job description but not in your résumé."),
            answer_tips: tips(&[
                "adjacent experience that transfers",
                "a concrete learning plan",
                "a time you ramped up on something new",
            ]),
        });
    }

    questions.push(seniority_question(ctx.result.job.seniority, ctx.level));

    if let Some(strength) = ctx.result.ai.strengths.first() {
        questions.push(InterviewQuestion {
            question: "What accomplishment are you most proud of, and why?".to_string(),
            category: QuestionCategory::StrengthShowcase,
            difficulty: Difficulty::Easy,
            rationale: format!("A chance to showcase: {strength}."),
            answer_tips: tips(&["pick one story", "quantify the impact", "tie it to this role"]),
        });
    }

    let talking_points = matched
        .iter()
        .take(5)
        .map(|skill| format!("Connect your {skill} experience to the problems this team is solving."))
        .collect();

    InterviewPrep {
        degraded: true,
        questions,
        talking_points,
    }
}

fn seniority_question(seniority: Seniority, level: ExperienceLevel) -> InterviewQuestion {
    let senior = matches!(seniority, Seniority::Senior | Seniority::Executive)
        || (seniority == Seniority::Unknown
            && matches!(level, ExperienceLevel::Senior | ExperienceLevel::Executive));
    let entry = seniority == Seniority::Entry
        || (seniority == Seniority::Unknown && level == ExperienceLevel::Entry);

    if senior {
        InterviewQuestion {
            question: "Describe a time you influenced a technical or business decision across teams."
                .to_string(),
            category: QuestionCategory::Situational,
            difficulty: Difficulty::Hard,
            rationale: "Senior roles are assessed on leadership and influence.".to_string(),
            answer_tips: tips(&["stakeholders involved", "how you built consensus", "the outcome"]),
        }
    } else if entry {
        InterviewQuestion {
            question: "Tell me about a project from your studies or an internship that you are proud of."
                .to_string(),
            category: QuestionCategory::Situational,
            difficulty: Difficulty::Easy,
            rationale: "Entry-level interviews focus on potential and learning.".to_string(),
            answer_tips: tips(&["what you built", "what you learned", "how it applies here"]),
        }
    } else {
        InterviewQuestion {
            question: "How would you handle a situation where you disagreed with your manager?"
                .to_string(),
            category: QuestionCategory::Situational,
            difficulty: Difficulty::Medium,
            rationale: "Probes conflict resolution and communication.".to_string(),
            answer_tips: tips(&["communication approach", "respect for the decision", "solution focus"]),
        }
    }
}

fn tips(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
