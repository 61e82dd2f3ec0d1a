// Prompt constants for the assist modules (interview prep, cover letter).
// Reuses cross-cutting fragments from llm_client::prompts.

pub const INTERVIEW_ROLE: &str = "You are an expert interview coach who prepares candidates \
    for interviews based on their résumé and the job they are applying for.";

/// Interview preparation prompt template.
/// Replace: {evidence_instruction}, {industry}, {experience_level}, {strengths},
///          {matched_keywords}, {missing_keywords}, {match_score}, {job_text}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"{evidence_instruction}

Generate personalised interview questions for this candidate.

CANDIDATE SUMMARY:
- Industry: {industry}
- Experience level: {experience_level}
- Strengths: {strengths}
- Job keywords the résumé covers: {matched_keywords}
- Job keywords the résumé lacks: {missing_keywords}
- Match score: {match_score}/100

Return a JSON object with this EXACT schema (no extra fields):
{
  "questions": [
    {
      "question": "the interview question",
      "category": "behavioral",
      "difficulty": "medium",
      "rationale": "why this question is likely for this candidate",
      "answer_tips": ["point to address", "point to address"]
    }
  ],
  "talking_points": ["a point the candidate should bring up"]
}

Rules:
- category is one of "behavioral", "technical", "situational", "weakness_focused", "strength_showcase".
- difficulty is one of "easy", "medium", "hard".
- Give 8 to 12 questions covering every category, with at least one question about a gap.

JOB DESCRIPTION:
{job_text}"#;

pub const COVER_LETTER_ROLE: &str = "You are an expert career strategist and professional \
    writer who drafts tailored cover letters.";

/// Cover letter prompt template.
/// Replace: {evidence_instruction}, {company}, {role}, {greeting_name}, {industry},
///          {experience_level}, {tone}, {length}, {strengths}, {matched_keywords},
///          {resume_text}, {job_text}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{evidence_instruction}

Write a cover letter for this application.

POSITION:
- Company: {company}
- Role: {role}
- Address the letter to: {greeting_name}
- Industry: {industry}
- Candidate experience level: {experience_level}

STYLE:
- Tone: {tone}
- Length: {length}
- Connect the candidate's background to the role's requirements with 2 or 3 concrete achievements.
- End with a clear call to action.

CANDIDATE HIGHLIGHTS:
- Strengths: {strengths}
- Job keywords the résumé covers: {matched_keywords}

Return a JSON object with this EXACT schema (no extra fields):
{
  "paragraphs": ["Dear ...,", "opening paragraph", "body paragraph", "closing paragraph", "sign-off"]
}

RÉSUMÉ:
{resume_text}

JOB DESCRIPTION:
{job_text}"#;
