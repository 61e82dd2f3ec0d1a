// Prompt constants for the compatibility analysis call.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role line for the analysis system prompt.
pub const ANALYSIS_ROLE: &str = "You are an expert ATS (applicant tracking system) analyst \
    and career coach. You compare a résumé against a job description and score how well \
    they fit.";

/// Analysis prompt template.
/// Placeholders: {evidence_instruction}, {industry}, {experience_level}, {focus_areas},
///               {keyword_weight}, {industry_keywords}, {resume_text}, {job_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"{evidence_instruction}

Analyse the résumé below against the job description.

CONTEXT:
- Industry: {industry}
- Candidate experience level: {experience_level}
- Focus areas for this level: {focus_areas}
- Keyword weight for this level: {keyword_weight} (1.0 means exact keyword alignment counts fully
  toward relevance_score; lower values mean transferable experience may compensate for missing keywords)
- Industry keywords to prioritise: {industry_keywords}

Return a JSON object with this EXACT schema (no extra fields):
{
  "relevance_score": 0,
  "ats_compatibility": 0,
  "ats_friendliness": "High",
  "skills_breakdown": {
    "technical": 0,
    "soft": 0,
    "industry_knowledge": 0,
    "experience_relevance": 0
  },
  "strengths": ["specific strength"],
  "recommendations": ["specific, actionable recommendation"],
  "suggested_rewrites": [
    {"original": "line from the résumé", "improved": "rewritten line", "reason": "why it is better"}
  ],
  "tone_notes": ["observation about tone or sentiment"]
}

Rules:
- Every score is a number from 0 to 100.
- relevance_score: how well the candidate's experience fits this specific role.
- ats_compatibility: how reliably an ATS would parse this résumé and rank it for the role.
- ats_friendliness: exactly one of "High", "Medium", "Low".
- Give 3 to 5 strengths and 3 to 5 recommendations.
- suggested_rewrites: up to 3 lines copied verbatim from the résumé, each with an improved version.

RÉSUMÉ:
{resume_text}

JOB DESCRIPTION:
{job_text}"#;
