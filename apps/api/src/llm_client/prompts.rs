// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every prompt that sees résumé content.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the résumé and job description provided. \
    Do NOT invent employers, titles, dates, metrics or skills the candidate has not listed. \
    When suggesting a rewrite, keep the underlying facts and change only the wording.";

/// Longest document excerpt embedded into a prompt, in characters.
pub const MAX_DOCUMENT_CHARS: usize = 12_000;

/// Composes a system prompt from a role description and the JSON-only rule.
pub fn system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

/// Truncates a document on a char boundary so prompts stay bounded.
pub fn clip_document(text: &str) -> &str {
    match text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills `{name}` placeholders in a single pass. Substituted values are never
/// scanned again, so documents containing placeholder-like text stay verbatim.
/// Unknown `{...}` runs (such as JSON schema braces) are copied unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_lowercase() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        let value = after[name_len..]
            .starts_with('}')
            .then(|| values.iter().find(|(key, _)| *key == name))
            .flatten();

        match value {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[name_len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
