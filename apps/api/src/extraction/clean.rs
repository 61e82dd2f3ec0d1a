//! Normalisation of text pulled out of uploaded documents.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank-line regex"));

static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").expect("Invalid whitespace regex"));

/// Glyphs PDF producers emit for list bullets, including the common
/// UTF-8-read-as-cp1252 mojibake of `•`.
const BULLET_GLYPHS: &[&str] = &["â€¢", "•", "●", "▪", "◦", "■", "\u{F0B7}", "\u{F0A7}"];

/// Cleans extracted text while keeping its line structure, which the
/// section slicer relies on.
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    for glyph in BULLET_GLYPHS {
        text = text.replace(glyph, "-");
    }

    let text: String = text
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|&c| c == '\n' || !c.is_control())
        .collect();

    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_WHITESPACE.replace_all(line.trim(), " ").into_owned())
        .collect();

    BLANK_RUNS
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}
