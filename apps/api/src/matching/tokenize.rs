//! Case-insensitive tokenizer shared by the matcher and job-field derivation.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Words are runs of letters and digits in any script. Inner `+ # . / -` are
/// kept so `c++`, `c#`, `node.js` and `ci/cd` survive.
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}+#./-]*").expect("Invalid word regex")
});

/// English stop words plus résumé / job-posting boilerplate.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "don", "should", "now", "also", "etc", "e.g", "i.e", "via", "per", "within", "across",
    "well", "using", "use", "used", "get", "make",
    // résumé / job-posting boilerplate
    "experience", "work", "working", "worked", "responsibilities", "responsible", "duties",
    "duty", "including", "include", "includes", "requires", "required", "requirements",
    "skills", "skill", "ability", "able", "years", "year", "company", "position", "role",
    "job", "candidate", "candidates", "team", "teams", "must", "new", "strong", "looking",
    "join", "plus", "preferred", "ideal", "opportunity",
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// A document reduced to words and its filtered keyword set.
#[derive(Debug, Clone, Default)]
pub struct TokenizedText {
    /// Stop-word-filtered keyword set; the basis of every overlap ratio.
    pub tokens: BTreeSet<String>,
    frequencies: BTreeMap<String, u32>,
    words: Vec<String>,
    vocabulary: HashSet<String>,
}

impl TokenizedText {
    /// Occurrences of a filtered token in the document.
    pub fn frequency(&self, token: &str) -> u32 {
        self.frequencies.get(token).copied().unwrap_or(0)
    }

    /// Whether a catalog term occurs in the document. Multi-word terms must
    /// appear as a contiguous run; stop words inside them still count.
    pub fn contains_term(&self, term: &str) -> bool {
        let needle = split_words(term);
        match needle.as_slice() {
            [] => false,
            [single] => self.vocabulary.contains(single),
            many => self
                .words
                .windows(many.len())
                .any(|window| window == many),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

pub fn tokenize(text: &str) -> TokenizedText {
    let words = split_words(text);

    let mut frequencies = BTreeMap::new();
    for word in words.iter().filter(|w| is_keyword(w)) {
        *frequencies.entry(word.clone()).or_insert(0) += 1;
    }

    TokenizedText {
        tokens: frequencies.keys().cloned().collect(),
        frequencies,
        vocabulary: words.iter().cloned().collect(),
        words,
    }
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_SET.contains(word)
}

/// Lower-cases and splits text into words, trimming trailing punctuation.
pub fn split_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().trim_end_matches(['.', '/', '-']).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn is_keyword(word: &str) -> bool {
    word.chars().count() >= 2
        && !word.chars().all(|c| c.is_numeric() || c == '.')
        && !is_stop_word(word)
}
