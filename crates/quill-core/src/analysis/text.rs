//! Text statistics used by the analysers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("word regex"));
static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence regex"));
static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{2,3}\s+\S").expect("heading regex"));

const WORDS_PER_MINUTE: usize = 200;

/// Length in characters, ignoring surrounding whitespace.
pub fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

pub fn words(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Prose paragraphs: blank-line separated blocks, markdown headings removed.
pub fn paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(|block| {
            block
                .lines()
                .filter(|line| !line.trim_start().starts_with('#'))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|block| word_count(block) > 0)
        .collect()
}

/// Sentences of the prose paragraphs. A paragraph always ends a sentence.
pub fn sentences(text: &str) -> Vec<String> {
    paragraphs(text)
        .iter()
        .flat_map(|p| {
            SENTENCE_END_RE
                .split(p)
                .filter(|s| word_count(s) > 0)
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn heading_count(text: &str) -> usize {
    HEADING_RE.find_iter(text).count()
}

/// Case-insensitive whole-phrase match.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return false;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let words = word_count(text);
        Self {
            words,
            sentences: sentences(text).len(),
            paragraphs: paragraphs(text).len(),
            reading_minutes: words.div_ceil(WORDS_PER_MINUTE),
        }
    }
}
