//! Readability checklist over the body text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::checklist::{Check, CheckStatus, ScoreCard, at_least, at_most};
use super::text::{TextStats, paragraphs, sentences, word_count};

static PASSIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(am|is|are|was|were|be|been|being)\s+\w+(ed|en)\b").expect("passive regex")
});
static TRANSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(however|therefore|moreover|furthermore|for example|for instance|in addition|as a result|consequently|meanwhile|finally|first|second|also|because|instead|similarly|in short|overall)\b",
    )
    .expect("transition regex")
});

const LONG_SENTENCE_WORDS: usize = 25;

#[derive(Debug, Clone, Serialize)]
pub struct ReadabilityReport {
    #[serde(flatten)]
    pub card: ScoreCard,
    pub stats: TextStats,
}

pub fn analyze(body: &str) -> ReadabilityReport {
    let stats = TextStats::of(body);
    if stats.words == 0 {
        return ReadabilityReport {
            card: ScoreCard::from_checks(empty_checks()),
            stats,
        };
    }

    let sentences = sentences(body);
    let sentence_lengths: Vec<usize> = sentences.iter().map(|s| word_count(s)).collect();
    let sentence_total = sentences.len().max(1) as f64;

    let avg_sentence = sentence_lengths.iter().sum::<usize>() as f64 / sentence_total;
    let long_share = sentence_lengths
        .iter()
        .filter(|&&n| n > LONG_SENTENCE_WORDS)
        .count() as f64
        / sentence_total;
    let passive_share =
        sentences.iter().filter(|s| PASSIVE_RE.is_match(s)).count() as f64 / sentence_total;
    let transition_share =
        sentences.iter().filter(|s| TRANSITION_RE.is_match(s)).count() as f64 / sentence_total;

    let paragraph_lengths: Vec<usize> = paragraphs(body).iter().map(|p| word_count(p)).collect();
    let avg_paragraph =
        paragraph_lengths.iter().sum::<usize>() as f64 / paragraph_lengths.len().max(1) as f64;

    let checks = vec![
        Check::new(
            "sentence_length",
            "Average sentence length",
            30,
            at_most(avg_sentence, 20.0, 25.0),
            format!("{avg_sentence:.1} words per sentence (aim for 20 or fewer)"),
        ),
        Check::new(
            "long_sentences",
            "Long sentences",
            20,
            at_most(long_share, 0.25, 0.40),
            format!(
                "{:.0}% of sentences exceed {LONG_SENTENCE_WORDS} words",
                long_share * 100.0
            ),
        ),
        Check::new(
            "passive_voice",
            "Passive voice",
            20,
            at_most(passive_share, 0.10, 0.20),
            format!("{:.0}% of sentences use passive voice", passive_share * 100.0),
        ),
        Check::new(
            "paragraph_length",
            "Paragraph length",
            15,
            at_most(avg_paragraph, 150.0, 200.0),
            format!("{avg_paragraph:.0} words per paragraph (aim for 150 or fewer)"),
        ),
        Check::new(
            "transition_words",
            "Transition words",
            15,
            at_least(transition_share, 0.20, 0.10),
            format!(
                "{:.0}% of sentences use transition words",
                transition_share * 100.0
            ),
        ),
    ];

    ReadabilityReport {
        card: ScoreCard::from_checks(checks),
        stats,
    }
}

fn empty_checks() -> Vec<Check> {
    [
        ("sentence_length", "Average sentence length", 30),
        ("long_sentences", "Long sentences", 20),
        ("passive_voice", "Passive voice", 20),
        ("paragraph_length", "Paragraph length", 15),
        ("transition_words", "Transition words", 15),
    ]
    .into_iter()
    .map(|(id, label, weight)| Check::new(id, label, weight, CheckStatus::Poor, "No content"))
    .collect()
}
