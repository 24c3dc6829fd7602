//! Content scoring.
//!
//! Three fixed checklists (SEO, readability, brand voice) evaluated with
//! plain arithmetic and regex counting. Every analyser is a pure function:
//! the same input always yields the same [`ScoreCard`], scores stay within
//! `0..=100`, and moving one check to a better band never lowers a score.

pub mod brand_voice;
pub mod checklist;
pub mod readability;
pub mod seo;
pub mod text;

use serde::{Deserialize, Serialize};

pub use checklist::{Check, CheckStatus, ScoreCard};
pub use readability::ReadabilityReport;

/// Text fields of a post under analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentInput {
    pub title: String,
    pub meta_description: String,
    pub body: String,
    pub keywords: Vec<String>,
    pub excerpt: String,
}

impl ContentInput {
    /// Non-blank keywords in order; the first is the focus keyword.
    pub fn focus_keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }

    /// Everything a reader sees, for voice checks.
    pub fn visible_text(&self) -> String {
        [self.title.as_str(), self.excerpt.as_str(), self.body.as_str()]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalysis {
    pub seo: ScoreCard,
    pub readability: ReadabilityReport,
    pub brand_voice: ScoreCard,
    pub overall: u8,
}

impl ContentAnalysis {
    pub fn new(seo: ScoreCard, readability: ReadabilityReport, brand_voice: ScoreCard) -> Self {
        let overall = overall_score(seo.score, readability.card.score, brand_voice.score);
        Self {
            seo,
            readability,
            brand_voice,
            overall,
        }
    }
}

/// Weighted blend: 50% SEO, 30% readability, 20% brand voice.
pub fn overall_score(seo: u8, readability: u8, brand_voice: u8) -> u8 {
    let weighted = 50 * seo as u32 + 30 * readability as u32 + 20 * brand_voice as u32;
    ((weighted + 50) / 100).min(100) as u8
}

/// Run every analyser sequentially.
pub fn analyze_content(input: &ContentInput) -> ContentAnalysis {
    ContentAnalysis::new(
        seo::analyze(input),
        readability::analyze(&input.body),
        brand_voice::analyze(&input.visible_text()),
    )
}
