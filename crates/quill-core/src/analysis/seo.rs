//! Search-engine checklist for a post.

use super::ContentInput;
use super::checklist::{Check, CheckStatus, ScoreCard, band};
use super::text::{char_len, contains_phrase, heading_count};

pub fn analyze(input: &ContentInput) -> ScoreCard {
    let mut checks = vec![
        length_check(
            "title_length",
            "Title length",
            20,
            char_len(&input.title),
            (50, 60),
            (30, 70),
        ),
        length_check(
            "meta_description_length",
            "Meta description length",
            20,
            char_len(&input.meta_description),
            (150, 160),
            (120, 170),
        ),
        length_check(
            "content_length",
            "Content length",
            20,
            char_len(&input.body),
            (1000, usize::MAX),
            (500, usize::MAX),
        ),
        keyword_count_check(input),
        length_check(
            "excerpt_length",
            "Excerpt length",
            10,
            char_len(&input.excerpt),
            (120, 160),
            (50, 200),
        ),
    ];

    checks.extend(focus_keyword_checks(input));

    let headings = heading_count(&input.body);
    checks.push(if headings > 0 {
        Check::new(
            "subheadings",
            "Subheadings",
            5,
            CheckStatus::Good,
            format!("{headings} subheading(s) break up the content"),
        )
    } else {
        Check::new(
            "subheadings",
            "Subheadings",
            5,
            CheckStatus::Poor,
            "Add ## or ### subheadings to structure the content",
        )
    });

    ScoreCard::from_checks(checks)
}

fn length_check(
    id: &'static str,
    label: &'static str,
    weight: u32,
    len: usize,
    good: (usize, usize),
    warning: (usize, usize),
) -> Check {
    let status = band(len, good.0..=good.1, warning.0..=warning.1);
    let target = if good.1 == usize::MAX {
        format!("at least {}", good.0)
    } else {
        format!("{}-{}", good.0, good.1)
    };
    Check::new(
        id,
        label,
        weight,
        status,
        format!("{len} characters (aim for {target})"),
    )
}

fn keyword_count_check(input: &ContentInput) -> Check {
    let count = input.focus_keywords().count();
    Check::new(
        "keyword_count",
        "Keywords",
        10,
        band(count, 3..=8, 1..=12),
        format!("{count} keyword(s) (aim for 3-8)"),
    )
}

fn focus_keyword_checks(input: &ContentInput) -> [Check; 2] {
    let Some(focus) = input.focus_keywords().next() else {
        return [
            Check::new(
                "keyword_in_title",
                "Focus keyword in title",
                10,
                CheckStatus::Poor,
                "No focus keyword set",
            ),
            Check::new(
                "keyword_in_meta_description",
                "Focus keyword in meta description",
                5,
                CheckStatus::Poor,
                "No focus keyword set",
            ),
        ];
    };

    let in_title = if contains_phrase(&input.title, focus) {
        Check::new(
            "keyword_in_title",
            "Focus keyword in title",
            10,
            CheckStatus::Good,
            format!("Title mentions \"{focus}\""),
        )
    } else if contains_phrase(&input.body, focus) {
        Check::new(
            "keyword_in_title",
            "Focus keyword in title",
            10,
            CheckStatus::Warning,
            format!("\"{focus}\" appears in the content but not the title"),
        )
    } else {
        Check::new(
            "keyword_in_title",
            "Focus keyword in title",
            10,
            CheckStatus::Poor,
            format!("\"{focus}\" is missing from title and content"),
        )
    };

    let in_meta = if contains_phrase(&input.meta_description, focus) {
        Check::new(
            "keyword_in_meta_description",
            "Focus keyword in meta description",
            5,
            CheckStatus::Good,
            format!("Meta description mentions \"{focus}\""),
        )
    } else {
        Check::new(
            "keyword_in_meta_description",
            "Focus keyword in meta description",
            5,
            CheckStatus::Poor,
            format!("Mention \"{focus}\" in the meta description"),
        )
    };

    [in_title, in_meta]
}
