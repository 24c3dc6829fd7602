//! Brand voice checklist: plain, customer-focused, calm.

use once_cell::sync::Lazy;
use regex::Regex;

use super::checklist::{Check, CheckStatus, ScoreCard, at_least, band};
use super::text::word_count;

static JARGON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(synerg(y|ies|istic)|leverag(e|es|ed|ing)|disrupt(ive|ion)?|paradigm|best-in-class|cutting-edge|bleeding-edge|world-class|game-changer|next-gen|thought leader(ship)?)\b",
    )
    .expect("jargon regex")
});
static YOU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(you|your|yours|yourself)\b").expect("you regex"));
static WE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(we|our|ours|us)\b").expect("we regex"));
static SHOUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{4,}\b").expect("shout regex"));
static HEDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(maybe|perhaps|might|possibly|somewhat|probably|arguably)\b")
        .expect("hedge regex")
});

pub fn analyze(text: &str) -> ScoreCard {
    let words = word_count(text);
    if words == 0 {
        return ScoreCard::from_checks(
            [
                ("jargon", "Jargon", 30),
                ("customer_focus", "Customer focus", 25),
                ("exclamations", "Exclamation marks", 15),
                ("shouting", "All-caps words", 15),
                ("hedging", "Hedging", 15),
            ]
            .into_iter()
            .map(|(id, label, weight)| {
                Check::new(id, label, weight, CheckStatus::Poor, "No content")
            })
            .collect(),
        );
    }

    let jargon: Vec<&str> = JARGON_RE.find_iter(text).map(|m| m.as_str()).collect();
    let you = YOU_RE.find_iter(text).count();
    let we = WE_RE.find_iter(text).count();
    let exclamations = text.matches('!').count();
    let shouting = SHOUT_RE.find_iter(text).count();
    let hedges_per_100 = HEDGE_RE.find_iter(text).count() as f64 * 100.0 / words as f64;

    let jargon_check = Check::new(
        "jargon",
        "Jargon",
        30,
        band(jargon.len(), 0..=0, 1..=2),
        if jargon.is_empty() {
            "No buzzwords".to_string()
        } else {
            format!("Replace buzzwords: {}", jargon.join(", "))
        },
    );

    let focus_check = match (you, we) {
        (0, 0) => Check::new(
            "customer_focus",
            "Customer focus",
            25,
            CheckStatus::Warning,
            "Speak to the reader directly with \"you\"",
        ),
        (you, 0) => Check::new(
            "customer_focus",
            "Customer focus",
            25,
            CheckStatus::Good,
            format!("{you} reader-directed pronouns"),
        ),
        (you, we) => {
            let ratio = you as f64 / we as f64;
            Check::new(
                "customer_focus",
                "Customer focus",
                25,
                at_least(ratio, 1.0, 0.5),
                format!("{you} \"you\" for every {we} \"we\" (aim for at least 1:1)"),
            )
        }
    };

    let checks = vec![
        jargon_check,
        focus_check,
        Check::new(
            "exclamations",
            "Exclamation marks",
            15,
            band(exclamations, 0..=1, 2..=3),
            format!("{exclamations} exclamation mark(s)"),
        ),
        Check::new(
            "shouting",
            "All-caps words",
            15,
            band(shouting, 0..=0, 1..=2),
            format!("{shouting} all-caps word(s)"),
        ),
        Check::new(
            "hedging",
            "Hedging",
            15,
            hedging_status(hedges_per_100),
            format!("{hedges_per_100:.1} hedging words per 100 words"),
        ),
    ];

    ScoreCard::from_checks(checks)
}

fn hedging_status(per_100: f64) -> CheckStatus {
    if per_100 < 1.0 {
        CheckStatus::Good
    } else if per_100 < 2.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_customer_copy_scores_full() {
        let card = analyze(
            "You get a backend that stays fast as your traffic grows. \
             We measure it, and you see the numbers every week.",
        );
        assert_eq!(card.score, 100);
    }

    #[test]
    fn test_jargon_and_shouting_lower_the_score() {
        let card = analyze(
            "We leverage synergy to DISRUPT the paradigm with BEST results! \
             Truly AMAZING! Our world-class team!",
        );
        assert_eq!(card.status_of("jargon"), Some(CheckStatus::Poor));
        assert_eq!(card.status_of("shouting"), Some(CheckStatus::Poor));
        assert_eq!(card.status_of("exclamations"), Some(CheckStatus::Warning));
        assert_eq!(card.status_of("customer_focus"), Some(CheckStatus::Poor));
        assert!(card.score < 30);
    }

    #[test]
    fn test_hedging_density() {
        let text = format!("Maybe it works. {}", "plain ".repeat(60));
        assert_eq!(analyze(&text).status_of("hedging"), Some(CheckStatus::Warning));
        assert_eq!(
            analyze("Perhaps this might possibly help.").status_of("hedging"),
            Some(CheckStatus::Poor)
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(analyze("").score, 0);
    }

    /// Four sentences of equal length, `buzzwords` of them carrying jargon.
    fn copy_with_jargon(buzzwords: usize) -> String {
        (0..4)
            .map(|i| {
                let adjective = if i < buzzwords { "synergistic" } else { "simple" };
                format!("You get {adjective} tools for your work.")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_less_jargon_never_lowers_score() {
        let poor = analyze(&copy_with_jargon(3));
        let warning = analyze(&copy_with_jargon(1));
        let good = analyze(&copy_with_jargon(0));

        assert_eq!(poor.status_of("jargon"), Some(CheckStatus::Poor));
        assert_eq!(warning.status_of("jargon"), Some(CheckStatus::Warning));
        assert_eq!(good.status_of("jargon"), Some(CheckStatus::Good));

        assert!(poor.score <= warning.score && warning.score <= good.score);
        assert!(poor.score < good.score);
        assert_eq!(good.score, 100);
    }
}
