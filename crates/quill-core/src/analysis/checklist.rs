//! Weighted checklist scoring shared by every analyser.

use std::ops::RangeInclusive;

use serde::Serialize;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Poor,
    Warning,
    Good,
}

impl CheckStatus {
    /// Points earned in halves of the check weight.
    fn halves(self) -> u32 {
        match self {
            CheckStatus::Good => 2,
            CheckStatus::Warning => 1,
            CheckStatus::Poor => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub id: &'static str,
    pub label: &'static str,
    pub status: CheckStatus,
    pub weight: u32,
    pub message: String,
}

impl Check {
    pub fn new(
        id: &'static str,
        label: &'static str,
        weight: u32,
        status: CheckStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            label,
            status,
            weight,
            message: message.into(),
        }
    }
}

/// A 0-100 score together with the checks that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub score: u8,
    pub checks: Vec<Check>,
}

impl ScoreCard {
    pub fn from_checks(checks: Vec<Check>) -> Self {
        let max: u32 = checks.iter().map(|c| c.weight * 2).sum();
        let earned: u32 = checks.iter().map(|c| c.weight * c.status.halves()).sum();
        let score = if max == 0 {
            0
        } else {
            ((earned * 100 + max / 2) / max).min(100) as u8
        };
        Self { score, checks }
    }

    pub fn check(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }

    pub fn status_of(&self, id: &str) -> Option<CheckStatus> {
        self.check(id).map(|c| c.status)
    }
}

/// Classify `value` against a good range nested inside a warning range.
pub fn band(
    value: usize,
    good: RangeInclusive<usize>,
    warning: RangeInclusive<usize>,
) -> CheckStatus {
    if good.contains(&value) {
        CheckStatus::Good
    } else if warning.contains(&value) {
        CheckStatus::Warning
    } else {
        CheckStatus::Poor
    }
}

/// Classify a value where lower is better.
pub fn at_most(value: f64, good: f64, warning: f64) -> CheckStatus {
    if value <= good {
        CheckStatus::Good
    } else if value <= warning {
        CheckStatus::Warning
    } else {
        CheckStatus::Poor
    }
}

/// Classify a value where higher is better.
pub fn at_least(value: f64, good: f64, warning: f64) -> CheckStatus {
    if value >= good {
        CheckStatus::Good
    } else if value >= warning {
        CheckStatus::Warning
    } else {
        CheckStatus::Poor
    }
}
