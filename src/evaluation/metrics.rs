//! Word counts, the length curve and marker-based consistency.

use lazy_static::lazy_static;
use regex::Regex;

/// Closed band of length ratios that earns the full length contribution.
pub const BALANCED_RATIO: (f64, f64) = (0.8, 1.2);

/// Points lost for each missing marker category.
pub mod penalties {
    pub const MISSING_PARAM: u32 = 20;
    pub const MISSING_RETURNS: u32 = 10;
    pub const MISSING_EXAMPLE: u32 = 10;
}

lazy_static! {
    static ref PARAM_MARKER: Regex = Regex::new(r"(?i)@(?:param|arg|argument)\b").unwrap();
    static ref RETURNS_MARKER: Regex = Regex::new(r"(?i)@returns?\b").unwrap();
    static ref EXAMPLE_MARKER: Regex = Regex::new(r"(?i)@example\b").unwrap();
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `generated / reference` word counts. A wordless reference gives 1.
pub fn length_ratio(generated_words: usize, reference_words: usize) -> f64 {
    if reference_words == 0 {
        return 1.0;
    }
    generated_words as f64 / reference_words as f64
}

/// Whether a ratio falls inside [`BALANCED_RATIO`].
pub fn is_balanced(ratio: f64) -> bool {
    (BALANCED_RATIO.0..=BALANCED_RATIO.1).contains(&ratio)
}

/// Map a length ratio to its 0-100 contribution to the overall score.
pub fn length_contribution(ratio: f64) -> f64 {
    if is_balanced(ratio) {
        100.0
    } else {
        (100.0 - 50.0 * (1.0 - ratio).abs()).max(0.0)
    }
}

/// Which marker categories a text contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub param: bool,
    pub returns: bool,
    pub example: bool,
}

impl Markers {
    pub fn scan(text: &str) -> Self {
        Self {
            param: PARAM_MARKER.is_match(text),
            returns: RETURNS_MARKER.is_match(text),
            example: EXAMPLE_MARKER.is_match(text),
        }
    }

    /// Total penalty for the missing categories.
    pub fn penalty(&self) -> u32 {
        let mut penalty = 0;
        if !self.param {
            penalty += penalties::MISSING_PARAM;
        }
        if !self.returns {
            penalty += penalties::MISSING_RETURNS;
        }
        if !self.example {
            penalty += penalties::MISSING_EXAMPLE;
        }
        penalty
    }

    /// 100 minus the penalty, floored at 0.
    pub fn score(&self) -> f64 {
        f64::from(100u32.saturating_sub(self.penalty()))
    }
}

/// Coverage percentage. No documentable functions means full coverage.
pub fn coverage_score(total: usize, documented: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    documented.min(total) as f64 / total as f64 * 100.0
}
