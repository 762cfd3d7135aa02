//! Weighting and grading for documentation quality.
//!
//! Combines the four sub-scores (each 0-100) into an overall score and maps
//! it to a grade.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer percentage weights for each sub-score.
pub mod weights {
    pub const KEYWORD_OVERLAP: u32 = 35;
    pub const COVERAGE: u32 = 30;
    pub const LENGTH: u32 = 15;
    pub const CONSISTENCY: u32 = 20;

    pub const TOTAL: u32 = 100;

    const _: () = assert!(KEYWORD_OVERLAP + COVERAGE + LENGTH + CONSISTENCY == TOTAL);
}

/// Grade thresholds (minimum overall score for each grade).
pub mod grades {
    pub const EXCELLENT_MIN: f64 = 85.0;
    pub const GOOD_MIN: f64 = 70.0;
    pub const FAIR_MIN: f64 = 55.0;
}

/// Overall quality grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Grade {
    /// Determine the grade from an overall score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= grades::EXCELLENT_MIN => Grade::Excellent,
            s if s >= grades::GOOD_MIN => Grade::Good,
            s if s >= grades::FAIR_MIN => Grade::Fair,
            _ => Grade::NeedsImprovement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Fair => "Fair",
            Grade::NeedsImprovement => "Needs Improvement",
        }
    }

    /// One-line assessment shown next to the grade.
    pub fn summary(&self) -> &'static str {
        match self {
            Grade::Excellent => "documentation quality is outstanding",
            Grade::Good => "documentation quality is solid",
            Grade::Fair => "documentation quality is acceptable but has room for improvement",
            Grade::NeedsImprovement => "documentation quality requires significant enhancement",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Weighted overall score, rounded to one decimal.
///
/// `length` is the length contribution (0-100), not the raw ratio.
pub fn overall(keyword: f64, coverage: f64, length: f64, consistency: f64) -> f64 {
    let weighted = keyword * f64::from(weights::KEYWORD_OVERLAP)
        + coverage * f64::from(weights::COVERAGE)
        + length * f64::from(weights::LENGTH)
        + consistency * f64::from(weights::CONSISTENCY);
    round_to(weighted / f64::from(weights::TOTAL), 1)
}
