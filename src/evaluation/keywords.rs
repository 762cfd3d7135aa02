//! Keyword extraction and set similarity.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Tokens of this many characters or fewer are dropped.
pub const MIN_TOKEN_CHARS: usize = 3;

lazy_static! {
    /// Anything that is neither a letter, a digit nor whitespace.
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}\s]").unwrap();
}

/// Lower-cased keywords of `text`: punctuation becomes whitespace, split on
/// whitespace, short tokens dropped.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Jaccard index |A∩B| / |A∪B|. Two empty sets score 0.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_drops_short_and_punctuation() {
        let keywords = extract_keywords("Adds two numbers, returning the SUM!");
        assert_eq!(keywords, set(&["adds", "numbers", "returning"]));
    }

    #[test]
    fn test_extract_splits_on_punctuation() {
        let keywords = extract_keywords("@param first-second");
        assert_eq!(keywords, set(&["param", "first", "second"]));

        // "key" is too short once split out of the call
        let keywords = extract_keywords("cache-lookup user.name getValue(key)");
        assert_eq!(keywords, set(&["cache", "lookup", "user", "name", "getvalue"]));
    }

    #[test]
    fn test_extract_unicode_letters() {
        let keywords = extract_keywords("Größe überprüfen");
        assert_eq!(keywords, set(&["größe", "überprüfen"]));
    }

    #[test]
    fn test_jaccard_bounds() {
        let a = set(&["fast", "lookup", "cache"]);
        let b = set(&["fast", "lookup", "index"]);
        let score = jaccard(&a, &b);
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, 0.5);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_empty() {
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
        assert_eq!(jaccard(&set(&["word"]), &BTreeSet::new()), 0.0);
    }
}
