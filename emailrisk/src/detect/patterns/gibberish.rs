// N-gram gibberish detector. Scores how far a local-part's bigram/
// trigram distribution sits from common-English letter-pair frequency,
// using small compiled-in frequency sets rather than pulling in an
// external language-model dependency.

use std::collections::HashSet;
use std::sync::OnceLock;

// A compact set of the most frequent English bigrams/trigrams — not
// exhaustive, just enough to separate plausible names from random
// strings, the same "small compiled-in table" approach the teacher
// uses for its reference header orderings.
const COMMON_BIGRAMS: &[&str] = &[
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or", "te", "of",
    "ed", "is", "it", "al", "ar", "st", "to", "nt", "ng", "se", "ha", "as", "ou", "io", "le",
];

const COMMON_TRIGRAMS: &[&str] = &[
    "the", "and", "ing", "ion", "ent", "her", "for", "tha", "ter", "est", "ers", "ati", "hat",
    "ate", "all", "eth", "hes", "ver", "his", "ith",
];

const NAME_ALLOWLIST_PATTERNS: &[&str] = &["john", "jane", "mike", "chris", "smith", "lee", "kim"];

fn bigram_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| COMMON_BIGRAMS.iter().copied().collect())
}

fn trigram_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| COMMON_TRIGRAMS.iter().copied().collect())
}

#[derive(Debug, Clone, Default)]
pub struct GibberishResult {
    pub overall: f64,
    pub confidence: f64,
    pub bigram_score: f64,
    pub trigram_score: f64,
}

fn ngrams(s: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if chars.len() < n {
        return Vec::new();
    }
    (0..=chars.len() - n).map(|i| chars[i..i + n].iter().collect()).collect()
}

/// Fraction of n-grams that ARE common English pairs/triples — a
/// naturalness ratio, not a gibberish ratio: higher means more
/// plausibly a real word.
fn matched_ratio(grams: &[String], common: &HashSet<&'static str>) -> f64 {
    if grams.is_empty() {
        return 0.0;
    }
    let matched = grams.iter().filter(|g| common.contains(g.as_str())).count();
    matched as f64 / grams.len() as f64
}

pub fn analyze(local: &str) -> GibberishResult {
    let lower = local.to_lowercase();

    let bigrams = ngrams(&lower, 2);
    let trigrams = ngrams(&lower, 3);

    let bigram_score = matched_ratio(&bigrams, bigram_set());
    let trigram_score = matched_ratio(&trigrams, trigram_set());
    let mut overall = 0.6 * bigram_score + 0.4 * trigram_score;

    if NAME_ALLOWLIST_PATTERNS.iter().any(|p| lower.contains(p)) {
        overall = (overall + (1.0 - overall) * 0.5).min(1.0);
    }

    let total_ngrams = bigrams.len() + trigrams.len();
    let confidence = (total_ngrams as f64 / 10.0).min(1.0);

    GibberishResult { overall, confidence, bigram_score, trigram_score }
}

/// `overall` is a naturalness score; a local part is natural (not
/// gibberish) once it clears a length-dependent threshold — short
/// local-parts need a stronger naturalness signal since they have
/// fewer n-grams to be right about.
pub fn is_natural(local: &str, result: &GibberishResult) -> bool {
    let threshold = if local.len() < 5 { 0.30 } else { 0.40 };
    result.overall > threshold
}

pub fn is_gibberish(local: &str, result: &GibberishResult) -> bool {
    !is_natural(local, result)
}

/// Risk translator: the gibberish-ness of the string, not its
/// naturalness, scaled by how much n-gram evidence backs the score.
pub fn detector_risk(result: &GibberishResult) -> f64 {
    (1.0 - result.overall) * result.confidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_name_scores_high_naturalness() {
        let result = analyze("johnsmith");
        assert!(result.overall > 0.40);
    }

    #[test]
    fn random_string_scores_lower_naturalness() {
        let name = analyze("johnsmith");
        let random = analyze("xzqvkpwj");
        assert!(random.overall < name.overall);
    }

    #[test]
    fn random_string_is_gibberish_and_common_name_is_not() {
        assert!(is_gibberish("xzqvkpwj", &analyze("xzqvkpwj")));
        assert!(!is_gibberish("johnsmith", &analyze("johnsmith")));
    }

    #[test]
    fn allowlisted_name_pattern_raises_naturalness() {
        let with_name = analyze("zzqvchris");
        let raw = 0.6 * with_name.bigram_score + 0.4 * with_name.trigram_score;
        assert!(with_name.overall >= raw);
    }
}
