// Disposable email domain table: an exact-match set plus a regex set
// for morphological variants ("mailinator", "tempmail", "10minute",
// ...). Regex alternation is used here rather than Aho-Corasick
// (`workers/cot.rs`'s approach) because disposable-domain morphology
// needs real alternation/anchoring, not just literal substring
// matching.

use std::collections::HashSet;

use regex::RegexSet;
use tracing::warn;

const FALLBACK_DOMAINS: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "tempmail.com",
    "trashmail.com",
    "yopmail.com",
    "fakeinbox.com",
    "throwawaymail.com",
];

const FALLBACK_PATTERNS: &[&str] =
    &[r"temp.?mail", r"\d+min.?mail", r"trash.?mail", r"throwaway", r"guerrilla.?mail", r"yopmail"];

pub struct DisposableTable {
    exact: HashSet<String>,
    patterns: RegexSet,
}

impl DisposableTable {
    pub fn fallback() -> Self {
        Self::build(
            FALLBACK_DOMAINS.iter().map(|s| s.to_string()).collect(),
            FALLBACK_PATTERNS,
        )
    }

    fn build(exact: HashSet<String>, patterns: &[&str]) -> Self {
        let patterns = RegexSet::new(patterns).unwrap_or_else(|e| {
            warn!("disposable pattern set failed to compile ({e}), using empty set");
            RegexSet::empty()
        });
        Self { exact, patterns }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.exact.contains(domain)
    }

    pub fn matches_pattern(&self, domain: &str) -> bool {
        self.patterns.is_match(domain)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Fetch the newline-delimited, `#`-commented domain list named in
    /// the reference-data refresh source and parse it into a table,
    /// keeping the compiled-in pattern set (patterns evolve far more
    /// slowly than the exact-match list and are not part of the feed).
    pub async fn fetch(source_base: &str) -> Result<Self, String> {
        let url = format!("{source_base}/disposable-domains.txt");
        let body = reqwest::get(&url)
            .await
            .map_err(|e| e.to_string())?
            .text()
            .await
            .map_err(|e| e.to_string())?;

        let exact: HashSet<String> = body
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.to_lowercase())
            .collect();

        if exact.is_empty() {
            return Err("fetched disposable domain list was empty".into());
        }

        Ok(Self::build(exact, FALLBACK_PATTERNS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_non_empty() {
        assert!(!DisposableTable::fallback().is_empty());
    }

    #[test]
    fn matches_known_exact_domain() {
        assert!(DisposableTable::fallback().contains("mailinator.com"));
    }

    #[test]
    fn matches_morphological_pattern() {
        let table = DisposableTable::fallback();
        assert!(table.matches_pattern("my-tempmail-service.net"));
        assert!(!table.matches_pattern("gmail.com"));
    }
}
