// Domain classification — reputation scoring in the additive,
// evidence-string style of `workers/fingerprint.rs`.

use crate::reference::ReferenceData;
use crate::types::TldProfile;

#[derive(Debug, Clone)]
pub struct DomainResult {
    pub is_disposable: bool,
    pub is_free_provider: bool,
    pub matches_disposable_pattern: bool,
    pub subdomain_depth: u32,
    pub has_valid_tld: bool,
    pub reputation_score: f64,
    pub tld_profile: TldProfile,
    pub evidence: Vec<String>,
}

const EXCESSIVE_LENGTH: usize = 40;
const VOWELS: &str = "aeiou";

fn subdomain_depth(domain: &str) -> u32 {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len().saturating_sub(2) as u32
}

fn is_consonant_only(label: &str) -> bool {
    label.len() >= 5 && label.chars().all(|c| c.is_ascii_alphabetic() && !VOWELS.contains(c.to_ascii_lowercase()))
}

/// Count of suspicious domain-shape heuristics triggered: excessive
/// overall length, more than 3 subdomains, an all-numeric label, a
/// label shorter than 3 characters, more than 3 hyphens, or a
/// consonant-only label of 5+ characters.
fn suspicious_heuristics(domain: &str, depth: u32, evidence: &mut Vec<String>) -> u32 {
    let mut count = 0u32;
    let labels: Vec<&str> = domain.split('.').collect();

    if domain.len() > EXCESSIVE_LENGTH {
        count += 1;
        evidence.push("excessive_length".to_string());
    }
    if depth > 3 {
        count += 1;
        evidence.push("excessive_subdomains".to_string());
    }
    if labels.iter().any(|l| !l.is_empty() && l.chars().all(|c| c.is_ascii_digit())) {
        count += 1;
        evidence.push("all_numeric_label".to_string());
    }
    if labels.iter().any(|l| !l.is_empty() && l.len() < 3) {
        count += 1;
        evidence.push("short_label".to_string());
    }
    if domain.matches('-').count() > 3 {
        count += 1;
        evidence.push("excessive_hyphens".to_string());
    }
    if labels.iter().any(|l| is_consonant_only(l)) {
        count += 1;
        evidence.push("consonant_only_label".to_string());
    }

    count
}

/// `check_disposable` gates the `enable_disposable_check` feature flag:
/// when false, the disposable/disposable-pattern lookups are skipped
/// entirely and the domain is treated as not disposable for scoring.
pub fn classify(domain: &str, reference: &ReferenceData, check_disposable: bool) -> DomainResult {
    let is_disposable = check_disposable && reference.is_disposable(domain);
    let matches_pattern = check_disposable && reference.matches_disposable_pattern(domain);
    let is_free = reference.is_free_provider(domain);
    let tld_profile = reference.tld_profile(domain);
    let depth = subdomain_depth(domain);
    let has_valid_tld = tld_profile.category != "unknown";

    let mut score = 0.0f64;
    let mut evidence = Vec::new();

    if is_disposable {
        score += 0.9;
        evidence.push("exact_disposable_match".to_string());
    } else if matches_pattern {
        score += 0.3;
        evidence.push("disposable_pattern_match".to_string());
    }

    let heuristic_count = suspicious_heuristics(domain, depth, &mut evidence);
    score += 0.1 * heuristic_count as f64;

    if depth > 2 {
        let extra = (depth - 2) as f64;
        score += 0.1 * extra;
        evidence.push(format!("deep_subdomain:{depth}"));
    }

    DomainResult {
        is_disposable,
        is_free_provider: is_free,
        matches_disposable_pattern: matches_pattern,
        subdomain_depth: depth,
        has_valid_tld,
        reputation_score: score.clamp(0.0, 1.0),
        tld_profile,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposable_domain_scores_high() {
        let reference = ReferenceData::default();
        let result = classify("mailinator.com", &reference, true);
        assert!(result.is_disposable);
        assert!(result.reputation_score >= 0.9);
    }

    #[test]
    fn reputable_domain_scores_low() {
        let reference = ReferenceData::default();
        let result = classify("example.com", &reference, true);
        assert!(result.reputation_score < 0.3);
    }

    #[test]
    fn deep_subdomain_adds_risk() {
        let reference = ReferenceData::default();
        let shallow = classify("example.com", &reference, true);
        let deep = classify("a.b.c.d.example.com", &reference, true);
        assert!(deep.reputation_score > shallow.reputation_score);
    }

    #[test]
    fn disabled_check_never_flags_disposable() {
        let reference = ReferenceData::default();
        let result = classify("mailinator.com", &reference, false);
        assert!(!result.is_disposable);
    }
}
