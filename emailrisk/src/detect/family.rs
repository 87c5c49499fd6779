// Pattern-family extractor: rolls the individual pattern detectors up
// into a single named family plus a tokenized base-structure string and
// its truncated hash, the same truncated-SHA-256-hex idiom
// `workers/fingerprint.rs::header_order_hash` uses for its composite
// hashes.

use sha2::{Digest, Sha256};

use crate::detect::patterns::PatternSignals;
use crate::types::{PatternFamily, PatternFamilyKind};

const NAME_DENYLIST: &[&str] = &[
    "john", "jane", "mike", "chris", "smith", "james", "mary", "david", "lisa", "robert",
];

fn family_hash(base_structure: &str) -> String {
    let digest = Sha256::digest(base_structure.as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Token the local part into a dotted `NUM`/`NAME`/`WORD`/`SHORT`
/// skeleton, one token per `._-`-separated segment — e.g.
/// "john.doe" -> "NAME.NAME", "jsmith2024" -> "WORD" (no separator,
/// one segment), "a-1" -> "SHORT.NUM".
fn base_structure(local: &str) -> String {
    local
        .split(|c| c == '.' || c == '_' || c == '-')
        .filter(|segment| !segment.is_empty())
        .map(classify_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn classify_segment(segment: &str) -> &'static str {
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return "NUM";
    }
    let lower = segment.to_lowercase();
    if NAME_DENYLIST.contains(&lower.as_str()) {
        "NAME"
    } else if segment.len() <= 2 {
        "SHORT"
    } else {
        "WORD"
    }
}

/// Maps a `dated::DatedResult` shape name to the family-string date
/// token it stands for.
fn date_token(shape: Option<&'static str>) -> &'static str {
    match shape {
        Some("full_date") => "DATE",
        Some("month_year") => "MONTH-YEAR",
        Some("year4") => "YEAR",
        Some("year2") => "YY",
        _ => "DATE",
    }
}

/// Char-class diversity: fraction of distinct characters over length.
/// A "random-looking" local part is long, diverse, and mixes letters
/// with digits rather than reading as a word-plus-suffix.
fn char_class_diversity(local: &str) -> f64 {
    if local.is_empty() {
        return 0.0;
    }
    let distinct: std::collections::HashSet<char> = local.chars().collect();
    distinct.len() as f64 / local.chars().count() as f64
}

fn is_random_looking(local: &str) -> bool {
    let has_letter = local.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = local.chars().any(|c| c.is_ascii_digit());
    local.chars().count() >= 8 && char_class_diversity(local) > 0.7 && has_letter && has_digit
}

/// Extracts the pattern family: a type tag, a tokenized base-structure
/// skeleton, and the full family string (`<baseStructure>` wrapped per
/// the priority rule that fired, suffixed `@<domain>`) whose hash is
/// the family's cross-request identity.
pub fn extract(stripped_local: &str, patterns: &PatternSignals, domain: &str) -> PatternFamily {
    let structure = base_structure(stripped_local);

    let (kind, confidence, family_string) = if patterns.dated_hit && patterns.dated_confidence >= 0.6 {
        let token = date_token(patterns.dated_shape);
        (PatternFamilyKind::Dated, patterns.dated_confidence, format!("{structure}.{token}@{domain}"))
    } else if patterns.sequential_hit && patterns.sequential_confidence >= 0.5 {
        (PatternFamilyKind::Sequential, patterns.sequential_confidence, format!("{structure}.NUM@{domain}"))
    } else if patterns.plus_tag_present {
        let confidence = if patterns.plus_tag_suspicious { 0.7 } else { 0.5 };
        (PatternFamilyKind::PlusTagged, confidence, format!("{structure}+TAG@{domain}"))
    } else if is_random_looking(stripped_local) {
        (PatternFamilyKind::RandomLooking, 0.6, format!("RANDOM@{domain}"))
    } else if stripped_local.chars().any(|c| "._-".contains(c)) {
        (PatternFamilyKind::Formatted, 0.35, format!("{structure}@{domain}"))
    } else {
        (PatternFamilyKind::Simple, 0.3, format!("{structure}@{domain}"))
    };

    PatternFamily {
        kind,
        family_hash: family_hash(&family_string),
        base_structure: structure,
        family_string,
        confidence,
    }
}

/// Roll-up risk score for the extracted family: a type-dependent base
/// in `[0.05, 0.4]`, plus a confidence contribution, plus uplifts for
/// risky domains, clamped to `[0, 1]`.
pub fn pattern_risk_score(
    family: &PatternFamily,
    patterns: &PatternSignals,
    is_free_provider: bool,
    is_disposable: bool,
) -> f64 {
    let base = match family.kind {
        PatternFamilyKind::Dated => 0.35,
        PatternFamilyKind::Sequential => 0.40,
        PatternFamilyKind::PlusTagged => {
            if patterns.plus_tag_suspicious {
                0.30
            } else {
                0.10
            }
        }
        PatternFamilyKind::RandomLooking => 0.40,
        PatternFamilyKind::Formatted => 0.20,
        PatternFamilyKind::Simple => 0.05,
    };

    let mut score = base + family.confidence * 0.3;

    if is_free_provider && matches!(family.kind, PatternFamilyKind::Sequential | PatternFamilyKind::Dated) {
        score += 0.2;
    }
    if is_disposable {
        score += 0.4;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::patterns;

    #[test]
    fn tokenizes_dot_separated_skeleton() {
        assert_eq!(base_structure("john.2024"), "NAME.NUM");
    }

    #[test]
    fn single_segment_without_separator_is_one_token() {
        assert_eq!(base_structure("jsmith2024"), "WORD");
    }

    #[test]
    fn classifies_denylisted_name() {
        assert_eq!(base_structure("john"), "NAME");
    }

    #[test]
    fn dated_pattern_wins_priority() {
        let signals = patterns::run_all("jsmith2024");
        let family = extract(&signals.stripped_local, &signals, "example.com");
        assert_eq!(family.kind, PatternFamilyKind::Dated);
    }

    #[test]
    fn family_string_carries_domain_suffix() {
        let signals = patterns::run_all("jsmith2024");
        let family = extract(&signals.stripped_local, &signals, "example.com");
        assert!(family.family_string.ends_with("@example.com"));
    }

    #[test]
    fn same_structure_yields_same_hash() {
        let a = family_hash("WORD.NUM@example.com");
        let b = family_hash("WORD.NUM@example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn disposable_domain_uplifts_pattern_risk() {
        let signals = patterns::run_all("user123");
        let family = extract(&signals.stripped_local, &signals, "mailinator.com");
        let plain = pattern_risk_score(&family, &signals, false, false);
        let disposable = pattern_risk_score(&family, &signals, false, true);
        assert!(disposable > plain);
    }
}
