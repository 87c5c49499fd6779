// Pure format validation: RFC-5322-lite local-part grammar, length
// limits, and Shannon entropy of the local part.

use crate::types::NormalisedEmail;

#[derive(Debug, Clone)]
pub struct FormatResult {
    pub valid: bool,
    pub format_valid: bool,
    pub entropy_score: f64,
    pub local_part_length: usize,
    pub reason: Option<String>,
}

const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;

/// Splits on the last `@`. An empty local part or domain is preserved
/// rather than rejected here — `validate` is what turns that into a
/// `format_valid: false` result with a reason, so callers always get a
/// `ValidationResult` rather than a bare parse failure. Only a missing
/// `@` entirely yields `None`, since there is nothing to split on.
pub fn normalise(raw: &str) -> Option<NormalisedEmail> {
    let trimmed = raw.trim().to_lowercase();
    let at = trimmed.rfind('@')?;
    let (local, domain) = (trimmed[..at].to_string(), trimmed[at + 1..].to_string());
    Some(NormalisedEmail { local_part: local, domain })
}

const DOT_INSENSITIVE_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];

/// Canonical per-inbox identity: Gmail ignores dots in the local part
/// and everything from a `+` tag onward, so two different submitted
/// addresses can land in the same inbox. Used for dedup/rate-limiting
/// keys — never for detection, which wants the address as submitted
/// since dot-stuffing and tagging are themselves fraud signals.
pub fn canonical_identity(email: &NormalisedEmail) -> NormalisedEmail {
    if DOT_INSENSITIVE_DOMAINS.contains(&email.domain.as_str()) {
        let base = email.local_part.split('+').next().unwrap_or(&email.local_part);
        NormalisedEmail { local_part: base.replace('.', ""), domain: email.domain.clone() }
    } else {
        email.clone()
    }
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+-/=?^_`{|}~".contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Shannon entropy over the local part's character distribution,
/// normalised by `log2(max(2, |local|))` so short and long strings are
/// comparable on the same `[0, 1]` scale.
pub fn entropy_score(local: &str) -> f64 {
    if local.is_empty() {
        return 0.0;
    }
    let mut counts = std::collections::HashMap::new();
    for c in local.chars() {
        *counts.entry(c).or_insert(0u32) += 1;
    }
    let len = local.chars().count() as f64;
    let raw_entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum();

    let normaliser = (len.max(2.0)).log2();
    if normaliser <= 0.0 {
        0.0
    } else {
        (raw_entropy / normaliser).clamp(0.0, 1.0)
    }
}

pub fn validate(email: &NormalisedEmail) -> FormatResult {
    let local_len = email.local_part.len();

    if local_len > MAX_LOCAL_LEN {
        return FormatResult {
            valid: false,
            format_valid: false,
            entropy_score: 0.0,
            local_part_length: local_len,
            reason: Some("local_part_too_long".into()),
        };
    }
    if email.domain.len() > MAX_DOMAIN_LEN {
        return FormatResult {
            valid: false,
            format_valid: false,
            entropy_score: 0.0,
            local_part_length: local_len,
            reason: Some("domain_too_long".into()),
        };
    }
    if !is_valid_local_part(&email.local_part) {
        return FormatResult {
            valid: false,
            format_valid: false,
            entropy_score: 0.0,
            local_part_length: local_len,
            reason: Some("invalid_local_part_grammar".into()),
        };
    }
    if !is_valid_domain(&email.domain) {
        return FormatResult {
            valid: false,
            format_valid: false,
            entropy_score: 0.0,
            local_part_length: local_len,
            reason: Some("invalid_domain_grammar".into()),
        };
    }

    FormatResult {
        valid: true,
        format_valid: true,
        entropy_score: entropy_score(&email.local_part),
        local_part_length: local_len,
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_at() {
        assert!(normalise("nodomain.com").is_none());
    }

    #[test]
    fn rejects_empty_local_part() {
        let email = normalise("@example.com").unwrap();
        assert!(!validate(&email).valid);
    }

    #[test]
    fn rejects_local_part_over_64_chars() {
        let local = "a".repeat(65);
        let email = NormalisedEmail { local_part: local, domain: "example.com".into() };
        let result = validate(&email);
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("local_part_too_long"));
    }

    #[test]
    fn rejects_domain_over_255_chars() {
        let domain = format!("{}.com", "a".repeat(260));
        let email = NormalisedEmail { local_part: "user".into(), domain };
        let result = validate(&email);
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("domain_too_long"));
    }

    #[test]
    fn accepts_plain_address() {
        let email = normalise("John.Doe@Example.com").unwrap();
        assert_eq!(email.local_part, "john.doe");
        assert_eq!(email.domain, "example.com");
        let result = validate(&email);
        assert!(result.valid);
    }

    #[test]
    fn high_entropy_local_part_scores_high() {
        let email = NormalisedEmail { local_part: "x7q2kz9wvp".into(), domain: "example.com".into() };
        let result = validate(&email);
        assert!(result.entropy_score > 0.7);
    }

    #[test]
    fn gmail_dot_and_plus_tag_share_canonical_identity() {
        let a = canonical_identity(&normalise("a.b+tag@gmail.com").unwrap());
        let b = canonical_identity(&normalise("ab@gmail.com").unwrap());
        assert_eq!(a.local_part, b.local_part);
        assert_eq!(a.domain, b.domain);
    }

    #[test]
    fn non_gmail_domain_keeps_dots_and_tag() {
        let email = normalise("a.b+tag@outlook.com").unwrap();
        let canonical = canonical_identity(&email);
        assert_eq!(canonical.local_part, "a.b+tag");
    }
}
