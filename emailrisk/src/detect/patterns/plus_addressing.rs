// Plus-addressing / sub-addressing detector: strips a `+tag` suffix
// (and Gmail's dot-insensitivity) to recover the base local-part used
// by every other pattern detector, and separately flags suspicious
// tags (numeric-only, or present in a small denylist of known
// bulk-signup tag vocabularies).

const SUSPICIOUS_TAGS: &[&str] = &["test", "spam", "bot", "signup", "promo", "temp"];

#[derive(Debug, Clone)]
pub struct PlusResult {
    pub tag_present: bool,
    pub suspicious_tag: bool,
    pub tag: Option<String>,
    pub stripped_local: String,
}

pub fn analyze(local: &str) -> PlusResult {
    let (base, tag) = match local.split_once('+') {
        Some((base, tag)) => (base.to_string(), Some(tag.to_string())),
        None => (local.to_string(), None),
    };

    // Gmail ignores dots in the local part — strip them from the base
    // so "j.smith" and "jsmith" normalise to the same family.
    let stripped_local = base.replace('.', "");

    let suspicious_tag = tag.as_deref().map(is_suspicious).unwrap_or(false);

    PlusResult { tag_present: tag.is_some(), suspicious_tag, tag, stripped_local }
}

fn is_suspicious(tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }
    if tag.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = tag.to_lowercase();
    SUSPICIOUS_TAGS.iter().any(|t| lower.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plus_tag() {
        let result = analyze("jsmith+newsletter");
        assert!(result.tag_present);
        assert_eq!(result.stripped_local, "jsmith");
    }

    #[test]
    fn strips_gmail_dots() {
        let result = analyze("j.s.mith");
        assert_eq!(result.stripped_local, "jsmith");
    }

    #[test]
    fn flags_numeric_tag_as_suspicious() {
        let result = analyze("jsmith+12345");
        assert!(result.suspicious_tag);
    }

    #[test]
    fn flags_denylisted_tag() {
        let result = analyze("jsmith+signup1");
        assert!(result.suspicious_tag);
    }

    #[test]
    fn no_tag_present_for_plain_address() {
        let result = analyze("jsmith");
        assert!(!result.tag_present);
        assert!(!result.suspicious_tag);
    }
}
