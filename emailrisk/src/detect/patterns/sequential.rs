// Sequential local-part detector — digit runs, zero-padded runs, and
// single-letter suffixes (`user1`, `user007`, `userx`).

#[derive(Debug, Clone, Default)]
pub struct SequentialResult {
    pub hit: bool,
    pub confidence: f64,
    pub kind: Option<&'static str>,
}

fn trailing_digits(s: &str) -> &str {
    let cut = s.len() - s.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    &s[cut..]
}

pub fn analyze(local: &str) -> SequentialResult {
    let digits = trailing_digits(local);

    if digits.is_empty() {
        // Explicit-separator single-letter suffix: "user_a", "user.b" —
        // a bare word ending in a letter (e.g. "jsmith") is not enough
        // signal on its own, so this only fires on a clear separator.
        if let Some(last) = local.chars().last() {
            if last.is_ascii_alphabetic() {
                let rest = &local[..local.len() - 1];
                if let Some(sep) = rest.chars().last() {
                    if (sep == '_' || sep == '.' || sep == '-') && rest.len() >= 4 {
                        return SequentialResult {
                            hit: true,
                            confidence: 0.35,
                            kind: Some("letter_suffix"),
                        };
                    }
                }
            }
        }
        return SequentialResult::default();
    }

    let padded = digits.len() > 1 && digits.starts_with('0');
    let run_len = digits.len();

    let confidence = if padded {
        0.75
    } else if run_len >= 3 {
        0.65
    } else {
        0.45
    };

    SequentialResult {
        hit: true,
        confidence,
        kind: Some(if padded { "zero_padded_run" } else { "digit_run" }),
    }
}

pub fn detector_risk(result: &SequentialResult) -> f64 {
    if result.hit {
        result.confidence
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_zero_padded_run() {
        let result = analyze("user007");
        assert!(result.hit);
        assert_eq!(result.kind, Some("zero_padded_run"));
    }

    #[test]
    fn detects_plain_digit_run() {
        let result = analyze("user42");
        assert!(result.hit);
    }

    #[test]
    fn no_hit_on_plain_name() {
        let result = analyze("jsmith");
        assert!(!result.hit);
    }
}
