// Hybrid risk aggregation.
//
// Generalizes `engine/fusion.rs::fuse()`'s "ordered overrides, then a
// weighted combine, then tiering" shape from glasswally's pure
// weighted-sum across 10 detectors to this spec's hybrid rule: domain
// signals are additive (reputation + TLD both contribute independently)
// while local-part signals take the *strongest* single signal rather
// than summing — a local part that is both high-entropy and a known
// bad pattern shouldn't be double-counted the way two independent
// domain-side weaknesses legitimately should.

use crate::config::Configuration;
use crate::detect::domain::DomainResult;
use crate::detect::format::FormatResult;
use crate::detect::patterns::PatternSignals;
use crate::markov::{self, EnsembleResult};
use crate::types::{Decision, RiskAssessment, SignalMap};

pub struct AggregatorInput<'a> {
    pub format: &'a FormatResult,
    pub domain: &'a DomainResult,
    pub patterns: &'a PatternSignals,
    pub pattern_risk_score: f64,
    pub markov: &'a EnsembleResult,
}

pub fn aggregate(input: &AggregatorInput, config: &Configuration) -> (RiskAssessment, SignalMap) {
    let mut signals = SignalMap::new();
    signals.insert("entropy_score".into(), input.format.entropy_score);
    signals.insert("reputation_score".into(), input.domain.reputation_score);
    signals.insert("tld_risk_score".into(), input.domain.tld_profile.multiplier);
    signals.insert("pattern_risk_score".into(), input.pattern_risk_score);
    signals.insert("markov_confidence".into(), input.markov.confidence);
    signals.insert("markov_risk".into(), markov::detector_risk(input.markov));

    // Fast paths, in fixed priority order — mirrors fuse()'s "apply
    // overrides before the weighted combine" structure.
    if !input.format.valid {
        return (
            RiskAssessment {
                risk_score: 0.8,
                decision: Decision::Block,
                block_reason: Some("invalid_format".to_string()),
            },
            signals,
        );
    }
    if input.domain.is_disposable {
        return (
            RiskAssessment {
                risk_score: 0.95,
                decision: Decision::Block,
                block_reason: Some("disposable_domain".to_string()),
            },
            signals,
        );
    }
    if input.format.entropy_score > 0.7 {
        let score = input.format.entropy_score;
        return (
            RiskAssessment {
                risk_score: score,
                decision: decide(score, config),
                block_reason: Some("high_entropy".to_string()),
            },
            signals,
        );
    }

    let weights = config.weights;
    let domain_based_risk =
        input.domain.reputation_score * weights.domain_reputation + input.domain.tld_profile.multiplier * weights.tld_risk;

    let local_part_candidates = [
        input.format.entropy_score * weights.entropy,
        input.pattern_risk_score * weights.pattern,
        markov::detector_risk(input.markov) * weights.markov,
    ];
    let local_part_risk = local_part_candidates.iter().cloned().fold(0.0, f64::max);

    let risk_score = (domain_based_risk + local_part_risk).min(1.0);
    let decision = decide(risk_score, config);

    let block_reason = if decision == Decision::Block || decision == Decision::Warn {
        Some(dominant_reason(input, &weights))
    } else {
        None
    };

    (RiskAssessment { risk_score, decision, block_reason }, signals)
}

fn decide(score: f64, config: &Configuration) -> Decision {
    if score >= config.thresholds.block {
        Decision::Block
    } else if score >= config.thresholds.warn {
        Decision::Warn
    } else {
        Decision::Allow
    }
}

/// Picks the single highest-*contributing* (weighted, not raw) axis
/// and names it; a pattern-axis win is further disambiguated by which
/// individual detector actually drove the pattern score.
fn dominant_reason(input: &AggregatorInput, weights: &crate::types::RiskWeights) -> String {
    const TLD: &str = "tld";
    const DOMAIN_REPUTATION: &str = "domain_reputation";
    const ENTROPY: &str = "entropy";
    const PATTERN: &str = "pattern";
    const MARKOV: &str = "markov";

    let candidates: [(&str, f64); 5] = [
        (TLD, input.domain.tld_profile.multiplier * weights.tld_risk),
        (DOMAIN_REPUTATION, input.domain.reputation_score * weights.domain_reputation),
        (ENTROPY, input.format.entropy_score * weights.entropy),
        (PATTERN, input.pattern_risk_score * weights.pattern),
        (MARKOV, markov::detector_risk(input.markov) * weights.markov),
    ];

    let winner = candidates
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(name, _)| *name)
        .unwrap_or(PATTERN);

    match winner {
        TLD => "high_risk_tld".to_string(),
        DOMAIN_REPUTATION => "domain_reputation".to_string(),
        ENTROPY => "entropy_threshold".to_string(),
        MARKOV => "markov_chain_fraud".to_string(),
        _ => pattern_sub_reason(input.patterns),
    }
}

fn pattern_sub_reason(patterns: &PatternSignals) -> String {
    if patterns.dated_hit && patterns.dated_confidence >= 0.6 {
        "dated_pattern".to_string()
    } else if patterns.sequential_hit && patterns.sequential_confidence >= 0.5 {
        "sequential_pattern".to_string()
    } else if patterns.plus_tag_present {
        "plus_addressing_abuse".to_string()
    } else if patterns.gibberish_score >= 0.4 {
        "gibberish_detected".to_string()
    } else if patterns.keyboard_walk_hit {
        "keyboard_walk".to_string()
    } else {
        "suspicious_pattern".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::domain::DomainResult;
    use crate::detect::format::FormatResult;
    use crate::detect::patterns::PatternSignals;
    use crate::markov::EnsembleResult;
    use crate::types::TldProfile;

    fn base_domain() -> DomainResult {
        DomainResult {
            is_disposable: false,
            is_free_provider: false,
            matches_disposable_pattern: false,
            subdomain_depth: 0,
            has_valid_tld: true,
            reputation_score: 0.1,
            tld_profile: TldProfile { category: "generic".into(), multiplier: 0.1 },
            evidence: vec![],
        }
    }

    fn base_format() -> FormatResult {
        FormatResult {
            valid: true,
            format_valid: true,
            entropy_score: 0.2,
            local_part_length: 6,
            reason: None,
        }
    }

    fn base_markov() -> EnsembleResult {
        EnsembleResult { prediction_fraud: false, confidence: 0.0, reasoning: "x", per_order: vec![] }
    }

    #[test]
    fn invalid_format_blocks_regardless_of_other_signals() {
        let mut format = base_format();
        format.valid = false;
        let input = AggregatorInput {
            format: &format,
            domain: &base_domain(),
            patterns: &PatternSignals::default(),
            pattern_risk_score: 0.0,
            markov: &base_markov(),
        };
        let (assessment, _) = aggregate(&input, &Configuration::default());
        assert_eq!(assessment.decision, Decision::Block);
        assert_eq!(assessment.block_reason.as_deref(), Some("invalid_format"));
    }

    #[test]
    fn disposable_domain_blocks() {
        let mut domain = base_domain();
        domain.is_disposable = true;
        let input = AggregatorInput {
            format: &base_format(),
            domain: &domain,
            patterns: &PatternSignals::default(),
            pattern_risk_score: 0.0,
            markov: &base_markov(),
        };
        let (assessment, _) = aggregate(&input, &Configuration::default());
        assert_eq!(assessment.decision, Decision::Block);
        assert_eq!(assessment.block_reason.as_deref(), Some("disposable_domain"));
    }

    #[test]
    fn clean_address_is_allowed() {
        let input = AggregatorInput {
            format: &base_format(),
            domain: &base_domain(),
            patterns: &PatternSignals::default(),
            pattern_risk_score: 0.05,
            markov: &base_markov(),
        };
        let (assessment, _) = aggregate(&input, &Configuration::default());
        assert_eq!(assessment.decision, Decision::Allow);
    }
}
