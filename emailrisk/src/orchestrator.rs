// Request orchestrator — the pipeline that turns a raw email plus
// request metadata into a `ValidationResult`, the generalization of
// `main.rs::Pipeline::process` (ingest -> fan out workers -> fuse ->
// dispatch) to this service's synchronous validate-and-respond flow.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::config::ConfigStore;
use crate::detect::{domain, family, format, patterns};
use crate::engine::aggregator::{self, AggregatorInput};
use crate::error::ErrorKind;
use crate::fingerprint;
use crate::markov::Ensemble;
use crate::otel::Metrics;
use crate::recorder::Recorder;
use crate::reference::ReferenceData;
use crate::types::{DecisionRecord, DetectorSignals, RawEmail, RequestMeta, ValidationResult};

const SOFT_BUDGET: Duration = Duration::from_millis(50);
const HARD_BUDGET: Duration = Duration::from_millis(200);

pub struct Orchestrator {
    pub config: Arc<ConfigStore>,
    pub reference: Arc<ReferenceData>,
    pub markov: Arc<Ensemble>,
    pub recorder: Arc<Recorder>,
    pub metrics: Arc<Metrics>,
}

impl Orchestrator {
    pub async fn validate(
        &self,
        email: &RawEmail,
        meta: RequestMeta,
        consumer: String,
        flow: String,
    ) -> Result<ValidationResult, ErrorKind> {
        let start = Instant::now();
        let fp = fingerprint::derive(&meta);

        let work = self.run_pipeline(email, fp.clone());
        let result = match tokio::time::timeout(HARD_BUDGET, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!("validation exceeded hard latency budget, degrading to warn");
                degraded_result(email, &fp)
            }
        };

        let latency = start.elapsed();
        if latency > SOFT_BUDGET {
            warn!(latency_ms = latency.as_millis() as u64, "validation exceeded soft latency budget");
        }

        let mut result = result?;
        result.latency_ms = latency.as_millis() as u64;

        self.metrics.record_risk_score(result.risk_score);
        self.metrics.record_latency(result.latency_ms);

        let config = self.config.get().await;
        let record = build_record(email, &result, &consumer, &flow, &config.version);
        self.recorder.record(record, &config).await;

        Ok(result)
    }

    async fn run_pipeline(
        &self,
        email: &RawEmail,
        fp: crate::types::Fingerprint,
    ) -> Result<ValidationResult, ErrorKind> {
        let config = self.config.get().await;

        let normalised = format::normalise(&email.0)
            .ok_or_else(|| ErrorKind::InvalidFormat("missing '@' separator".to_string()))?;
        let format_result = format::validate(&normalised);

        if !format_result.valid {
            let signals = DetectorSignals {
                format_valid: false,
                entropy_score: format_result.entropy_score,
                local_part_length: format_result.local_part_length,
                invalid_reason: format_result.reason.clone(),
                ..Default::default()
            };
            return Ok(ValidationResult {
                valid: false,
                decision: crate::types::Decision::Block,
                risk_score: 0.8,
                signals,
                fingerprint: fp,
                message: Some("invalid_format".to_string()),
                latency_ms: 0,
            });
        }

        let (domain_result, pattern_signals, markov_result) = tokio::join!(
            async {
                domain::classify(&normalised.domain, &self.reference, config.flags.enable_disposable_check)
            },
            async { patterns::run_all(&normalised.local_part) },
            async { self.markov.predict(&normalised.local_part) },
        );

        let (family, pattern_risk_score) = if config.flags.enable_pattern_check {
            let family = family::extract(&pattern_signals.stripped_local, &pattern_signals, &normalised.domain);
            let risk = family::pattern_risk_score(
                &family,
                &pattern_signals,
                domain_result.is_free_provider,
                domain_result.is_disposable,
            );
            (Some(family), risk)
        } else {
            (None, 0.0)
        };

        let input = AggregatorInput {
            format: &format_result,
            domain: &domain_result,
            patterns: &pattern_signals,
            pattern_risk_score,
            markov: &markov_result,
        };
        let (assessment, _signal_map) = aggregator::aggregate(&input, &config);

        let signals = DetectorSignals {
            format_valid: true,
            entropy_score: format_result.entropy_score,
            local_part_length: format_result.local_part_length,
            invalid_reason: None,
            is_disposable: domain_result.is_disposable,
            is_free_provider: domain_result.is_free_provider,
            matches_disposable_pattern: domain_result.matches_disposable_pattern,
            subdomain_depth: domain_result.subdomain_depth,
            has_valid_tld: domain_result.has_valid_tld,
            reputation_score: domain_result.reputation_score,
            tld_category: domain_result.tld_profile.category.clone(),
            tld_risk_score: domain_result.tld_profile.multiplier,
            sequential_hit: pattern_signals.sequential_hit,
            sequential_confidence: pattern_signals.sequential_confidence,
            dated_hit: pattern_signals.dated_hit,
            dated_confidence: pattern_signals.dated_confidence,
            plus_tag_present: pattern_signals.plus_tag_present,
            plus_tag_suspicious: pattern_signals.plus_tag_suspicious,
            keyboard_walk_hit: pattern_signals.keyboard_walk_hit,
            keyboard_walk_confidence: pattern_signals.keyboard_walk_confidence,
            gibberish_score: pattern_signals.gibberish_score,
            gibberish_confidence: pattern_signals.gibberish_confidence,
            family,
            pattern_risk_score,
            markov_prediction_fraud: markov_result.prediction_fraud,
            markov_confidence: markov_result.confidence,
            markov_reasoning: markov_result.reasoning.to_string(),
        };

        Ok(ValidationResult {
            valid: assessment.decision != crate::types::Decision::Block,
            decision: assessment.decision,
            risk_score: assessment.risk_score,
            signals,
            fingerprint: fp,
            message: assessment.block_reason,
            latency_ms: 0,
        })
    }
}

fn degraded_result(email: &RawEmail, fp: &crate::types::Fingerprint) -> Result<ValidationResult, ErrorKind> {
    let _ = email;
    Ok(ValidationResult {
        valid: true,
        decision: crate::types::Decision::Warn,
        risk_score: 0.5,
        signals: DetectorSignals::default(),
        fingerprint: fp.clone(),
        message: Some("timeout_degraded".to_string()),
        latency_ms: 0,
    })
}

/// Hashes the canonical per-inbox identity rather than the raw
/// submitted text, so two Gmail dot/plus-tag variants of the same
/// address collapse to the same hash for dedup/rate-limiting.
fn email_hash(email: &RawEmail) -> String {
    let canonical = match format::normalise(&email.0) {
        Some(normalised) => format::canonical_identity(&normalised).full(),
        None => email.0.to_lowercase(),
    };
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)[..16].to_string()
}

fn risk_bucket(risk_score: f64) -> &'static str {
    if risk_score >= 0.6 {
        "high"
    } else if risk_score >= 0.3 {
        "medium"
    } else {
        "low"
    }
}

/// The literal TLD suffix of a domain, e.g. "example.co.uk" -> "uk".
fn extract_tld(domain: &str) -> String {
    domain.rsplit('.').next().unwrap_or(domain).to_string()
}

/// ASN transport signals arrive as free-form strings (e.g. "AS15169");
/// the sink schema wants a bare number, so non-digit characters are
/// stripped and an unparsable/missing value becomes `0.0`.
fn parse_asn(asn: &Option<String>) -> f64 {
    asn.as_deref()
        .map(|s| s.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0.0)
}

fn build_record(
    email: &RawEmail,
    result: &ValidationResult,
    consumer: &str,
    flow: &str,
    config_version: &str,
) -> DecisionRecord {
    let domain = format::normalise(&email.0).map(|e| e.domain).unwrap_or_default();
    let tld = extract_tld(&domain);
    let pattern_type = result.signals.family.as_ref().map(|f| f.kind.to_string()).unwrap_or_default();
    let pattern_family = result.signals.family.as_ref().map(|f| f.family_hash.clone());
    let email_local_part = result.signals.family.as_ref().map(|f| f.base_structure.clone()).unwrap_or_default();

    DecisionRecord {
        record_id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        consumer: consumer.to_string(),
        flow: flow.to_string(),
        config_version: config_version.to_string(),

        decision: result.decision.to_string(),
        block_reason: result.message.clone(),
        country: result.fingerprint.country.clone(),
        risk_bucket: risk_bucket(result.risk_score).to_string(),
        domain,
        tld,
        pattern_type,
        pattern_family,
        is_disposable: result.signals.is_disposable,
        is_free_provider: result.signals.is_free_provider,
        has_plus_addressing: result.signals.plus_tag_present,
        has_keyboard_walk: result.signals.keyboard_walk_hit,
        is_gibberish: result.signals.gibberish_score >= 0.4,
        email_local_part,

        risk_score: result.risk_score,
        entropy_score: result.signals.entropy_score,
        bot_score: result.fingerprint.bot_score.unwrap_or(0.0),
        asn: parse_asn(&result.fingerprint.asn),
        latency_ms: result.latency_ms,
        tld_risk_score: result.signals.tld_risk_score,
        domain_reputation_score: result.signals.reputation_score,
        pattern_confidence: result.signals.family.as_ref().map(|f| f.confidence).unwrap_or(0.0),

        fingerprint_hash: result.fingerprint.hash.clone(),

        email_hash: email_hash(email),
        evidence: Vec::new(),
    }
}
