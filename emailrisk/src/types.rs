// Shared domain types — one module, imported by every other module, the
// same way glasswally centralized its wire/domain types in `events.rs`.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw, as-submitted email address. `Debug` never prints the value —
/// the pipeline must not let a cleartext address leak into a log line
/// via a stray `{:?}`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawEmail(pub String);

impl fmt::Debug for RawEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for RawEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RawEmail {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lowercased, trimmed email split into its two halves. Normalisation is
/// idempotent: normalising an already-normalised email is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalisedEmail {
    pub local_part: String,
    pub domain: String,
}

impl NormalisedEmail {
    pub fn full(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// A classification of the local-part's surface structure, used both as
/// a risk signal in its own right and as the key for the family hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternFamilyKind {
    Dated,
    Sequential,
    PlusTagged,
    RandomLooking,
    Formatted,
    Simple,
}

impl fmt::Display for PatternFamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dated => "dated",
            Self::Sequential => "sequential",
            Self::PlusTagged => "plus_tagged",
            Self::RandomLooking => "random_looking",
            Self::Formatted => "formatted",
            Self::Simple => "simple",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternFamily {
    pub kind: PatternFamilyKind,
    pub base_structure: String,
    /// The full family string the hash is taken over, e.g.
    /// `"WORD.NUM.YEAR@example.com"`.
    pub family_string: String,
    pub family_hash: String,
    pub confidence: f64,
}

/// The raw per-detector outputs, before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetectorSignals {
    pub format_valid: bool,
    pub entropy_score: f64,
    pub local_part_length: usize,
    pub invalid_reason: Option<String>,

    pub is_disposable: bool,
    pub is_free_provider: bool,
    pub matches_disposable_pattern: bool,
    pub subdomain_depth: u32,
    pub has_valid_tld: bool,
    pub reputation_score: f64,
    pub tld_category: String,
    pub tld_risk_score: f64,

    pub sequential_hit: bool,
    pub sequential_confidence: f64,
    pub dated_hit: bool,
    pub dated_confidence: f64,
    pub plus_tag_present: bool,
    pub plus_tag_suspicious: bool,
    pub keyboard_walk_hit: bool,
    pub keyboard_walk_confidence: f64,
    pub gibberish_score: f64,
    pub gibberish_confidence: f64,

    pub family: Option<PatternFamily>,
    pub pattern_risk_score: f64,

    pub markov_prediction_fraud: bool,
    pub markov_confidence: f64,
    pub markov_reasoning: String,
}

/// Weighted contributions into the composite score. Must sum to 1.0 —
/// enforced by `Configuration::validate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskWeights {
    pub domain_reputation: f64,
    pub tld_risk: f64,
    pub entropy: f64,
    pub pattern: f64,
    pub markov: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            domain_reputation: 0.15,
            tld_risk: 0.15,
            entropy: 0.05,
            pattern: 0.30,
            markov: 0.35,
        }
    }
}

impl RiskWeights {
    pub fn sum(&self) -> f64 {
        self.domain_reputation + self.tld_risk + self.entropy + self.pattern + self.markov
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub warn: f64,
    pub block: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { warn: 0.3, block: 0.6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Warn,
    Block,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Block => "block",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TldProfile {
    pub category: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub ja4: Option<String>,
    pub ja3: Option<String>,
    pub asn: Option<String>,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub bot_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub country: Option<String>,
    pub asn: Option<String>,
    pub bot_score: Option<f64>,
    pub ja4: Option<String>,
    pub ja3: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
}

/// Result returned from the aggregator, and the payload handed to
/// `ValidationResult`/`DecisionRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub decision: Decision,
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub decision: Decision,
    pub risk_score: f64,
    pub signals: DetectorSignals,
    pub fingerprint: Fingerprint,
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// One record per validation, written to the observability sink. The 14
/// string / 8 numeric / 1 indexed core fields below keep their relative
/// order stable; `email_local_part` is a coarse structural skeleton
/// (e.g. "WORD-NUM"), never the submitted text, so the sink stays
/// privacy-safe without losing the pattern-shape signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub record_id: String,
    pub timestamp: DateTime<Utc>,
    pub consumer: String,
    pub flow: String,
    pub config_version: String,

    pub decision: String,
    pub block_reason: Option<String>,
    pub country: Option<String>,
    pub risk_bucket: String,
    pub domain: String,
    pub tld: String,
    pub pattern_type: String,
    pub pattern_family: Option<String>,
    pub is_disposable: bool,
    pub is_free_provider: bool,
    pub has_plus_addressing: bool,
    pub has_keyboard_walk: bool,
    pub is_gibberish: bool,
    pub email_local_part: String,

    pub risk_score: f64,
    pub entropy_score: f64,
    pub bot_score: f64,
    pub asn: f64,
    pub latency_ms: u64,
    pub tld_risk_score: f64,
    pub domain_reputation_score: f64,
    pub pattern_confidence: f64,

    pub fingerprint_hash: String,

    pub email_hash: String,
    pub evidence: Vec<String>,
}

pub type SignalMap = HashMap<String, f64>;
