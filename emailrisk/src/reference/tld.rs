use std::collections::HashMap;

use crate::types::TldProfile;

/// `(multiplier − 0.2) / 2.8`, clamped to `[0, 1]`. A multiplier of 0.2
/// (the lowest-risk TLDs) maps to 0.0; a multiplier of 3.0 (the
/// highest-risk ones) maps to 1.0.
fn risk_from_multiplier(multiplier: f64) -> f64 {
    ((multiplier - 0.2) / 2.8).clamp(0.0, 1.0)
}

const FALLBACK_PROFILES: &[(&str, &str, f64)] = &[
    ("com", "generic", 0.4),
    ("org", "generic", 0.3),
    ("net", "generic", 0.4),
    ("edu", "institutional", 0.2),
    ("gov", "institutional", 0.2),
    ("io", "tech", 0.6),
    ("co", "tech", 0.8),
    ("xyz", "high_risk", 2.4),
    ("top", "high_risk", 2.6),
    ("tk", "high_risk", 3.0),
    ("ml", "high_risk", 3.0),
    ("gq", "high_risk", 3.0),
    ("cf", "high_risk", 3.0),
    ("info", "high_risk", 1.8),
    ("biz", "high_risk", 1.6),
    ("ru", "regional", 1.2),
    ("cn", "regional", 1.0),
];

pub struct TldTable {
    profiles: HashMap<String, TldProfile>,
}

impl TldTable {
    pub fn fallback() -> Self {
        let profiles = FALLBACK_PROFILES
            .iter()
            .map(|(tld, category, multiplier)| {
                (
                    tld.to_string(),
                    TldProfile { category: category.to_string(), multiplier: *multiplier },
                )
            })
            .collect();
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profile_for(&self, domain: &str) -> TldProfile {
        let tld = domain.rsplit('.').next().unwrap_or("").to_lowercase();
        match self.profiles.get(&tld) {
            Some(profile) => TldProfile {
                category: profile.category.clone(),
                multiplier: risk_from_multiplier(profile.multiplier),
            },
            None => TldProfile { category: "unknown".to_string(), multiplier: 0.15 },
        }
    }
}
