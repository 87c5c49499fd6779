// Request-fingerprint deriver: a single composite SHA-256 hash over
// the request attributes, the same idiom
// `workers/fingerprint.rs::header_order_hash` uses (missing components
// collapse to an empty string rather than aborting the hash).

use sha2::{Digest, Sha256};

use crate::types::{Fingerprint, RequestMeta};

pub fn derive(meta: &RequestMeta) -> Fingerprint {
    let raw = format!(
        "{}|{}|{}|{}|{}",
        meta.ip.as_deref().unwrap_or(""),
        meta.ja4.as_deref().unwrap_or(""),
        meta.asn.as_deref().unwrap_or(""),
        meta.device_type.as_deref().unwrap_or(""),
        meta.bot_score.map(|s| s.to_string()).unwrap_or_default(),
    );
    let hash = hex::encode(Sha256::digest(raw.as_bytes()));

    Fingerprint {
        hash,
        country: meta.country.clone(),
        asn: meta.asn.clone(),
        bot_score: meta.bot_score,
        ja4: meta.ja4.clone(),
        ja3: meta.ja3.clone(),
        user_agent: meta.user_agent.clone(),
        device_type: meta.device_type.clone(),
    }
}
