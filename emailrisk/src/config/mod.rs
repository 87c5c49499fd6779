// Layered configuration: compiled defaults, overlaid with a KV-stored
// object, overlaid with a secrets layer. Mirrors the typed-struct
// discipline of the teacher's `redis_state.rs::RedisConfig` (a real
// struct with a sensible `Default`, not an ambient hashmap), merged
// with the per-section `#[serde(default)]` layering style used by
// config modules in the broader example pack.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ErrorKind;
use crate::kv::KvStore;
use crate::types::{RiskThresholds, RiskWeights};

const CONFIG_KEY: &str = "config.json";
const SECRETS_KEY: &str = "config.secrets.json";
const CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub origin_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self { origin_url: String::new(), log_level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Pipeline toggles gating detector and integration behaviour. All
/// default "on" except the verbose decision log, which is opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub enable_disposable_check: bool,
    #[serde(default = "default_true")]
    pub enable_pattern_check: bool,
    #[serde(default = "default_true")]
    pub enable_origin_headers: bool,
    #[serde(default)]
    pub log_all_validations: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_disposable_check: true,
            enable_pattern_check: true,
            enable_origin_headers: true,
            log_all_validations: false,
        }
    }
}

/// Secrets overlay — loaded from a separate KV key and merged on top
/// of the rest of the configuration, never persisted alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    #[serde(default)]
    pub admin_api_key: String,
    #[serde(default)]
    pub refresh_source_credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub weights: RiskWeights,
    #[serde(default)]
    pub thresholds: RiskThresholds,
    #[serde(default)]
    pub flags: FeatureFlags,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1".to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            flags: FeatureFlags::default(),
            integration: IntegrationConfig::default(),
            secrets: SecretsConfig::default(),
            version: default_version(),
        }
    }
}

/// A partial configuration for `PATCH /admin/config` — every field
/// optional, merged into the existing configuration field-by-field.
/// Secrets are never patched through this path; use `seed_secrets`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigPatch {
    pub weights: Option<RiskWeights>,
    pub thresholds: Option<RiskThresholds>,
    pub flags: Option<FeatureFlags>,
    pub integration: Option<IntegrationConfig>,
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ErrorKind> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ErrorKind::InvalidConfig(format!(
                "risk weights must sum to 1.0, got {sum}"
            )));
        }
        if !(0.0 < self.thresholds.warn && self.thresholds.warn < self.thresholds.block
            && self.thresholds.block < 1.0)
        {
            return Err(ErrorKind::InvalidConfig(
                "thresholds must satisfy 0 < warn < block < 1".into(),
            ));
        }
        if !self.integration.origin_url.is_empty()
            && !(self.integration.origin_url.starts_with("http://")
                || self.integration.origin_url.starts_with("https://"))
        {
            return Err(ErrorKind::InvalidConfig(
                "integration.origin_url must be an absolute URL".into(),
            ));
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(w) = patch.weights {
            self.weights = w;
        }
        if let Some(t) = patch.thresholds {
            self.thresholds = t;
        }
        if let Some(f) = patch.flags {
            self.flags = f;
        }
        if let Some(i) = patch.integration {
            self.integration = i;
        }
    }
}

struct Cached {
    config: Configuration,
    fetched_at: std::time::Instant,
}

/// Read-through cache over a `KvStore`, same discipline as
/// `redis_state.rs`: on a read failure, fall back to whatever is
/// cached rather than failing the request outright.
pub struct ConfigStore {
    kv: Arc<dyn KvStore>,
    cache: RwLock<Option<Cached>>,
}

impl ConfigStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv, cache: RwLock::new(None) }
    }

    pub async fn get(&self) -> Configuration {
        if let Some(cached) = self.cache.read().as_ref() {
            if cached.fetched_at.elapsed() < CACHE_TTL {
                return cached.config.clone();
            }
        }
        self.reload().await
    }

    async fn reload(&self) -> Configuration {
        let loaded = match self.kv.get(CONFIG_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Configuration>(&raw) {
                Ok(cfg) => match cfg.validate() {
                    Ok(()) => Some(cfg),
                    Err(e) => {
                        warn!("stored configuration failed validation: {e}, using defaults");
                        None
                    }
                },
                Err(e) => {
                    warn!("stored configuration failed to parse: {e}, using defaults");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("configuration store unavailable ({e}), serving stale/default");
                if let Some(cached) = self.cache.read().as_ref() {
                    return cached.config.clone();
                }
                None
            }
        };

        let mut config = loaded.unwrap_or_default();
        config.secrets = self.load_secrets().await;
        *self.cache.write() =
            Some(Cached { config: config.clone(), fetched_at: std::time::Instant::now() });
        config
    }

    /// Secrets are stored under their own key, separate from the rest
    /// of the configuration, and overlaid onto every load. A missing
    /// or unreadable secrets document degrades to empty secrets
    /// rather than failing the load.
    async fn load_secrets(&self) -> SecretsConfig {
        match self.kv.get(SECRETS_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("stored secrets failed to parse: {e}, using defaults");
                SecretsConfig::default()
            }),
            Ok(None) => SecretsConfig::default(),
            Err(e) => {
                warn!("secrets store unavailable ({e}), serving without secrets overlay");
                SecretsConfig::default()
            }
        }
    }

    /// Writes the secrets overlay directly, bypassing `Configuration`
    /// validation (secrets have no stated validation rule) and
    /// invalidating the cache so the next `get` picks them up.
    pub async fn seed_secrets(&self, secrets: SecretsConfig) -> Result<(), ErrorKind> {
        let raw = serde_json::to_string(&secrets)
            .map_err(|e| ErrorKind::Internal(format!("secrets serialize failed: {e}")))?;
        self.kv.set(SECRETS_KEY, raw).await?;
        self.invalidate();
        Ok(())
    }

    pub async fn patch(&self, patch: ConfigPatch) -> Result<Configuration, ErrorKind> {
        let mut config = self.get().await;
        config.apply_patch(patch);
        self.put(config).await
    }

    pub async fn put(&self, config: Configuration) -> Result<Configuration, ErrorKind> {
        config.validate()?;

        let mut stored = config.clone();
        stored.secrets = SecretsConfig::default();
        let raw = serde_json::to_string(&stored)
            .map_err(|e| ErrorKind::Internal(format!("config serialize failed: {e}")))?;
        self.kv.set(CONFIG_KEY, raw).await?;
        info!("configuration updated, version {}", config.version);

        let mut result = config;
        result.secrets = self.load_secrets().await;
        *self.cache.write() =
            Some(Cached { config: result.clone(), fetched_at: std::time::Instant::now() });
        Ok(result)
    }

    pub async fn reset(&self) -> Configuration {
        match self.put(Configuration::default()).await {
            Ok(config) => config,
            Err(_) => Configuration::default(),
        }
    }

    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[tokio::test]
    async fn defaults_are_valid() {
        assert!(Configuration::default().validate().is_ok());
    }

    #[tokio::test]
    async fn rejects_weights_not_summing_to_one() {
        let mut cfg = Configuration::default();
        cfg.weights.markov = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[tokio::test]
    async fn round_trips_through_store() {
        let store = ConfigStore::new(Arc::new(MemoryKv::new()));
        let mut cfg = store.get().await;
        cfg.thresholds.warn = 0.2;
        cfg.thresholds.block = 0.6;
        let saved = store.put(cfg).await.unwrap();
        store.invalidate();
        let reloaded = store.get().await;
        assert_eq!(reloaded.thresholds.warn, saved.thresholds.warn);
    }

    #[tokio::test]
    async fn seeded_secret_is_overlaid_on_next_load() {
        let store = ConfigStore::new(Arc::new(MemoryKv::new()));
        store.seed_secrets(SecretsConfig { admin_api_key: "s3cr3t".into(), ..Default::default() }).await.unwrap();
        let config = store.get().await;
        assert_eq!(config.secrets.admin_api_key, "s3cr3t");
    }

    #[tokio::test]
    async fn put_does_not_persist_secrets_in_the_main_document() {
        let store = ConfigStore::new(Arc::new(MemoryKv::new()));
        store.seed_secrets(SecretsConfig { admin_api_key: "s3cr3t".into(), ..Default::default() }).await.unwrap();
        let mut cfg = store.get().await;
        cfg.thresholds.warn = 0.25;
        let saved = store.put(cfg).await.unwrap();
        assert_eq!(saved.secrets.admin_api_key, "s3cr3t");

        let raw = store.kv.get(CONFIG_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("s3cr3t"));
    }
}
