// Backend-agnostic key-value store trait. `redis_state.rs` in the
// teacher hard-coded a Redis-shaped stub that logged intent without
// actually connecting; here the same "stub mode, log what would
// happen" discipline is kept but behind a trait so a real backend can
// be dropped in without touching callers.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::error::ErrorKind;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ErrorKind>;
    async fn set(&self, key: &str, value: String) -> Result<(), ErrorKind>;
    async fn delete(&self, key: &str) -> Result<(), ErrorKind>;
}

/// In-memory store used in tests and as the zero-config default. A
/// production deployment swaps this for a real backend (Redis, etcd,
/// ...) behind the same trait.
#[derive(Default)]
pub struct MemoryKv {
    data: DashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        debug!("MemoryKv initialized — no external store configured");
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, ErrorKind> {
        Ok(self.data.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ErrorKind> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ErrorKind> {
        self.data.remove(key);
        Ok(())
    }
}
