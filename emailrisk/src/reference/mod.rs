// Reference-data store: disposable domains, free providers, TLD risk
// profiles, keyboard layouts. Each table is held behind an `ArcSwap` so
// a background refresh can publish a whole new table atomically
// without callers ever observing a half-built one — the same
// copy-on-write discipline the teacher documents for its DashMap-backed
// `StateStore`, generalized from per-entry locks to a whole-table swap
// because these tables are replaced wholesale on refresh, not mutated
// incrementally.

pub mod disposable;
pub mod free;
pub mod keyboard;
pub mod tld;

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::types::TldProfile;
use disposable::DisposableTable;
use free::FreeProviderTable;
use tld::TldTable;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 3600);

pub struct ReferenceData {
    disposable: ArcSwap<DisposableTable>,
    free: ArcSwap<FreeProviderTable>,
    tld: ArcSwap<TldTable>,
}

impl ReferenceData {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            disposable: ArcSwap::from_pointee(DisposableTable::fallback()),
            free: ArcSwap::from_pointee(FreeProviderTable::fallback()),
            tld: ArcSwap::from_pointee(TldTable::fallback()),
        })
    }

    pub fn is_disposable(&self, domain: &str) -> bool {
        self.disposable.load().contains(domain)
    }

    pub fn matches_disposable_pattern(&self, domain: &str) -> bool {
        self.disposable.load().matches_pattern(domain)
    }

    pub fn is_free_provider(&self, domain: &str) -> bool {
        self.free.load().contains(domain)
    }

    pub fn tld_profile(&self, domain: &str) -> TldProfile {
        self.tld.load().profile_for(domain)
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.disposable.load().len(), self.free.load().len(), self.tld.load().len())
    }

    /// Fetch fresh copies of every table from their HTTPS sources and
    /// atomically publish them. On source failure, the previous table
    /// is left untouched — never fail closed on a transient outage.
    pub async fn refresh_all(self: &Arc<Self>, source_base: &str) {
        self.refresh_disposable(source_base).await;
        self.refresh_free(source_base).await;
    }

    async fn refresh_disposable(self: &Arc<Self>, source_base: &str) {
        match DisposableTable::fetch(source_base).await {
            Ok(table) => {
                info!("disposable domain table refreshed: {} entries", table.len());
                self.disposable.store(Arc::new(table));
            }
            Err(e) => warn!("disposable domain refresh failed, keeping stale table: {e}"),
        }
    }

    async fn refresh_free(self: &Arc<Self>, source_base: &str) {
        match FreeProviderTable::fetch(source_base).await {
            Ok(table) => {
                info!("free-provider table refreshed: {} entries", table.len());
                self.free.store(Arc::new(table));
            }
            Err(e) => warn!("free-provider refresh failed, keeping stale table: {e}"),
        }
    }

    /// Background loop, one per deployment, modeled on
    /// `redis_state.rs::checkpoint_loop` / `ioc_feed.rs::poll_loop`.
    pub async fn refresh_loop(self: Arc<Self>, source_base: String, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;
            self.refresh_all(&source_base).await;
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            disposable: ArcSwap::from_pointee(DisposableTable::fallback()),
            free: ArcSwap::from_pointee(FreeProviderTable::fallback()),
            tld: ArcSwap::from_pointee(TldTable::fallback()),
        }
    }
}
