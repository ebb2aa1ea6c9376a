//! Remote collection store.
//!
//! A keyed cache of fetched collections with stale-while-revalidate reads:
//! - a fresh entry (younger than the stale time, not invalidated) is served
//!   without a request
//! - at most one fetch per key is in flight; concurrent queries for the same
//!   key wait for it and share its result
//! - invalidation marks an entry stale but keeps its data, so screens keep
//!   rendering the previous collection until the refetch lands
//! - a failed fetch sets the error flag and keeps whatever data was cached

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::ClientResult;

/// Cache keys, one per backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKey {
    Products,
    Categories,
    QualityIssues,
    Orders,
    CallLogs,
    SupplierPayments,
    SupplierInvoices,
    InventoryEvents,
    ProductionBatches,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Products => "products",
            CacheKey::Categories => "categories",
            CacheKey::QualityIssues => "order-quality",
            CacheKey::Orders => "orders",
            CacheKey::CallLogs => "call-logs",
            CacheKey::SupplierPayments => "supplier-payments",
            CacheKey::SupplierInvoices => "supplier-invoices",
            CacheKey::InventoryEvents => "inventory-events",
            CacheKey::ProductionBatches => "production-batches",
        }
    }
}

/// Snapshot of one cached collection.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<Arc<Vec<T>>>,
    /// No data yet and a fetch is in flight.
    pub is_loading: bool,
    /// The last fetch failed.
    pub is_error: bool,
    pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    /// Cached items, or an empty slice while nothing has loaded.
    pub fn items(&self) -> &[T] {
        self.data.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_deref().map(Vec::as_slice)
    }
}

type Shared = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Entry {
    data: Option<Shared>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    error: Option<String>,
    in_flight: usize,
    flight: Arc<tokio::sync::Mutex<()>>,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self.error.is_none()
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    fn snapshot<T: Send + Sync + 'static>(&self, key: CacheKey) -> QueryState<T> {
        let data = self.data.clone().and_then(|d| match d.downcast::<Vec<T>>() {
            Ok(items) => Some(items),
            Err(_) => {
                error!(key = key.as_str(), "cached collection has an unexpected type");
                None
            }
        });
        QueryState {
            is_loading: data.is_none() && self.in_flight > 0,
            is_error: self.error.is_some(),
            error: self.error.clone(),
            data,
        }
    }
}

/// One query waiting for or running a fetch. Released on drop, so a query
/// whose future is cancelled mid-fetch does not leave the key loading.
struct InFlight<'a> {
    store: &'a CollectionStore,
    key: CacheKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.store.entries().get_mut(&self.key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }
}

pub struct CollectionStore {
    stale_time: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl core::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("stale_time", &self.stale_time)
            .field("keys", &self.entries().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CollectionStore {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current state without fetching.
    pub fn peek<T: Send + Sync + 'static>(&self, key: CacheKey) -> QueryState<T> {
        self.entries()
            .get(&key)
            .map(|e| e.snapshot(key))
            .unwrap_or_default()
    }

    /// Mark stale. Data stays visible until the next fetch replaces it.
    pub fn invalidate(&self, key: CacheKey) {
        if let Some(entry) = self.entries().get_mut(&key) {
            entry.invalidated = true;
            debug!(key = key.as_str(), "cache invalidated");
        }
    }

    /// Serve from cache when fresh, otherwise fetch (once per key at a time).
    pub async fn query<T, F, Fut>(&self, key: CacheKey, fetch: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        let (flight, in_flight) = {
            let mut entries = self.entries();
            let entry = entries.entry(key).or_default();
            if entry.is_fresh(self.stale_time) {
                debug!(key = key.as_str(), "cache hit");
                return entry.snapshot(key);
            }
            entry.in_flight += 1;
            (entry.flight.clone(), InFlight { store: self, key })
        };

        let _turn = flight.lock().await;

        // Someone else may have refreshed the entry while we waited.
        let refreshed = self
            .entries()
            .get(&key)
            .is_some_and(|entry| entry.is_fresh(self.stale_time));
        if refreshed {
            drop(in_flight);
            debug!(key = key.as_str(), "shared in-flight fetch");
            return self.peek(key);
        }

        let result = fetch().await;
        drop(in_flight);

        let mut entries = self.entries();
        let entry = entries.entry(key).or_default();
        match result {
            Ok(items) => {
                info!(key = key.as_str(), count = items.len(), "collection fetched");
                entry.data = Some(Arc::new(items) as Shared);
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.error = None;
            }
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "collection fetch failed");
                entry.error = Some(e.user_message());
            }
        }
        entry.snapshot(key)
    }

    /// Invalidate then fetch immediately.
    pub async fn refetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        self.invalidate(key);
        self.query(key, fetch).await
    }
}
